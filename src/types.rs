use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized, fixed-width postal code.
///
/// Only [`crate::normalize::normalize`] builds keys from raw input, so two keys
/// are equal exactly when their normalized text is identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Every key found within a radius of a query key, in service order, without duplicates.
/// An empty result means "no data known", never "error".
pub type LookupResult = Vec<Key>;

/// Core seam for the remote radius lookup.
///
/// Implementations never fail: transport and parsing problems are reported by
/// the implementation and surface here as an empty result.
pub trait RadiusLookup {
    /// Fetch every key within `radius` of `key`
    fn radius_zips(&self, key: &Key, radius: u32) -> LookupResult;
}
