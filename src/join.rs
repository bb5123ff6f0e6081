use crate::config::ProviderTable;
use crate::constants::{DERIVED_COLUMN, LABEL_SEPARATOR};
use crate::error::Result;
use crate::normalize::{normalize, split_keys};
use crate::table::Table;
use crate::types::Key;
use crate::union::ordered_union;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// One-to-many mapping of zip code to upper-cased provider labels, in table row order.
#[derive(Debug, Default)]
pub struct ProviderIndex {
    labels: HashMap<Key, Vec<String>>,
}

impl ProviderIndex {
    pub fn from_table(table: &Table, key_column: &str, label_column: &str) -> Result<Self> {
        let key_index = table.require_column(key_column)?;
        let label_index = table.require_column(label_column)?;

        let mut index = Self::default();
        for (raw_key, label) in table
            .column_values(key_index)
            .zip(table.column_values(label_index))
        {
            index.insert(normalize(raw_key), label);
        }
        Ok(index)
    }

    /// Record `label` for `key`; blank labels are ignored.
    pub fn insert(&mut self, key: Key, label: &str) {
        let label = label.trim();
        if label.is_empty() {
            return;
        }
        self.labels
            .entry(key)
            .or_default()
            .push(label.to_uppercase());
    }

    pub fn get(&self, key: &Key) -> Option<&[String]> {
        self.labels.get(key).map(Vec::as_slice)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Union of labels for every key in a comma-separated key list, joined with `", "`.
    pub fn labels_for(&self, keys: &str) -> String {
        let matched = split_keys(keys)
            .map(normalize)
            .filter_map(|key| self.get(&key));
        ordered_union(matched)
            .into_iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(LABEL_SEPARATOR)
    }
}

/// Outcome of joining every configured provider table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinReport {
    pub joined: Vec<String>,
    pub skipped: Vec<PathBuf>,
}

/// Adds one output column per provider table, keyed by the `radius_zips` column.
pub struct ProviderJoin<'a> {
    tables: &'a [ProviderTable],
}

impl<'a> ProviderJoin<'a> {
    pub fn new(tables: &'a [ProviderTable]) -> Self {
        Self { tables }
    }

    /// Join every table whose file exists; missing files are skipped with a warning.
    ///
    /// The derived column is required as soon as one table is actually joined.
    #[instrument(skip_all, fields(tables = self.tables.len()))]
    pub fn run(&self, output: &mut Table) -> Result<JoinReport> {
        let mut report = JoinReport::default();

        for descriptor in self.tables {
            if !descriptor.file.exists() {
                warn!(
                    "Provider file {} not found, skipping column '{}'",
                    descriptor.file.display(),
                    descriptor.output_name()
                );
                report.skipped.push(descriptor.file.clone());
                continue;
            }

            let derived = output.require_column(DERIVED_COLUMN)?;
            let providers = Table::read(&descriptor.file)?;
            let index =
                ProviderIndex::from_table(&providers, &descriptor.key_column, &descriptor.label_column)?;
            info!(
                "Joining {} zip codes from {} into '{}'",
                index.len(),
                descriptor.file.display(),
                descriptor.output_name()
            );

            let values: Vec<String> = output
                .column_values(derived)
                .map(|keys| index.labels_for(keys))
                .collect();
            output.set_column(descriptor.output_name(), values);
            report.joined.push(descriptor.output_name().to_string());
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[(&str, &str)]) -> ProviderIndex {
        let mut index = ProviderIndex::default();
        for (key, label) in entries {
            index.insert(normalize(key), label);
        }
        index
    }

    #[test]
    fn test_labels_for_deduplicates_across_keys() {
        let index = index(&[("00001", "X"), ("00002", "Y"), ("00002", "X")]);
        assert_eq!(index.labels_for("00001,00002"), "X, Y");
    }

    #[test]
    fn test_labels_are_upper_cased_in_row_order() {
        let index = index(&[("98101", "acme health"), ("98101", "Blue Cross"), ("98101", "  ")]);
        assert_eq!(
            index.get(&normalize("98101")),
            Some(&["ACME HEALTH".to_string(), "BLUE CROSS".to_string()][..])
        );
    }

    #[test]
    fn test_unknown_and_blank_keys_contribute_nothing() {
        let index = index(&[("98101", "A")]);
        assert_eq!(index.labels_for(" 98199 , ,98101"), "A");
        assert_eq!(index.labels_for(""), "");
    }

    #[test]
    fn test_from_table_normalizes_key_column() {
        let providers = Table::from_reader(
            "providers.csv",
            "zip_code,provider_name\n2139.0,mass general\n98101,Swedish\n".as_bytes(),
        )
        .unwrap();
        let index = ProviderIndex::from_table(&providers, "zip_code", "provider_name").unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.labels_for("02139"), "MASS GENERAL");
    }

    #[test]
    fn test_from_table_requires_columns() {
        let providers =
            Table::from_reader("providers.csv", "zip,provider_name\n98101,A\n".as_bytes()).unwrap();
        assert!(ProviderIndex::from_table(&providers, "zip_code", "provider_name").is_err());
    }
}
