use crate::constants::KEY_WIDTH;
use crate::types::Key;
use std::fmt::Display;

/// Canonicalize a raw zip code into a [`Key`].
///
/// Spreadsheet exports often turn `02139` into `2139` or `2139.0`, so a single
/// trailing `.0` is dropped and the result is left-padded with `0` up to five
/// characters. Longer values are kept as they are.
pub fn normalize(raw: impl Display) -> Key {
    let text = raw.to_string();
    let trimmed = text.strip_suffix(".0").unwrap_or(&text);
    Key::from_normalized(format!("{:0>width$}", trimmed, width = KEY_WIDTH))
}

/// Split a comma-separated key list, trimming whitespace and dropping empty tokens.
pub fn split_keys(field: &str) -> impl Iterator<Item = &str> {
    field.split(',').map(str::trim).filter(|token| !token.is_empty())
}
