//! Column and file name constants shared by the pipeline, the join and the CLI.

// Input column holding comma-separated zip codes per row
pub const INPUT_KEYS_COLUMN: &str = "total_zips";

// Column written by the enrichment pipeline
pub const DERIVED_COLUMN: &str = "radius_zips";

// Default key column of provider tables
pub const PROVIDER_KEY_COLUMN: &str = "zip_code";

// Field carrying a result key in the radius API response
pub const RESPONSE_KEY_FIELD: &str = "zipCode";

pub const KEY_WIDTH: usize = 5;
pub const DEFAULT_RADIUS: u32 = 10;

pub const RADIUS_API_URL: &str =
    "https://zip-code-distance-radius.p.rapidapi.com/api/zipCodesWithinRadius";
pub const DEFAULT_CREDENTIALS_FILE: &str = "secrets.json";
pub const DEFAULT_CONFIG_FILE: &str = "radius_zips.toml";
pub const OUTPUT_SUFFIX: &str = ".out.csv";

/// Separator used when writing the derived column.
pub const DERIVED_SEPARATOR: &str = ",";

/// Separator used when writing joined provider labels.
pub const LABEL_SEPARATOR: &str = ", ";

/// File name of the cache snapshot for a radius.
pub fn cache_file_name(radius: u32) -> String {
    format!("cache{}.json", radius)
}
