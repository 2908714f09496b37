//! Catalog settings read from the environment.

use std::env;
use std::path::PathBuf;

use catalog_ingest::loader::DEFAULT_BATCH_SIZE;
use catalog_ingest::reader::{DEFAULT_CSV_PATH, DEFAULT_ENCODING};
use catalog_repository::config::{
    DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_PORT, DEFAULT_SCHEME, DEFAULT_USERNAME,
};
use catalog_repository::{ConnectionConfig, IdMatch};

use crate::CatalogError;

/// Default identifier field for delete-by-id.
pub const DEFAULT_ID_FIELD: &str = "_id";

/// Everything the catalog client needs besides the search provider itself.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    /// Search service connection.
    pub connection: ConnectionConfig,
    /// CSV file loaded by `index_data`.
    pub csv_path: PathBuf,
    /// Encoding label of the CSV file.
    pub csv_encoding: String,
    /// Documents per bulk request.
    pub batch_size: usize,
    /// Field matched by `del_emp_by_id`.
    pub id_field: String,
    /// How `del_emp_by_id` matches the identifier.
    pub id_match: IdMatch,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            csv_encoding: DEFAULT_ENCODING.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            id_field: DEFAULT_ID_FIELD.to_string(),
            id_match: IdMatch::default(),
        }
    }
}

impl CatalogSettings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CATALOG_HOST`: search service host (default: localhost)
    /// - `CATALOG_PORT`: search service port (default: 8989)
    /// - `CATALOG_SCHEME`: `http` or `https` (default: http)
    /// - `CATALOG_USERNAME`: basic-auth user, empty disables auth (default: elastic)
    /// - `CATALOG_PASSWORD`: basic-auth password (default: elastic)
    /// - `CATALOG_REFRESH`: refresh after writes (default: true)
    /// - `CATALOG_CSV_PATH`: CSV file to index (default: ./Employee Sample Data 1.csv)
    /// - `CATALOG_CSV_ENCODING`: CSV encoding label (default: ISO-8859-1)
    /// - `CATALOG_BATCH_SIZE`: documents per bulk request (default: 500)
    /// - `CATALOG_ID_FIELD`: identifier field for deletes (default: _id)
    /// - `CATALOG_ID_MATCH`: `exact` or `analyzed` (default: exact)
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CatalogError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = parse_var(&lookup, "CATALOG_PORT", DEFAULT_PORT)?;
        let refresh = parse_bool(&lookup, "CATALOG_REFRESH", true)?;
        let batch_size = parse_var(&lookup, "CATALOG_BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        if batch_size == 0 {
            return Err(CatalogError::config("CATALOG_BATCH_SIZE must be at least 1"));
        }

        let scheme = var("CATALOG_SCHEME", DEFAULT_SCHEME).to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(CatalogError::config(format!(
                "CATALOG_SCHEME must be http or https, got '{}'",
                scheme
            )));
        }

        let username = var("CATALOG_USERNAME", DEFAULT_USERNAME);
        let id_match = var("CATALOG_ID_MATCH", "exact")
            .parse::<IdMatch>()
            .map_err(|e| CatalogError::config(e.to_string()))?;

        Ok(Self {
            connection: ConnectionConfig {
                host: var("CATALOG_HOST", DEFAULT_HOST),
                port,
                scheme,
                username: (!username.is_empty()).then_some(username),
                password: var("CATALOG_PASSWORD", DEFAULT_PASSWORD),
                refresh,
            },
            csv_path: PathBuf::from(var("CATALOG_CSV_PATH", DEFAULT_CSV_PATH)),
            csv_encoding: var("CATALOG_CSV_ENCODING", DEFAULT_ENCODING),
            batch_size,
            id_field: var("CATALOG_ID_FIELD", DEFAULT_ID_FIELD),
            id_match,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, CatalogError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CatalogError::config(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}

fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, CatalogError> {
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(CatalogError::config(format!(
            "{} has invalid value '{}'",
            key, v
        ))),
    }
}
