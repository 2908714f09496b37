//! Configuration and dependency wiring for the catalog.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::CatalogSettings;
