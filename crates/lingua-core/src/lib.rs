pub mod catalog;

pub use catalog::{
    AUTO_DETECT, CatalogError, DEFAULT_CODE, DEFAULT_NAME, LanguageCatalog, LanguageEntry, is_auto,
};
