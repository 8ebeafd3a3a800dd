//! eduboost-providers: where student data comes from.
//!
//! Implements the record and feedback stores (a data directory of JSON/CSV
//! files, or a remote records API), the built-in resource catalog and module
//! directory, and configuration loading.

pub mod catalog;
pub mod config;
pub mod error;
pub mod file;
pub mod http;
pub mod mock;

pub use catalog::{builtin_catalog, builtin_modules, find_module, load_catalog};
pub use config::{create_stores, load_config, load_config_from, EduboostConfig, Stores};
pub use error::ProviderError;
pub use file::FileStore;
pub use http::HttpStore;
