//! Merge per-ethnicity heritage data files into one unified file and
//! validate both against the fixed family schema.

pub mod config;
pub mod discovery;
pub mod duplicates;
pub mod errors;
pub mod logging;
pub mod merge;
pub mod model;
pub mod report;
pub mod schema;

pub use config::Layout;
pub use errors::HeritageError;
pub use model::{CategoryFile, UnifiedFile, UnifiedMetadata};
