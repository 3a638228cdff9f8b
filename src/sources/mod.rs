//! Input collaborators: name lists and the medication catalog.

pub mod catalog;
pub mod names;

use std::path::PathBuf;

use thiserror::Error;

pub use catalog::{builtin_catalog, parse_catalog, Catalog};
pub use names::NameLists;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No usable medication entries in {}", .0.display())]
    EmptyCatalog(PathBuf),
}
