//! Star catalog access and identifier resolution.

mod entry;
mod table;

pub use entry::{CatalogEntry, SUBGIANT_MARKER};
pub use table::CatalogTable;

#[cfg(test)]
pub(crate) use entry::sample_entry;
