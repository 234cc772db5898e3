//! Per-instrument archive discovery and loading.
//!
//! Each [`ArchiveFormat`] names its directory, file convention and an ordered
//! list of [`AliasStrategy`] values. [`SourceLoader`] walks that list for
//! every registered format and keeps the first archive it finds; instruments
//! with no archive are recorded and skipped.

mod alias;
mod archive;
mod loader;

pub use alias::{candidates, AliasStrategy};
pub use archive::{
    ActivityKind, ArchiveFormat, HarpsRvBank, HiresEbps, RawArchive, RawRow, HIRES_COLUMNS,
};
pub use loader::{LoadedArchive, LoadedSources, SourceLoader};
