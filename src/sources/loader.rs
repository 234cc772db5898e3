//! Locate and load every available archive for a resolved star.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::alias::{candidates, AliasStrategy};
use super::archive::{ArchiveFormat, HarpsRvBank, HiresEbps, RawArchive};
use crate::catalog::CatalogEntry;
use crate::context::StarContext;
use crate::core::Instrument;
use crate::error::{PipelineError, Result};

/// Archive located for an instrument, with the alias that found it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedArchive {
    pub alias: AliasStrategy,
    pub designation: String,
    pub archive: RawArchive,
}

/// Outcome of loading all instruments for one star.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSources {
    /// Archives in loader order.
    pub archives: Vec<LoadedArchive>,
    /// Instruments with no file under any alias.
    pub absent: Vec<PipelineError>,
}

impl LoadedSources {
    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    pub fn instruments(&self) -> Vec<Instrument> {
        self.archives.iter().map(|a| a.archive.instrument).collect()
    }

    pub fn raw(&self) -> impl Iterator<Item = &RawArchive> {
        self.archives.iter().map(|a| &a.archive)
    }

    pub fn is_absent(&self, instrument: Instrument) -> bool {
        self.absent.iter().any(|e| {
            matches!(e, PipelineError::SourceNotFound { instrument: i } if *i == instrument)
        })
    }
}

/// Walks each instrument's alias chain under a data directory.
pub struct SourceLoader {
    data_dir: PathBuf,
    formats: Vec<Box<dyn ArchiveFormat>>,
}

impl std::fmt::Debug for SourceLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceLoader")
            .field("data_dir", &self.data_dir)
            .field(
                "formats",
                &self.formats.iter().map(|fmt| fmt.instrument()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl SourceLoader {
    /// Loader with the HARPS RVBank and Keck HIRES EBPS archives.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::empty(data_dir)
            .with_format(Box::new(HarpsRvBank))
            .with_format(Box::new(HiresEbps))
    }

    /// Loader with no archive formats registered.
    pub fn empty(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            formats: Vec::new(),
        }
    }

    /// Append an archive format, tried after those already registered.
    pub fn with_format(mut self, format: Box<dyn ArchiveFormat>) -> Self {
        self.formats.push(format);
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Find the first existing file along a format's alias chain.
    pub fn locate(
        &self,
        format: &dyn ArchiveFormat,
        entry: &CatalogEntry,
    ) -> Option<(AliasStrategy, String, PathBuf)> {
        candidates(format.aliases(), entry)
            .into_iter()
            .find_map(|(alias, designation)| {
                let path = format.path_for(&self.data_dir, &designation);
                debug!(
                    instrument = %format.instrument(),
                    alias = alias.name(),
                    path = %path.display(),
                    "trying alias"
                );
                path.is_file().then_some((alias, designation, path))
            })
    }

    /// Load every registered instrument for `entry`.
    ///
    /// A missing archive is recorded in [`LoadedSources::absent`]; an archive that
    /// exists but fails to parse is an error.
    pub fn load(&self, entry: &CatalogEntry, ctx: &StarContext) -> Result<LoadedSources> {
        let _span = ctx.span().enter();
        let mut sources = LoadedSources::default();

        for format in &self.formats {
            let instrument = format.instrument();
            match self.locate(format.as_ref(), entry) {
                Some((alias, designation, path)) => {
                    let archive = format.read(&path)?;
                    info!(
                        %instrument,
                        alias = alias.name(),
                        rows = archive.len(),
                        path = %path.display(),
                        "loaded archive"
                    );
                    sources.archives.push(LoadedArchive {
                        alias,
                        designation,
                        archive,
                    });
                }
                None => {
                    let absent = PipelineError::SourceNotFound { instrument };
                    warn!(%instrument, "{}", absent);
                    sources.absent.push(absent);
                }
            }
        }

        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_entry;
    use std::fs;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    const HARPS_CSV: &str = ",BJD,RV_mlc_nzp,e_RV_mlc_nzp,RHKp\n0,2455000.5,1.0,0.5,-4.9\n";
    const HIRES_VELS: &str = "2452000.1 3.2 1.1 0.171 0.03 5000 300\n";

    #[test]
    fn first_existing_alias_wins() {
        let dir = tempfile::tempdir().unwrap();
        // Both the Hipparcos and Tycho files exist; Hipparcos comes first.
        write(&dir.path().join("harps_rv_bank/HIP43587.csv"), HARPS_CSV);
        write(&dir.path().join("harps_rv_bank/TYC1949-1837-1.csv"), HARPS_CSV);

        let loader = SourceLoader::new(dir.path());
        let entry = sample_entry("HD 75732 A");
        let sources = loader.load(&entry, &StarContext::new("HD 75732 A")).unwrap();

        assert_eq!(sources.archives.len(), 1);
        assert_eq!(sources.archives[0].alias, AliasStrategy::Hipparcos);
        assert_eq!(sources.archives[0].designation, "HIP43587");
        assert!(sources.is_absent(Instrument::Hires));
    }

    #[test]
    fn component_stripped_name_is_tried_before_alternates() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("ebps_keck_hires/HD75732_KECK.vels"), HIRES_VELS);
        write(&dir.path().join("ebps_keck_hires/HIP43587_KECK.vels"), HIRES_VELS);

        let loader = SourceLoader::new(dir.path());
        let entry = sample_entry("HD 75732 A");
        let sources = loader.load(&entry, &StarContext::new("HD 75732 A")).unwrap();

        assert_eq!(sources.instruments(), vec![Instrument::Hires]);
        assert_eq!(sources.archives[0].alias, AliasStrategy::StripComponentSuffix);
    }

    #[test]
    fn hires_does_not_use_secondary_catalog_names() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("ebps_keck_hires/GJ324A_KECK.vels"), HIRES_VELS);

        let loader = SourceLoader::new(dir.path());
        let entry = sample_entry("HD 75732 A");
        let sources = loader.load(&entry, &StarContext::new("HD 75732 A")).unwrap();
        assert!(sources.is_empty());
        assert_eq!(sources.absent.len(), 2);
    }

    #[test]
    fn absence_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = SourceLoader::new(dir.path());
        let sources = loader
            .load(&sample_entry("HD 1"), &StarContext::new("HD 1"))
            .unwrap();
        assert!(sources.is_empty());
        assert!(sources.is_absent(Instrument::Harps));
        assert!(sources.is_absent(Instrument::Hires));
    }

    #[test]
    fn unreadable_archive_propagates() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("ebps_keck_hires/HD1_KECK.vels"), "not a number row\n");
        let loader = SourceLoader::new(dir.path());
        let result = loader.load(&sample_entry("HD 1"), &StarContext::new("HD 1"));
        assert!(matches!(result, Err(PipelineError::Parse(_))));
    }

    #[test]
    fn registered_formats_load_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("harps_rv_bank/HD1.csv"), HARPS_CSV);
        write(&dir.path().join("ebps_keck_hires/HD1_KECK.vels"), HIRES_VELS);

        let loader = SourceLoader::empty(dir.path())
            .with_format(Box::new(HiresEbps))
            .with_format(Box::new(HarpsRvBank));
        let sources = loader
            .load(&sample_entry("HD 1"), &StarContext::new("HD 1"))
            .unwrap();
        assert_eq!(
            sources.instruments(),
            vec![Instrument::Hires, Instrument::Harps]
        );
        assert!(sources.absent.is_empty());
    }
}
