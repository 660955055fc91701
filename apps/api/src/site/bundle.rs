//! Packaging of a generated site: the three source files and the `website.zip` archive.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::site::sections::{SectionTag, SiteSections};

pub const ARCHIVE_NAME: &str = "website.zip";

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// A generated site, ready to be archived or written out.
#[derive(Debug, Clone)]
pub struct SiteBundle {
    pub id: Uuid,
    pub sections: SiteSections,
}

/// Where `SiteBundle::persist` put things.
#[derive(Debug, Clone)]
pub struct PersistedSite {
    pub dir: PathBuf,
    pub archive: PathBuf,
}

impl SiteBundle {
    pub fn new(sections: SiteSections) -> Self {
        Self {
            id: Uuid::new_v4(),
            sections,
        }
    }

    /// `(file name, contents)` for each section, in archive order.
    pub fn files(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        SectionTag::ALL
            .into_iter()
            .map(move |tag| (tag.file_name(), self.sections.get(tag)))
    }

    /// Builds `website.zip` in memory, with the three files at the archive root.
    pub fn to_zip(&self) -> Result<Vec<u8>, BundleError> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        for (name, contents) in self.files() {
            writer.start_file(name, options)?;
            writer.write_all(contents.as_bytes())?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Writes the three files and the archive into `root/<bundle id>/`.
    ///
    /// The archive is built before anything touches disk, and every file is
    /// written to a temp file in the target directory and renamed into place.
    pub fn persist(&self, root: &Path) -> Result<PersistedSite, BundleError> {
        let archive_bytes = self.to_zip()?;

        let dir = root.join(self.id.to_string());
        std::fs::create_dir_all(&dir)?;

        for (name, contents) in self.files() {
            write_atomic(&dir, name, contents.as_bytes())?;
        }
        let archive = write_atomic(&dir, ARCHIVE_NAME, &archive_bytes)?;

        debug!("Persisted site {} to {}", self.id, dir.display());
        Ok(PersistedSite { dir, archive })
    }
}

fn write_atomic(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, BundleError> {
    let target = dir.join(name);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(target)
}
