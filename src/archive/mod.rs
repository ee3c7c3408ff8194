mod tar_gz;
mod zip;

use crate::runtime::Runtime;
use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use std::path::{Component, Path, PathBuf};

pub use tar_gz::TarGzExtractor;
pub use zip::ZipExtractor;

/// Trait for format-specific archive extractors
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor: Send + Sync {
    /// Check if this extractor can handle the given archive format
    fn can_handle(&self, archive_path: &Path) -> bool;

    /// Unpack the archive into `extract_to`, keeping the archive's own
    /// directory layout. `extract_to` is created, and entries appear in it,
    /// only once the whole archive has been unpacked.
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()>;
}

/// Dispatcher that selects the appropriate extractor based on archive format.
pub struct ArchiveExtractorImpl {
    tar_gz: TarGzExtractor,
    zip: ZipExtractor,
}

impl Default for ArchiveExtractorImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractorImpl {
    pub fn new() -> Self {
        Self {
            tar_gz: TarGzExtractor,
            zip: ZipExtractor,
        }
    }
}

impl ArchiveExtractor for ArchiveExtractorImpl {
    fn can_handle(&self, archive_path: &Path) -> bool {
        self.tar_gz.can_handle(archive_path) || self.zip.can_handle(archive_path)
    }

    #[tracing::instrument(skip(self, runtime))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        if self.tar_gz.can_handle(archive_path) {
            return self.tar_gz.extract(runtime, archive_path, extract_to);
        }
        if self.zip.can_handle(archive_path) {
            return self.zip.extract(runtime, archive_path, extract_to);
        }
        Err(anyhow!(
            "Unsupported archive format: {}",
            archive_path.display()
        ))
    }
}

/// Creates a fresh staging directory next to `archive_path`:
/// `cache/Roboto.zip` -> `cache/.Roboto.zip.unpacking/`
pub(crate) fn prepare_staging_dir<R: Runtime>(
    runtime: &R,
    archive_path: &Path,
) -> Result<PathBuf> {
    let archive_name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());
    let staging_dir = archive_path.with_file_name(format!(".{}.unpacking", archive_name));

    if runtime.exists(&staging_dir) {
        runtime.remove_dir_all(&staging_dir)?;
    }
    runtime
        .create_dir_all(&staging_dir)
        .with_context(|| format!("Failed to create staging directory {:?}", staging_dir))?;

    debug!("Unpacking to staging dir: {:?}", staging_dir);
    Ok(staging_dir)
}

/// Moves the unpacked tree from `staging_dir` into `extract_to`, then
/// removes `staging_dir`. On failure the staging directory is discarded.
///
/// A missing `extract_to` is produced by renaming `staging_dir` itself, so it
/// either appears complete or not at all. An existing `extract_to` receives
/// the top-level entries one by one, replacing entries of the same name.
pub(crate) fn promote_staged<R: Runtime>(
    runtime: &R,
    staging_dir: &Path,
    extract_to: &Path,
) -> Result<()> {
    let entries = runtime
        .read_dir(staging_dir)
        .context("Failed to read staging directory")?;

    if entries.is_empty() {
        runtime.remove_dir_all(staging_dir)?;
        return Err(anyhow!("Archive appears to be empty."));
    }

    let result = if runtime.exists(extract_to) {
        promote_entries(runtime, &entries, extract_to)
            .and_then(|()| runtime.remove_dir_all(staging_dir))
    } else {
        promote_whole(runtime, staging_dir, extract_to)
    };

    if result.is_err() {
        discard_staging(runtime, staging_dir);
    }
    result
}

fn promote_whole<R: Runtime>(runtime: &R, staging_dir: &Path, extract_to: &Path) -> Result<()> {
    if let Some(parent) = extract_to.parent().filter(|p| !p.as_os_str().is_empty()) {
        runtime
            .create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    debug!("Installing {:?}", extract_to);
    runtime
        .rename(staging_dir, extract_to)
        .with_context(|| format!("Failed to move {:?} to {:?}", staging_dir, extract_to))
}

fn promote_entries<R: Runtime>(runtime: &R, entries: &[PathBuf], extract_to: &Path) -> Result<()> {
    for item in entries {
        let Some(name) = item.file_name() else {
            continue;
        };
        let dest_path = extract_to.join(name);
        if runtime.is_dir(&dest_path) {
            warn!("Replacing existing directory {:?}", dest_path);
            runtime.remove_dir_all(&dest_path)?;
        } else if runtime.exists(&dest_path) {
            warn!("Replacing existing file {:?}", dest_path);
            runtime.remove_file(&dest_path)?;
        }
        debug!("Installing {:?}", dest_path);
        runtime
            .rename(item, &dest_path)
            .with_context(|| format!("Failed to move {:?} to {:?}", item, dest_path))?;
    }
    Ok(())
}

/// Best-effort removal of a staging directory after a failed unpack.
pub(crate) fn discard_staging<R: Runtime>(runtime: &R, staging_dir: &Path) {
    if let Err(e) = runtime.remove_dir_all(staging_dir) {
        debug!("Failed to remove staging dir {:?}: {}", staging_dir, e);
    }
}

/// Returns the entry path if it stays inside the extraction root.
pub(crate) fn enclosed_path(path: &Path) -> Option<PathBuf> {
    let mut enclosed = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => enclosed.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if enclosed.as_os_str().is_empty() {
        None
    } else {
        Some(enclosed)
    }
}
