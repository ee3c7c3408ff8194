use crate::runtime::Runtime;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::{debug, info};
use std::io::Read;
use std::path::Path;
use tar::{Archive, EntryType};

use super::{
    ArchiveExtractor, discard_staging, enclosed_path, prepare_staging_dir, promote_staged,
};

/// Extractor for .tar.gz / .tgz archives
pub struct TarGzExtractor;

impl ArchiveExtractor for TarGzExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        let name = archive_path.to_string_lossy().to_lowercase();
        name.ends_with(".tar.gz") || name.ends_with(".tgz")
    }

    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!("Extracting tarball {:?} to {:?}...", archive_path, extract_to);
        let reader = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;
        let mut archive = Archive::new(GzDecoder::new(reader));

        let staging_dir = prepare_staging_dir(runtime, archive_path)?;

        if let Err(e) = unpack_entries(runtime, &mut archive, &staging_dir) {
            discard_staging(runtime, &staging_dir);
            return Err(e.context(format!("Failed to unpack {:?}", archive_path)));
        }

        promote_staged(runtime, &staging_dir, extract_to)?;

        info!("Extraction complete.");
        Ok(())
    }
}

fn unpack_entries<R: Runtime, T: Read>(
    runtime: &R,
    archive: &mut Archive<T>,
    staging_dir: &Path,
) -> Result<()> {
    let entries = archive.entries().context("Failed to read tarball")?;

    for entry in entries {
        let mut entry = entry.context("Failed to read tar entry")?;
        let raw_path = entry.path().context("Invalid path in tar entry")?.into_owned();

        let Some(entry_path) = enclosed_path(&raw_path) else {
            debug!("Skipping entry with invalid path {:?}", raw_path);
            continue;
        };
        let full_path = staging_dir.join(&entry_path);

        match entry.header().entry_type() {
            EntryType::Directory => runtime.create_dir_all(&full_path)?,
            EntryType::Regular | EntryType::Continuous => {
                if let Some(parent) = full_path.parent() {
                    runtime.create_dir_all(parent)?;
                }
                let mut dest_file = runtime.create_file(&full_path)?;
                std::io::copy(&mut entry, &mut dest_file)
                    .with_context(|| format!("Failed to extract file {:?}", full_path))?;

                #[cfg(unix)]
                if let Ok(mode) = entry.header().mode()
                    && let Err(e) = runtime.set_permissions(&full_path, mode)
                {
                    debug!("Failed to set permissions on {:?}: {}", full_path, e);
                }
            }
            other => debug!("Skipping {:?} entry {:?}", other, raw_path),
        }
    }
    Ok(())
}
