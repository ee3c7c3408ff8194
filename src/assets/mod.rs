//! Fetches the project's font and image assets.
//!
//! Every step is guarded by an existence check, which makes repeated runs
//! cheap: a cached download is never fetched again and an unpacked archive
//! is never unpacked again. Nothing verifies the cached content, so a
//! corrupt cache entry has to be deleted by hand.

mod descriptor;

use anyhow::Result;
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::archive::ArchiveExtractor;
use crate::download::download_file;
use crate::error::SetupError;
use crate::http::HttpClient;
use crate::runtime::Runtime;

pub use descriptor::{ArchiveAsset, AssetManifest, FileCopy, ImageAsset};

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Default project asset directory, relative to the working directory.
pub const DEFAULT_ASSETS_DIR: &str = "../assets";

/// Where downloads are cached and where assets are installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    pub cache_dir: PathBuf,
    pub assets_dir: PathBuf,
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
        }
    }
}

pub struct AssetInstaller<R: Runtime + 'static, E: ArchiveExtractor> {
    runtime: R,
    http_client: HttpClient,
    extractor: E,
    layout: AssetLayout,
}

impl<R: Runtime + 'static, E: ArchiveExtractor> AssetInstaller<R, E> {
    pub fn new(runtime: R, http_client: HttpClient, extractor: E, layout: AssetLayout) -> Self {
        Self {
            runtime,
            http_client,
            extractor,
            layout,
        }
    }

    /// Installs every asset of `manifest`: fonts first (unless
    /// `skip_fonts`), then images. Stops at the first failure.
    #[tracing::instrument(skip(self, manifest))]
    pub async fn run(&self, manifest: &AssetManifest, skip_fonts: bool) -> Result<()> {
        self.ensure_cache_dir()?;

        if skip_fonts {
            info!("Skipping {} font asset(s)", manifest.fonts.len());
        } else {
            for font in &manifest.fonts {
                self.install_archive_asset(font).await?;
            }
        }

        for image in &manifest.images {
            self.install_image_asset(image).await?;
        }

        Ok(())
    }

    pub fn ensure_cache_dir(&self) -> Result<()> {
        let cache_dir = &self.layout.cache_dir;
        if self.runtime.exists(cache_dir) {
            return Ok(());
        }
        debug!("Creating cache directory {:?}", cache_dir);
        self.runtime
            .create_dir_all(cache_dir)
            .map_err(|e| SetupError::file_system(cache_dir, e).into())
    }

    /// Downloads `url` to `dest` unless `dest` already exists.
    /// Returns whether a download happened.
    pub async fn download_if_missing(&self, name: &str, url: &str, dest: &Path) -> Result<bool> {
        if self.runtime.exists(dest) {
            debug!("{} is cached at {:?}", name, dest);
            return Ok(false);
        }
        println!(" downloading {} {}", name, url);
        download_file(&self.runtime, url, dest, &self.http_client).await?;
        Ok(true)
    }

    #[tracing::instrument(skip(self, asset), fields(name = %asset.name))]
    pub async fn install_archive_asset(&self, asset: &ArchiveAsset) -> Result<()> {
        let cache_dir = &self.layout.cache_dir;
        let archive_path = cache_dir.join(&asset.archive);
        let extracted_dir = cache_dir.join(&asset.extracted_dir);

        self.download_if_missing(&asset.name, &asset.url, &archive_path)
            .await?;

        if self.runtime.exists(&extracted_dir) {
            debug!("{} is already unpacked at {:?}", asset.name, extracted_dir);
        } else {
            let unpack_to = match &asset.unpack_to {
                Some(dir) => cache_dir.join(dir),
                None => cache_dir.clone(),
            };
            println!("  extracting {} {}", asset.name, archive_path.display());
            self.extractor
                .extract(&self.runtime, &archive_path, &unpack_to)
                .map_err(|e| SetupError::file_system(&archive_path, e))?;
        }

        for copy in &asset.files {
            let from = extracted_dir.join(&copy.from);
            let to = self.layout.assets_dir.join(&copy.to);
            self.install_file(&from, &to)?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, asset), fields(name = %asset.name))]
    pub async fn install_image_asset(&self, asset: &ImageAsset) -> Result<()> {
        let cached = self.layout.cache_dir.join(&asset.cached);
        let dest = self.layout.assets_dir.join(&asset.destination);

        self.download_if_missing(&asset.name, &asset.url, &cached)
            .await?;
        self.install_file(&cached, &dest)
    }

    /// Copies `from` to `to`, creating the destination directory.
    fn install_file(&self, from: &Path, to: &Path) -> Result<()> {
        if !self.runtime.exists(from) {
            return Err(SetupError::file_system(from, "Expected file is missing").into());
        }
        if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.runtime
                .create_dir_all(parent)
                .map_err(|e| SetupError::file_system(parent, e))?;
        }

        println!("  installing {}", to.display());
        self.runtime
            .copy(from, to)
            .map_err(|e| SetupError::file_system(to, e))?;
        Ok(())
    }
}
