//! Typed descriptors for the assets the installer fetches.
//!
//! Paths inside a descriptor are relative: cache paths to the cache
//! directory, `FileCopy::from` to the asset's extracted directory, and
//! destinations to the project's asset directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::archive::enclosed_path;
use crate::error::SetupError;
use crate::runtime::Runtime;

/// One file to copy out of an unpacked archive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileCopy {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl FileCopy {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// An asset distributed as an archive (the font families).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArchiveAsset {
    pub name: String,
    pub url: String,
    /// Where the downloaded archive is cached
    pub archive: PathBuf,
    /// Directory that exists once the archive has been unpacked
    pub extracted_dir: PathBuf,
    /// Where the archive is unpacked; the cache root when absent
    #[serde(default)]
    pub unpack_to: Option<PathBuf>,
    pub files: Vec<FileCopy>,
}

/// An asset downloaded as a single file (the placeholder image).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageAsset {
    pub name: String,
    pub url: String,
    /// Where the download is cached
    pub cached: PathBuf,
    pub destination: PathBuf,
}

/// The full set of assets installed by one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub fonts: Vec<ArchiveAsset>,
    #[serde(default)]
    pub images: Vec<ImageAsset>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            fonts: vec![roboto(), font_awesome()],
            images: vec![placeholder_image()],
        }
    }
}

impl AssetManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: AssetManifest = serde_json::from_str(json)
            .map_err(|e| SetupError::configuration(format!("Invalid asset manifest: {}", e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let json = runtime
            .read_to_string(path)
            .map_err(|e| SetupError::file_system(path, e))?;
        Self::from_json(&json).with_context(|| format!("Failed to load manifest {:?}", path))
    }

    /// Rejects descriptors that would read or write outside the cache or
    /// asset directories (absolute paths, `..`), or that have nothing to
    /// download.
    pub fn validate(&self) -> Result<()> {
        for font in &self.fonts {
            check_url(&font.name, &font.url)?;
            let mut paths = vec![&font.archive, &font.extracted_dir];
            paths.extend(font.unpack_to.iter());
            for copy in &font.files {
                paths.push(&copy.from);
                paths.push(&copy.to);
            }
            for path in paths {
                check_relative(&font.name, path)?;
            }
        }
        for image in &self.images {
            check_url(&image.name, &image.url)?;
            check_relative(&image.name, &image.cached)?;
            check_relative(&image.name, &image.destination)?;
        }
        Ok(())
    }
}

fn check_url(name: &str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(SetupError::configuration(format!("Asset {:?} has no URL", name)).into());
    }
    Ok(())
}

fn check_relative(name: &str, path: &Path) -> Result<()> {
    if enclosed_path(path).is_none() {
        return Err(SetupError::configuration(format!(
            "Asset {:?} uses {:?}; paths must be relative and stay inside their directory",
            name, path
        ))
        .into());
    }
    Ok(())
}

/// Roboto from Google Fonts. The download is a flat zip, so it is unpacked
/// into its own directory.
fn roboto() -> ArchiveAsset {
    ArchiveAsset {
        name: "Roboto".to_string(),
        url: "https://fonts.google.com/download?family=Roboto".to_string(),
        archive: PathBuf::from("Roboto.zip"),
        extracted_dir: PathBuf::from("Roboto"),
        unpack_to: Some(PathBuf::from("Roboto")),
        files: vec![
            FileCopy::new("static/Roboto-Regular.ttf", "fonts/roboto/Roboto-Regular.ttf"),
            FileCopy::new("OFL.txt", "fonts/roboto/LICENSE.txt"),
        ],
    }
}

fn font_awesome() -> ArchiveAsset {
    ArchiveAsset {
        name: "Font Awesome".to_string(),
        url: "https://use.fontawesome.com/releases/v6.5.1/fontawesome-free-6.5.1-web.zip"
            .to_string(),
        archive: PathBuf::from("fontawesome-free-6.5.1-web.zip"),
        extracted_dir: PathBuf::from("fontawesome-free-6.5.1-web"),
        unpack_to: None,
        files: vec![
            FileCopy::new("webfonts/fa-solid-900.ttf", "fonts/fa/fa-solid-900.ttf"),
            FileCopy::new("LICENSE.txt", "fonts/fa/LICENSE.txt"),
        ],
    }
}

fn placeholder_image() -> ImageAsset {
    ImageAsset {
        name: "placeholder image".to_string(),
        url: "https://dummyimage.com/256x256/000/fff.png".to_string(),
        cached: PathBuf::from("dummy.png"),
        destination: PathBuf::from("images/dummy.png"),
    }
}
