//! Registers the project's custom vcpkg triplet for the host platform.

use anyhow::Result;
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::error::SetupError;
use crate::platform::PlatformDetector;
use crate::runtime::Runtime;

/// Environment variable holding the vcpkg installation root.
pub const VCPKG_ROOT_ENV: &str = "VCPKG_ROOT";

/// Default location of the triplet sources, relative to the working directory.
pub const DEFAULT_SOURCE_DIR: &str = "../cmake";

/// Where custom triplets live inside a vcpkg root.
const COMMUNITY_TRIPLETS_DIR: [&str; 2] = ["triplets", "community"];

/// Outcome of a triplet installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripletOutcome {
    /// The triplet was copied to the contained path.
    Added(PathBuf),
    /// The contained destination was already present; nothing was written.
    AlreadyExists(PathBuf),
}

pub struct TripletInstaller<R: Runtime, P: PlatformDetector> {
    runtime: R,
    detector: P,
    source_dir: PathBuf,
}

impl<R: Runtime, P: PlatformDetector> TripletInstaller<R, P> {
    pub fn new(runtime: R, detector: P, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            detector,
            source_dir: source_dir.into(),
        }
    }

    /// Copies the triplet for the host platform into
    /// `<vcpkg_root>/triplets/community/`, unless it is already there.
    ///
    /// `vcpkg_root` takes precedence over the `VCPKG_ROOT` environment variable.
    #[tracing::instrument(skip(self))]
    pub fn install(&self, vcpkg_root: Option<&Path>) -> Result<TripletOutcome> {
        let vcpkg_root = self.resolve_vcpkg_root(vcpkg_root)?;
        debug!("Using vcpkg root {:?}", vcpkg_root);

        let platform = self.detector.detect().ok_or_else(|| {
            SetupError::configuration("Could not determine the host operating system")
        })?;
        info!("Detected platform {}", platform);

        let file_name = platform.triplet_file().ok_or_else(|| {
            SetupError::configuration(format!("Unsupported platform: {}", platform))
        })?;

        let mut dest = vcpkg_root;
        dest.extend(COMMUNITY_TRIPLETS_DIR);
        dest.push(file_name);

        if self.runtime.exists(&dest) {
            println!("{} already exists", dest.display());
            return Ok(TripletOutcome::AlreadyExists(dest));
        }

        let source = self.source_dir.join(file_name);
        if !self.runtime.exists(&source) {
            return Err(SetupError::file_system(&source, "Triplet source file not found").into());
        }

        println!("Adding {}", dest.display());
        self.runtime
            .copy(&source, &dest)
            .map_err(|e| SetupError::file_system(&dest, e))?;

        Ok(TripletOutcome::Added(dest))
    }

    fn resolve_vcpkg_root(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(root) = explicit.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(root.to_path_buf());
        }

        match self.runtime.env_var(VCPKG_ROOT_ENV) {
            Ok(root) if !root.trim().is_empty() => Ok(PathBuf::from(root)),
            _ => Err(SetupError::configuration(format!(
                "{} environment variable not set",
                VCPKG_ROOT_ENV
            ))
            .into()),
        }
    }
}
