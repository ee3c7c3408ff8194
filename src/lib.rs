pub mod archive;
pub mod assets;
pub mod download;
pub mod error;
pub mod http;
pub mod logging;
pub mod platform;
pub mod runtime;
pub mod triplet;

/// Version string embedded by the build script.
pub const VERSION: &str = env!("TACTILE_SETUP_VERSION");
