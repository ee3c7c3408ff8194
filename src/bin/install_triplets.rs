use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tactile_setup::platform::DefaultPlatformDetector;
use tactile_setup::runtime::RealRuntime;
use tactile_setup::triplet::{DEFAULT_SOURCE_DIR, TripletInstaller};

/// install-triplets - register the custom vcpkg triplet for this host
///
/// Copies the triplet matching the host platform from the project's cmake
/// directory into $VCPKG_ROOT/triplets/community/. Nothing is written if the
/// triplet is already there.
///
/// Examples:
///   install-triplets                          # uses VCPKG_ROOT
///   install-triplets --vcpkg-root ~/vcpkg
#[derive(Parser, Debug)]
#[command(author, version = tactile_setup::VERSION, about)]
struct Cli {
    /// vcpkg installation root (also via VCPKG_ROOT)
    #[arg(long = "vcpkg-root", env = "VCPKG_ROOT", value_name = "PATH")]
    vcpkg_root: Option<PathBuf>,

    /// Directory holding the triplet files
    #[arg(long = "source-dir", value_name = "PATH", default_value = DEFAULT_SOURCE_DIR)]
    source_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tactile_setup::logging::init(cli.verbose);

    let installer = TripletInstaller::new(RealRuntime, DefaultPlatformDetector, cli.source_dir);
    installer.install(cli.vcpkg_root.as_deref())?;
    Ok(())
}
