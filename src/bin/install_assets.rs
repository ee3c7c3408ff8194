use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tactile_setup::archive::ArchiveExtractorImpl;
use tactile_setup::assets::{
    AssetInstaller, AssetLayout, AssetManifest, DEFAULT_ASSETS_DIR, DEFAULT_CACHE_DIR,
};
use tactile_setup::http::HttpClient;
use tactile_setup::runtime::RealRuntime;

/// install-assets - download the fonts and images used by the editor
///
/// Downloads are cached in the cache directory and reused on later runs;
/// the needed files are then copied into the project's asset directory.
///
/// Examples:
///   install-assets                 # fonts and images
///   install-assets --skip-fonts    # only the placeholder image
#[derive(Parser, Debug)]
#[command(author, version = tactile_setup::VERSION, about)]
struct Cli {
    /// Do not install the font families
    #[arg(long = "skip-fonts")]
    skip_fonts: bool,

    /// Directory where downloads are cached
    #[arg(long = "cache-dir", value_name = "PATH", default_value = DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Project asset directory
    #[arg(long = "assets-dir", value_name = "PATH", default_value = DEFAULT_ASSETS_DIR)]
    assets_dir: PathBuf,

    /// JSON file replacing the built-in asset list
    #[arg(long = "manifest", value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tactile_setup::logging::init(cli.verbose);

    let runtime = RealRuntime;
    let manifest = match &cli.manifest {
        Some(path) => AssetManifest::load(&runtime, path)?,
        None => AssetManifest::default(),
    };

    let layout = AssetLayout {
        cache_dir: cli.cache_dir,
        assets_dir: cli.assets_dir,
    };
    let installer = AssetInstaller::new(
        runtime,
        HttpClient::with_browser_identity()?,
        ArchiveExtractorImpl::new(),
        layout,
    );
    installer.run(&manifest, cli.skip_fonts).await
}
