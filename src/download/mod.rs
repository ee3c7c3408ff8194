use crate::error::SetupError;
use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::Result;
use log::{debug, info};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Downloads `url` to `dest`.
///
/// The body is streamed into `<dest>.part` and renamed into place once the
/// transfer completes, so an interrupted download never shows up at `dest`.
#[tracing::instrument(skip(runtime, http_client))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    dest: &Path,
    http_client: &HttpClient,
) -> Result<()> {
    info!("Downloading file from {}...", url);

    let part_path = partial_path(dest);
    let bytes = http_client
        .download_file(url, || -> Result<Box<dyn Write + Send>> {
            let file = runtime
                .create_file(&part_path)
                .map_err(|e| SetupError::file_system(&part_path, e))?;
            Ok(file)
        })
        .await?;

    debug!("Moving {:?} to {:?}", part_path, dest);
    runtime
        .rename(&part_path, dest)
        .map_err(|e| SetupError::file_system(dest, e))?;

    info!("Download complete ({} bytes).", bytes);
    Ok(())
}

/// `cache/Roboto.zip` -> `cache/Roboto.zip.part`
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("download"));
    name.push(".part");
    dest.with_file_name(name)
}
