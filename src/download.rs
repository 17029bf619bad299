use crate::config::USER_AGENT;
use crate::error::ZvmError;
use crate::progress::ProgressObserver;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use std::fmt::Display;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

const ARCHIVE_EXTENSIONS: &[&str] = &[".tar.xz", ".tar.gz", ".tgz", ".zip", ".tar"];
const DEFAULT_EXTENSION: &str = ".tar.xz";

/// `<version><ext>`, with the extension taken from the artifact URL.
pub fn archive_file_name(version: &str, url: &str) -> String {
    let path = reqwest::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string());
    let path = path.to_lowercase();

    let ext = ARCHIVE_EXTENSIONS
        .iter()
        .find(|ext| path.ends_with(*ext))
        .copied()
        .unwrap_or(DEFAULT_EXTENSION);

    format!("{}{}", version, ext)
}

/// Streams `url` into `dest`, creating or truncating it.
///
/// A broken transfer leaves the partial file behind. `size_hint` is used for
/// progress only when the server sends no content length.
pub async fn download_file(
    client: &Client,
    url: &str,
    dest: &Path,
    size_hint: Option<u64>,
    progress: &dyn ProgressObserver,
) -> Result<u64, ZvmError> {
    tracing::info!("Downloading {} to {}", url, dest.display());

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|source| ZvmError::ArtifactRequestFailed {
            url: url.to_string(),
            source,
        })?;

    let total = response.content_length().or(size_hint);
    tracing::debug!("Expected size: {:?}", total);

    let mut file = File::create(dest)
        .await
        .map_err(|source| ZvmError::DestinationUnwritable {
            path: dest.to_path_buf(),
            source,
        })?;

    progress.start(total);
    let written = copy_stream(response.bytes_stream(), &mut file, dest, progress).await?;
    progress.finish();

    tracing::info!("Wrote {} bytes to {}", written, dest.display());
    Ok(written)
}

/// Copies chunks into `file` as they arrive, reporting each one.
pub async fn copy_stream<S, B, E>(
    stream: S,
    file: &mut File,
    dest: &Path,
    progress: &dyn ProgressObserver,
) -> Result<u64, ZvmError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    futures_util::pin_mut!(stream);

    let mut written = 0u64;
    let outcome = loop {
        match stream.next().await {
            None => break Ok(()),
            Some(Err(e)) => break Err(e.to_string()),
            Some(Ok(chunk)) => {
                let chunk = chunk.as_ref();
                if let Err(e) = file.write_all(chunk).await {
                    break Err(e.to_string());
                }
                written += chunk.len() as u64;
                progress.advance(chunk.len() as u64);
            }
        }
    };

    // Whatever arrived stays on disk, even when the stream broke off.
    let flushed = file.flush().await.map_err(|e| e.to_string());

    outcome
        .and(flushed)
        .map_err(|reason| ZvmError::TransferFailed {
            path: dest.to_path_buf(),
            reason,
        })?;
    Ok(written)
}
