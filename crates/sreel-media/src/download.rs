//! HTTP download of generated artifacts.
//!
//! Provider result URLs are short-lived links to finished images, videos,
//! and audio tracks. Bodies are streamed to disk chunk by chunk; all
//! segment downloads run concurrently, so nothing is buffered in full.

use std::path::Path;

use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Download a remote artifact to a local path.
///
/// Creates the parent directory if needed and returns the number of bytes
/// written.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    output: impl AsRef<Path>,
) -> MediaResult<u64> {
    let output = output.as_ref();

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).await?;
    }

    debug!(url = %url, output = %output.display(), "Downloading artifact");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| MediaError::download_failed(format!("request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(MediaError::download_failed(format!(
            "{} returned status {}",
            url,
            response.status()
        )));
    }

    let mut file = fs::File::create(output).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| MediaError::download_failed(format!("body read failed: {e}")))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    info!(
        output = %output.display(),
        size_kb = written / 1024,
        "Artifact saved"
    );

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_writes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/video.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"clipdata".to_vec()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("videos").join("video_1.mp4");
        let client = reqwest::Client::new();

        let size = download_file(&client, &format!("{}/video.mp4", server.uri()), &out)
            .await
            .unwrap();

        assert_eq!(size, 8);
        assert_eq!(fs::read(&out).await.unwrap(), b"clipdata");
    }

    #[tokio::test]
    async fn test_download_streams_large_body() {
        let server = MockServer::start().await;
        let body: Vec<u8> = (0..256u32 * 1024).map(|i| (i % 251) as u8).collect();
        Mock::given(method("GET"))
            .and(path("/big.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("big.mp4");
        let client = reqwest::Client::new();

        let size = download_file(&client, &format!("{}/big.mp4", server.uri()), &out)
            .await
            .unwrap();

        assert_eq!(size, body.len() as u64);
        assert_eq!(fs::read(&out).await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_fails_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.mp4"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let client = reqwest::Client::new();
        let err = download_file(
            &client,
            &format!("{}/gone.mp4", server.uri()),
            dir.path().join("gone.mp4"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::DownloadFailed { .. }));
    }
}
