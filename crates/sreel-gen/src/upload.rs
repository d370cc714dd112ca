//! Reference image resolution.
//!
//! A reference image may be given as a URL (used as-is) or a local file
//! (uploaded to provider storage first, since generation payloads only
//! accept hosted URLs).

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::error::{GenError, GenResult};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Turn a user-supplied reference into a hosted URL.
pub async fn resolve_reference_image(
    http: &Client,
    base_url: &str,
    api_key: &str,
    reference: &str,
) -> GenResult<String> {
    if let Ok(url) = Url::parse(reference) {
        if matches!(url.scheme(), "http" | "https") {
            return Ok(reference.to_string());
        }
    }
    upload_image(http, base_url, api_key, Path::new(reference)).await
}

/// Upload a local image file to provider storage.
async fn upload_image(
    http: &Client,
    base_url: &str,
    api_key: &str,
    path: &Path,
) -> GenResult<String> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("reference.png")
        .to_string();
    let mime = match path.extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    };

    info!(file = %file_name, bytes = bytes.len(), "uploading reference image");

    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime)
        .map_err(|e| GenError::parse(format!("invalid upload mime type: {e}")))?;
    let form = Form::new().part("file", part);

    let url = format!("{}/storage/upload", base_url.trim_end_matches('/'));
    let response = http
        .post(&url)
        .header("Authorization", format!("Key {api_key}"))
        .multipart(form)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(GenError::from_status(status, body));
    }

    let parsed: UploadResponse = response.json().await?;
    Ok(parsed.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn passes_urls_through() {
        let http = Client::new();
        let resolved =
            resolve_reference_image(&http, "http://unused", "key", "https://example.com/ref.png")
                .await
                .unwrap();
        assert_eq!(resolved, "https://example.com/ref.png");
    }

    #[tokio::test]
    async fn uploads_local_files() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/storage/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "url": "https://cdn.example/hosted.png"
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ref.png");
        std::fs::write(&file, b"not a real png").unwrap();

        let http = Client::new();
        let resolved =
            resolve_reference_image(&http, &server.uri(), "key", file.to_str().unwrap())
                .await
                .unwrap();
        assert_eq!(resolved, "https://cdn.example/hosted.png");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let http = Client::new();
        let err = resolve_reference_image(&http, "http://unused", "key", "/no/such/file.png")
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::Io(_)));
    }
}
