use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;

use crate::error::{GenerateError, Result};
use crate::types::{MediaKind, MediaOutput};

/// Largest video payload that is still inline-encoded
///
/// Videos above this stay a bare URL so the JSON response (with base64
/// inflation) fits under the downstream response-size ceiling. Every
/// adapter that fetches its own output goes through this same decision.
pub const VIDEO_INLINE_LIMIT: usize = 3_500_000;

/// Whether a payload of this kind and size should be inline-encoded
pub fn should_inline(kind: MediaKind, byte_len: usize) -> bool {
    kind != MediaKind::Video || byte_len <= VIDEO_INLINE_LIMIT
}

/// Encode bytes as a self-describing data URI
pub fn to_data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

/// Split a data URI into content type and decoded bytes
///
/// Only the `data:{type};base64,{payload}` form is supported
pub fn parse_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (content_type, payload) = rest.split_once(";base64,")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((content_type.to_owned(), bytes))
}

/// Fetch a provider's output URL and normalize it into a media output
///
/// The declared content type decides the media kind (default image/png);
/// size and kind decide between inline encoding and the bare URL.
///
/// # Errors
///
/// Returns an error on transport failure or a non-2xx media response
pub async fn resolve_output_url(client: &Client, url: &str, model_name: &str) -> Result<MediaOutput> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| GenerateError::Connection(format!("failed to fetch output media: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(GenerateError::Provider {
            model: model_name.to_owned(),
            message: format!("output media fetch returned {status}"),
        });
    }

    let content_type = response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("image/png")
        .to_owned();

    let bytes = response
        .bytes()
        .await
        .map_err(|e| GenerateError::Connection(format!("failed to read output media: {e}")))?;

    let kind = if content_type.starts_with("video/") {
        MediaKind::Video
    } else {
        MediaKind::Image
    };

    let data = if should_inline(kind, bytes.len()) {
        to_data_uri(&content_type, &bytes)
    } else {
        tracing::debug!(
            model = %model_name,
            bytes = bytes.len(),
            "video exceeds inline limit; returning bare URL"
        );
        url.to_owned()
    };

    Ok(MediaOutput {
        kind,
        data,
        url: Some(url.to_owned()),
        content_type,
    })
}
