//! Shared plumbing for the Google REST clients.

use reqwest::{Response, Url};
use serde::Deserialize;

/// Appends path segments to `base`, keeping any path prefix `base` already has
/// (the emulators serve the APIs below a prefix).
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("{base} cannot be used as a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, String> {
    Url::parse(raw).map_err(|e| format!("Invalid base URL {raw}: {e}"))
}

/// Error envelope shared by the Google APIs.
#[derive(Debug, Deserialize)]
pub(crate) struct GoogleErrorBody {
    pub error: GoogleError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleError {
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
}

/// Reads the error message out of a non-success response.
pub(crate) async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<GoogleErrorBody>().await {
        Ok(body) if !body.error.message.is_empty() => body.error.message,
        Ok(body) => body
            .error
            .status
            .unwrap_or_else(|| status.to_string()),
        Err(_) => format!("Unexpected response status {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let base = Url::parse("http://localhost:9099/identitytoolkit.googleapis.com").unwrap();
        let url = endpoint(&base, &["v1", "projects", "demo", "accounts:delete"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9099/identitytoolkit.googleapis.com/v1/projects/demo/accounts:delete"
        );
    }

    #[test]
    fn endpoint_escapes_segments() {
        let base = Url::parse("https://firestore.googleapis.com/").unwrap();
        let url = endpoint(&base, &["documents", "users", "a/b c"]).unwrap();
        assert_eq!(url.path(), "/documents/users/a%2Fb%20c");
    }
}
