// src/wiki/client.rs
use crate::utils::error::WikiError;
use reqwest::{header, StatusCode, Url};

// Wikipedia rejects some default client agents; look like a browser instead.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Environment variable that overrides the User-Agent header.
pub const USER_AGENT_ENV: &str = "WIKI_USER_AGENT";

fn user_agent() -> String {
    std::env::var(USER_AGENT_ENV).unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string())
}

/// Creates a reqwest client configured for Wikipedia page fetches.
fn build_wiki_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(user_agent())
        .build()
}

/// True for `https://<lang>.wikipedia.org/wiki/<Article>` style URLs.
pub fn is_valid_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    let host_ok = parsed
        .host_str()
        .map(|h| h.to_lowercase().ends_with("wikipedia.org"))
        .unwrap_or(false);

    host_ok && parsed.path().starts_with("/wiki/")
}

/// Downloads the raw HTML of a Wikipedia article.
pub async fn fetch_page(url: &str) -> Result<String, WikiError> {
    if !is_valid_url(url) {
        return Err(WikiError::InvalidUrl(url.to_string()));
    }

    let client = build_wiki_client()?;

    tracing::info!("Downloading page from: {}", url);
    tracing::debug!("Using User-Agent: {}", user_agent());

    let response = client.get(url)
        .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
        .send()
        .await?; // Propagates reqwest::Error as WikiError::Network

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        return Err(status_error(status, url));
    }

    let body = response.text().await?;
    if body.is_empty() {
        return Err(WikiError::EmptyResponse(url.to_string()));
    }
    tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);

    Ok(body)
}

fn status_error(status: StatusCode, url: &str) -> WikiError {
    match status {
        StatusCode::NOT_FOUND => WikiError::PageNotFound(url.to_string()),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            tracing::warn!("Received {} - check User-Agent and request rate.", status);
            WikiError::Blocked(status)
        }
        _ => WikiError::Http(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://en.wikipedia.org/wiki/Annakili_(soundtrack)"));
        assert!(is_valid_url("https://EN.Wikipedia.org/wiki/Annakili#Track_listing"));
        assert!(!is_valid_url("https://en.wikipedia.org/w/index.php?title=Annakili"));
        assert!(!is_valid_url("https://example.com/wiki/Annakili"));
        assert!(!is_valid_url("annakili.html"));
    }

    #[test]
    fn test_fetch_rejects_non_wikipedia_url_without_network() {
        let result = tokio_test::block_on(fetch_page("https://example.com/page"));
        assert!(matches!(result, Err(WikiError::InvalidUrl(u)) if u == "https://example.com/page"));
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(status_error(StatusCode::NOT_FOUND, "u"), WikiError::PageNotFound(_)));
        assert!(matches!(status_error(StatusCode::FORBIDDEN, "u"), WikiError::Blocked(_)));
        assert!(matches!(status_error(StatusCode::TOO_MANY_REQUESTS, "u"), WikiError::Blocked(_)));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "u"),
            WikiError::Http(StatusCode::INTERNAL_SERVER_ERROR)
        ));
    }
}
