use std::time::Duration;

use reqwest::{Client, StatusCode};
use scraper::Html;
use thiserror::Error;
use tracing::{debug, warn};

use crate::settings::Settings;

const ERROR_MARKER: &str = "ERROR:";
const NO_GAME_MARKER: &str = "No game";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("J! Archive reported: {0}")]
    Upstream(String),
}

/// HTTP access to the archive. One client, reused for every request.
pub struct Fetcher {
    client: Client,
    settings: Settings,
}

impl Fetcher {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    /// Fetch a game page. Pages the archive marks as errors never come back
    /// as `Ok`, so they cannot reach the extraction passes.
    pub async fn fetch_game(&self, game_id: u32) -> Result<String, FetchError> {
        let url = self.settings.game_url(game_id);
        let body = self.get(&url).await?;
        if let Some(msg) = upstream_error(&body) {
            return Err(FetchError::Upstream(msg));
        }
        Ok(body)
    }

    /// GET with exponential backoff on rate limiting, server errors and timeouts.
    pub async fn get(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match self.get_once(url).await {
                Err(e) if attempt < self.settings.max_retries && is_retryable(&e) => {
                    let backoff =
                        Duration::from_millis(self.settings.base_backoff_ms * 2u64.pow(attempt));
                    warn!(
                        "{} on {} (attempt {}/{}), backing off {:.1}s",
                        e,
                        url,
                        attempt + 1,
                        self.settings.max_retries,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn get_once(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.text().await?)
    }
}

fn is_retryable(err: &FetchError) -> bool {
    match err {
        FetchError::Status(status) => matches!(status.as_u16(), 429 | 500 | 502 | 503),
        FetchError::Http(e) => e.is_timeout() || e.is_connect(),
        FetchError::Upstream(_) => false,
    }
}

/// The archive answers unknown ids with a normal page saying so.
/// Returns the message when the page is one of those.
pub fn upstream_error(body: &str) -> Option<String> {
    let doc = Html::parse_document(body);
    let text: String = doc.root_element().text().collect();

    if let Some(pos) = text.find(ERROR_MARKER) {
        let msg: String = text[pos..].chars().take(100).collect();
        return Some(msg.split_whitespace().collect::<Vec<_>>().join(" "));
    }
    text.contains(NO_GAME_MARKER)
        .then(|| NO_GAME_MARKER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_page_detected() {
        let body = "<html><body><p>ERROR:  No game\n found with id 99999.</p></body></html>";
        assert_eq!(
            upstream_error(body).as_deref(),
            Some("ERROR: No game found with id 99999.")
        );
    }

    #[test]
    fn no_game_page_detected() {
        let body = "<html><body><div>No game has been archived for this date.</div></body></html>";
        assert_eq!(upstream_error(body).as_deref(), Some("No game"));
    }

    #[test]
    fn valid_page_passes() {
        let body = std::fs::read_to_string("tests/fixtures/game_9416.html").unwrap();
        assert_eq!(upstream_error(&body), None);
    }

    #[test]
    fn retry_policy() {
        assert!(is_retryable(&FetchError::Status(StatusCode::TOO_MANY_REQUESTS)));
        assert!(is_retryable(&FetchError::Status(StatusCode::BAD_GATEWAY)));
        assert!(!is_retryable(&FetchError::Status(StatusCode::NOT_FOUND)));
        assert!(!is_retryable(&FetchError::Upstream("No game".into())));
    }
}
