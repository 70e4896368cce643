use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::error::ScrapeError;

/// Browser identity sent on every request, and echoed inside the
/// continuation request context.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Blocking HTTP seam for the walker: one page fetch plus any number of
/// continuation posts. The walker talks only to this trait, so walk
/// behavior is testable against an in-memory fake.
pub trait Transport {
    fn get_page(&self, url: &str, cookie: &str) -> Result<String, ScrapeError>;
    fn post_json(&self, url: &str, body: String) -> Result<String, ScrapeError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .expect("failed to build http client");

        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get_page(&self, url: &str, cookie: &str) -> Result<String, ScrapeError> {
        self.client
            .get(url)
            .header(header::COOKIE, format!("SOCS={}", cookie))
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(ScrapeError::PageFetch)
    }

    fn post_json(&self, url: &str, body: String) -> Result<String, ScrapeError> {
        self.client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(ScrapeError::ContinuationFetch)
    }
}
