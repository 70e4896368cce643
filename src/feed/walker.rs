use std::fs;

use crate::error::ScrapeError;

use super::continuation::{self, ContinuationRequest};
use super::extract;
use super::post::Post;
use super::renderer;
use super::transport::{HttpTransport, Transport};

/// Consent cookie accepted by default, so the page comes back as the
/// feed instead of the consent interstitial.
const DEFAULT_SOCS_COOKIE: &str = "CAESEwgDEgk2NDg4NTY2OTgaAnJvIAEaBgiAtae0Bg";
const COOKIE_PATH: &str = "cookies.txt";

/// Walks a channel's community feed: one page fetch to bootstrap, then
/// strictly sequential continuation exchanges until the feed runs dry,
/// the limit is hit, or a continuation call fails.
pub struct Scraper<T: Transport = HttpTransport> {
    transport: T,
    cookie: String,
}

impl Scraper {
    pub fn new() -> Self {
        Self::with_transport(HttpTransport::new())
    }
}

impl<T: Transport> Scraper<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            cookie: socs_cookie(),
        }
    }

    /// Returns the channel's posts in feed order (newest first), at most
    /// `limit` of them when one is given.
    ///
    /// Only a failed page fetch is an error. A continuation call that
    /// fails mid-walk ends the walk and whatever was collected up to
    /// that point is returned as a normal result.
    pub fn fetch_posts(
        &self,
        channel_url: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Post>, ScrapeError> {
        let feed_url = feed_url(channel_url);

        let page = self
            .transport
            .get_page(&format!("{}?persist_hl=1&hl=en", feed_url), &self.cookie)?;

        let mut posts: Vec<Post> = extract::recover_post_threads(&page)
            .iter()
            .filter_map(renderer::normalize_thread)
            .collect();

        if posts.is_empty() {
            dump_debug_page(&page);
        }

        let api_key = extract::api_key(&page);
        let api_path = extract::api_endpoint(&page);
        let mut token = extract::initial_token(&page);

        // Token extraction is independent of post extraction; the walk
        // continues even when the page yielded no posts. Without the api
        // key or endpoint there is nothing to continue against.
        if let (Some(api_key), Some(api_path)) = (api_key, api_path) {
            let endpoint = continuation::endpoint_url(&api_path, &api_key);

            loop {
                if limit.map_or(false, |l| posts.len() >= l) {
                    break;
                }
                let Some(current) = token.take().filter(|t| !t.is_empty()) else {
                    break;
                };

                let request = ContinuationRequest::new(&current, &feed_url);
                let batch = serde_json::to_string(&request)
                    .map_err(ScrapeError::from)
                    .and_then(|body| self.transport.post_json(&endpoint, body))
                    .and_then(|response| {
                        continuation::decode_batch(&response).map_err(ScrapeError::from)
                    });

                match batch {
                    Ok((new_posts, next_token)) => {
                        let end_of_feed = new_posts.is_empty()
                            && next_token.as_deref().map_or(true, str::is_empty);
                        posts.extend(new_posts);
                        token = next_token;
                        if end_of_feed {
                            break;
                        }
                    }
                    Err(err) => {
                        eprintln!("Error fetching continuation: {}", err);
                        break;
                    }
                }
            }
        }

        if let Some(limit) = limit {
            posts.truncate(limit);
        }
        Ok(posts)
    }
}

/// Channel URL normalized to its posts-feed form.
fn feed_url(channel_url: &str) -> String {
    let trimmed = channel_url.trim_end_matches('/');
    if trimmed.ends_with("/posts") {
        trimmed.to_string()
    } else {
        format!("{}/posts", trimmed)
    }
}

fn socs_cookie() -> String {
    match fs::read_to_string(COOKIE_PATH) {
        Ok(cookie) => cookie.trim().to_string(),
        Err(_) => DEFAULT_SOCS_COOKIE.to_string(),
    }
}

/// Saves the fetched page, and its data blob when one can be found, so
/// an extraction that came up empty can be inspected offline.
fn dump_debug_page(page: &str) {
    println!("No initial posts found. Saving HTML to debug.html...");
    if fs::write("debug.html", page).is_err() {
        eprintln!("Could not write debug.html");
    }

    match extract::initial_data(page) {
        Some(data) => {
            println!("Saving ytInitialData to debug_data.json...");
            let _ = fs::write("debug_data.json", data);
        }
        None => println!("Could not extract ytInitialData from HTML."),
    }
}
