use serde::Serialize;
use serde_json::Value;

use super::post::Post;
use super::renderer;
use super::transport::USER_AGENT;

const CLIENT_NAME: &str = "WEB";
const CLIENT_VERSION: &str = "2.20231010.10.01";
const PLATFORM: &str = "DESKTOP";
const BROWSER_NAME: &str = "Chrome";
const BROWSER_VERSION: &str = "139.0.0.0";
const ACCEPT_HEADER: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Body of one continuation exchange: the fixed desktop client identity
/// plus the token being redeemed.
#[derive(Serialize)]
pub struct ContinuationRequest {
    context: RequestContext,
    continuation: String,
}

#[derive(Serialize)]
struct RequestContext {
    client: ClientInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    user_agent: &'static str,
    client_name: &'static str,
    client_version: &'static str,
    original_url: String,
    platform: &'static str,
    browser_name: &'static str,
    browser_version: &'static str,
    accept_header: &'static str,
    utc_offset_minutes: i32,
}

impl ContinuationRequest {
    pub fn new(token: &str, original_url: &str) -> Self {
        Self {
            context: RequestContext {
                client: ClientInfo {
                    user_agent: USER_AGENT,
                    client_name: CLIENT_NAME,
                    client_version: CLIENT_VERSION,
                    original_url: original_url.to_string(),
                    platform: PLATFORM,
                    browser_name: BROWSER_NAME,
                    browser_version: BROWSER_VERSION,
                    accept_header: ACCEPT_HEADER,
                    utc_offset_minutes: 0,
                },
            },
            continuation: token.to_string(),
        }
    }
}

/// Browse endpoint a continuation request is posted to.
pub fn endpoint_url(api_path: &str, api_key: &str) -> String {
    format!(
        "https://www.youtube.com{}?key={}&prettyPrint=false",
        api_path, api_key
    )
}

/// Decodes one continuation response into its batch of posts and the
/// token for the page after it, if the feed issued one.
///
/// The appended items mix post-thread entries with at most one
/// continuation marker; anything else in the list is ignored.
pub fn decode_batch(body: &str) -> Result<(Vec<Post>, Option<String>), serde_json::Error> {
    let root: Value = serde_json::from_str(body)?;

    let mut posts = Vec::new();
    let mut next_token = None;

    let endpoints = root
        .get("onResponseReceivedEndpoints")
        .and_then(Value::as_array);

    for endpoint in endpoints.into_iter().flatten() {
        let items = endpoint
            .get("appendContinuationItemsAction")
            .and_then(|action| action.get("continuationItems"))
            .and_then(Value::as_array);

        for item in items.into_iter().flatten() {
            if let Some(wrapper) = item.get("backstagePostThreadRenderer") {
                if let Some(post) = renderer::normalize_thread(wrapper) {
                    posts.push(post);
                }
            } else if let Some(token) = item
                .get("continuationItemRenderer")
                .and_then(|cont| cont.get("continuationEndpoint"))
                .and_then(|endpoint| endpoint.get("continuationCommand"))
                .and_then(|command| command.get("token"))
                .and_then(Value::as_str)
            {
                next_token = Some(token.to_string());
            }
        }
    }

    Ok((posts, next_token))
}
