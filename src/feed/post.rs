use serde::Serialize;

/// One community post, normalized from whichever renderer shape
/// the feed delivered it in. Built once, never mutated.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Source-assigned post id. Unique within one channel's feed.
    pub id: String,
    /// Canonical link to the post, derived from `id`.
    pub permalink: String,
    /// Reconstructed plain text. Empty string if the post has none.
    pub text: String,
    /// Age string as the feed renders it ("2 weeks ago").
    /// Kept verbatim, never parsed into an absolute time.
    pub relative_age: String,
    /// UTC timestamp of when this record was normalized.
    pub retrieved_at: String,
    /// Watch link, present only for video posts.
    pub video_link: Option<String>,
    /// Best-resolution thumbnail per attached image.
    /// May be empty, never contains empty entries.
    pub image_links: Vec<String>,
    /// Reserved for poll posts. Polls are not parsed yet, so always false.
    pub has_poll: bool,
}

pub const POST_URL_PREFIX: &str = "https://www.youtube.com/post/";
pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

impl Post {
    pub fn permalink_for(id: &str) -> String {
        format!("{}{}", POST_URL_PREFIX, id)
    }

    pub fn watch_link_for(video_id: &str) -> String {
        format!("{}{}", WATCH_URL_PREFIX, video_id)
    }
}
