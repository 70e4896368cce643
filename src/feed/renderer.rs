use chrono::Utc;
use serde_json::Value;

use super::post::Post;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalizes one decoded post-thread wrapper into a [`Post`].
///
/// Returns `None` when the wrapper carries no recognizable post. The
/// same two renderer shapes show up in the initial page and in
/// continuation batches, so both paths funnel through here.
pub fn normalize_thread(wrapper: &Value) -> Option<Post> {
    let post = wrapper.get("post")?;
    let renderer = post
        .get("backstagePostRenderer")
        .or_else(|| post.get("sharedPostRenderer"))?;
    normalize_renderer(renderer)
}

/// Normalizes a standalone or shared post renderer. Only a missing post
/// id drops the record; every other structural miss just leaves its
/// field empty.
pub fn normalize_renderer(renderer: &Value) -> Option<Post> {
    let id = renderer
        .get("postId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())?;

    // Standalone posts put their runs under contentText, shared ones
    // under content.
    let text = renderer
        .get("contentText")
        .or_else(|| renderer.get("content"))
        .map(collect_runs)
        .unwrap_or_default();

    let relative_age = renderer
        .get("publishedTimeText")
        .and_then(|t| t.get("runs"))
        .and_then(|runs| runs.get(0))
        .and_then(|run| run.get("text"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut video_link = None;
    let mut image_links = Vec::new();

    if let Some(attachment) = renderer.get("backstageAttachment") {
        if let Some(image) = attachment.get("backstageImageRenderer") {
            image_links.extend(best_thumbnail(image));
        } else if let Some(multi) = attachment.get("postMultiImageRenderer") {
            if let Some(images) = multi.get("images").and_then(Value::as_array) {
                for image in images {
                    if let Some(url) = image
                        .get("backstageImageRenderer")
                        .and_then(best_thumbnail)
                    {
                        image_links.push(url);
                    }
                }
            }
        } else if let Some(video) = attachment.get("videoRenderer") {
            video_link = video
                .get("videoId")
                .and_then(Value::as_str)
                .map(Post::watch_link_for);
        }
    }

    Some(Post {
        id: id.to_string(),
        permalink: Post::permalink_for(id),
        text,
        relative_age,
        retrieved_at: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        video_link,
        image_links,
        // pollRenderer attachments are not parsed yet
        has_poll: false,
    })
}

fn collect_runs(content: &Value) -> String {
    let Some(runs) = content.get("runs").and_then(Value::as_array) else {
        return String::new();
    };

    let mut text = String::new();
    for run in runs {
        // A linked run contributes its raw target URL in place of the
        // display text, exactly as the feed serves it.
        if let Some(url) = run
            .get("navigationEndpoint")
            .and_then(|nav| nav.get("urlEndpoint"))
            .and_then(|endpoint| endpoint.get("url"))
            .and_then(Value::as_str)
        {
            text.push_str(url);
            continue;
        }
        if let Some(literal) = run.get("text").and_then(Value::as_str) {
            text.push_str(literal);
        }
    }
    text
}

fn best_thumbnail(image_renderer: &Value) -> Option<String> {
    let thumbnails = image_renderer
        .get("image")?
        .get("thumbnails")?
        .as_array()?;

    // Candidates arrive smallest first; the last one is full size.
    thumbnails
        .last()?
        .get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(renderer: Value) -> Value {
        json!({ "post": { "backstagePostRenderer": renderer } })
    }

    #[test]
    fn linked_runs_contribute_their_raw_url() {
        let post = normalize_thread(&wrap(json!({
            "postId": "p1",
            "contentText": { "runs": [
                { "text": "a" },
                { "navigationEndpoint": { "urlEndpoint": { "url": "http://x" } },
                  "text": "display text" },
                { "text": "b" },
            ]},
        })))
        .unwrap();

        assert_eq!(post.text, "ahttp://xb");
    }

    #[test]
    fn run_with_neither_url_nor_text_contributes_nothing() {
        let post = normalize_thread(&wrap(json!({
            "postId": "p1",
            "contentText": { "runs": [
                { "text": "start" },
                { "bold": true },
                { "text": "end" },
            ]},
        })))
        .unwrap();

        assert_eq!(post.text, "startend");
    }

    #[test]
    fn post_without_text_gets_empty_string() {
        let post = normalize_thread(&wrap(json!({ "postId": "p1" }))).unwrap();
        assert_eq!(post.text, "");
        assert!(post.image_links.is_empty());
        assert!(post.video_link.is_none());
        assert!(!post.has_poll);
    }

    #[test]
    fn permalink_follows_the_id() {
        let post = normalize_thread(&wrap(json!({ "postId": "Ug4xyz" }))).unwrap();
        assert_eq!(post.id, "Ug4xyz");
        assert_eq!(post.permalink, "https://www.youtube.com/post/Ug4xyz");
    }

    #[test]
    fn missing_or_empty_id_drops_the_record() {
        assert!(normalize_thread(&wrap(json!({ "contentText": { "runs": [] } }))).is_none());
        assert!(normalize_thread(&wrap(json!({ "postId": "" }))).is_none());
    }

    #[test]
    fn unrecognized_wrappers_are_skipped() {
        assert!(normalize_thread(&json!({ "notAPost": {} })).is_none());
        assert!(normalize_thread(&json!({ "post": { "somethingElse": {} } })).is_none());
    }

    #[test]
    fn shared_posts_read_their_text_from_content() {
        let post = normalize_thread(&json!({
            "post": { "sharedPostRenderer": {
                "postId": "shared1",
                "content": { "runs": [{ "text": "reposted" }] },
            }},
        }))
        .unwrap();

        assert_eq!(post.id, "shared1");
        assert_eq!(post.text, "reposted");
    }

    #[test]
    fn relative_age_comes_from_published_time_text() {
        let post = normalize_thread(&wrap(json!({
            "postId": "p1",
            "publishedTimeText": { "runs": [{ "text": "2 weeks ago" }] },
        })))
        .unwrap();

        assert_eq!(post.relative_age, "2 weeks ago");
    }

    #[test]
    fn single_image_takes_the_last_thumbnail() {
        let post = normalize_thread(&wrap(json!({
            "postId": "p1",
            "backstageAttachment": { "backstageImageRenderer": {
                "image": { "thumbnails": [
                    { "url": "s" }, { "url": "m" }, { "url": "l" },
                ]},
            }},
        })))
        .unwrap();

        assert_eq!(post.image_links, vec!["l"]);
    }

    #[test]
    fn gallery_keeps_source_order_and_skips_empty_urls() {
        let post = normalize_thread(&wrap(json!({
            "postId": "p1",
            "backstageAttachment": { "postMultiImageRenderer": { "images": [
                { "backstageImageRenderer": { "image": { "thumbnails": [{ "url": "one" }] } } },
                { "backstageImageRenderer": { "image": { "thumbnails": [{ "url": "" }] } } },
                { "backstageImageRenderer": { "image": { "thumbnails": [{ "url": "two" }] } } },
            ]}},
        })))
        .unwrap();

        assert_eq!(post.image_links, vec!["one", "two"]);
    }

    #[test]
    fn video_attachment_becomes_a_watch_link() {
        let post = normalize_thread(&wrap(json!({
            "postId": "p1",
            "backstageAttachment": { "videoRenderer": { "videoId": "dQw4w9WgXcQ" } },
        })))
        .unwrap();

        assert_eq!(
            post.video_link.as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
        assert!(post.image_links.is_empty());
    }

    #[test]
    fn renormalizing_is_stable_apart_from_the_timestamp() {
        let wrapper = wrap(json!({
            "postId": "p1",
            "contentText": { "runs": [{ "text": "same" }] },
            "publishedTimeText": { "runs": [{ "text": "1 day ago" }] },
            "backstageAttachment": { "backstageImageRenderer": {
                "image": { "thumbnails": [{ "url": "img" }] },
            }},
        }));

        let first = normalize_thread(&wrapper).unwrap();
        let second = normalize_thread(&wrapper).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.permalink, second.permalink);
        assert_eq!(first.text, second.text);
        assert_eq!(first.relative_age, second.relative_age);
        assert_eq!(first.video_link, second.video_link);
        assert_eq!(first.image_links, second.image_links);
        assert_eq!(first.has_poll, second.has_poll);
    }
}
