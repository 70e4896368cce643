use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

/// Opens every post-thread entry embedded in the channel page.
const THREAD_MARKER: &str = "{\"backstagePostThreadRenderer\":";

/// Closing run of a complete entry: the final string value's quote plus
/// the braces that close the renderer chain and the entry itself.
const THREAD_TERMINATOR: &str = "\"}}}}";

lazy_static! {
    static ref API_KEY_RE: Regex = Regex::new(r#""INNERTUBE_API_KEY":"([^"]+)""#).unwrap();
    static ref API_URL_RE: Regex = Regex::new(r#""apiUrl":"([^"]+)""#).unwrap();
    static ref TOKEN_RE: Regex = Regex::new(r#""token":"([^"]+)""#).unwrap();
    static ref INITIAL_DATA_RE: Regex =
        Regex::new(r"(?s)var ytInitialData = (\{.+?\});</script>").unwrap();
}

/// Recovers the post-thread entries embedded in the channel page.
///
/// The page as a whole is not parseable, so each entry is located by its
/// opening marker and bounded by the shortest terminator run that is
/// followed by either a sibling entry (`,{`) or the close of the
/// enclosing array (`],`). Post bodies nest braces, so the boundary has
/// to anchor on the enclosing array's syntax, not on brace counting.
///
/// Each captured span is rebuilt into a standalone JSON object and
/// decoded; entries that fail to decode are dropped without affecting
/// the rest.
pub fn recover_post_threads(html: &str) -> Vec<Value> {
    let mut threads = Vec::new();
    let mut cursor = 0;

    while let Some(found) = html[cursor..].find(THREAD_MARKER) {
        let start = cursor + found + THREAD_MARKER.len();

        let Some(end) = find_entry_end(html, start) else {
            // No bounded terminator anywhere after this marker, so none
            // of the later markers can have one either.
            break;
        };

        // The terminator's quote and all but its last brace belong to the
        // entry's inner value; putting them back yields valid JSON again.
        let mut fragment = String::with_capacity(end - start + 4);
        fragment.push_str(&html[start..end]);
        fragment.push_str("\"}}}");

        if let Ok(value) = serde_json::from_str::<Value>(&fragment) {
            threads.push(value);
        }

        cursor = end + THREAD_TERMINATOR.len();
    }

    threads
}

/// Shortest terminator at or after `start` whose lookahead confirms an
/// entry boundary. Returns the terminator's byte offset.
fn find_entry_end(html: &str, start: usize) -> Option<usize> {
    let mut scan = start;
    while let Some(found) = html[scan..].find(THREAD_TERMINATOR) {
        let pos = scan + found;
        let after = &html[pos + THREAD_TERMINATOR.len()..];
        if after.starts_with(",{") || after.starts_with("],") {
            return Some(pos);
        }
        scan = pos + 1;
    }
    None
}

/// INNERTUBE api key, as embedded in the page config blob.
pub fn api_key(html: &str) -> Option<String> {
    first_capture(html, &API_KEY_RE)
}

/// Path of the browse endpoint the continuation requests go to.
pub fn api_endpoint(html: &str) -> Option<String> {
    first_capture(html, &API_URL_RE)
}

/// First continuation token issued by the page.
pub fn initial_token(html: &str) -> Option<String> {
    first_capture(html, &TOKEN_RE)
}

/// The page's `ytInitialData` blob, for debug dumps when extraction
/// comes up empty.
pub fn initial_data(html: &str) -> Option<String> {
    first_capture(html, &INITIAL_DATA_RE)
}

fn first_capture(html: &str, re: &Regex) -> Option<String> {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
