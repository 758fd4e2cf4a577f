/// Leading symbol models like to put in front of a hashtag.
pub const MARKER: char = '#';

/// Tags appended to every generated fallback set.
const STOCK_TAGS: &[&str] = &[
    "video",
    "youtube",
    "content",
    "trending",
    "viral",
    "socialmedia",
    "creator",
    "influencer",
];

/// Trim whitespace and drop every leading marker. Idempotent.
pub fn strip_marker(tag: &str) -> String {
    tag.trim_start_matches(|c: char| c == MARKER || c.is_whitespace())
        .trim_end()
        .to_string()
}

/// Hashtags derived from the topic alone: the squashed topic, each word,
/// then the stock tags. First occurrence wins, empties are dropped.
pub fn default_hashtags(topic: &str) -> Vec<String> {
    let lower = topic.to_lowercase();
    let squashed: String = lower.split_whitespace().collect();

    let candidates = std::iter::once(squashed)
        .chain(lower.split_whitespace().map(String::from))
        .chain(STOCK_TAGS.iter().map(|t| t.to_string()));

    let mut tags: Vec<String> = Vec::new();
    for candidate in candidates {
        let tag = strip_marker(&candidate);
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Break one cleaned line of a hashtag list into tags.
///
/// `#a #b #c` and `a, b, c` yield three tags; anything else is a single tag.
pub fn split_tag_line(line: &str) -> Vec<String> {
    let line = line.trim();
    let marked = line
        .split_whitespace()
        .filter(|w| w.starts_with(MARKER))
        .count();

    let pieces: Vec<&str> = if marked >= 2 {
        line.split_whitespace().collect()
    } else if line.contains(',') {
        line.split(',').collect()
    } else {
        vec![line]
    };

    pieces
        .into_iter()
        .map(|p| p.trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace()))
        .map(strip_marker)
        .filter(|t| !t.is_empty())
        .collect()
}
