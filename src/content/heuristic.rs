//! Heuristic tier: read `Title:` / `Description:` / `Hashtags:` style text line by line.

use std::sync::OnceLock;

use regex::Regex;

use super::hashtags::split_tag_line;
use super::{fallback_description, fallback_title, synthetic, ContentPackage};

fn title_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)"title"|\btitle\b[*_]*\s*:"#).expect("title marker regex should compile")
    })
}

fn description_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)"description"|\bdescription\b[*_]*\s*:"#)
            .expect("description marker regex should compile")
    })
}

fn hashtags_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)"hashtags"|\bhashtags\b[*_]*\s*(?:\([^)]*\))?[*_]*\s*:"#)
            .expect("hashtags marker regex should compile")
    })
}

fn section_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:option|content\s+plan|video)\s*#?\s*\d+\s*[*_]*\s*:")
            .expect("section heading regex should compile")
    })
}

fn list_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s*").expect("list item regex should compile")
    })
}

/// Packages scraped from labelled text. The single-option case always
/// produces a package; several options need `Option N:` style headings.
pub fn extract(raw: &str, topic: &str, option_count: usize) -> Option<Vec<ContentPackage>> {
    if option_count <= 1 {
        return Some(vec![extract_package(raw, topic, fallback_title(topic), false)]);
    }

    let sections = split_sections(raw);
    if sections.is_empty() {
        log::debug!("No option headings found in model text");
        return None;
    }

    let mut packages: Vec<ContentPackage> = sections
        .iter()
        .take(option_count)
        .enumerate()
        .map(|(i, section)| {
            let default_title = format!("Video option {} about {}", i + 1, topic);
            extract_package(section, topic, default_title, true)
        })
        .collect();

    if packages.len() < option_count {
        log::debug!(
            "Found {} of {} option sections, filling the rest",
            packages.len(),
            option_count
        );
        synthetic::fill(&mut packages, topic, option_count);
    }

    Some(packages)
}

/// Text following each `Option N:` / `Content Plan N:` / `Video N:` heading.
/// Anything before the first heading is dropped.
pub fn split_sections(raw: &str) -> Vec<&str> {
    section_heading().split(raw).skip(1).collect()
}

/// Read one package out of `text`. With `heading_title`, an unlabelled first
/// line (the rest of an `Option N:` heading) stands in for a missing title.
pub fn extract_package(
    text: &str,
    topic: &str,
    default_title: String,
    heading_title: bool,
) -> ContentPackage {
    let lines: Vec<&str> = text.lines().collect();

    let title = find_title(&lines)
        .or_else(|| {
            if heading_title {
                heading_line_title(&lines)
            } else {
                None
            }
        })
        .unwrap_or(default_title);

    let description = find_description(&lines)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| fallback_description(topic));

    let hashtags = find_hashtags(&lines)
        .filter(|tags| !tags.is_empty())
        .unwrap_or_else(|| super::hashtags::default_hashtags(topic));

    ContentPackage {
        title,
        description,
        hashtags,
    }
}

fn find_title(lines: &[&str]) -> Option<String> {
    lines.iter().find_map(|line| {
        let m = title_marker().find(line)?;
        Some(clean_value(&line[m.end()..])).filter(|t| !t.is_empty())
    })
}

fn heading_line_title(lines: &[&str]) -> Option<String> {
    let first = lines.first()?;
    if description_marker().is_match(first) || hashtags_marker().is_match(first) {
        return None;
    }
    Some(clean_value(first)).filter(|t| !t.is_empty())
}

fn find_description(lines: &[&str]) -> Option<String> {
    let (start, line) = lines
        .iter()
        .enumerate()
        .find(|(_, line)| description_marker().is_match(line))?;

    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| hashtags_marker().is_match(line))
        .map(|(i, _)| i)
        .unwrap_or(lines.len());

    let mut parts: Vec<String> = Vec::new();
    if let Some(m) = description_marker().find(line) {
        let inline = clean_value(&line[m.end()..]);
        if !inline.is_empty() {
            parts.push(inline);
        }
    }
    parts.extend(
        lines[start + 1..end]
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(String::from),
    );

    let joined = parts.join(" ");
    Some(trim_quotes(&joined).to_string())
}

fn find_hashtags(lines: &[&str]) -> Option<Vec<String>> {
    let (start, line) = lines
        .iter()
        .enumerate()
        .find(|(_, line)| hashtags_marker().is_match(line))?;

    let mut tags: Vec<String> = Vec::new();

    if let Some(m) = hashtags_marker().find(line) {
        tags.extend(split_tag_line(&clean_list_item(&line[m.end()..])));
    }

    for line in &lines[start + 1..] {
        let trimmed = line.trim();
        let candidate = list_item().is_match(trimmed)
            || trimmed.starts_with('#')
            || trimmed.starts_with('"')
            || trimmed.contains(':');
        if candidate {
            tags.extend(split_tag_line(&clean_list_item(trimmed)));
        }
    }

    tags.retain(|t| t.chars().any(|c| c.is_alphanumeric()));
    Some(tags)
}

/// Strip list numbering/bullets, brackets, braces, quotes and commas around a tag line.
fn clean_list_item(line: &str) -> String {
    let without_marker = list_item().replace(line, "");
    without_marker
        .trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '"' | '\'' | ',' | '[' | ']' | '{' | '}' | ':' | '*')
        })
        .to_string()
}

/// Value after a `Label:` or `"key":` marker.
fn clean_value(rest: &str) -> String {
    let rest = rest.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '*' | '_'));

    if let Some(quoted) = rest.strip_prefix('"') {
        if let Some(end) = closing_quote(quoted) {
            return quoted[..end].replace("\\\"", "\"").trim().to_string();
        }
    }

    rest.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '"' | ',' | '*' | '_'))
        .trim_start_matches('"')
        .trim()
        .to_string()
}

/// Byte offset of the first unescaped `"`.
fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, ch) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            return Some(i);
        }
    }
    None
}

fn trim_quotes(s: &str) -> &str {
    s.trim()
        .trim_end_matches(',')
        .trim_matches('"')
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::hashtags::default_hashtags;

    #[test]
    fn test_extract_labelled_text() {
        let raw = "Here is your plan!\n\
                   Title: Cats Who Code\n\
                   Description:\n\
                   Meet the felines who ship features.\n\
                   They review every pull request.\n\
                   Hashtags:\n\
                   1. #cats\n\
                   2. #coding\n\
                   - #devlife\n";
        let packages = extract(raw, "cats", 1).unwrap();
        assert_eq!(packages.len(), 1);
        let p = &packages[0];
        assert_eq!(p.title, "Cats Who Code");
        assert_eq!(
            p.description,
            "Meet the felines who ship features. They review every pull request."
        );
        assert_eq!(p.hashtags, vec!["cats", "coding", "devlife"]);
    }

    #[test]
    fn test_extract_markdown_labels() {
        let raw = "**Title:** \"Lo-fi Beats to Debug To\"\n\
                   **Description:** Chill tracks for long nights.\n\
                   **Hashtags:** #lofi #beats #study";
        let p = &extract(raw, "lofi", 1).unwrap()[0];
        assert_eq!(p.title, "Lo-fi Beats to Debug To");
        assert_eq!(p.description, "Chill tracks for long nights.");
        assert_eq!(p.hashtags, vec!["lofi", "beats", "study"]);
    }

    #[test]
    fn test_extract_truncated_json_lines() {
        let raw = "{\n  \"title\": \"Cat Chaos\",\n  \"description\": \"Cats knocking things over.\",\n  \"hashtags\": [\"#cats\", \"funny\",\n    \"pets";
        let p = &extract(raw, "cats", 1).unwrap()[0];
        assert_eq!(p.title, "Cat Chaos");
        assert_eq!(p.description, "Cats knocking things over.");
        assert_eq!(p.hashtags, vec!["cats", "funny", "pets"]);
    }

    #[test]
    fn test_extract_one_line_json_missing_comma() {
        let raw = r#"{"title": "X", "description": "Y" "hashtags": ["a", "b"]}"#;
        let p = &extract(raw, "cats", 1).unwrap()[0];
        assert_eq!(p.title, "X");
        assert_eq!(p.description, "Y");
        assert_eq!(p.hashtags, vec!["a", "b"]);
    }

    #[test]
    fn test_clean_list_item_strips_closing_braces() {
        assert_eq!(clean_list_item(r#" ["a", "b"]}"#), r#"a", "b"#);
        assert_eq!(clean_list_item("{#cats}"), "#cats");
    }

    #[test]
    fn test_extract_nothing_found_uses_defaults() {
        let p = &extract("lorem ipsum", "rust tips", 1).unwrap()[0];
        assert_eq!(p.title, "Video about rust tips");
        assert_eq!(p.description, "This is a video about rust tips.");
        assert_eq!(p.hashtags, default_hashtags("rust tips"));
    }

    #[test]
    fn test_extract_option_sections() {
        let raw = "Sure! Here are the options.\n\n\
                   **Option 1: Speedrun Cats**\n\
                   Description: Cats racing.\n\
                   Hashtags: #cats #speedrun\n\n\
                   **Option 2:**\n\
                   Title: Slow Cats\n\
                   Description: Cats napping.\n\
                   Hashtags:\n\
                   - naps\n\
                   - cats\n";
        let packages = extract(raw, "cats", 3).unwrap();
        assert_eq!(packages.len(), 3);

        assert_eq!(packages[0].title, "Speedrun Cats");
        assert_eq!(packages[0].description, "Cats racing.");
        assert_eq!(packages[0].hashtags, vec!["cats", "speedrun"]);

        assert_eq!(packages[1].title, "Slow Cats");
        assert_eq!(packages[1].description, "Cats napping.");
        assert_eq!(packages[1].hashtags, vec!["naps", "cats"]);

        assert_eq!(packages[2].title, "Video option 3 about cats");
        assert_eq!(packages[2].description, "This is video option 3 about cats.");
    }

    #[test]
    fn test_extract_section_defaults_are_numbered() {
        let raw = "Content Plan 1:\nDescription: only a description\nVideo 2:\n";
        let packages = extract(raw, "tea", 2).unwrap();
        assert_eq!(packages[0].title, "Video option 1 about tea");
        assert_eq!(packages[0].description, "only a description");
        assert_eq!(packages[1].title, "Video option 2 about tea");
        assert_eq!(packages[1].description, "This is a video about tea.");
        assert_eq!(packages[1].hashtags, default_hashtags("tea"));
    }

    #[test]
    fn test_extract_caps_sections_at_option_count() {
        let raw = "Option 1: A\nOption 2: B\nOption 3: C";
        let packages = extract(raw, "x", 2).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[1].title, "B");
    }

    #[test]
    fn test_extract_multi_without_headings_fails() {
        assert!(extract("Title: Lonely\nDescription: one plan only", "x", 3).is_none());
        assert!(extract("", "x", 2).is_none());
    }

    #[test]
    fn test_split_sections_skips_preamble() {
        let sections = split_sections("intro text\nOPTION 1: first\nvideo 2: second");
        assert_eq!(sections, vec![" first\n", " second"]);
    }

    #[test]
    fn test_clean_value_variants() {
        assert_eq!(clean_value(": \"Quoted \\\"Title\\\"\", \"x\": 1"), "Quoted \"Title\"");
        assert_eq!(clean_value("** Bold Title **"), "Bold Title");
        assert_eq!(clean_value(": \"unterminated"), "unterminated");
        assert_eq!(clean_value("   "), "");
    }
}
