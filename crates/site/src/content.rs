//! Markdown rendering for portfolio entries.
//!
//! Entry bodies are stored as markdown by the admin pages. On render:
//! - GFM extensions are enabled and raw HTML is passed through
//! - links to YouTube videos become embedded players
//! - other links open in a new tab
//! - long bodies get a short preview plus the full text behind a disclosure

use std::sync::LazyLock;

use comrak::{Options, markdown_to_html};
use regex::Regex;
use url::Url;

/// Preview length for websites and contributions.
pub const SHORT_PREVIEW_CHARS: usize = 150;

/// Preview length for everything else.
pub const DEFAULT_PREVIEW_CHARS: usize = 300;

/// Rendered markdown, optionally with a shortened preview.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// Full body as HTML.
    pub html: String,
    /// First `max_chars` of the source rendered as HTML, present only when the
    /// source was longer than that.
    pub preview_html: Option<String>,
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
#[must_use]
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    // Entries are written by the site owner; raw HTML is allowed
    options.render.r#unsafe = true;

    rewrite_links(&markdown_to_html(content, &options))
}

/// Render markdown, adding a preview when it exceeds `max_chars` characters.
#[must_use]
pub fn render_truncated(content: &str, max_chars: usize) -> Rendered {
    let preview_html = truncate_chars(content, max_chars).map(render_markdown);
    Rendered {
        html: render_markdown(content),
        preview_html,
    }
}

/// The first `max_chars` characters of `s`, or `None` if `s` is not longer.
fn truncate_chars(s: &str, max_chars: usize) -> Option<&str> {
    s.char_indices().nth(max_chars).map(|(end, _)| &s[..end])
}

// =============================================================================
// Link Rewriting
// =============================================================================

/// Matches rendered anchors: `<a href="...">label</a>`.
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a href="([^"]*)"([^>]*)>(.*?)</a>"#).expect("Invalid regex"));

fn rewrite_links(html: &str) -> String {
    ANCHOR_RE
        .replace_all(html, |caps: &regex::Captures| {
            let href = &caps[1];
            let attrs = &caps[2];
            let label = &caps[3];

            youtube_video_id(&href.replace("&amp;", "&")).map_or_else(
                || format!(r#"<a href="{href}"{attrs} target="_blank" rel="noopener noreferrer">{label}</a>"#),
                |id| render_youtube_embed(&id),
            )
        })
        .into_owned()
}

/// Extract the video id from a YouTube watch, short, embed, or `youtu.be`
/// link.
fn youtube_video_id(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let id = match host {
        "youtu.be" => url.path_segments()?.next()?.to_string(),
        "youtube.com" | "youtube-nocookie.com" => {
            let mut segments = url.path_segments()?;
            match segments.next()? {
                "watch" => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())?,
                "embed" | "shorts" | "live" => segments.next()?.to_string(),
                _ => return None,
            }
        }
        _ => return None,
    };

    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

fn render_youtube_embed(video_id: &str) -> String {
    format!(
        r#"<div class="video-embed"><iframe src="https://www.youtube.com/embed/{video_id}" title="YouTube video player" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe></div>"#
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown_basic() {
        let html = render_markdown("**bold** and ~~gone~~");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_external_links_open_in_new_tab() {
        let html = render_markdown("[site](https://example.com)");
        assert!(html.contains(
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">site</a>"#
        ));
    }

    #[test]
    fn test_youtube_links_become_embeds() {
        let html = render_markdown("[demo](https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42)");
        assert!(html.contains(r#"src="https://www.youtube.com/embed/dQw4w9WgXcQ""#));
        assert!(!html.contains("<a href"));

        let html = render_markdown("[short](https://youtu.be/dQw4w9WgXcQ)");
        assert!(html.contains("embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_youtube_video_id() {
        assert_eq!(
            youtube_video_id("https://youtube.com/shorts/abc_DEF-123").as_deref(),
            Some("abc_DEF-123")
        );
        assert_eq!(youtube_video_id("https://www.youtube.com/@channel"), None);
        assert_eq!(youtube_video_id("https://www.youtube.com/watch?v=<bad>"), None);
        assert_eq!(youtube_video_id("https://vimeo.com/12345"), None);
        assert_eq!(youtube_video_id("not a url"), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 5), None);
        assert_eq!(truncate_chars("hello", 3), Some("hel"));
        assert_eq!(truncate_chars("héllo wörld", 4), Some("héll"));
        assert_eq!(truncate_chars("", 0), None);
    }

    #[test]
    fn test_render_truncated() {
        let short = render_truncated("A short note.", DEFAULT_PREVIEW_CHARS);
        assert!(short.preview_html.is_none());
        assert!(short.html.contains("A short note."));

        let long = "word ".repeat(60);
        let rendered = render_truncated(&long, SHORT_PREVIEW_CHARS);
        let preview = rendered.preview_html.unwrap();
        assert!(preview.len() < rendered.html.len());
    }
}
