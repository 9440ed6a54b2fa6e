//! Lyrics block locator
//!
//! Finds the lyrics containers on a Genius song page and turns each into a
//! list of text lines for [`scan`](super::scan).

use super::scan::{self, is_section_marker, is_start_cue};
use scraper::{ElementRef, Html, Node};
use tracing::debug;

/// Class prefix of the `div`s Genius puts lyrics in.
pub const DEFAULT_CONTAINER_PREFIX: &str = "Lyrics-sc";

/// One candidate lyrics container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub lines: Vec<String>,
    /// Lines were re-extracted with `<br><br>` pairs as blank lines.
    pub paragraph_split: bool,
}

#[derive(Debug, Clone)]
pub struct Extractor {
    class_prefix: String,
}

impl Extractor {
    pub fn new(class_prefix: impl Into<String>) -> Self {
        Self {
            class_prefix: class_prefix.into(),
        }
    }

    /// Candidate blocks in document order.
    pub fn locate_blocks(&self, html: &str) -> Vec<RawBlock> {
        let doc = Html::parse_document(html);
        doc.root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| {
                el.value().name() == "div"
                    && el
                        .value()
                        .classes()
                        .any(|c| c.starts_with(self.class_prefix.as_str()))
            })
            .map(|el| {
                let lines = text_lines(el, false);
                if has_section_markers(&lines) == Some(false) {
                    debug!("no section markers after cue, splitting on <br> pairs");
                    RawBlock {
                        lines: text_lines(el, true),
                        paragraph_split: true,
                    }
                } else {
                    RawBlock {
                        lines,
                        paragraph_split: false,
                    }
                }
            })
            .collect()
    }

    /// Lyrics from the first block that yields any, or an empty string.
    pub fn extract(&self, html: &str) -> String {
        let blocks = self.locate_blocks(html);
        debug!(count = blocks.len(), "lyrics containers located");

        let mut lyrics = String::new();
        for (idx, block) in blocks.iter().enumerate() {
            lyrics = scan::clean_block(&block.lines);
            if !lyrics.is_empty() {
                debug!(block = idx, "lyrics found");
                break;
            }
            debug!(block = idx, "block empty after filtering");
        }
        lyrics
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_PREFIX)
    }
}

/// `None` when the block never reaches the start cue.
fn has_section_markers(lines: &[String]) -> Option<bool> {
    let start = lines.iter().position(|l| is_start_cue(l))?;
    Some(lines[start..].iter().any(|l| is_section_marker(l)))
}

/// Text nodes under `container`, trimmed, one entry per line.
///
/// With `paragraphs` set, every adjacent `<br><br>` pair adds an empty line.
fn text_lines(container: ElementRef<'_>, paragraphs: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let mut paired = false;

    for node in container.descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .parent()
                    .and_then(ElementRef::wrap)
                    .is_some_and(|p| matches!(p.value().name(), "script" | "style"));
                if hidden {
                    continue;
                }
                let text = text.trim();
                if !text.is_empty() {
                    lines.extend(text.lines().map(|l| l.trim().to_string()));
                }
            }
            Node::Element(el) if paragraphs && el.name() == "br" => {
                let after_br = node
                    .prev_sibling()
                    .is_some_and(|prev| matches!(prev.value(), Node::Element(p) if p.name() == "br"));
                if after_br && !paired {
                    lines.push(String::new());
                    paired = true;
                } else {
                    paired = false;
                }
            }
            _ => {}
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> String {
        format!("<!DOCTYPE html><html><head><title>t</title></head><body>{body}</body></html>")
    }

    #[test]
    fn test_end_to_end_single_container() {
        let html = page(
            r#"<div class="Lyrics-sc-1a2b3c-1 kXyZ">Some Song Lyrics<br/>[Intro]<br/>La la la<br/>[Chorus]<br/>Na na na<br/>Embed</div>"#,
        );
        assert_eq!(Extractor::default().extract(&html), "La la la\n\nNa na na");
    }

    #[test]
    fn test_no_container_is_empty() {
        let html = page(r#"<div class="SongHeader">Song Lyrics<br/>[Verse]<br/>a<br/>b</div>"#);
        let ex = Extractor::default();
        assert!(ex.locate_blocks(&html).is_empty());
        assert_eq!(ex.extract(&html), "");
    }

    #[test]
    fn test_prefix_must_start_a_class_token() {
        let html = page(r#"<div class="xLyrics-sc-1">Song Lyrics<br/>[Verse]<br/>a<br/>b</div>"#);
        assert!(Extractor::default().locate_blocks(&html).is_empty());
    }

    #[test]
    fn test_inline_markup_is_line_aware() {
        let html = page(
            r#"<div class="Lyrics-sc-9">Title Lyrics<br/>[Verse 1: <a href="/a">Artist</a>]<br/><a href="/x"><span>First <i>line</i></span></a><br/>[Chorus]<br/>Second line<br/>Embed</div>"#,
        );
        let ex = Extractor::default();
        let blocks = ex.locate_blocks(&html);
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].lines,
            vec![
                "Title Lyrics",
                "[Verse 1:",
                "Artist",
                "]",
                "First",
                "line",
                "[Chorus]",
                "Second line",
                "Embed"
            ]
        );
        assert!(!blocks[0].paragraph_split);
        assert_eq!(ex.extract(&html), "First\nline\n\nSecond line");
    }

    #[test]
    fn test_split_markers_alone_trigger_fallback() {
        let html = page(r#"<div class="Lyrics-sc-9">Title Lyrics<br/>[Verse 1: <a>Artist</a>]<br/>a<br/>Embed</div>"#);
        assert!(Extractor::default().locate_blocks(&html)[0].paragraph_split);
    }

    #[test]
    fn test_decoy_block_falls_through() {
        let html = page(concat!(
            r#"<div class="Lyrics-sc-aaa">Lyrics</div>"#,
            r#"<div class="Lyrics-sc-bbb">Real Song Lyrics<br/>[Chorus]<br/>Hey<br/>Ho<br/>5Embed</div>"#,
        ));
        let ex = Extractor::default();
        assert_eq!(ex.locate_blocks(&html).len(), 2);
        assert_eq!(ex.extract(&html), "Hey\nHo");
    }

    #[test]
    fn test_first_non_empty_block_wins() {
        let html = page(concat!(
            r#"<div class="Lyrics-sc-a">A Lyrics<br/>[Verse]<br/>first<br/>Embed</div>"#,
            r#"<div class="Lyrics-sc-b">B Lyrics<br/>[Verse]<br/>second<br/>Embed</div>"#,
        ));
        assert_eq!(Extractor::default().extract(&html), "first");
    }

    #[test]
    fn test_fallback_splits_on_br_pairs() {
        let html = page(
            r#"<div class="Lyrics-sc-x">Song Lyrics<br/>First verse line<br/>Second line<br/><br/>Third line<br/>Fourth line<br/>123Embed</div>"#,
        );
        let blocks = Extractor::default().locate_blocks(&html);
        assert!(blocks[0].paragraph_split);
        assert_eq!(
            Extractor::default().extract(&html),
            "First verse line\nSecond line\n\nThird line\nFourth line"
        );
    }

    #[test]
    fn test_markers_before_cue_do_not_prevent_fallback() {
        let html = page(
            r#"<div class="Lyrics-sc-x">[Info]<br/>Song Lyrics<br/>a<br/><br/>b<br/>end</div>"#,
        );
        let blocks = Extractor::default().locate_blocks(&html);
        assert!(blocks[0].paragraph_split);
        assert_eq!(blocks[0].lines, vec!["[Info]", "Song Lyrics", "a", "", "b", "end"]);
    }

    #[test]
    fn test_br_runs_pair_up() {
        let html = page(r#"<div class="Lyrics-sc-x">Song Lyrics<br/>a<br/><br/><br/><br/>b<br/>end</div>"#);
        let blocks = Extractor::default().locate_blocks(&html);
        assert_eq!(blocks[0].lines, vec!["Song Lyrics", "a", "", "", "b", "end"]);
        assert_eq!(Extractor::default().extract(&html), "a\n\nb");
    }

    #[test]
    fn test_custom_prefix() {
        let html = page(r#"<div class="Lyrics__Container-sc-1">Song Lyrics<br/>[Verse]<br/>x<br/>Embed</div>"#);
        assert_eq!(Extractor::new("Lyrics__Container").extract(&html), "x");
        assert_eq!(Extractor::default().extract(&html), "");
    }

    #[test]
    fn test_script_text_ignored() {
        let html = page(
            r#"<div class="Lyrics-sc-x">Song Lyrics<br/>[Verse]<script>var x = 1;</script><br/>line<br/>Embed</div>"#,
        );
        assert_eq!(Extractor::default().extract(&html), "line");
    }
}
