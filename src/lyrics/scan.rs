//! Line classifier for scraped lyrics pages
//!
//! Genius renders lyrics as a flat run of text nodes mixed with section
//! headers (`[Chorus]`), annotations split over several nodes, and injected
//! page chrome. [`ScanState`] walks those lines in order and decides, per
//! line, whether it is sung text, a verse boundary, or noise.

use tracing::{debug, trace};

/// Verdict for one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Before the "Lyrics" cue; page header text.
    SkipPreroll,
    /// `[Chorus]` on a single line.
    SectionMarker,
    /// Starts with `[` but doesn't end with `]`; swallowed up to the next `]`.
    UnclosedSectionMarker,
    /// Swallowed while waiting for the `]` of an unclosed section marker.
    SectionMarkerContinuation,
    /// Contains `(` but doesn't end with `)`; collected up to the next `)`.
    UnclosedParenthetical,
    /// Collected into the pending parenthetical.
    ParentheticalContinuation,
    /// The embed footer that ends every lyrics container.
    Embed,
    /// Promo injected into the container ("You might also like", tour dates).
    Promo,
    /// The line right after a tour-date promo (ticket price).
    PromoContinuation,
    /// Sung text.
    LyricLine,
}

/// Where the scan currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BeforeStart,
    Started,
    InSectionMarkerContinuation,
    InParentheticalContinuation,
    SkippingPromoLine,
}

/// One accumulated output entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Line(String),
    /// Verse separator.
    Blank,
    /// Occupies the trailing slot dropped by [`finish`]; renders as nothing.
    Footer,
}

/// Mutable context for one candidate block.
#[derive(Debug, Default)]
pub struct ScanState {
    song_started: bool,
    in_unclosed_section_marker: bool,
    in_unclosed_parenthetical: bool,
    pending_parenthetical: String,
    skip_next_line: bool,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state that has already seen the "Lyrics" cue.
    #[cfg(test)]
    pub fn started() -> Self {
        Self {
            song_started: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        if self.skip_next_line {
            Phase::SkippingPromoLine
        } else if self.in_unclosed_section_marker {
            Phase::InSectionMarkerContinuation
        } else if self.in_unclosed_parenthetical {
            Phase::InParentheticalContinuation
        } else if self.song_started {
            Phase::Started
        } else {
            Phase::BeforeStart
        }
    }

    /// Classify one line, pushing whatever it contributes onto `out`.
    pub fn feed(&mut self, raw: &str, out: &mut Vec<Entry>) -> LineClass {
        let line = raw.trim();

        if self.skip_next_line {
            self.skip_next_line = false;
            return LineClass::PromoContinuation;
        }

        if self.in_unclosed_section_marker {
            if line.contains(']') {
                self.in_unclosed_section_marker = false;
            }
            return LineClass::SectionMarkerContinuation;
        }

        if self.in_unclosed_parenthetical {
            if !line.is_empty() {
                self.pending_parenthetical.push(' ');
                self.pending_parenthetical.push_str(line);
            }
            if line.contains(')') {
                self.in_unclosed_parenthetical = false;
                out.push(Entry::Line(std::mem::take(&mut self.pending_parenthetical)));
            }
            return LineClass::ParentheticalContinuation;
        }

        if is_start_cue(line) && !self.song_started {
            debug!(line, "song starts");
            self.song_started = true;
        }

        if !self.song_started {
            return LineClass::SkipPreroll;
        }

        if is_section_marker(line) {
            out.push(Entry::Blank);
            return LineClass::SectionMarker;
        }

        if line.starts_with('[') {
            self.in_unclosed_section_marker = true;
            return LineClass::UnclosedSectionMarker;
        }

        if let Some(open) = opens_parenthetical(line) {
            self.in_unclosed_parenthetical = true;
            self.pending_parenthetical = line[open..].to_string();
            return LineClass::UnclosedParenthetical;
        }

        if line == "Embed" {
            out.push(Entry::Footer);
            return LineClass::Embed;
        }

        if line == "You might also like" {
            return LineClass::Promo;
        }

        // "See <Artist> Live" is followed by a ticket price line.
        if line.starts_with("See") && line.ends_with("Live") {
            self.skip_next_line = true;
            return LineClass::Promo;
        }

        if line.is_empty() {
            out.push(Entry::Blank);
        } else {
            out.push(Entry::Line(line.to_string()));
        }
        LineClass::LyricLine
    }
}

/// `[Intro]` or anything mentioning `Lyrics` (case-sensitive).
pub fn is_start_cue(line: &str) -> bool {
    line == "[Intro]" || line.contains("Lyrics")
}

/// A section header closed on the same line.
pub fn is_section_marker(line: &str) -> bool {
    line.starts_with('[') && line.ends_with(']')
}

/// Byte offset of the first `(` when the line doesn't end with `)`.
///
/// Only the line ending is checked, so `(Yeah) I'm here` opens one too.
fn opens_parenthetical(line: &str) -> Option<usize> {
    if line.ends_with(')') {
        return None;
    }
    line.find('(')
}

/// Run every line of a block through a fresh [`ScanState`].
pub fn scan<S: AsRef<str>>(state: &mut ScanState, lines: &[S]) -> Vec<Entry> {
    let mut out = Vec::new();
    for line in lines {
        let class = state.feed(line.as_ref(), &mut out);
        trace!(line = line.as_ref(), ?class, "classified");
    }
    out
}

/// Render entries as lines, never emitting two blank lines in a row.
pub fn collapse_blank_lines(entries: &[Entry]) -> Vec<&str> {
    let mut lines: Vec<&str> = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Entry::Line(text) => lines.push(text),
            Entry::Blank => {
                if lines.last() != Some(&"") {
                    lines.push("");
                }
            }
            Entry::Footer => {}
        }
    }
    lines
}

/// Drop the leading cue and trailing artifact, collapse blanks, trim.
pub fn finish(entries: &[Entry]) -> String {
    let interior = entries
        .get(1..entries.len().saturating_sub(1))
        .unwrap_or(&[]);
    collapse_blank_lines(interior).join("\n").trim().to_string()
}

/// Clean one candidate block into lyrics text (empty if nothing usable).
pub fn clean_block<S: AsRef<str>>(lines: &[S]) -> String {
    let mut state = ScanState::new();
    let entries = scan(&mut state, lines);
    match state.phase() {
        Phase::InParentheticalContinuation => {
            debug!(pending = %state.pending_parenthetical, "unclosed parenthetical dropped")
        }
        Phase::InSectionMarkerContinuation => debug!("block ended inside a section marker"),
        _ => {}
    }
    finish(&entries)
}
