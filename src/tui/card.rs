//! Song card: cover art on the left, metadata on the right

use super::cover::CoverArt;
use crate::song::Song;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const FG_PRIMARY: Color = Color::Rgb(255, 255, 255);
const FG_SECONDARY: Color = Color::Rgb(136, 136, 136);
const UNKNOWN: &str = "Unknown";

/// Label/value pairs shown under the title.
pub fn metadata_rows(song: &Song) -> Vec<(&'static str, String)> {
    fn or_unknown(v: &Option<String>) -> String {
        v.as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    }

    vec![
        ("Artist", song.artists_display()),
        ("Album", or_unknown(&song.album)),
        ("Label", or_unknown(&song.label)),
        ("Genre", or_unknown(&song.genre)),
        (
            "Duration",
            song.duration_display()
                .unwrap_or_else(|| UNKNOWN.to_string()),
        ),
        (
            "Popularity",
            song.popularity
                .map(|rank| format!("#{}", thousands(rank)))
                .unwrap_or_else(|| UNKNOWN.to_string()),
        ),
        ("Released", or_unknown(&song.release_date)),
        ("Explicit", if song.explicit { "Yes" } else { "No" }.to_string()),
        ("ISRC", or_unknown(&song.isrc)),
        (
            "BPM",
            song.bpm
                .map(|b| format!("{b:.0}"))
                .unwrap_or_else(|| UNKNOWN.to_string()),
        ),
        (
            "Gain",
            song.gain
                .map(|g| format!("{g:.1} dB"))
                .unwrap_or_else(|| UNKNOWN.to_string()),
        ),
        ("Link", or_unknown(&song.link)),
    ]
}

fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Rows needed to draw the card.
pub fn height(song: &Song, cover: Option<&CoverArt>) -> u16 {
    // title + underline + metadata
    let text = 2 + metadata_rows(song).len() as u16;
    let art = cover.map(|c| c.rows.len() as u16).unwrap_or(0);
    text.max(art)
}

pub fn render(frame: &mut Frame, area: Rect, song: &Song, cover: Option<&CoverArt>) {
    let accent = cover
        .map(|c| Color::Rgb(c.accent[0], c.accent[1], c.accent[2]))
        .unwrap_or(FG_PRIMARY);

    let cover_width = cover
        .and_then(|c| c.rows.first())
        .map(|r| r.len() as u16)
        .unwrap_or(0);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(cover_width),
            Constraint::Length(if cover_width > 0 { 2 } else { 0 }), // gutter
            Constraint::Min(1),
        ])
        .split(area);

    if let Some(cover) = cover {
        let lines: Vec<Line> = cover
            .rows
            .iter()
            .map(|row| {
                Line::from(
                    row.iter()
                        .map(|(c, [r, g, b])| {
                            Span::styled(c.to_string(), Style::default().fg(Color::Rgb(*r, *g, *b)))
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), cols[0]);
    }

    let width = cols[2].width as usize;
    let mut lines = vec![
        Line::from(Span::styled(
            truncate_str(&song.title, width),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "-".repeat(song.title.chars().count().min(width)),
            Style::default().fg(FG_SECONDARY),
        )),
    ];

    for (label, value) in metadata_rows(song) {
        let prefix = format!("{label}: ");
        let room = width.saturating_sub(prefix.chars().count());
        lines.push(Line::from(vec![
            Span::styled(prefix, Style::default().fg(accent).add_modifier(Modifier::BOLD)),
            Span::styled(truncate_str(&value, room), Style::default().fg(FG_PRIMARY)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), cols[2]);
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn song() -> Song {
        Song {
            title: "Hello".into(),
            artists: vec!["Adele".into()],
            album: Some("25".into()),
            duration_seconds: Some(295),
            popularity: Some(812_345),
            explicit: false,
            bpm: Some(157.0),
            ..Song::default()
        }
    }

    #[test]
    fn test_metadata_rows() {
        let rows = metadata_rows(&song());
        let get = |label: &str| rows.iter().find(|(l, _)| *l == label).unwrap().1.clone();
        assert_eq!(get("Artist"), "Adele");
        assert_eq!(get("Album"), "25");
        assert_eq!(get("Label"), "Unknown");
        assert_eq!(get("Duration"), "4:55");
        assert_eq!(get("Popularity"), "#812,345");
        assert_eq!(get("Explicit"), "No");
        assert_eq!(get("BPM"), "157");
        assert_eq!(get("Gain"), "Unknown");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_height_uses_taller_side() {
        let s = song();
        assert_eq!(height(&s, None), 14);
        let tall = CoverArt {
            rows: vec![vec![('.', [0, 0, 0]); 40]; 20],
            accent: [200, 0, 0],
        };
        assert_eq!(height(&s, Some(&tall)), 20);
    }

    #[test]
    fn test_render_without_cover() {
        let s = song();
        let mut terminal = Terminal::new(TestBackend::new(40, height(&s, None))).unwrap();
        terminal
            .draw(|f| render(f, f.area(), &s, None))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let first: String = (0..5u16).map(|x| buffer[(x, 0u16)].symbol().to_string()).collect();
        assert_eq!(first, "Hello");
        let second: String = (0..5u16).map(|x| buffer[(x, 1u16)].symbol().to_string()).collect();
        assert_eq!(second, "-----");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("abcdef", 5), "ab...");
        assert_eq!(truncate_str("abc", 5), "abc");
        assert_eq!(truncate_str("abc", 0), "");
    }
}
