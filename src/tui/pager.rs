//! Full-screen scrollable lyrics view

use super::TerminalGuard;
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    Quit,
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,
    Resize,
}

pub fn map_input(ev: &Event) -> Option<PagerAction> {
    match ev {
        Event::Resize(_, _) => Some(PagerAction::Resize),
        Event::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp => Some(PagerAction::Up),
            MouseEventKind::ScrollDown => Some(PagerAction::Down),
            _ => None,
        },
        Event::Key(k) if k.kind == KeyEventKind::Press => match k.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(PagerAction::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(PagerAction::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(PagerAction::Down),
            KeyCode::Char('g') | KeyCode::Home => Some(PagerAction::Top),
            KeyCode::Char('G') | KeyCode::End => Some(PagerAction::Bottom),
            KeyCode::Char('d') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(PagerAction::PageDown)
            }
            KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(PagerAction::PageUp)
            }
            KeyCode::PageDown | KeyCode::Char(' ') => Some(PagerAction::PageDown),
            KeyCode::PageUp => Some(PagerAction::PageUp),
            _ => None,
        },
        _ => None,
    }
}

/// Scroll position over `len` lines shown `viewport` at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagerState {
    pub offset: usize,
    pub len: usize,
    pub viewport: usize,
}

impl PagerState {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    pub fn max_offset(&self) -> usize {
        self.len.saturating_sub(self.viewport)
    }

    pub fn apply(&mut self, action: PagerAction) {
        let page = self.viewport.max(1);
        self.offset = match action {
            PagerAction::Up => self.offset.saturating_sub(1),
            PagerAction::Down => self.offset + 1,
            PagerAction::Top => 0,
            PagerAction::Bottom => self.max_offset(),
            PagerAction::PageUp => self.offset.saturating_sub(page),
            PagerAction::PageDown => self.offset + page,
            PagerAction::Quit | PagerAction::Resize => self.offset,
        }
        .min(self.max_offset());
    }
}

/// Show lyrics until the user quits.
pub fn run(title: &str, lyrics: &str) -> anyhow::Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let mut state = PagerState::new(lyrics.lines().count());
    let body: Vec<Line> = lyrics.lines().map(Line::raw).collect();

    loop {
        guard
            .terminal_mut()
            .draw(|f| {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(1), Constraint::Length(1)])
                    .split(f.area());

                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Rgb(64, 64, 64)))
                    .title(format!(" {title} "))
                    .title_style(Style::default().add_modifier(Modifier::BOLD));
                state.viewport = block.inner(rows[0]).height as usize;
                state.offset = state.offset.min(state.max_offset());

                let text = Paragraph::new(body.clone())
                    .block(block)
                    .scroll((state.offset.min(u16::MAX as usize) as u16, 0));
                f.render_widget(text, rows[0]);

                let help = Line::from(Span::styled(
                    " j/k scroll  g/G top/bottom  q quit",
                    Style::default().fg(Color::Rgb(136, 136, 136)),
                ));
                f.render_widget(Paragraph::new(help), rows[1]);
            })
            .context("terminal draw")?;

        let ev = event::read().context("read terminal event")?;
        match map_input(&ev) {
            Some(PagerAction::Quit) => break,
            Some(action) => state.apply(action),
            None => {}
        }
    }

    Ok(())
}
