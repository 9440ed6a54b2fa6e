use crate::song::Song;
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal, TerminalOptions, Viewport};
use std::io::{self, Stdout};

pub mod card;
pub mod cover;
pub mod pager;

pub use cover::CoverArt;

pub type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

pub struct TerminalGuard {
    terminal: TuiTerminal,
}

impl TerminalGuard {
    pub fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("enable raw mode")?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("enter alt screen + mouse capture")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("create terminal")?;

        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut TuiTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best-effort cleanup; don't panic in Drop.
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
    }
}

/// Draw the song card into the scrollback, below the prompt.
pub fn print_card(song: &Song, cover: Option<&CoverArt>) -> anyhow::Result<()> {
    let height = card::height(song, cover);
    let mut terminal = Terminal::with_options(
        CrosstermBackend::new(io::stdout()),
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )
    .context("create inline terminal")?;

    terminal
        .draw(|f| card::render(f, f.area(), song, cover))
        .context("terminal draw")?;

    // Leave the cursor under the card so later output doesn't overwrite it.
    let area = terminal.get_frame().area();
    terminal
        .set_cursor_position((0, area.bottom().saturating_sub(1)))
        .context("move cursor")?;
    drop(terminal);
    println!();
    Ok(())
}
