mod app;
mod config;
mod listen;
mod lyrics;
mod song;
mod storage;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "sngfetch",
    version,
    about = "Identify the song playing around you and print its lyrics"
)]
struct Cli {
    /// Override config file path.
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Listen through the microphone and identify the song (default).
    Listen {
        /// Only identify; skip the lyrics lookup.
        #[arg(long)]
        no_lyrics: bool,
        /// Show lyrics in a scrollable full-screen view.
        #[arg(long)]
        pager: bool,
    },
    /// Look up lyrics by title.
    Lyrics {
        title: String,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        pager: bool,
    },
    /// Extract lyrics from a song page URL.
    Url { url: String },
    /// Recently identified songs.
    History {
        #[command(subcommand)]
        cmd: Option<HistoryCommand>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Debug, Subcommand)]
enum HistoryCommand {
    /// Forget all identified songs.
    Clear,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let app = app::App::new(cfg)?;

    let command = cli.command.unwrap_or(Command::Listen {
        no_lyrics: false,
        pager: false,
    });

    let run = async {
        match command {
            Command::Listen { no_lyrics, pager } => app.listen(no_lyrics, pager).await,
            Command::Lyrics {
                title,
                artist,
                pager,
            } => app.lyrics(&title, artist.as_deref(), pager).await,
            Command::Url { url } => app.url(&url).await,
            Command::History { cmd, limit } => match cmd {
                Some(HistoryCommand::Clear) => app.clear_history(),
                None => app.history(limit),
            },
        }
    };

    tokio::select! {
        res = run => res,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nExiting...");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_listen() {
        let cli = Cli::try_parse_from(["sngfetch", "-vv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(log_level(cli.verbose), Level::DEBUG);
    }

    #[test]
    fn test_history_clear() {
        let cli = Cli::try_parse_from(["sngfetch", "history", "clear"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::History {
                cmd: Some(HistoryCommand::Clear),
                limit: 20
            })
        ));
    }

    #[test]
    fn test_lyrics_args() {
        let cli =
            Cli::try_parse_from(["sngfetch", "lyrics", "Hello", "--artist", "Adele"]).unwrap();
        match cli.command {
            Some(Command::Lyrics { title, artist, pager }) => {
                assert_eq!(title, "Hello");
                assert_eq!(artist.as_deref(), Some("Adele"));
                assert!(!pager);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
