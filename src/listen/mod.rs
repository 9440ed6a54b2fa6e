//! Microphone identification loop
//!
//! Records short samples with an external recorder and hands them to an
//! external recognizer until one matches. Later attempts listen longer.

pub mod process;
pub mod wav;

use crate::config::ListenConfig;
use crate::song::Song;
use anyhow::Context;
use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effort {
    Listening,
    TryingHarder,
    LastTry,
}

impl Effort {
    pub fn label(self) -> &'static str {
        match self {
            Effort::Listening => "Listening...",
            Effort::TryingHarder => "Trying harder...",
            Effort::LastTry => "Last try...",
        }
    }
}

/// Sample length and effort for every attempt.
///
/// `timeout / sample` attempts; the last three before the final one each
/// listen a second longer than the previous, the final one three more.
pub fn schedule(timeout_secs: u32, sample_secs: u32) -> Vec<(u32, Effort)> {
    let sample_secs = sample_secs.max(1);
    let attempts = (timeout_secs / sample_secs).max(1);
    let mut duration = sample_secs;

    (0..attempts)
        .map(|i| {
            let effort = if i + 1 == attempts {
                duration += 3;
                Effort::LastTry
            } else if i + 4 >= attempts {
                duration += 1;
                Effort::TryingHarder
            } else {
                Effort::Listening
            };
            (duration, effort)
        })
        .collect()
}

/// Listen until the recognizer names the song.
pub async fn identify(cfg: &ListenConfig) -> anyhow::Result<Song> {
    let wav_path = std::env::temp_dir().join(format!("sngfetch-{}.wav", std::process::id()));
    let result = run_attempts(cfg, &wav_path).await;
    clear_progress();
    let _ = std::fs::remove_file(&wav_path);
    result
}

async fn run_attempts(cfg: &ListenConfig, wav_path: &Path) -> anyhow::Result<Song> {
    let plan = schedule(cfg.timeout_secs, cfg.sample_secs);
    let total = plan.len();

    for (attempt, (seconds, effort)) in plan.into_iter().enumerate() {
        progress(attempt, total, effort);
        debug!(attempt, seconds, ?effort, "sampling");

        let pcm = process::record(&cfg.recorder, seconds).await?;
        let sample = wav::encode_wav(&wav::amplify(&pcm, cfg.gain));
        std::fs::write(wav_path, &sample).with_context(|| format!("write {}", wav_path.display()))?;

        let response = process::recognize(&cfg.recognizer, wav_path).await?;
        if let Some(song) = response.into_song() {
            info!(title = %song.title, attempt, "recognized");
            return Ok(song);
        }
    }
    anyhow::bail!("Sorry, couldn't recognize this song after {total} attempts.")
}

fn progress(attempt: usize, total: usize, effort: Effort) {
    let mut err = std::io::stderr();
    let _ = execute!(
        err,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(format!("({}/{total}) {}", attempt + 1, effort.label()))
    );
}

fn clear_progress() {
    let mut err = std::io::stderr();
    let _ = execute!(err, MoveToColumn(0), Clear(ClearType::CurrentLine));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let plan = schedule(20, 2);
        let durations: Vec<u32> = plan.iter().map(|(d, _)| *d).collect();
        assert_eq!(durations, vec![2, 2, 2, 2, 2, 2, 3, 4, 5, 8]);
        assert_eq!(plan[0].1, Effort::Listening);
        assert_eq!(plan[6].1, Effort::TryingHarder);
        assert_eq!(plan[9].1, Effort::LastTry);
    }

    #[test]
    fn test_short_timeout_still_tries_once() {
        assert_eq!(schedule(1, 5), vec![(8, Effort::LastTry)]);
        assert_eq!(schedule(0, 0), vec![(4, Effort::LastTry)]);
    }

    #[test]
    fn test_few_attempts_all_escalate() {
        let plan = schedule(6, 2);
        assert_eq!(
            plan,
            vec![
                (3, Effort::TryingHarder),
                (4, Effort::TryingHarder),
                (7, Effort::LastTry)
            ]
        );
    }
}
