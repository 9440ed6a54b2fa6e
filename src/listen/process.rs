use crate::song::shazam::RecognizeResponse;
use anyhow::Context;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, warn};

/// Split an argv template into program and arguments, filling in
/// `{seconds}`.
pub fn build_argv(template: &[String], seconds: u32) -> anyhow::Result<(String, Vec<String>)> {
    let (program, args) = template.split_first().context("empty command in config")?;
    let secs = seconds.to_string();
    let args = args.iter().map(|a| a.replace("{seconds}", &secs)).collect();
    Ok((program.clone(), args))
}

/// Capture `seconds` of raw s16le mono PCM from the configured recorder.
pub async fn record(template: &[String], seconds: u32) -> anyhow::Result<Vec<u8>> {
    let (program, args) = build_argv(template, seconds)?;
    debug!(%program, ?args, "recording");

    let out = Command::new(&program)
        .args(&args)
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("run {program}"))?;

    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        anyhow::bail!("{program} failed: {}", stderr.trim());
    }
    Ok(out.stdout)
}

/// Ask the recognizer about a WAV file. A failed run counts as no match.
pub async fn recognize(template: &[String], wav: &Path) -> anyhow::Result<RecognizeResponse> {
    let (program, args) = build_argv(template, 0)?;
    debug!(%program, wav = %wav.display(), "recognizing");

    let out = Command::new(&program)
        .args(&args)
        .arg(wav)
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("run {program}"))?;

    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        warn!("{program} failed: {}", stderr.trim());
        return Ok(RecognizeResponse::default());
    }

    let stdout = String::from_utf8(out.stdout).context("decode recognizer stdout")?;
    parse_output(&stdout)
}

fn parse_output(stdout: &str) -> anyhow::Result<RecognizeResponse> {
    let body = stdout.trim();
    if body.is_empty() {
        return Ok(RecognizeResponse::default());
    }
    serde_json::from_str(body).context("parse recognizer json")
}
