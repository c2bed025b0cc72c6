use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    time::Duration,
};

use crate::foundation::error::{FlashbangError, FlashbangResult};

/// Audio length assumed when probing fails or reports no duration.
pub const FALLBACK_AUDIO_DURATION: Duration = Duration::from_millis(5000);

/// An audio clip on disk, ready for probing and playback.
///
/// Clips supplied as bytes (for example via `include_bytes!`) are staged into a uniquely named
/// temp file because `ffprobe` and `ffplay` need a path. The staged file is removed when the
/// source is dropped, so keep it alive for as long as playback runs.
#[derive(Debug)]
pub struct AudioSource {
    path: PathBuf,
    staged: Option<tempfile::NamedTempFile>,
}

impl AudioSource {
    /// Use an existing audio file.
    pub fn from_path(path: impl Into<PathBuf>) -> FlashbangResult<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(FlashbangError::media(format!(
                "audio file '{}' does not exist",
                path.display()
            )));
        }
        Ok(Self { path, staged: None })
    }

    /// Stage in-memory audio into a temp file.
    pub fn from_bytes(bytes: &[u8]) -> FlashbangResult<Self> {
        if bytes.is_empty() {
            return Err(FlashbangError::media("audio data is missing"));
        }

        let mut file = tempfile::Builder::new()
            .prefix("flashbang-audio-")
            .tempfile()
            .map_err(|e| FlashbangError::media(format!("failed to create temp audio file: {e}")))?;
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(|e| FlashbangError::media(format!("failed to write temp audio file: {e}")))?;

        let path = file.path().to_path_buf();
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "staged audio");
        Ok(Self {
            path,
            staged: Some(file),
        })
    }

    /// Location of the clip on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return `true` if the clip lives in a temp file owned by this value.
    pub fn is_staged(&self) -> bool {
        self.staged.is_some()
    }
}

/// Probe the clip length, falling back to [`FALLBACK_AUDIO_DURATION`].
pub fn probe_duration(source: &AudioSource) -> Duration {
    probe_duration_or(source, FALLBACK_AUDIO_DURATION)
}

/// Probe the clip length with the system `ffprobe`, returning `fallback` when the probe fails
/// or the duration is indeterminate.
///
/// A fallback is an ordinary result, not an error: it is logged and the overlay runs with it.
#[tracing::instrument(skip(source), fields(path = %source.path().display()))]
pub fn probe_duration_or(source: &AudioSource, fallback: Duration) -> Duration {
    let fallback_ms = fallback.as_millis() as u64;
    match run_ffprobe(source.path()) {
        Ok(Some(duration)) => {
            tracing::info!(duration_ms = duration.as_millis() as u64, "probed audio");
            duration
        }
        Ok(None) => {
            tracing::warn!(fallback_ms, "audio duration is indeterminate, using fallback");
            fallback
        }
        Err(err) => {
            tracing::warn!(%err, fallback_ms, "failed to probe audio duration, using fallback");
            fallback
        }
    }
}

fn run_ffprobe(path: &Path) -> FlashbangResult<Option<Duration>> {
    let out = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .map_err(|e| FlashbangError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(FlashbangError::media(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_output(&out.stdout)
}

fn parse_probe_output(stdout: &[u8]) -> FlashbangResult<Option<Duration>> {
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(stdout)
        .map_err(|e| FlashbangError::media(format!("ffprobe json parse failed: {e}")))?;
    Ok(parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok()))
}

/// A running audio player (the system `ffplay`, without a video window).
///
/// Playback stops when the handle is dropped: the player is killed and reaped.
#[derive(Debug)]
pub struct AudioPlayback {
    child: Child,
}

impl AudioPlayback {
    /// Start playing `source` in the background.
    pub fn start(source: &AudioSource) -> FlashbangResult<Self> {
        Self::start_with("ffplay", source)
    }

    fn start_with(program: &str, source: &AudioSource) -> FlashbangResult<Self> {
        let mut child = Command::new(program)
            .args(["-nodisp", "-autoexit", "-loglevel", "error"])
            .arg(source.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                FlashbangError::playback(format!(
                    "failed to spawn {program} (is it installed and on PATH?): {e}"
                ))
            })?;

        if let Ok(Some(status)) = child.try_wait()
            && !status.success()
        {
            return Err(FlashbangError::playback(format!(
                "{program} exited immediately with {status}"
            )));
        }

        tracing::info!(pid = child.id(), "audio playback started");
        Ok(Self { child })
    }

    /// Return `true` while the player process is still running.
    pub fn is_playing(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for AudioPlayback {
    fn drop(&mut self) {
        if self.is_playing()
            && let Err(err) = self.child.kill()
        {
            tracing::debug!(%err, "failed to stop audio player");
        }
        let _ = self.child.wait();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
