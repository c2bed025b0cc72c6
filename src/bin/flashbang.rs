use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::{ArgAction, Parser};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "flashbang", version, about)]
struct Cli {
    /// Image shown once the flash fades (PNG, JPEG, ...). Defaults to the built-in image.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Audio clip played for the duration of the overlay. Defaults to the built-in clip.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Invisible lead-in before the flash, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Length of the solid white flash, in milliseconds.
    #[arg(long, default_value_t = 300)]
    flash_ms: u64,

    /// Length of the image fade-in, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    fade_in_ms: u64,

    /// Length of the final fade-out, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    fade_out_ms: u64,

    /// Audio length assumed when it cannot be probed, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    fallback_ms: u64,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let fixed = flashbang::FixedDurations {
        delay: Duration::from_millis(cli.delay_ms),
        flash: Duration::from_millis(cli.flash_ms),
        fade_in: Duration::from_millis(cli.fade_in_ms),
        fade_out: Duration::from_millis(cli.fade_out_ms),
    };

    // Dropped in reverse order: playback stops before a staged clip is removed.
    let audio = match &cli.audio {
        Some(path) => flashbang::AudioSource::from_path(path)
            .with_context(|| format!("open audio '{}'", path.display()))?,
        None => flashbang::AudioSource::from_bytes(flashbang::DEFAULT_AUDIO)
            .context("stage built-in audio")?,
    };
    let audio_len =
        flashbang::probe_duration_or(&audio, Duration::from_millis(cli.fallback_ms));
    let durations = fixed.fit_to_audio(audio_len);
    tracing::debug!(?durations, "phase table");

    let image = match &cli.image {
        Some(path) => flashbang::load_image(path)
            .with_context(|| format!("load image '{}'", path.display()))?,
        None => {
            flashbang::decode_image(flashbang::DEFAULT_IMAGE).context("decode built-in image")?
        }
    };

    let _playback = flashbang::AudioPlayback::start(&audio).context("start audio playback")?;

    flashbang::run_overlay(image, flashbang::OverlayOpts::new(durations))
        .context("run overlay")?;
    Ok(())
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match verbose {
        _ if quiet => LevelFilter::WARN,
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
