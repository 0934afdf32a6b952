//! shuffletui — a loading switch whose overlay shuffles nine coloured blocks in the terminal.

mod app;
mod easing;
mod input;
mod sampling;
mod screen;
mod shuffle;
mod theme;
mod tween;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Timings derived from CLI (shuffle cycle and overlay fade-out).
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    pub shuffle: shuffle::Timing,
    pub fade: Duration,
}

impl From<&Args> for Timings {
    fn from(args: &Args) -> Self {
        Self {
            shuffle: shuffle::Timing {
                movement: Duration::from_millis(args.move_ms),
                idle: Duration::from_millis(args.idle_ms),
            },
            fade: Duration::from_millis(args.fade_ms),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = match args.log_file.as_deref() {
        Some(path) => Some(init_logging(path)?),
        None => None,
    };

    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        warn!(error = %e, "failed to load theme, using defaults");
        if args.log_file.is_none() {
            eprintln!("shuffletui: {e}, using built-in colours");
        }
        theme::Theme::default_for_palette(args.palette)
    });
    let timings = Timings::from(&args);
    info!(
        period_ms = timings.shuffle.period().as_millis() as u64,
        seed = ?args.seed,
        "starting"
    );

    let mut app = App::new(&args, timings, theme);
    app.run()?;
    Ok(())
}

/// Log to `path` through a non-blocking writer; the terminal belongs to the UI.
/// Honors RUST_LOG, defaulting to `info`. Keep the guard alive to flush on exit.
fn init_logging(path: &Path) -> Result<WorkerGuard> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(guard)
}

/// Loading switch with a shuffling-blocks overlay.
#[derive(Debug, Parser)]
#[command(
    name = "shuffletui",
    version,
    about = "Toggle a loading overlay of nine blocks that swap places, spin, and change colour.",
    long_about = "shuffletui shows a single switch. Turn it on and a loading overlay appears: nine \
        blocks on a 3x3 grid trade places every cycle (no block keeps its cell), spin a full turn, \
        and shift to a new colour. Turn it off and the overlay goes away, its backdrop fading out.\n\n\
        CONTROLS:\n  Space/Enter/t  Toggle    q / Esc / Ctrl-C  Quit\n\n\
        Use --theme to load a btop-style theme (theme[key]=\"#RRGGBB\") and --seed for a repeatable shuffle."
)]
pub struct Args {
    /// Path to theme file (btop-style theme[key]=\"value\"). Built-in colours if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Block palette: normal (theme), high-contrast, or colorblind.
    #[arg(short, long, default_value = "normal")]
    pub palette: Palette,

    /// How blocks are drawn: half-block cells (solid) or braille dots (finer).
    #[arg(long, default_value = "half-block")]
    pub marker: BlockMarker,

    /// Target render frames per second (1 to 1000).
    #[arg(long, default_value = "60.0", value_name = "RATE", value_parser = parse_frame_rate)]
    pub frame_rate: f64,

    /// Seed for the shuffle's random source (same seed, same shuffle).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Start with the switch on.
    #[arg(long)]
    pub visible: bool,

    /// Duration of each shuffle move in ms (the spin takes two halves of it).
    #[arg(long, default_value = "800", value_name = "MS")]
    pub move_ms: u64,

    /// Pause between shuffles in ms.
    #[arg(long, default_value = "400", value_name = "MS")]
    pub idle_ms: u64,

    /// Overlay fade-out duration in ms.
    #[arg(long, default_value = "300", value_name = "MS")]
    pub fade_ms: u64,

    /// Do not draw the fading backdrop after switching off.
    #[arg(long)]
    pub no_fade: bool,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Accepted `--frame-rate` values.
pub const FRAME_RATE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=1000.0;

fn parse_frame_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if FRAME_RATE_RANGE.contains(&rate) {
        Ok(rate)
    } else {
        Err(format!(
            "frame rate must be between {} and {}",
            FRAME_RATE_RANGE.start(),
            FRAME_RATE_RANGE.end()
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BlockMarker {
    #[default]
    #[value(alias = "halfblock")]
    HalfBlock,
    Braille,
}
