//! sheet-demo - drives a bottom sheet headlessly
//!
//! Presents a sheet on a simulated phone screen, plays a scripted touch
//! gesture against it and reports how it ended. Frames can be dumped as
//! JSON lines for plotting.

mod demo;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bottom_sheet::primitives::Rect;
use bottom_sheet::SheetConfig;
use clap::Parser;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use demo::Scenario;

#[derive(Parser, Debug)]
#[command(name = "sheet-demo")]
#[command(about = "Drive a draggable bottom sheet through scripted gestures", long_about = None)]
struct Args {
    /// Gesture script to play
    #[arg(short, long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    /// Sheet config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write one JSON line per frame to this file
    #[arg(long)]
    frames_json: Option<PathBuf>,

    /// Screen width in logical units
    #[arg(long, default_value_t = 360.0)]
    width: f64,

    /// Screen height in logical units
    #[arg(long, default_value_t = 760.0)]
    height: f64,

    /// Enable verbose debug output
    #[arg(short, long)]
    debug: bool,
}

fn state_dir() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".local/state")))
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join("bottom-sheet")
}

fn main() -> Result<()> {
    let log_dir = state_dir();
    std::fs::create_dir_all(&log_dir).ok();

    // Set up panic hook to log panics before crashing
    let crash_log = log_dir.join("crash.log");
    std::panic::set_hook(Box::new(move |panic_info| {
        eprintln!("PANIC: {}", panic_info);
        if let Ok(mut f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&crash_log)
        {
            use std::io::Write;
            let _ = writeln!(f, "[{}] PANIC: {}", chrono::Local::now(), panic_info);
        }
    }));

    let args = Args::parse();

    // File appender - rotates daily
    let file_appender = rolling::daily(&log_dir, "sheet-demo.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Quiet by default, verbose with --debug
    let default_filter = if args.debug {
        "debug"
    } else {
        "warn,bottom_sheet=info,sheet_demo=info"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    info!(log_path = %log_dir.display(), "sheet-demo starting");

    let config = match &args.config {
        Some(path) => SheetConfig::load(path)?,
        None => SheetConfig::default(),
    };

    let mut frames = match &args.frames_json {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create frame dump {}", path.display()))?;
            Some(BufWriter::new(file))
        }
        None => None,
    };

    let screen = Rect::new(0.0, 0.0, args.width, args.height);
    for scenario in args.scenario.expand() {
        let (state, out) = demo::run(scenario, config.clone(), screen, frames.take())?;
        frames = out;
        println!("{:<8} -> {:?}", scenario.name(), state);
    }

    Ok(())
}
