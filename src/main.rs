use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use umbra_level::Level;
use umbra_lighting::{LightingConfig, LightingEngine};

mod render;

use render::{View, render_text};

#[derive(Parser, Debug)]
#[command(name = "umbra", version, about = "Render a level's lighting as text")]
struct Args {
    /// Level file (TOML)
    level: PathBuf,

    /// Lighting config (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable the experimental 3x smoothing pass
    #[arg(long)]
    upscale: bool,

    /// Override the player position as COL,ROW
    #[arg(long, value_parser = parse_pair)]
    player: Option<(usize, usize)>,

    /// Visible window in tiles as COLS,ROWS
    #[arg(long, value_parser = parse_pair, default_value = "15,9")]
    view: (usize, usize),

    /// Frames to compute; the last one is printed
    #[arg(long, default_value_t = 1)]
    frames: u32,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn parse_pair(s: &str) -> Result<(usize, usize), String> {
    let (a, b) = s.split_once(',').ok_or_else(|| format!("expected A,B, got {s:?}"))?;
    let a = a.trim().parse().map_err(|e| format!("{a:?}: {e}"))?;
    let b = b.trim().parse().map_err(|e| format!("{b:?}: {e}"))?;
    Ok((a, b))
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut level = Level::load(&args.level)?;
    if let Some((col, row)) = args.player {
        level.place_player(col, row)?;
    }
    let mut cfg = match &args.config {
        Some(path) => LightingConfig::load(path)?,
        None => LightingConfig::default(),
    };
    if args.upscale {
        cfg = cfg.with_upscale(true);
    }
    log::info!("dropoff={} diagonal={} upscale={}", cfg.dropoff, cfg.diagonal_dropoff(), cfg.upscale);

    let t0 = Instant::now();
    let statics = level.static_lights();
    let mut engine = LightingEngine::new(cfg, level.transparency_map(), level.width(), level.height(), &statics)?;
    log::info!("base lighting from {} static source(s) in {:?}", statics.len(), t0.elapsed());

    let dynamic = level.dynamic_lights();
    let frames = args.frames.max(1);
    let t1 = Instant::now();
    let mut map = engine.shadow_map(&dynamic)?;
    for _ in 1..frames {
        map = engine.shadow_map(&dynamic)?;
    }
    log::info!("{} frame(s), {:?} per frame", frames, t1.elapsed() / frames);

    let (cols, rows) = args.view;
    let view = View::centred(level.player.col, level.player.row, cols, rows);
    let window = map.window(view.col, view.row, cols, rows)?;
    print!("{}", render_text(&level, view, &window));
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = TermLogger::init(args.log_level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("logger init failed: {e}");
    }
    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
