/// Backdrop Terminal Preview
///
/// Renders the star field and skill shapes in the terminal, with a simulated
/// page to scroll through.
/// Controls:
///   - j/k, Arrow Keys, mouse wheel: Scroll
///   - PgUp/PgDn, Space: Scroll a page
///   - m / c / 1-3: Open menu / close menu / follow a nav link
///   - Q/ESC: Quit

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use backdrop_core::{SceneConfig, Theme};
use backdrop_terminal::TerminalApp;
use clap::Parser;
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal preview of the animated page backdrop")]
struct Args {
    /// JSON scene configuration; omitted fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stylesheet to read the theme colors from (its custom properties)
    #[arg(long)]
    css: Option<PathBuf>,

    /// Seed for star and shape placement
    #[arg(short, long)]
    seed: Option<u64>,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

fn load(args: &Args) -> Result<(SceneConfig, Theme)> {
    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SceneConfig::from_json(&json)?
        }
        None => SceneConfig::default(),
    };

    let theme = match &args.css {
        Some(path) => {
            let css = fs::read_to_string(path)
                .with_context(|| format!("failed to read stylesheet {}", path.display()))?;
            Theme::from_css(&css, &config.theme.background_token, &config.theme.accent_token)?
        }
        None => config.theme()?,
    };

    Ok((config, theme))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let (config, theme) = load(&args)?;

    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });
    info!("starting terminal preview with seed {}", seed);

    let mut app = TerminalApp::new(&config, &theme, args.fps, &mut StdRng::seed_from_u64(seed))?;
    app.run()?;

    Ok(())
}
