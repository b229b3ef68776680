//! Tetratui — classic falling-block puzzle game in the terminal.

mod app;
mod game;
mod input;
mod matrix;
mod pieces;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref()).unwrap_or_default();
    let mut app = App::new(args, theme);
    app.run()?;
    Ok(())
}

/// Classic falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tetratui",
    version,
    about = "Classic falling-block puzzle in the terminal. Stack the pieces, clear full rows, climb the levels.",
    long_about = "Tetratui is a terminal rendition of the classic falling-block puzzle.\n\n\
        Pieces fall on a fixed tick; every 30 cleared rows the level (and fall speed) rises.\n\n\
        CONTROLS (normal):\n  Left/Right  Move    Up/Space  Rotate CW   Down  Soft drop\n  p  Pause    r  Restart    +/-  Starting level    q / Esc  Quit\n\n\
        CONTROLS (vim):\n  h/l  Move    k  Rotate CW   u/z  Rotate CCW   j  Soft drop\n\n\
        Use --theme to load a btop-style theme file, --seed for a reproducible piece stream."
)]
pub struct Args {
    /// Playfield width in columns.
    #[arg(long, default_value = "10", value_name = "COLS",
        value_parser = clap::value_parser!(u16).range(4..=100))]
    pub width: u16,

    /// Playfield height in rows.
    #[arg(long, default_value = "20", value_name = "ROWS",
        value_parser = clap::value_parser!(u16).range(4..=100))]
    pub height: u16,

    /// Starting level; higher levels fall faster.
    #[arg(short, long, default_value = "1", value_name = "N")]
    pub level: u32,

    /// Logic ticks per second. The fall timer counts these ticks, so the
    /// classic speed table assumes 60.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub tick_rate: f64,

    /// Path to theme file (btop-style theme[key]="value").
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Seed for the piece stream (random when omitted).
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Disable the line-clear flash.
    #[arg(long)]
    pub no_animation: bool,
}
