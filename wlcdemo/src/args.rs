use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wlcdemo")]
#[command(about = "Wayland demo client: scrolling checkerboard plus seat input reporting")]
#[command(version)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "WLCDEMO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Initial window width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Toplevel title
    #[arg(long)]
    pub title: Option<String>,

    /// Checkerboard scroll speed in pixels per second
    #[arg(long, value_name = "PX_PER_SEC")]
    pub scroll_rate: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
