use anyhow::Result;
use clap::Parser;
use tracing::info;

use wlc_client::Config;

mod args;
mod sink;

use args::Args;
use sink::LogSink;

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("wlcdemo={log_level},wlc_client={log_level},wlc_input=info,wlc_shm=info")
                    .into()
            }),
        )
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // CLI flags override the file.
    if let Some(width) = args.width {
        config.display.width = width;
    }
    if let Some(height) = args.height {
        config.display.height = height;
    }
    if let Some(title) = &args.title {
        config.display.title = title.clone();
    }
    if let Some(rate) = args.scroll_rate {
        config.animation.scroll_rate = rate;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    info!("starting wlcdemo {}", env!("CARGO_PKG_VERSION"));
    let config = load_config(&args)?;
    wlc_client::run(config, Box::new(LogSink))?;
    Ok(())
}
