mod types;
mod tree;
mod ipc;
mod move_counter;
mod transform;
mod cycle;
mod window_ops;
mod layout;
mod ncol;
mod commands;
#[cfg(test)]
mod sim;

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use swayipc::{Event, EventType};

use crate::ipc::{Conn, SwayTransport};
use crate::layout::{Engine, construct_layout};
use crate::transform::Transforms;

/// An xmonad-like auto-tiler for sway.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Layout to use for workspaces where the layout has not been manually
    /// set. Valid options are "tall", "3_col" and "nop".
    #[arg(long, default_value = "tall")]
    default_layout: String,

    /// Enable debug logging.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log file path, defaults to stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Sleep for n seconds before sending every command to sway, allowing a
    /// human to observe intermediate state.
    #[arg(long, default_value_t = 0.0)]
    delay: f64,
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(if cli.verbose > 0 {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    if construct_layout(&cli.default_layout, 0, 1, Transforms::default()).is_none() {
        bail!("unknown default layout {:?}, expected tall, 3_col or nop", cli.default_layout);
    }
    if cli.delay < 0.0 {
        bail!("--delay must not be negative");
    }

    let transport = SwayTransport::connect()?;
    let conn = Conn::new(Box::new(transport), Duration::from_secs_f64(cli.delay));
    let mut engine = Engine::new(conn, cli.default_layout);

    let events = swayipc::Connection::new()
        .context("failed to connect to the sway socket for events")?
        .subscribe(&[EventType::Window, EventType::Binding])
        .context("failed to subscribe to sway events")?;

    for event in events {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                log::info!("event stream ended: {err}");
                break;
            }
        };
        match event {
            Event::Window(window) => {
                if let Some(window_event) = ipc::window_event(&window) {
                    if let Err(err) = commands::dispatch_window_event(&mut engine, &window_event) {
                        log::error!("window event handler failed: {err:#}");
                    }
                }
            }
            Event::Binding(binding) => {
                if let Err(err) = commands::dispatch_binding(&mut engine, &binding.binding.command) {
                    log::error!("binding handler failed: {err:#}");
                }
            }
            _ => {}
        }
    }
    Ok(())
}
