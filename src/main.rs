mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use vanishing_cube::geometry::{AXIS_LABELS, CUBE_EDGES};
use vanishing_cube::widget::terminal_size;
use vanishing_cube::CubeView;

/// Canvas size used when the terminal size cannot be read
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Main function
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let state = cli.view_state().context("invalid viewer configuration")?;
    let (columns, rows) = match (cli.width, cli.height) {
        (Some(columns), Some(rows)) => (columns, rows),
        (columns, rows) => {
            let (detected_columns, detected_rows) = terminal_size().unwrap_or_else(|err| {
                tracing::warn!(%err, "could not read terminal size");
                FALLBACK_SIZE
            });
            (
                columns.unwrap_or(detected_columns),
                rows.unwrap_or(detected_rows),
            )
        }
    };

    let view = CubeView::new(state, cli.sensitivity(), columns, rows).with_debug(cli.debug);
    if cli.once {
        print_once(view);
        Ok(())
    } else {
        view.run().context("viewer failed")
    }
}

/// Logs go to a file in interactive mode so they don't tear the screen.
fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if cli.once {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn print_once(mut view: CubeView) {
    let scene = view.scene();
    for (index, ((from, to), (a, b))) in scene.lines.iter().zip(CUBE_EDGES).enumerate() {
        println!("edge {index:2} [{a}-{b}]: {from} -> {to}");
    }
    for (label, point) in AXIS_LABELS.iter().zip(scene.vanishing_points) {
        println!("vanishing point {label}: {point}");
    }

    view.paint();
    println!();
    if view.is_debug() {
        for line in view.overlay() {
            println!("{line}");
        }
    }
    for line in view.canvas().lines() {
        println!("{line}");
    }
}
