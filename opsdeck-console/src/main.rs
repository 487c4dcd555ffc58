//! OpsDeck Console
//!
//! Line-oriented front end for the simulated operator console.
//! - Reads commands from stdin and prints the interpreter output
//! - Runs the simulation loop and the wall clock in the background
//! - Redraws the current view when the session switches views
//!
//! Lines starting with `:` are presentation navigation (`:dashboard`,
//! `:terminal`, `:experience`, `:education`, `:projects`, `:quit`) and never
//! reach the interpreter.

mod render;

use anyhow::{Context, Result};
use opsdeck_kernel::{load_config, spawn_simulation, spawn_wall_clock, Profile, Session, View, ViewChange};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("opsdeck_kernel=info,opsdeck_console=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("🖥️ OpsDeck console starting");

    let config = load_config().await;
    let profile = match &config.console.profile_path {
        Some(path) => Profile::load(path)
            .await
            .with_context(|| format!("Failed to load profile from {path}"))?,
        None => Profile::builtin(),
    };
    let profile = Arc::new(profile);

    let (session, mut view_events) = Session::new(&config, profile.clone());
    let simulation = spawn_simulation(session.clone(), config.simulation.tick_interval());
    let clock = spawn_wall_clock(config.simulation.clock_interval());

    println!("{}", render::render_history(&session.history()));
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if !handle_line(&session, &line) {
                    break;
                }
                prompt()?;
            }
            Some(change) = view_events.recv() => {
                redraw(&session, &profile, &clock, change);
                prompt()?;
            }
        }
    }

    session.cancel_pending_switch();
    simulation.abort();
    info!("OpsDeck console stopped");
    Ok(())
}

/// Returns false when the console should stop
fn handle_line(session: &Session, line: &str) -> bool {
    if let Some(nav) = line.trim().strip_prefix(':') {
        return match nav {
            "quit" | "q" => false,
            other => {
                match parse_view(other) {
                    Some(view) => session.set_view(view),
                    None => warn!("unknown view '{other}'"),
                }
                true
            }
        };
    }

    session.set_pending_input(line);
    let output = session.submit_pending();
    if !output.is_empty() {
        println!("{output}");
    }
    true
}

fn parse_view(name: &str) -> Option<View> {
    match name {
        "terminal" => Some(View::Terminal),
        "dashboard" => Some(View::Dashboard),
        "experience" => Some(View::Experience),
        "education" => Some(View::Education),
        "projects" => Some(View::Projects),
        _ => None,
    }
}

fn redraw(session: &Session, profile: &Profile, clock: &watch::Receiver<String>, change: ViewChange) {
    info!(view = %change.view, cause = ?change.cause, "view changed");
    match change.view {
        View::Terminal => println!("{}", render::render_history(&session.history())),
        View::Dashboard => println!("{}", render::render_dashboard(&session.snapshot(), &clock.borrow())),
        view => {
            if let Some(section) = render::render_section(view, profile) {
                println!("{section}");
            }
        }
    }
}

fn prompt() -> Result<()> {
    print!("$ ");
    std::io::stdout().flush().context("Failed to flush stdout")
}
