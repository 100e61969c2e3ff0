//! Terminal tracker: the CLI counterpart of the floating tracker window.
//!
//! Seeds a [`TimerEngine`] from the backend's reconstruction and redraws the
//! clock face once per tick until interrupted.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Args;
use devfocus_core::timer::{format_hms, Ticker};
use devfocus_core::{Backend, Config, SubtaskStatus, TimerEngine};

use super::{backend, print_json, CliResult};

#[derive(Args)]
pub struct TrackArgs {
    /// Subtask ID
    id: String,
    /// Start the subtask first if it is still pending
    #[arg(long)]
    start: bool,
    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    duration: Option<u64>,
    /// Pause the subtask with the displayed total on exit
    #[arg(long)]
    pause_on_exit: bool,
}

pub async fn run(args: TrackArgs, config: &Config, json: bool) -> CliResult {
    let backend = backend()?;

    if args.start {
        let (subtask, _) = backend.get_subtask_with_session(&args.id).await?;
        if subtask.status == SubtaskStatus::Todo {
            backend.start_subtask(&args.id).await?;
        }
    }

    let (subtask, session) = backend.get_subtask_with_session(&args.id).await?;
    let engine = Arc::new(Mutex::new(TimerEngine::from_reconstruction(
        &subtask,
        session.as_ref(),
        chrono::Utc::now(),
    )));
    let paused = subtask.status != SubtaskStatus::InProgress;

    if !json {
        println!("{} ({})", subtask.title, subtask.status);
    }
    draw(&engine, json);

    let ticker = Ticker::from_millis(config.timer.tick_interval_ms);
    let handle = {
        let engine = Arc::clone(&engine);
        ticker.spawn(move || draw_tick(&engine, json))
    };

    match args.duration {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
        None => tokio::signal::ctrl_c().await?,
    }
    handle.stop();
    if !json {
        println!();
    }

    let seconds = engine.lock().map(|e| e.seconds()).unwrap_or_default();
    if args.pause_on_exit && !paused {
        let session = backend.pause_subtask(&args.id, seconds).await?;
        if json {
            print_json(&session)?;
        } else {
            println!("Paused at {}", format_hms(session.duration_seconds));
        }
    }
    Ok(())
}

fn draw_tick(engine: &Mutex<TimerEngine>, json: bool) {
    let ticked = engine.lock().ok().and_then(|mut e| e.tick());
    if ticked.is_some() {
        draw(engine, json);
    }
}

fn draw(engine: &Mutex<TimerEngine>, json: bool) {
    let Ok(engine) = engine.lock() else {
        return;
    };
    if json {
        println!("{}", serde_json::json!({ "seconds": engine.seconds() }));
    } else {
        print!("\r{}", format_hms(engine.seconds()));
        let _ = std::io::stdout().flush();
    }
}
