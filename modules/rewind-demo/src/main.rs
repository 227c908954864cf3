mod scene;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rewind_engine::active;
use rewind_engine::{EngineConfig, EventKind, TransactionSystem};

use crate::scene::{Audit, Counter, Increment, Panel, Slide, AUDIT, COUNTER, INCREMENT, PANEL, SLIDE};
use crate::script::Op;

#[derive(Parser)]
#[command(name = "rewind-demo", about = "Drive a transaction system one frame per scripted operation")]
struct Cli {
    /// Path to a TOML config file with an [engine] table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated operations: inc:N, slide:N, undo, redo, noop
    #[arg(long, default_value = "inc:5,inc:3,undo,undo,redo")]
    script: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    /// Print the History journal as JSON when the script finishes
    #[arg(long)]
    journal: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::from_default_env().add_directive("rewind=info".parse()?);
    if cli.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let ops = script::parse(&cli.script)?;
    let config = EngineConfig::load(cli.config.as_deref())?;

    let shared = active::install(TransactionSystem::new(config, scene::registry()?));
    active::with_active(scene::register_stores)
        .context("transaction system is not installed")??;

    info!(frames = ops.len(), "Running script");
    {
        let mut system = shared.borrow_mut();
        for op in ops {
            run_frame(&mut system, op)?;
        }

        if cli.journal {
            println!("{}", serde_json::to_string_pretty(&system.journal())?);
        }
    }

    if let Some(shared) = active::uninstall() {
        shared.borrow_mut().teardown();
    }
    Ok(())
}

/// Propose `op`, flush, and follow a committed increment with its audit line.
fn run_frame(system: &mut TransactionSystem, op: Op) -> Result<()> {
    {
        let mut cx = system.context();
        match op {
            Op::Increment(delta) => cx.propose(INCREMENT, Increment { delta })?,
            Op::Slide(to) => cx.propose(SLIDE, Slide::to(to))?,
            Op::Undo => cx.request_undo(),
            Op::Redo => cx.request_redo(),
            Op::Noop => {}
        }
    }

    let committed = flush(system, op)?;

    if committed == INCREMENT {
        if let Op::Increment(delta) = op {
            let line = format!("counter {delta:+}");
            system.context().propose(AUDIT, Audit { line })?;
            flush(system, op)?;
        }
    }
    Ok(())
}

fn flush(system: &mut TransactionSystem, op: Op) -> Result<EventKind> {
    let committed = match system.on_update() {
        Ok(kind) => kind,
        Err(error) => {
            warn!(%op, %error, "Frame discarded");
            return Ok(EventKind::NOOP);
        }
    };

    let counter = system.store::<Counter>(COUNTER)?.value;
    let panel = system.store::<Panel>(PANEL)?.lines.len();
    info!(
        frame = system.frame(),
        %op,
        committed = %system.registry().description(committed),
        counter,
        panel,
        bundles = system.history().len(),
        "Frame"
    );
    println!("frame {:>3}  {:<10} counter = {counter}", system.frame(), op.to_string());
    Ok(committed)
}
