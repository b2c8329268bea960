// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ncd — the command-line front end for the interpreter engine.
//!
//! Loads a configuration file (§6 "CLI surface"), starts its default root
//! process, and drives the single-threaded reactor to completion. The
//! engine itself is strictly single-threaded (`Rc`, `RefCell` throughout),
//! so the whole program runs inside one `tokio::task::LocalSet` on the
//! current-thread runtime rather than the usual multi-threaded one.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod cli;
mod color;
mod exit_error;

use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use ncd_core::OwnedValue;
use ncd_engine::{Context, Engine, ProcessOutcome};

use cli::Cli;
use exit_error::ExitError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("ncd: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let local = tokio::task::LocalSet::new();
    match local.block_on(&runtime, run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ncd: {e}");
            ExitCode::from(e.code as u8)
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.filter_directive()));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

async fn run(cli: Cli) -> Result<(), ExitError> {
    let source = std::fs::read_to_string(&cli.config_file)
        .map_err(|e| ExitError::new(2, format!("reading {}: {e}", cli.config_file.display())))?;

    let program = match ncd_parser::parse(&source) {
        Ok(program) => program,
        Err(e) => {
            let diagnostic = e.diagnostic(&source).unwrap_or_else(|| e.to_string());
            eprintln!("{diagnostic}");
            return Err(ExitError::new(1, "configuration failed to parse"));
        }
    };

    if cli.dump_ast {
        let json = serde_json::to_string_pretty(&program)
            .map_err(|e| ExitError::new(1, format!("serializing parsed program: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    if cli.syntax_only {
        return Ok(());
    }

    let config = Engine::load(&program).map_err(|e| ExitError::new(2, format!("loading configuration: {e}")))?;
    let root_name = config
        .default_root_name()
        .ok_or_else(|| ExitError::new(2, "configuration defines no process to run (only templates)"))?
        .to_string();

    let context = Context::new(ncd_module::reference_registry());
    let engine = Engine::new(context, config);

    let args = cli.args.iter().map(|a| OwnedValue::str(a.as_bytes().to_vec())).collect();
    let handle = engine
        .start(&root_name, args)
        .map_err(|e| ExitError::new(2, format!("starting process '{root_name}': {e}")))?;

    let outcome = Rc::new(std::cell::RefCell::new(None));
    let recorded = outcome.clone();
    let reactor = engine.context().reactor.clone();
    engine.on_complete(handle, move |o| {
        *recorded.borrow_mut() = Some(o);
        reactor.quit();
    });

    tokio::task::spawn_local(shutdown_on_signal(engine.clone(), handle));

    engine.run().await;

    match outcome.borrow().as_ref() {
        Some(ProcessOutcome::Completed) | None => Ok(()),
        Some(ProcessOutcome::Aborted(reason)) => Err(ExitError::new(3, format!("process '{root_name}' aborted: {reason}"))),
    }
}

/// Requests a clean shutdown of the root process on SIGINT/SIGTERM,
/// mirroring `§5` "Cancellation" — termination tears every statement down
/// tail-first rather than killing the process out from under its modules.
async fn shutdown_on_signal(engine: Engine, handle: ncd_engine::ProcessHandle) {
    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(s) => s,
        Err(_) => return,
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
    engine.terminate(handle);
}
