// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line surface (§6 "CLI surface"): a thin wrapper that loads a
//! configuration file, starts its default root process, and drives the
//! engine to completion.

use std::path::PathBuf;

use clap::Parser;

use crate::color::styles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// `ncd` — a single-threaded, cooperative configuration interpreter.
#[derive(Debug, Parser)]
#[command(name = "ncd", version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")), styles = styles())]
pub struct Cli {
    /// Program source path (§6 "--config-file PATH").
    #[arg(long, value_name = "PATH")]
    pub config_file: PathBuf,

    /// Parse `config_file` and exit: 0 on success, 1 on parse error.
    #[arg(long)]
    pub syntax_only: bool,

    /// Print the parsed AST as JSON instead of running the engine. Implies
    /// `--syntax-only`.
    #[arg(long)]
    pub dump_ast: bool,

    /// Default log level for every channel not named in `--loglevel-module`.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Per-module log level override, `module=level` (repeatable), e.g.
    /// `--loglevel-module ncd_engine=debug`.
    #[arg(long = "loglevel-module", value_name = "MODULE=LEVEL")]
    pub loglevel_module: Vec<String>,

    /// Extra positional arguments, exposed to the root process via the
    /// `_args` namespace. Everything after a literal `--` is taken
    /// verbatim, including further `--flag`-shaped tokens.
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Builds the `tracing-subscriber` `EnvFilter` directive string implied
    /// by `--loglevel`/`--loglevel-module`, e.g. `"info,ncd_engine=debug"`.
    pub fn filter_directive(&self) -> String {
        let mut directive = self.loglevel.as_str().to_string();
        for module in &self.loglevel_module {
            directive.push(',');
            directive.push_str(module);
        }
        directive
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
