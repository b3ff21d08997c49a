mod cli;
mod error_fmt;
mod interactive;
mod session;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};
use wodtimer_config::Config;
use wodtimer_core::error::TimerError;
use wodtimer_core::{Mode, StopReason};

use crate::cli::{Cli, Commands, DEFAULT_CONFIG, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::session::{SessionEnv, SessionSpec};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if !cli.json {
        let _ = color_eyre::install();
    }

    if let Err(e) = real_main(cli) {
        tracing::error!(error = %e, "wodtimer failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(&cli)?;
    // Dropping the guard on return flushes the file sink.
    let _file_guard = init_tracing(&cli, &cfg)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "could not install Ctrl-C handler");
        }
    }
    let env = SessionEnv {
        json: cli.json,
        fast: session::fast_mode(),
        shutdown,
    };

    match cli.cmd {
        Commands::Countdown {
            secs,
            template,
            reps,
            voice_count,
            max_run_ms,
        } => {
            let duration_secs = session::resolve_duration(&cfg, secs, template.as_deref())?;
            let spec = SessionSpec {
                mode: Mode::Countdown,
                duration_secs,
                repetitions: reps,
                voice_count,
                max_run_ms,
                intents: None,
            };
            let outcome = session::run_session(&cfg, spec, &env)?;
            session::print_summary(&outcome, cli.json);
            outcome.require_finished(max_run_ms)?;
        }
        Commands::Stopwatch {
            max_run_ms,
            voice_count,
        } => {
            let spec = SessionSpec {
                mode: Mode::Stopwatch,
                duration_secs: None,
                repetitions: None,
                voice_count,
                max_run_ms,
                intents: None,
            };
            let outcome = session::run_session(&cfg, spec, &env)?;
            session::print_summary(&outcome, cli.json);
            outcome.require_finished(max_run_ms)?;
        }
        Commands::Interactive { max_run_ms } => {
            let intents = interactive::spawn_stdin_reader()
                .wrap_err("starting stdin reader")?;
            if !cli.json {
                eprintln!("{}", interactive::HELP);
            }
            let spec = SessionSpec {
                mode: cfg.timer.mode.into(),
                duration_secs: None,
                repetitions: None,
                voice_count: false,
                max_run_ms,
                intents: Some(intents),
            };
            let outcome = session::run_session(&cfg, spec, &env)?;
            session::print_summary(&outcome, cli.json);
            if outcome.stopped_by == StopReason::Shutdown {
                return Err(eyre::Report::new(TimerError::Shutdown));
            }
        }
        Commands::SelfCheck => session::self_check(&cfg, cli.json),
        Commands::Templates => session::list_templates(&cfg, cli.json),
    }
    Ok(())
}

/// Read, merge and validate configuration. A missing file at the default
/// path means built-in defaults.
fn load_config(cli: &Cli) -> eyre::Result<Config> {
    let mut cfg = match std::fs::read_to_string(&cli.config) {
        Ok(text) => toml::from_str::<Config>(&text)
            .wrap_err_with(|| format!("invalid config {}", cli.config.display()))?,
        Err(e)
            if e.kind() == std::io::ErrorKind::NotFound
                && cli.config == Path::new(DEFAULT_CONFIG) =>
        {
            Config::default()
        }
        Err(e) => {
            return Err(e).wrap_err_with(|| format!("read config {}", cli.config.display()));
        }
    };
    if let Some(path) = &cli.templates {
        cfg.templates
            .extend(wodtimer_config::load_templates_csv(path)?);
    }
    cfg.validate().wrap_err("invalid config")?;
    Ok(cfg)
}

fn init_tracing(
    cli: &Cli,
    cfg: &Config,
) -> eyre::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    // RUST_LOG wins over --log-level.
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    // Diagnostics go to stderr; stdout carries timer output only.
    let console = if cli.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    };

    let mut guard = None;
    let file_layer = match cfg.logging.file.as_deref() {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file}"))?;
            let appender = match cfg.logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, g) = tracing_appender::non_blocking(appender);
            guard = Some(g);
            let level = cfg.logging.level.as_deref().unwrap_or("info");
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(EnvFilter::new(level)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("init tracing: {e}"))?;
    Ok(guard)
}
