mod capture;
mod cli;
mod inspect;
mod replay;

use std::process::ExitCode;

use arkwin_common::ArkwinError;
use arkwin_config::ArkwinConfig;
use tracing_subscriber::EnvFilter;

use crate::capture::Capture;
use crate::cli::Command;

fn main() -> ExitCode {
    let args = cli::parse();

    // Config comes first so its log level can seed the filter.
    let config = arkwin_config::load_config_from(args.config.as_deref());
    let log_directive = args.log_level.clone().unwrap_or_else(|| match &config {
        Ok(config) => config.logging.level.directive(),
        Err(_) => "arkwin=info".to_string(),
    });
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "arkwin=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::debug!("Arkwin v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(config) => config,
        Err(e) if args.config.is_some() => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            ArkwinConfig::default()
        }
    };

    match run(&config, args.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ArkwinConfig, command: Command) -> Result<ExitCode, ArkwinError> {
    match command {
        Command::Replay { capture } => {
            let capture = Capture::load(&capture)?;
            let outcome = replay::run(config, &capture)?;
            for invocation in &outcome.invocations {
                let json = serde_json::to_string(invocation)
                    .map_err(|e| ArkwinError::Other(format!("failed to serialize call: {e}")))?;
                println!("{json}");
            }
            let complete = outcome.is_complete();
            match outcome.result {
                Ok(report) if complete => {
                    tracing::info!(
                        events = report.events,
                        callbacks = report.callbacks,
                        skipped = report.skipped,
                        trailing = report.trailing,
                        "replay complete"
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Ok(report) => {
                    eprintln!(
                        "replay ended after {} event(s) with {} still queued",
                        report.events, outcome.pending
                    );
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => {
                    eprintln!(
                        "replay stopped: {e} ({} event(s) not dispatched)",
                        outcome.pending
                    );
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Inspect { capture } => {
            let capture = Capture::load(&capture)?;
            let lines = inspect::inspect(&capture.event_bytes()?);
            print!("{}", inspect::to_json_lines(&lines)?);
            if lines.iter().any(|l| l.error.is_some()) {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Command::Sample { output } => {
            Capture::sample().save(&output)?;
            tracing::info!("Sample capture written to {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}
