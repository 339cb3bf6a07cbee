//! Lucas series binary
//!
//! Reads the worker count, term count and fault flag from the environment,
//! then from stdin for any that are missing. Questions are shown only when
//! stdin is a terminal.

use std::cell::RefCell;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;

use lucas_core::config::{ENV_FAULT, ENV_TERMS, ENV_WORKERS};
use lucas_core::{LucasError, RunConfig};
use tracing::{debug, error, info, warn};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return if e.is_config() { ExitCode::from(2) } else { ExitCode::FAILURE };
        }
    };

    info!(
        "Computing {} Lucas terms with {} workers (fault injection: {})",
        config.terms, config.workers, config.inject_fault
    );

    let json = std::env::var("LUCAS_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    let coordinator = lucas_core::Coordinator::new(config.clone());
    let runtime = match lucas_core::LucasRuntime::new(config.runtime) {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = match runtime.block_on(coordinator.run()) {
        Ok(report) => report,
        Err(e) => {
            error!("Run failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("Metrics:\n{}", coordinator.metrics().export());
    runtime.shutdown();

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                error!("Failed to render report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Lucas series: {}", report.series_line());
    }

    ExitCode::SUCCESS
}

/// Environment first, then one line of stdin per missing core setting
fn load_config() -> Result<RunConfig, LucasError> {
    let stdin = io::stdin();
    let echo = stdin.is_terminal();
    let input = RefCell::new(stdin.lock());
    RunConfig::from_lookup(|key| std::env::var(key).ok().or_else(|| answer(key, &input, echo)))
}

/// Read the answer for `key`, showing the question only when `echo` is set.
///
/// Keys without a question, and input that has run out, fall back to the
/// default.
fn answer<R: BufRead>(key: &str, input: &RefCell<R>, echo: bool) -> Option<String> {
    let question = match key {
        ENV_WORKERS => "Number of workers to use: ",
        ENV_TERMS => "Number of Lucas terms to compute: ",
        ENV_FAULT => "Simulate a worker failure? y(es) - n(o): ",
        _ => return None,
    };
    if echo {
        print!("{}", question);
        io::stdout().flush().ok()?;
    }

    let mut line = String::new();
    match input.borrow_mut().read_line(&mut line) {
        Ok(0) => {
            warn!("No input for {}, using the default", key);
            None
        }
        Ok(_) => Some(line.trim().to_string()),
        Err(e) => {
            warn!("Failed to read {}: {}, using the default", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn config_from(input: &str) -> Result<RunConfig, LucasError> {
        let input = RefCell::new(Cursor::new(input.to_string()));
        RunConfig::from_lookup(|key| answer(key, &input, false))
    }

    #[test]
    fn test_piped_answers() {
        let config = config_from("4\n10\nn\n").unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.terms, 10);
        assert!(!config.inject_fault);
    }

    #[test]
    fn test_piped_fault_answer() {
        let config = config_from("2\n5\ns\n").unwrap();
        assert!(config.inject_fault);
    }

    #[test]
    fn test_exhausted_input_uses_defaults() {
        let config = config_from("3\n").unwrap();
        assert_eq!(config.workers, 3);
        assert_eq!(config.terms, 1);
        assert!(!config.inject_fault);
    }

    #[test]
    fn test_invalid_answer_is_config_error() {
        let err = config_from("0\n10\nn\n").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_unprompted_keys_read_nothing() {
        let input = RefCell::new(Cursor::new("7\n".to_string()));
        assert_eq!(answer("LUCAS_UNIT_DELAY_MS", &input, false), None);
        assert_eq!(answer(ENV_WORKERS, &input, false), Some("7".to_string()));
    }
}
