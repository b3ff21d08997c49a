//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use wodtimer_core::error::{BuildError, TimerError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid timer configuration ({msg}).\nLikely causes: Out-of-range values in the [timer] table.\nHow to fix: Edit the config file, then rerun. See etc/wodtimer.toml for a sample."
            ),
        };
    }

    if let Some(te) = err.downcast_ref::<TimerError>() {
        return match te {
            TimerError::Shutdown => "What happened: The session was interrupted (Ctrl-C).\nLikely causes: A shutdown signal arrived before the countdown finished.\nHow to fix: Nothing to fix; start a new session when ready.".to_string(),
            TimerError::MaxRuntime { max_run_ms } => format!(
                "What happened: max run time was exceeded ({max_run_ms} ms) before the countdown reached zero.\nLikely causes: --max-run-ms shorter than the countdown.\nHow to fix: Raise --max-run-ms or shorten the duration."
            ),
            TimerError::Config(msg) if msg.contains("unknown template") => format!(
                "What happened: {msg}.\nLikely causes: Misspelled name, or the template lives in a CSV that was not passed.\nHow to fix: Run `wodtimer templates` to list names, or add --templates FILE."
            ),
            TimerError::Config(msg) => format!(
                "What happened: Configuration is invalid ({msg}).\nLikely causes: Out-of-range or misspelled values in the TOML.\nHow to fix: Edit the TOML config and try again."
            ),
            TimerError::Scheduler(msg) => format!(
                "What happened: The tick scheduler could not start ({msg}).\nLikely causes: The OS refused to spawn another thread.\nHow to fix: Check process limits (ulimit -u), then rerun."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from config loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("templates csv must have headers") {
        return "Invalid headers in templates CSV. Expected 'name,duration_secs'.".to_string();
    }

    if lower.contains("invalid config")
        || lower.contains("must be in")
        || lower.contains("must be >")
        || lower.contains("must be one of")
    {
        let chain = err
            .chain()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": ");
        return format!(
            "What happened: Configuration is invalid ({chain}).\nLikely causes: Out-of-range or misspelled values in the TOML.\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 max runtime, 4 shutdown, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use wodtimer_core::error::TimerError;
    match err.downcast_ref::<TimerError>() {
        Some(TimerError::MaxRuntime { .. }) => 3,
        Some(TimerError::Shutdown) => 4,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    use wodtimer_core::error::TimerError;

    match err.downcast_ref::<TimerError>() {
        Some(TimerError::MaxRuntime { max_run_ms }) => json!({
            "reason": "MaxRuntime",
            "details": { "max_run_ms": max_run_ms },
            "message": humanize(err),
        })
        .to_string(),
        Some(TimerError::Shutdown) => {
            json!({ "reason": "Shutdown", "message": humanize(err) }).to_string()
        }
        _ => json!({ "reason": "Error", "message": humanize(err) }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wodtimer_core::error::TimerError;

    #[test]
    fn max_runtime_maps_to_code_and_json() {
        let err = eyre::Report::new(TimerError::MaxRuntime { max_run_ms: 1_500 });
        assert_eq!(exit_code_for_error(&err), 3);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "MaxRuntime");
        assert_eq!(v["details"]["max_run_ms"], 1_500);
        assert!(v["message"].as_str().unwrap().contains("max run time"));
    }

    #[test]
    fn unknown_template_gets_a_listing_hint() {
        let err = eyre::Report::new(TimerError::Config(
            "unknown template \"nope\" (known: tabata)".into(),
        ));
        assert_eq!(exit_code_for_error(&err), 1);
        let text = humanize(&err);
        assert!(text.contains("unknown template \"nope\""), "{text}");
        assert!(text.contains("wodtimer templates"), "{text}");
    }

    #[test]
    fn untyped_errors_fall_back() {
        let err = eyre::eyre!("disk on fire");
        assert_eq!(exit_code_for_error(&err), 1);
        assert!(humanize(&err).contains("Original: disk on fire"));
    }
}
