//! Line-oriented control surface: one command per stdin line becomes an intent.

use std::io::BufRead;

use crossbeam_channel as xch;
use wodtimer_core::{Intent, Mode};

/// What a single input line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Quit,
}

pub const HELP: &str = "commands: start | pause | toggle | reset | mode countdown|stopwatch | \
dur N | reps N | + | - | reps-reset | voice | voice-reset | quit";

/// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("too many arguments: {line:?}"));
    }

    let int_arg = |what: &str| -> Result<i64, String> {
        let raw = arg.ok_or_else(|| format!("{what} needs a number"))?;
        raw.parse::<i64>()
            .map_err(|_| format!("{what}: {raw:?} is not a whole number"))
    };

    let intent = match head.as_str() {
        "quit" | "q" | "exit" => return Ok(Some(Command::Quit)),
        "start" | "s" => Intent::Start,
        "pause" | "p" => Intent::Pause,
        "toggle" | "t" | "space" => Intent::Toggle,
        "reset" | "r" => Intent::Reset,
        "mode" => {
            let raw = arg.ok_or("mode needs countdown or stopwatch")?;
            Intent::SetMode(raw.parse::<Mode>()?)
        }
        "dur" | "duration" => Intent::SetDuration(int_arg("dur")?),
        "reps" => Intent::SetRepetitions(int_arg("reps")?),
        "+" | "inc" => Intent::IncrementRepetitions,
        "-" | "dec" => Intent::DecrementRepetitions,
        "reps-reset" => Intent::ResetRepetitions,
        "voice" => Intent::ToggleVoiceCount,
        "voice-reset" => Intent::ResetVoiceCount,
        other => return Err(format!("unknown command {other:?}; {HELP}")),
    };
    Ok(Some(Command::Intent(intent)))
}

/// Forward parsed lines from `input` to `tx` until `quit`, EOF, or the
/// receiver hangs up. Dropping `tx` on return closes the session.
pub fn pump<R: BufRead>(input: R, tx: xch::Sender<Intent>) {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed; closing session");
                return;
            }
        };
        match parse_line(&line) {
            Ok(Some(Command::Intent(intent))) => {
                if tx.send(intent).is_err() {
                    return;
                }
            }
            Ok(Some(Command::Quit)) => return,
            Ok(None) => {}
            Err(msg) => eprintln!("{msg}"),
        }
    }
}

/// Spawn the stdin reader thread.
pub fn spawn_stdin_reader() -> std::io::Result<xch::Receiver<Intent>> {
    let (tx, rx) = xch::unbounded();
    std::thread::Builder::new()
        .name("wodtimer-stdin".into())
        .spawn(move || pump(std::io::stdin().lock(), tx))?;
    Ok(rx)
}
