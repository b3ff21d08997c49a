#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and template parsing for the workout timer.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Template CSV loader enforces headers and rejects out-of-range durations
//!   so a selected template always feeds a valid duration to the engine.
use serde::Deserialize;

/// Longest countdown the engine accepts (59:59).
pub const MAX_DURATION_SECS: u32 = 3599;
/// Shortest countdown the engine accepts.
pub const MIN_DURATION_SECS: u32 = 1;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModeCfg {
    #[default]
    Countdown,
    Stopwatch,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimerCfg {
    pub mode: ModeCfg,
    /// Initial countdown length in seconds (1..=3599).
    pub duration_secs: u32,
    /// Nominal scheduler cadence. Real elapsed time is always measured, so
    /// this only affects display smoothness.
    pub tick_hz: u32,
}

impl Default for TimerCfg {
    fn default() -> Self {
        Self {
            mode: ModeCfg::Countdown,
            duration_secs: 60,
            tick_hz: 10,
        }
    }
}

/// Which collaborators should be asked to act on milestones.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NotifyCfg {
    pub sound: bool,
    pub vibration: bool,
    pub keep_screen_on: bool,
}

impl Default for NotifyCfg {
    fn default() -> Self {
        Self {
            sound: true,
            vibration: true,
            keep_screen_on: true,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// A named preset that supplies a countdown duration when selected.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub duration_secs: u32,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerCfg,
    #[serde(default)]
    pub notify: NotifyCfg,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub templates: Vec<Template>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Timer
        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&self.timer.duration_secs) {
            eyre::bail!("timer.duration_secs must be in [1, 3599]");
        }
        if self.timer.tick_hz == 0 {
            eyre::bail!("timer.tick_hz must be > 0");
        }
        if self.timer.tick_hz > 1000 {
            eyre::bail!("timer.tick_hz is unreasonably large (>1000)");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot}");
        }

        // Templates
        for (idx, t) in self.templates.iter().enumerate() {
            validate_template(t).map_err(|e| eyre::eyre!("templates[{idx}]: {e}"))?;
        }
        let mut names: Vec<&str> = self.templates.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        if let Some(w) = names.windows(2).find(|w| w[0] == w[1]) {
            eyre::bail!("duplicate template name {:?}", w[0]);
        }

        Ok(())
    }

    /// Look up a template by name (case-insensitive).
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

fn validate_template(t: &Template) -> eyre::Result<()> {
    if t.name.trim().is_empty() {
        eyre::bail!("template name must not be empty");
    }
    if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&t.duration_secs) {
        eyre::bail!(
            "template {:?} duration_secs must be in [1, 3599], got {}",
            t.name,
            t.duration_secs
        );
    }
    Ok(())
}

/// Load templates from a CSV file.
///
/// Expected headers:
/// name,duration_secs
///
/// Example:
/// name,duration_secs
/// tabata,20
/// emom,60
pub fn load_templates_csv(path: &std::path::Path) -> eyre::Result<Vec<Template>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open templates CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["name", "duration_secs"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "templates CSV must have headers 'name,duration_secs', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<Template>().enumerate() {
        match rec {
            Ok(t) => {
                validate_template(&t).map_err(|e| eyre::eyre!("CSV row {}: {}", idx + 2, e))?;
                rows.push(t);
            }
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    Ok(rows)
}
