use crate::error::{PfResult, PopForgeError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub anneal: AnnealParams,
    #[command(flatten)]
    pub limits: RunLimits,
}

/// Cooling schedule and acceptance settings, applied identically to every area.
#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnnealParams {
    /// Swap attempts per temperature step.
    #[arg(long, default_value_t = 2)]
    pub max_runs: u32,
    /// An area counts as converged once its error is at or below this value.
    #[arg(long, default_value_t = 0)]
    pub error_margin: u32,
    /// Number of temperature steps.
    #[arg(long, default_value_t = 20)]
    pub max_temperature: u32,
    /// Scale applied to the step ratio to obtain the temperature.
    #[arg(long, default_value_t = 5.0)]
    pub temperature_conversion: f64,
}

impl Default for AnnealParams {
    fn default() -> Self {
        Self {
            max_runs: 2,
            error_margin: 0,
            max_temperature: 20,
            temperature_conversion: 5.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunLimits {
    /// Worker threads; 1 processes areas sequentially.
    #[arg(long, default_value_t = 1)]
    pub threads: usize,
    /// Hard cap on swap attempts for any single area.
    #[arg(long)]
    pub max_swaps_per_area: Option<u64>,
    /// Wall-clock budget for the whole run, in seconds.
    #[arg(long)]
    pub max_time_secs: Option<u64>,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            threads: 1,
            max_swaps_per_area: None,
            max_time_secs: None,
        }
    }
}

impl RunLimits {
    pub fn max_time(&self) -> Option<Duration> {
        self.max_time_secs.map(Duration::from_secs)
    }
}

impl AnnealParams {
    /// Temperature for cooling step `step` (counting down from `max_temperature` to 1).
    #[inline]
    pub fn temperature_at(&self, step: u32) -> f64 {
        self.temperature_conversion * (step as f64 / self.max_temperature as f64)
    }

    /// Upper bound on swap attempts a single area can make.
    pub fn attempt_budget(&self) -> u64 {
        self.max_runs as u64 * self.max_temperature as u64
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PfResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> PfResult<()> {
        let conv = self.anneal.temperature_conversion;
        if !conv.is_finite() || conv <= 0.0 {
            return Err(PopForgeError::Config(format!(
                "temperature_conversion must be a positive number, got {}",
                conv
            )));
        }
        if self.limits.threads == 0 {
            return Err(PopForgeError::Config(
                "threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Copies onto `self` only the values the user typed on the command line,
    /// so a config file keeps precedence over clap defaults.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(anneal.max_runs);
        update_if_present!(anneal.error_margin);
        update_if_present!(anneal.max_temperature);
        update_if_present!(anneal.temperature_conversion);

        update_if_present!(limits.threads);
        update_if_present!(limits.max_swaps_per_area);
        update_if_present!(limits.max_time_secs);
    }
}
