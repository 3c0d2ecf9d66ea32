use clap::{CommandFactory, FromArgMatches, Parser};
use popforge::config::{AnnealParams, Config};
use popforge::optimizer::OptimizationOptions;
use popforge::PopForgeError;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    config: Config,
}

fn parse(args: &[&str]) -> (Config, clap::ArgMatches) {
    let mut full = vec!["popforge"];
    full.extend_from_slice(args);
    let matches = TestCli::command().get_matches_from(full);
    let cli = TestCli::from_arg_matches(&matches).unwrap();
    (cli.config, matches)
}

fn json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_defaults_match_reference_schedule() {
    let config = Config::default();
    assert_eq!(config.anneal.max_runs, 2);
    assert_eq!(config.anneal.error_margin, 0);
    assert_eq!(config.anneal.max_temperature, 20);
    assert_eq!(config.anneal.temperature_conversion, 5.0);
    assert_eq!(config.limits.threads, 1);
    assert!(config.limits.max_swaps_per_area.is_none());
    assert!(config.limits.max_time().is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_clap_defaults_agree_with_default_impl() {
    let (config, _) = parse(&[]);
    assert_eq!(config, Config::default());
}

#[test]
fn test_temperature_schedule_endpoints() {
    let params = AnnealParams::default();
    assert_eq!(params.temperature_at(20), 5.0);
    assert_eq!(params.temperature_at(1), 0.25);
    assert_eq!(params.attempt_budget(), 40);
}

#[test]
fn test_load_partial_json_fills_defaults() {
    let file = json_file(r#"{ "anneal": { "max_runs": 7 }, "limits": { "max_time_secs": 3 } }"#);
    let config = Config::load_from_file(file.path()).unwrap();

    assert_eq!(config.anneal.max_runs, 7);
    assert_eq!(config.anneal.max_temperature, 20);
    assert_eq!(config.limits.threads, 1);
    assert_eq!(config.limits.max_time(), Some(Duration::from_secs(3)));
}

#[test]
fn test_load_invalid_json_is_error() {
    let file = json_file("{ not json");
    let err = Config::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, PopForgeError::Json(_)));
}

#[test]
fn test_cli_overrides_only_typed_flags() {
    let mut from_file = Config::default();
    from_file.anneal.max_runs = 9;
    from_file.anneal.error_margin = 3;

    let (cli, matches) = parse(&["--error-margin", "1", "--threads", "4"]);
    from_file.merge_from_cli(&cli, &matches);

    // Untyped flags keep the file value, not the clap default.
    assert_eq!(from_file.anneal.max_runs, 9);
    assert_eq!(from_file.anneal.error_margin, 1);
    assert_eq!(from_file.limits.threads, 4);
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = Config::default();
    config.anneal.temperature_conversion = 0.0;
    assert!(matches!(config.validate(), Err(PopForgeError::Config(_))));

    config.anneal.temperature_conversion = f64::NAN;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.limits.threads = 0;
    assert!(matches!(config.validate(), Err(PopForgeError::Config(_))));
}

#[test]
fn test_options_from_config() {
    let mut config = Config::default();
    config.limits.threads = 3;
    config.limits.max_swaps_per_area = Some(10);
    config.limits.max_time_secs = Some(2);

    let options = OptimizationOptions::from(&config);
    assert_eq!(options.num_threads, 3);
    assert_eq!(options.max_swaps_per_area, Some(10));
    assert_eq!(options.max_time, Some(Duration::from_secs(2)));
    assert_eq!(options.anneal, config.anneal);
}
