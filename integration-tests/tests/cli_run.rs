//! The command-line front end, from configuration file to report.

use std::fs;

use hearth_cli::{config::Config, run};
use hearth_sim::{Error, weather::UpstreamError};
use integration_tests::{HOURS_IN_YEAR, synthetic_year_json, year_start};
use tempfile::TempDir;

const RETROFIT: &str = r#"
[location]
postal_code = "10001"

[geocode.postal_codes]
"10001" = { latitude = 40.75, longitude = -73.99 }

[weather]
path = "weather.json"

[simulation]
timestep_minutes = 30
excluded_months = [6, 7, 8, 9]

[before]
heating_system = "natural_gas"

[after]
heating_system = "heat_pump"
ach50 = 5
"#;

fn workspace(config: &str, weather_latitude: f64) -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("weather.json"),
        synthetic_year_json(weather_latitude, -73.99),
    )
    .unwrap();
    let path = dir.path().join("hearth.toml");
    fs::write(&path, config).unwrap();
    let config = Config::load(&path).unwrap();
    (dir, config)
}

#[test]
fn retrofit_report_from_files() {
    let (dir, config) = workspace(RETROFIT, 40.8);
    assert_eq!(config.weather.path, dir.path().join("weather.json"));

    let report = run(&config).unwrap();

    assert_eq!(report.location.latitude, 40.75);
    assert_eq!(report.weather.samples, HOURS_IN_YEAR);
    assert_eq!(report.weather.start, year_start());
    assert_eq!(report.months, vec![1, 2, 3, 4, 5, 10, 11, 12]);

    assert_eq!(report.before.heating_system, "natural_gas");
    assert_eq!(report.after.heating_system, "heat_pump");
    assert_eq!(report.before.monthly_kwh.len(), 8);
    assert!(!report.before.monthly_kwh.contains_key(&7));

    // Tighter house with a heat pump: less energy, lower bill, less CO2.
    assert!(report.after.annual.kwh < report.before.annual.kwh);
    assert!(report.difference.kwh < 0.0);
    assert!(report.difference.cost < 0.0);
    assert!(report.difference.co2_tons < 0.0);

    let text = report.to_string();
    assert!(text.contains(&report.before.label));
    assert!(text.contains("Jan"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["after"]["heating_system"], "heat_pump");
}

#[test]
fn weather_for_another_place_is_refused() {
    let (_dir, config) = workspace(RETROFIT, 34.05);

    assert!(matches!(
        run(&config),
        Err(Error::UpstreamUnavailable(UpstreamError::WeatherProvider { .. }))
    ));
}

#[test]
fn unknown_postal_code_is_reported() {
    let config = RETROFIT.replace("postal_code = \"10001\"\n", "postal_code = \"99999\"\n");
    let (_dir, config) = workspace(&config, 40.75);

    assert!(matches!(
        run(&config),
        Err(Error::UpstreamUnavailable(UpstreamError::PostalCodeNotFound(code))) if code == "99999"
    ));
}

#[test]
fn unknown_heating_system_is_a_configuration_error() {
    let config = RETROFIT.replace("\"heat_pump\"", "\"wood_stove\"");
    let (_dir, config) = workspace(&config, 40.75);

    assert!(matches!(run(&config), Err(Error::Configuration(_))));
}
