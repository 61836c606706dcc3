use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use recurrence_core::{
    config::{ConfigCache, ConfigEntry, ConfigError, JsonFileSource},
    time::Clock,
};
use serde_json::json;
use tempfile::tempdir;

struct StepClock(Mutex<DateTime<Utc>>);

impl StepClock {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        )))
    }

    fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[test]
fn file_changes_are_seen_after_ttl() {
    let dir = tempdir().unwrap();
    let source = JsonFileSource::new(dir.path().join("system_config.json"));
    source
        .save(&[ConfigEntry::new("trial_days", "14")])
        .unwrap();

    let clock = StepClock::new();
    let cache = ConfigCache::new(source, clock.clone(), Duration::minutes(5));
    assert_eq!(cache.get().unwrap().trial_days(), 14);

    cache
        .source()
        .save(&[ConfigEntry::new("trial_days", json!(30))])
        .unwrap();

    clock.advance(Duration::minutes(4));
    assert_eq!(cache.get().unwrap().trial_days(), 14);

    clock.advance(Duration::minutes(1));
    assert_eq!(cache.get().unwrap().trial_days(), 30);
}

#[test]
fn invalidate_picks_up_changes_immediately() {
    let dir = tempdir().unwrap();
    let source = JsonFileSource::new(dir.path().join("system_config.json"));
    let cache = ConfigCache::new(source, StepClock::new(), Duration::hours(1));

    let config = cache.get().unwrap();
    assert_eq!(config.currency(), "BRL");
    assert_eq!(config.occurrence_cap(), 365);

    cache
        .source()
        .save(&[
            ConfigEntry::new("currency", "usd"),
            ConfigEntry::new("max_occurrences", json!({ "value": "24" })),
            ConfigEntry::new("feature.projections", "true"),
        ])
        .unwrap();
    cache.invalidate();

    let config = cache.get().unwrap();
    assert_eq!(config.currency(), "USD");
    assert_eq!(config.occurrence_cap(), 24);
    assert!(config.feature_enabled("projections"));
    assert!(!config.feature_enabled("reports"));
}

#[test]
fn invalid_rows_surface_and_are_not_cached() {
    let dir = tempdir().unwrap();
    let source = JsonFileSource::new(dir.path().join("system_config.json"));
    source
        .save(&[ConfigEntry::new("maintenance_mode", "sometimes")])
        .unwrap();
    let cache = ConfigCache::new(source, StepClock::new(), Duration::minutes(5));

    match cache.get() {
        Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "maintenance_mode"),
        other => panic!("expected invalid value, got {other:?}"),
    }
    assert!(!cache.is_cached());

    cache
        .source()
        .save(&[ConfigEntry::new("maintenance_mode", true)])
        .unwrap();
    assert!(cache.get().unwrap().maintenance_mode());
    assert!(cache.is_cached());
}
