use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::ConfigError;
use crate::recurrence::MAX_OCCURRENCES;

const FEATURE_PREFIX: &str = "feature.";
const DEFAULT_CURRENCY: &str = "BRL";
const DEFAULT_TRIAL_DAYS: u32 = 7;

/// One loosely-typed configuration row as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: Value,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Typed view over the system configuration rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemConfig {
    pub maintenance_mode: Option<bool>,
    pub subscription_price: Option<f64>,
    pub trial_days: Option<u32>,
    pub currency: Option<String>,
    pub support_email: Option<String>,
    pub max_occurrences: Option<u32>,
    pub features: BTreeMap<String, bool>,
}

impl SystemConfig {
    pub fn maintenance_mode(&self) -> bool {
        self.maintenance_mode.unwrap_or(false)
    }

    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    pub fn trial_days(&self) -> u32 {
        self.trial_days.unwrap_or(DEFAULT_TRIAL_DAYS)
    }

    /// Occurrence limit for new schedules, never above the generator's own cap.
    pub fn occurrence_cap(&self) -> u32 {
        self.max_occurrences
            .map_or(MAX_OCCURRENCES, |limit| limit.min(MAX_OCCURRENCES))
    }

    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }
}

/// Decodes configuration rows into a [`SystemConfig`].
///
/// Values may be native JSON or strings wrapping JSON (`"true"`, `"29.9"`), and may
/// be boxed as `{"value": ...}`. Later rows override earlier ones; unknown keys
/// are skipped.
pub fn decode(entries: &[ConfigEntry]) -> Result<SystemConfig, ConfigError> {
    let mut config = SystemConfig::default();

    for entry in entries {
        let key = entry.key.trim().to_ascii_lowercase();
        let value = unwrap_value(&entry.value);
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            "maintenance_mode" => config.maintenance_mode = Some(scalar(&key, &value, "a boolean")?),
            "subscription_price" => {
                config.subscription_price = Some(scalar(&key, &value, "a number")?)
            }
            "trial_days" => config.trial_days = Some(scalar(&key, &value, "a whole number")?),
            "currency" => config.currency = Some(text(&key, &entry.value, &value)?.to_uppercase()),
            "support_email" => config.support_email = Some(text(&key, &entry.value, &value)?),
            "max_occurrences" => {
                config.max_occurrences = Some(scalar(&key, &value, "a whole number")?)
            }
            other => match other.strip_prefix(FEATURE_PREFIX) {
                Some(feature) if !feature.is_empty() => {
                    let enabled = scalar(&key, &value, "a boolean")?;
                    config.features.insert(feature.to_string(), enabled);
                }
                _ => tracing::debug!(key = %entry.key, "ignoring unknown configuration key"),
            },
        }
    }

    Ok(config)
}

fn unwrap_value(raw: &Value) -> Value {
    let mut value = raw.clone();
    // Rows have been seen double-encoded, so peel at most two layers.
    for _ in 0..2 {
        value = match value {
            Value::String(text) => match serde_json::from_str::<Value>(text.trim()) {
                Ok(parsed) => parsed,
                Err(_) => return Value::String(text),
            },
            Value::Object(mut map) if map.len() == 1 && map.contains_key("value") => {
                map.remove("value").unwrap_or(Value::Null)
            }
            other => return other,
        };
    }
    value
}

fn scalar<T: DeserializeOwned>(
    key: &str,
    value: &Value,
    expected: &'static str,
) -> Result<T, ConfigError> {
    serde_json::from_value(value.clone()).map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        expected,
        value: value.to_string(),
    })
}

fn text(key: &str, raw: &Value, unwrapped: &Value) -> Result<String, ConfigError> {
    match (unwrapped, raw) {
        (Value::String(text), _) => Ok(text.trim().to_string()),
        // A bare string such as "123" parses as a number; keep the original text.
        (_, Value::String(text)) => Ok(text.trim().to_string()),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            expected: "a string",
            value: unwrapped.to_string(),
        }),
    }
}
