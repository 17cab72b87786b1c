//! Alert configuration.
//!
//! Defaults match the standard setup: a critical stock threshold of 10 units
//! and a 30 day expiration window. Both can be overridden from the environment.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use medstock_events::AlertSink;

use crate::alerts::{CriticalStockObserver, ExpirationAlarmObserver};

pub const CRITICAL_THRESHOLD_VAR: &str = "MEDSTOCK_CRITICAL_THRESHOLD";
pub const EXPIRATION_WINDOW_VAR: &str = "MEDSTOCK_EXPIRATION_WINDOW_DAYS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub critical_stock_threshold: i64,
    pub expiration_window_days: i64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            critical_stock_threshold: 10,
            expiration_window_days: 30,
        }
    }
}

impl AlertConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; missing or invalid values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            critical_stock_threshold: read_non_negative(
                &lookup,
                CRITICAL_THRESHOLD_VAR,
                defaults.critical_stock_threshold,
            ),
            expiration_window_days: read_non_negative(
                &lookup,
                EXPIRATION_WINDOW_VAR,
                defaults.expiration_window_days,
            ),
        }
    }

    /// The two standard observers, writing to `sink`.
    pub fn observers(
        &self,
        sink: Arc<dyn AlertSink>,
    ) -> (CriticalStockObserver, ExpirationAlarmObserver) {
        (
            CriticalStockObserver::new(self.critical_stock_threshold).with_sink(sink.clone()),
            ExpirationAlarmObserver::new(self.expiration_window_days).with_sink(sink),
        )
    }
}

fn read_non_negative(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: i64) -> i64 {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 0 => value,
        _ => {
            tracing::warn!(key, value = %raw, default, "invalid alert setting; using default");
            default
        }
    }
}
