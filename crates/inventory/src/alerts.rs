//! Concrete stock observers.
//!
//! Both observers are pure reporters: they read the record handed to `update`
//! and write at most one line to their sink. They run on every notification,
//! including ones that did not touch the field they watch.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, TimeDelta};

use medstock_events::{AlertSink, Observer, stdout};

use crate::clock::{Clock, SystemClock};
use crate::stock::StockItem;

/// Raises an alert whenever a record's stock is at or below `threshold`.
#[derive(Clone)]
pub struct CriticalStockObserver {
    threshold: i64,
    sink: Arc<dyn AlertSink>,
}

impl CriticalStockObserver {
    pub fn new(threshold: i64) -> Self {
        Self {
            threshold,
            sink: stdout(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }
}

impl Observer<StockItem> for CriticalStockObserver {
    fn update(&self, item: &StockItem) {
        if item.stock() > self.threshold {
            return;
        }
        tracing::warn!(
            item = %item.name(),
            stock = item.stock(),
            threshold = self.threshold,
            "critical stock level"
        );
        self.sink.emit(&format!(
            "CRITICAL STOCK ALERT: {} has only {} units left (threshold: {}).",
            item.name(),
            item.stock(),
            self.threshold
        ));
    }
}

/// Raises an alert when a record expires within the next `window_days` days.
///
/// An expiration date counts from the start of that day (UTC). Records that
/// already expired are not reported by this observer.
#[derive(Clone)]
pub struct ExpirationAlarmObserver {
    window_days: i64,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn AlertSink>,
}

impl ExpirationAlarmObserver {
    pub fn new(window_days: i64) -> Self {
        Self {
            window_days,
            clock: Arc::new(SystemClock),
            sink: stdout(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    /// Whole days from now until `date`, if it falls inside the window.
    pub fn days_left(&self, date: NaiveDate) -> Option<i64> {
        let expires_at = date.and_time(NaiveTime::MIN).and_utc();
        let remaining = expires_at - self.clock.now();
        if remaining < TimeDelta::zero() {
            return None;
        }
        let within = TimeDelta::try_days(self.window_days).is_none_or(|window| remaining <= window);
        within.then(|| remaining.num_days())
    }
}

impl Observer<StockItem> for ExpirationAlarmObserver {
    fn update(&self, item: &StockItem) {
        let Some(date) = item.expiration_date() else {
            return;
        };
        let Some(days_left) = self.days_left(date) else {
            return;
        };
        tracing::warn!(
            item = %item.name(),
            %date,
            days_left,
            "stock item close to expiration"
        );
        self.sink.emit(&format!(
            "EXPIRATION ALERT: {} expires on {} ({} days left).",
            item.name(),
            date,
            days_left
        ));
    }
}

impl core::fmt::Debug for CriticalStockObserver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CriticalStockObserver")
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl core::fmt::Debug for ExpirationAlarmObserver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExpirationAlarmObserver")
            .field("window_days", &self.window_days)
            .finish()
    }
}
