//! # Spending Limits
//!
//! Per-account caps on outgoing native-asset transfers over UTC calendar
//! windows.
//!
//! ## Window Semantics
//!
//! - `spent_today` resets when the UTC date of the transaction time is later
//!   than the UTC date of `window_anchor_ms`.
//! - `spent_this_month` resets when the UTC (year, month) is later.
//! - A time earlier than the anchor never resets and never moves the anchor.
//! - A limit of zero means that window is unlimited.
//!
//! Replicas pass the block timestamp, not their own clock, so every replica
//! sees the same windows.

use super::{LedgerError, LedgerResult};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Amount, TimestampMs};
use std::fmt;

/// Which window a limit check failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitWindow {
    Daily,
    Monthly,
}

impl fmt::Display for LimitWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitWindow::Daily => write!(f, "Daily"),
            LimitWindow::Monthly => write!(f, "Monthly"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingLimit {
    pub daily_limit: Amount,
    pub monthly_limit: Amount,
    pub spent_today: Amount,
    pub spent_this_month: Amount,
    /// Time of the last window roll; windows are computed relative to it.
    pub window_anchor_ms: TimestampMs,
}

fn utc(ms: TimestampMs) -> Option<DateTime<Utc>> {
    let ms = i64::try_from(ms).ok()?;
    DateTime::<Utc>::from_timestamp_millis(ms)
}

fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

impl SpendingLimit {
    /// Fresh limit with empty counters, anchored at `now_ms`.
    pub fn new(daily_limit: Amount, monthly_limit: Amount, now_ms: TimestampMs) -> Self {
        Self {
            daily_limit,
            monthly_limit,
            spent_today: 0,
            spent_this_month: 0,
            window_anchor_ms: now_ms,
        }
    }

    /// Reset counters whose window has ended by `now_ms`.
    pub fn roll_windows(&mut self, now_ms: TimestampMs) {
        if now_ms <= self.window_anchor_ms {
            return;
        }
        let (Some(now), Some(anchor)) = (utc(now_ms), utc(self.window_anchor_ms)) else {
            return;
        };
        let (today, anchor_day) = (now.date_naive(), anchor.date_naive());
        if today > anchor_day {
            self.spent_today = 0;
        }
        if month_key(today) > month_key(anchor_day) {
            self.spent_this_month = 0;
        }
        self.window_anchor_ms = now_ms;
    }

    /// Roll windows, check `amount` against both caps, then record it.
    ///
    /// On error nothing is recorded, though the windows may have rolled.
    pub fn check_and_record(&mut self, amount: Amount, now_ms: TimestampMs) -> LedgerResult<()> {
        self.roll_windows(now_ms);

        let daily = self.spent_today.saturating_add(amount);
        if self.daily_limit > 0 && daily > self.daily_limit {
            return Err(LedgerError::LimitExceeded {
                window: LimitWindow::Daily,
                limit: self.daily_limit,
                attempted: daily,
            });
        }
        let monthly = self.spent_this_month.saturating_add(amount);
        if self.monthly_limit > 0 && monthly > self.monthly_limit {
            return Err(LedgerError::LimitExceeded {
                window: LimitWindow::Monthly,
                limit: self.monthly_limit,
                attempted: monthly,
            });
        }

        self.spent_today = daily;
        self.spent_this_month = monthly;
        Ok(())
    }

    /// Remaining daily allowance at `now_ms`; `None` when unlimited.
    pub fn remaining_daily(&self, now_ms: TimestampMs) -> Option<Amount> {
        let mut rolled = self.clone();
        rolled.roll_windows(now_ms);
        (rolled.daily_limit > 0).then(|| rolled.daily_limit.saturating_sub(rolled.spent_today))
    }

    /// Remaining monthly allowance at `now_ms`; `None` when unlimited.
    pub fn remaining_monthly(&self, now_ms: TimestampMs) -> Option<Amount> {
        let mut rolled = self.clone();
        rolled.roll_windows(now_ms);
        (rolled.monthly_limit > 0)
            .then(|| rolled.monthly_limit.saturating_sub(rolled.spent_this_month))
    }
}
