//! # Audit Stamping
//!
//! Every entity carries an [`AuditStamp`] with its creation and last-modification instants.
//! The runtime sets both on insert and refreshes `updated_at` on every committed mutation;
//! entities never stamp themselves.
//!
//! Time comes from an injected [`Clock`], so tests can pin it with a [`ManualClock`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// Creation and last-modification instants of an entity.
///
/// `updated_at >= created_at` always holds, and every call to [`AuditStamp::touch`]
/// moves `updated_at` strictly forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AuditStamp {
    /// A fresh stamp for an entity created at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records a mutation at `now`.
    ///
    /// If the clock did not move past the previous stamp (coarse resolution, skew), the new
    /// value is the previous one plus one microsecond.
    pub fn touch(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
        self.updated_at
    }
}

/// Source of the current instant.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
