use std::sync::LazyLock;

use regex::Regex;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9]+):([0-9]{2})$").unwrap());

/// A lecture runtime written as `minutes:seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LectureDuration {
    pub minutes: u64,
    pub seconds: u64,
}

impl LectureDuration {
    /// Accepts `m:ss` with any number of minute digits and exactly two second digits.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = DURATION_RE.captures(text.trim())?;
        let minutes = caps[1].parse().ok()?;
        let seconds = caps[2].parse().ok()?;
        Some(LectureDuration { minutes, seconds })
    }

    pub fn from_seconds(secs: u64) -> Self {
        LectureDuration {
            minutes: secs / 60,
            seconds: secs % 60,
        }
    }

    pub fn as_seconds(&self) -> u64 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }

    pub fn as_minutes_f64(&self) -> f64 {
        self.as_seconds() as f64 / 60.0
    }
}

pub fn is_duration(text: &str) -> bool {
    LectureDuration::parse(text).is_some()
}

/// Seconds for a duration cell, zero when the text is not a duration.
pub fn seconds_or_zero(text: &str) -> u64 {
    LectureDuration::parse(text).map_or(0, |d| d.as_seconds())
}
