use std::collections::BTreeSet;

use serde::Deserialize;

use crate::parser::duration::{seconds_or_zero, LectureDuration};
use crate::parser::extract::OutlineRecord;

pub const DEFAULT_THRESHOLD_SECONDS: u64 = 3000;

/// How the running total is turned into block boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum BucketPolicy {
    /// Mark the record that pushes the total over the threshold, then restart
    /// from zero. A trailing partial block is left unmarked.
    #[default]
    #[serde(rename = "reset")]
    PerRecordReset,
    /// Same as `PerRecordReset`, and the last record that contributed time is
    /// also marked when a partial block remains at the end.
    #[serde(rename = "include_tail")]
    IncludeTail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Threshold,
    Tail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryEvent {
    pub index: usize,
    /// Block total at the moment the boundary was marked.
    pub cumulative_seconds: u64,
    pub kind: BoundaryKind,
}

impl BoundaryEvent {
    pub fn cumulative_minutes(&self) -> f64 {
        LectureDuration::from_seconds(self.cumulative_seconds).as_minutes_f64()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boundaries {
    pub events: Vec<BoundaryEvent>,
}

impl Boundaries {
    pub fn indices(&self) -> BTreeSet<usize> {
        self.events.iter().map(|e| e.index).collect()
    }
}

#[derive(Debug, Default)]
struct BucketState {
    cumulative_seconds: u64,
    last_contributing: Option<usize>,
}

/// Scan records in order and mark the rows where a block closes.
pub fn mark_boundaries(
    records: &[OutlineRecord],
    threshold_seconds: u64,
    policy: BucketPolicy,
) -> Boundaries {
    let mut state = BucketState::default();
    let mut out = Boundaries::default();

    for (idx, record) in records.iter().enumerate() {
        let secs = seconds_or_zero(&record.duration_text);
        if secs == 0 {
            continue;
        }
        state.last_contributing = Some(idx);
        state.cumulative_seconds = state.cumulative_seconds.saturating_add(secs);

        if state.cumulative_seconds > threshold_seconds {
            out.events.push(BoundaryEvent {
                index: idx,
                cumulative_seconds: state.cumulative_seconds,
                kind: BoundaryKind::Threshold,
            });
            state.cumulative_seconds = 0;
        }
    }

    if policy == BucketPolicy::IncludeTail && state.cumulative_seconds > 0 {
        if let Some(idx) = state.last_contributing {
            out.events.push(BoundaryEvent {
                index: idx,
                cumulative_seconds: state.cumulative_seconds,
                kind: BoundaryKind::Tail,
            });
        }
    }

    out
}
