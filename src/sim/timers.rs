//! Scheduled session events
//!
//! Delayed effects (reload completion, crash-to-result delay) are queued with
//! a due time on the session clock and the session generation that queued
//! them. `drain_due` runs at the top of every step; entries from an older
//! generation are discarded, so a stop or restart cancels them implicitly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Refill the magazine
    ReloadComplete,
    /// Move from the crash phase to the final result
    FinalizeGameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub due_ms: f64,
    pub generation: u32,
    pub kind: TimerKind,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    events: Vec<ScheduledEvent>,
}

impl Scheduler {
    pub fn schedule(&mut self, due_ms: f64, generation: u32, kind: TimerKind) {
        self.events.push(ScheduledEvent {
            due_ms,
            generation,
            kind,
        });
    }

    /// Remove and return every event due at `now_ms` for `generation`, earliest first
    ///
    /// Stale-generation events are dropped whether due or not.
    pub fn drain_due(&mut self, now_ms: f64, generation: u32) -> Vec<TimerKind> {
        let mut due: Vec<ScheduledEvent> = Vec::new();
        self.events.retain(|e| {
            if e.generation != generation {
                log::debug!("Dropping stale {:?} from generation {}", e.kind, e.generation);
                return false;
            }
            if e.due_ms <= now_ms {
                due.push(*e);
                return false;
            }
            true
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter().map(|e| e.kind).collect()
    }

    pub fn cancel_all(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
