//! In-memory administrative activity feed, most recent entry first.

use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const SYSTEM_ACTOR: &str = "System Administrator";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Login,
    Settings,
    Approve,
    Export,
}

impl ActivityKind {
    /// Icon tag the dashboard uses for this kind of entry
    pub fn icon(self) -> &'static str {
        match self {
            ActivityKind::Login => "login",
            ActivityKind::Settings => "settings",
            ActivityKind::Approve => "check",
            ActivityKind::Export => "download",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub user: String,
    pub action: String,
    pub time: String,
    pub icon: String,
}

impl ActivityEntry {
    /// New entry stamped with the current UTC time
    pub fn now(kind: ActivityKind, user: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            kind,
            user: user.into(),
            action: action.into(),
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            icon: kind.icon().to_string(),
        }
    }

    pub fn login(admin_name: &str) -> Self {
        Self::now(ActivityKind::Login, admin_name, "Logged into the system")
    }

    pub fn settings_saved(admin_name: &str) -> Self {
        Self::now(ActivityKind::Settings, admin_name, "Updated system settings")
    }

    fn sample(kind: ActivityKind, action: &str, time: &str) -> Self {
        Self {
            kind,
            user: SYSTEM_ACTOR.to_string(),
            action: action.to_string(),
            time: time.to_string(),
            icon: kind.icon().to_string(),
        }
    }
}

/// Fixed entries that always close the feed.
pub fn sample_entries() -> [ActivityEntry; 3] {
    [
        ActivityEntry::sample(ActivityKind::Settings, "Updated system settings", "2026-01-17T16:30:00"),
        ActivityEntry::sample(
            ActivityKind::Approve,
            "Batch approved 15 registrations for SECRH",
            "2026-01-17T15:45:00",
        ),
        ActivityEntry::sample(ActivityKind::Export, "Exported registration report", "2026-01-17T14:20:00"),
    ]
}

pub struct ActivityLog {
    entries: RwLock<VecDeque<ActivityEntry>>,
    capacity: usize,
}

impl ActivityLog {
    /// `capacity` of 0 never evicts.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            capacity,
        }
    }

    /// Record an entry in front of everything recorded so far
    pub fn record(&self, entry: ActivityEntry) {
        let mut entries = self.entries.write();
        if self.capacity > 0 && entries.len() >= self.capacity {
            entries.pop_back();
        }
        entries.push_front(entry);
    }

    /// Number of recorded entries, samples excluded
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Recorded entries newest first, followed by the sample entries
    pub fn feed(&self) -> Vec<ActivityEntry> {
        let entries = self.entries.read();
        entries.iter().cloned().chain(sample_entries()).collect()
    }
}
