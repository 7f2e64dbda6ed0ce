use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Registration parameters for the current semester. Dates are kept as the
/// client sent them so a save reads back unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub semester: String,
    pub start_date: String,
    pub end_date: String,
    pub registration_open: bool,
    pub max_credit_hours: u32,
    pub min_credit_hours: u32,
    pub require_aa_approval: bool,
    pub email_new_registrations: bool,
    pub email_approvals: bool,
    pub daily_summary: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            semester: "Semester 2 2025/2026".to_string(),
            start_date: "2026-01-06".to_string(),
            end_date: "2026-01-20".to_string(),
            registration_open: true,
            max_credit_hours: 21,
            min_credit_hours: 12,
            require_aa_approval: true,
            email_new_registrations: true,
            email_approvals: true,
            daily_summary: false,
        }
    }
}

/// Holds the one settings record; saves replace it wholesale.
#[derive(Default)]
pub struct SettingsStore {
    current: RwLock<SystemSettings>,
}

impl SettingsStore {
    pub fn get(&self) -> SystemSettings {
        self.current.read().clone()
    }

    pub fn replace(&self, settings: SystemSettings) {
        *self.current.write() = settings;
    }
}
