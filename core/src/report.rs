//! End-of-run summaries, printed by the runner as text or JSON.

use crate::{
    cohort::CohortAssignment,
    registry::KioskRegistry,
    transaction::TransactionLog,
    types::{KioskId, UserId},
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KioskSummary {
    pub kiosk_id:        KioskId,
    pub users:           usize,
    pub abusive_users:   usize,
    pub num_clients:     u32,
    pub days:            usize,
    pub transactions:    usize,
    pub total_volume_ml: u64,
    pub failures:        usize,
    /// Largest single user-day total across the window.
    pub peak_user_day_ml: u64,
}

impl KioskSummary {
    pub fn from_run(
        registry: &KioskRegistry,
        cohorts: &CohortAssignment,
        logs: &[TransactionLog],
    ) -> Self {
        let peak_user_day_ml = logs
            .iter()
            .flat_map(|log| {
                let mut per_user: HashMap<&UserId, u64> = HashMap::new();
                for t in &log.transactions {
                    *per_user.entry(&t.user_id).or_default() += u64::from(t.volume_ml);
                }
                per_user.into_values()
            })
            .max()
            .unwrap_or(0);

        Self {
            kiosk_id: registry.kiosk.kiosk_id.clone(),
            users: registry.users.len(),
            abusive_users: cohorts.abusive_count(),
            num_clients: registry.kiosk.num_clients,
            days: logs.len(),
            transactions: logs.iter().map(|l| l.transactions.len()).sum(),
            total_volume_ml: logs.iter().map(TransactionLog::total_volume_ml).sum(),
            failures: logs.iter().map(TransactionLog::failures).sum(),
            peak_user_day_ml,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkippedKiosk {
    pub kiosk_id: KioskId,
    pub reason:   String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RunReport {
    pub master_seed: u64,
    pub kiosks:      Vec<KioskSummary>,
    pub skipped:     Vec<SkippedKiosk>,
}

impl RunReport {
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            ..Self::default()
        }
    }

    pub fn total_transactions(&self) -> usize {
        self.kiosks.iter().map(|k| k.transactions).sum()
    }
}
