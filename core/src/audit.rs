//! Ledger audit: re-read a kiosk's stored registry and ledgers and check
//! the properties every generated ledger must satisfy.
//!
//! Cohort labels are not persisted, so per user-day totals are checked
//! against the abusive cap; totals above the normal cap are counted as
//! heavy user-days rather than flagged.

use crate::{
    config::GeneratorConfig,
    error::SimResult,
    registry::KioskRegistry,
    store::KioskStore,
    transaction::TransactionLog,
    types::{KioskId, UserId},
};
use chrono::Timelike;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AuditReport {
    pub kiosk_id: KioskId,
    pub days: usize,
    pub transactions: usize,
    /// User-days whose total exceeded the normal cap.
    pub heavy_user_days: usize,
    pub violations: Vec<String>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

pub fn audit_kiosk<S: KioskStore + ?Sized>(
    store: &S,
    kiosk_id: &str,
    config: &GeneratorConfig,
) -> SimResult<AuditReport> {
    let registry = store.load_registry(kiosk_id)?;
    let logs = store.load_transactions(kiosk_id)?;
    Ok(audit_logs(&registry, &logs, config))
}

pub fn audit_logs(
    registry: &KioskRegistry,
    logs: &[TransactionLog],
    config: &GeneratorConfig,
) -> AuditReport {
    let mut report = AuditReport {
        kiosk_id: registry.kiosk.kiosk_id.clone(),
        days: logs.len(),
        ..AuditReport::default()
    };
    let pins: HashMap<&str, &str> = registry
        .users
        .iter()
        .map(|u| (u.user_id.as_str(), u.pin.as_str()))
        .collect();
    let clients: HashSet<String> = registry.kiosk.client_names().into_iter().collect();
    let (start_secs, end_secs) = config.active_seconds();

    for log in logs {
        let file = log.file_name();
        report.transactions += log.transactions.len();

        if log.kiosk_id != registry.kiosk.kiosk_id {
            report.violations.push(format!(
                "{file}: kiosk {} does not match registry kiosk {}",
                log.kiosk_id, registry.kiosk.kiosk_id
            ));
        }
        if !log.is_chronological() {
            report.violations.push(format!("{file}: rows not sorted by timestamp"));
        }

        let mut per_user: HashMap<&UserId, u64> = HashMap::new();
        for (row, t) in log.transactions.iter().enumerate() {
            let row = row + 1;
            if t.timestamp.date() != log.date {
                report.violations.push(format!("{file} row {row}: dated {}", t.timestamp.date()));
            }
            let secs = t.timestamp.time().num_seconds_from_midnight();
            if secs < start_secs || secs >= end_secs {
                report.violations.push(format!(
                    "{file} row {row}: {} outside active hours",
                    t.timestamp.time()
                ));
            }
            if !(config.min_volume_ml..=config.max_volume_ml).contains(&t.volume_ml) {
                report
                    .violations
                    .push(format!("{file} row {row}: volume {} mL outside band", t.volume_ml));
            }
            if !clients.contains(&t.client_name) {
                report
                    .violations
                    .push(format!("{file} row {row}: unknown terminal {:?}", t.client_name));
            }
            match pins.get(t.user_id.as_str()) {
                None => report
                    .violations
                    .push(format!("{file} row {row}: unregistered user {}", t.user_id)),
                Some(pin) if *pin != t.pin => report
                    .violations
                    .push(format!("{file} row {row}: PIN mismatch for {}", t.user_id)),
                Some(_) => {}
            }
            *per_user.entry(&t.user_id).or_default() += u64::from(t.volume_ml);
        }

        for (user_id, total) in per_user {
            if total > u64::from(config.abusive_daily_cap_ml) {
                report
                    .violations
                    .push(format!("{file}: user {user_id} drew {total} mL, above every cap"));
            } else if total > u64::from(config.normal_daily_cap_ml) {
                report.heavy_user_days += 1;
            }
        }
    }
    report.violations.sort();
    report
}
