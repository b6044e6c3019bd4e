//! Phase 2: daily transaction simulation.
//!
//! Per simulated day, independently:
//!   1. Pick k active users, k uniform in [max(1, users/3), users].
//!   2. Each active user plans n transactions according to their cohort.
//!   3. Volumes are drawn one by one against the user's remaining daily
//!      allowance; once the allowance drops below the minimum volume the
//!      user stops for the day.
//!   4. Each emitted transaction gets a time in the active window, a
//!      terminal, and a PASS/FAIL outcome.
//!   5. The day's transactions are sorted by timestamp.

use crate::{
    cohort::{Cohort, CohortAssignment, CohortClassifier},
    config::GeneratorConfig,
    error::SimResult,
    registry::{KioskRegistry, User},
    rng::StreamRng,
    transaction::{Response, Transaction, TransactionLog},
    types::VolumeMl,
    window::DayWindow,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

pub struct DailyTransactionSimulator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> DailyTransactionSimulator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Simulate every day of `window` for one kiosk, in date order.
    pub fn simulate_kiosk(
        &self,
        registry: &KioskRegistry,
        cohorts: &CohortAssignment,
        window: &DayWindow,
        rng: &mut StreamRng,
    ) -> Vec<TransactionLog> {
        window
            .dates()
            .map(|date| self.simulate_day(registry, cohorts, date, rng))
            .collect()
    }

    /// Simulate one kiosk-day. An empty registry yields an empty log.
    pub fn simulate_day(
        &self,
        registry: &KioskRegistry,
        cohorts: &CohortAssignment,
        date: NaiveDate,
        rng: &mut StreamRng,
    ) -> TransactionLog {
        let clients = registry.kiosk.client_names();
        let mut transactions = Vec::new();

        for user in self.active_users(&registry.users, rng) {
            let cohort = cohorts.cohort_of(&user.user_id);
            let planned = cohort.planned_transactions(self.config, rng);
            let volumes = self.draw_volumes(cohort, planned, rng);
            for volume_ml in volumes {
                transactions.push(Transaction {
                    timestamp: self.random_timestamp(date, rng),
                    client_name: rng.pick(&clients).cloned().unwrap_or_default(),
                    user_id: user.user_id.clone(),
                    pin: user.pin.clone(),
                    volume_ml,
                    response: self.draw_response(rng),
                });
            }
        }

        log::debug!(
            "simulator: kiosk {} on {date}: {} transactions",
            registry.kiosk_id(),
            transactions.len()
        );
        TransactionLog::new(registry.kiosk.kiosk_id.clone(), date, transactions)
    }

    /// Uniformly chosen subset of users allowed to transact today.
    pub fn active_users<'u>(&self, users: &'u [User], rng: &mut StreamRng) -> Vec<&'u User> {
        if users.is_empty() {
            return Vec::new();
        }
        let lo = (users.len() / 3).max(1);
        let k = rng.range_inclusive(lo as u64, users.len() as u64) as usize;
        rng.sample_indices(users.len(), k)
            .into_iter()
            .map(|i| &users[i])
            .collect()
    }

    /// Volumes for one user-day, never exceeding the cohort's daily cap.
    /// Fewer than `planned` volumes come back when the cap is reached.
    pub fn draw_volumes(&self, cohort: Cohort, planned: u32, rng: &mut StreamRng) -> Vec<VolumeMl> {
        let cap = cohort.daily_cap(self.config);
        let min = self.config.min_volume_ml;
        let mut accumulated: VolumeMl = 0;
        let mut volumes = Vec::new();

        for _ in 0..planned {
            let remaining = cap.saturating_sub(accumulated);
            if remaining < min {
                break;
            }
            let hi = self.config.max_volume_ml.min(remaining);
            let volume = rng.range_inclusive(u64::from(min), u64::from(hi)) as VolumeMl;
            accumulated += volume;
            volumes.push(volume);
        }
        volumes
    }

    /// `date` plus a second-granular time in [start_hour, end_hour).
    fn random_timestamp(&self, date: NaiveDate, rng: &mut StreamRng) -> NaiveDateTime {
        let (start, end) = self.config.active_seconds();
        let secs = rng.range_inclusive(u64::from(start), u64::from(end) - 1);
        date.and_time(NaiveTime::default()) + Duration::seconds(secs as i64)
    }

    fn draw_response(&self, rng: &mut StreamRng) -> Response {
        if rng.chance(self.config.pass_rate) {
            Response::Pass
        } else {
            Response::Fail
        }
    }
}

/// Classify a kiosk's users and simulate its whole configured window.
pub fn simulate_registry(
    config: &GeneratorConfig,
    registry: &KioskRegistry,
    cohort_rng: &mut StreamRng,
    tx_rng: &mut StreamRng,
) -> SimResult<(CohortAssignment, Vec<TransactionLog>)> {
    let window = DayWindow::new(config.end_date, config.num_days)?;
    let cohorts = CohortClassifier::from_config(config).classify(&registry.users, cohort_rng);
    let logs = DailyTransactionSimulator::new(config).simulate_kiosk(
        registry,
        &cohorts,
        &window,
        tx_rng,
    );
    Ok((cohorts, logs))
}
