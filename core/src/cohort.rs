//! Behavioural cohorts: each user is either normal or abusive for the
//! whole run. Abusive users transact more often and may draw more water.

use crate::{
    config::GeneratorConfig,
    registry::User,
    rng::StreamRng,
    types::{UserId, VolumeMl},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    Normal,
    Abusive,
}

impl Cohort {
    pub fn daily_cap(self, config: &GeneratorConfig) -> VolumeMl {
        match self {
            Self::Normal => config.normal_daily_cap_ml,
            Self::Abusive => config.abusive_daily_cap_ml,
        }
    }

    /// Transactions a user of this cohort plans for one day.
    /// Normal users plan base ± variance, floored at 1.
    pub fn planned_transactions(self, config: &GeneratorConfig, rng: &mut StreamRng) -> u32 {
        match self {
            Self::Abusive => rng.range_inclusive(
                u64::from(config.abusive_min_tx),
                u64::from(config.abusive_max_tx),
            ) as u32,
            Self::Normal => {
                let base = i64::from(config.normal_tx_base);
                let variance = i64::from(config.normal_tx_variance);
                rng.range_inclusive_i64(base - variance, base + variance).max(1) as u32
            }
        }
    }
}

/// Cohort membership for one kiosk's users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CohortAssignment {
    abusive: HashSet<UserId>,
}

impl CohortAssignment {
    pub fn cohort_of(&self, user_id: &str) -> Cohort {
        if self.abusive.contains(user_id) {
            Cohort::Abusive
        } else {
            Cohort::Normal
        }
    }

    pub fn abusive_count(&self) -> usize {
        self.abusive.len()
    }

    pub fn abusive_users(&self) -> impl Iterator<Item = &UserId> {
        self.abusive.iter()
    }
}

pub struct CohortClassifier {
    abusive_fraction: f64,
}

impl CohortClassifier {
    pub fn new(abusive_fraction: f64) -> Self {
        Self { abusive_fraction }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.abusive_fraction)
    }

    /// `max(1, floor(users * fraction))`, or 0 for an empty kiosk.
    pub fn abusive_size(&self, user_count: usize) -> usize {
        if user_count == 0 {
            return 0;
        }
        let raw = (user_count as f64 * self.abusive_fraction).floor() as usize;
        raw.clamp(1, user_count)
    }

    /// Uniform sample without replacement. No memory across kiosks.
    pub fn classify(&self, users: &[User], rng: &mut StreamRng) -> CohortAssignment {
        let size = self.abusive_size(users.len());
        let abusive = rng
            .sample_indices(users.len(), size)
            .into_iter()
            .map(|i| users[i].user_id.clone())
            .collect();
        CohortAssignment { abusive }
    }
}
