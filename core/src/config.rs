use crate::{
    error::{SimError, SimResult},
    types::VolumeMl,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of distinct 4-digit kiosk IDs.
pub const KIOSK_ID_SPACE: usize = 10_000;

/// Number of distinct 6-digit user suffixes (100000..=999999).
pub const USER_SUFFIX_SPACE: usize = 900_000;

/// Every tunable of a generation run in one place.
///
/// Missing fields in a config file fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    // ── Registry ──────────────────────────────────
    /// Kiosks to create. Default 10.
    pub kiosk_count: usize,
    /// Users per kiosk are drawn uniformly from [min, max]. Default 50–100.
    pub min_users_per_kiosk: usize,
    pub max_users_per_kiosk: usize,
    /// Client terminals per kiosk, drawn once from [min, max]. Default 4–6.
    pub min_clients: u32,
    pub max_clients: u32,
    /// Three-digit prefix shared by every user ID. Default "708".
    pub user_id_prefix: String,

    // ── Day window ────────────────────────────────
    /// Days to simulate. Default 30.
    pub num_days: u32,
    /// Last simulated day (inclusive). Default 2025-11-13.
    pub end_date: NaiveDate,

    // ── Volumes ───────────────────────────────────
    /// Per-transaction band in mL. Default 100–600.
    pub min_volume_ml: VolumeMl,
    pub max_volume_ml: VolumeMl,
    /// Daily ceiling per normal user. Default 1500.
    pub normal_daily_cap_ml: VolumeMl,
    /// Daily ceiling per abusive user. Default 3000.
    pub abusive_daily_cap_ml: VolumeMl,

    // ── Behaviour ─────────────────────────────────
    /// Fraction of each kiosk's users marked abusive. Default 0.05.
    pub abusive_fraction: f64,
    /// Normal users plan base ± variance transactions a day, at least 1.
    pub normal_tx_base: u32,
    pub normal_tx_variance: u32,
    /// Abusive users plan [min, max] transactions a day. Default 5–7.
    pub abusive_min_tx: u32,
    pub abusive_max_tx: u32,
    /// Probability a transaction is PASS. Default 0.98.
    pub pass_rate: f64,
    /// Transactions happen in [start, end) hours. Default 06:00–18:00.
    pub active_start_hour: u32,
    pub active_end_hour: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            kiosk_count: 10,
            min_users_per_kiosk: 50,
            max_users_per_kiosk: 100,
            min_clients: 4,
            max_clients: 6,
            user_id_prefix: "708".into(),
            num_days: 30,
            end_date: NaiveDate::from_ymd_opt(2025, 11, 13).expect("2025-11-13 is a calendar date"),
            min_volume_ml: 100,
            max_volume_ml: 600,
            normal_daily_cap_ml: 1500,
            abusive_daily_cap_ml: 3000,
            abusive_fraction: 0.05,
            normal_tx_base: 3,
            normal_tx_variance: 1,
            abusive_min_tx: 5,
            abusive_max_tx: 7,
            pass_rate: 0.98,
            active_start_hour: 6,
            active_end_hour: 18,
        }
    }
}

impl GeneratorConfig {
    /// Load from a JSON file and validate it.
    /// In tests, use GeneratorConfig::default_test().
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("config: loaded {}", path.display());
        Ok(config)
    }

    /// Small config for unit and integration tests: few kiosks, few users,
    /// a one-week window.
    pub fn default_test() -> Self {
        Self {
            kiosk_count: 3,
            min_users_per_kiosk: 10,
            max_users_per_kiosk: 20,
            num_days: 7,
            ..Self::default()
        }
    }

    /// Transaction window as seconds since midnight: [start, end).
    pub fn active_seconds(&self) -> (u32, u32) {
        (self.active_start_hour * 3600, self.active_end_hour * 3600)
    }

    pub fn validate(&self) -> SimResult<()> {
        fn check(ok: bool, msg: impl FnOnce() -> String) -> SimResult<()> {
            if ok {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(msg()))
            }
        }

        check(self.kiosk_count <= KIOSK_ID_SPACE, || {
            format!("kiosk_count {} exceeds the 4-digit ID space", self.kiosk_count)
        })?;
        check(self.min_users_per_kiosk <= self.max_users_per_kiosk, || {
            format!(
                "min_users_per_kiosk {} > max_users_per_kiosk {}",
                self.min_users_per_kiosk, self.max_users_per_kiosk
            )
        })?;
        check(self.max_users_per_kiosk <= USER_SUFFIX_SPACE, || {
            format!(
                "max_users_per_kiosk {} exceeds the 6-digit user ID space",
                self.max_users_per_kiosk
            )
        })?;
        check(self.min_clients >= 1 && self.min_clients <= self.max_clients, || {
            format!(
                "client range {}..={} must be non-empty and start at 1 or more",
                self.min_clients, self.max_clients
            )
        })?;
        check(
            self.user_id_prefix.len() == 3
                && self.user_id_prefix.bytes().all(|b| b.is_ascii_digit()),
            || format!("user_id_prefix {:?} must be 3 digits", self.user_id_prefix),
        )?;
        check(self.num_days >= 1, || "num_days must be at least 1".into())?;
        check(
            self.min_volume_ml >= 1 && self.min_volume_ml <= self.max_volume_ml,
            || {
                format!(
                    "volume band {}..={} must be non-empty and positive",
                    self.min_volume_ml, self.max_volume_ml
                )
            },
        )?;
        check(self.abusive_daily_cap_ml > self.normal_daily_cap_ml, || {
            format!(
                "abusive_daily_cap_ml {} must exceed normal_daily_cap_ml {}",
                self.abusive_daily_cap_ml, self.normal_daily_cap_ml
            )
        })?;
        check((0.0..=1.0).contains(&self.abusive_fraction), || {
            format!("abusive_fraction {} outside [0, 1]", self.abusive_fraction)
        })?;
        check((0.0..=1.0).contains(&self.pass_rate), || {
            format!("pass_rate {} outside [0, 1]", self.pass_rate)
        })?;
        check(self.abusive_min_tx <= self.abusive_max_tx, || {
            format!(
                "abusive_min_tx {} > abusive_max_tx {}",
                self.abusive_min_tx, self.abusive_max_tx
            )
        })?;
        let normal_fit = self.normal_daily_cap_ml / self.min_volume_ml;
        let normal_max_tx = u64::from(self.normal_tx_base) + u64::from(self.normal_tx_variance);
        check(normal_max_tx <= u64::from(normal_fit), || {
            format!(
                "normal users plan up to {normal_max_tx} transactions but the daily cap fits {normal_fit}"
            )
        })?;
        let abusive_fit = self.abusive_daily_cap_ml / self.min_volume_ml;
        check(self.abusive_max_tx <= abusive_fit, || {
            format!(
                "abusive_max_tx {} exceeds the {abusive_fit} transactions the daily cap fits",
                self.abusive_max_tx
            )
        })?;
        check(
            self.active_start_hour < self.active_end_hour && self.active_end_hour <= 24,
            || {
                format!(
                    "active hours {}..{} must be a non-empty window within a day",
                    self.active_start_hour, self.active_end_hour
                )
            },
        )?;
        Ok(())
    }
}
