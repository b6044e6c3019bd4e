//! Phase 1: kiosk and user registry generation.
//!
//! A registry is created once and then only read. Kiosk IDs are unique
//! within a run; user IDs are unique within their kiosk but may repeat
//! across kiosks.

use crate::{
    config::GeneratorConfig,
    rng::StreamRng,
    types::{format_kiosk_id, KioskId, Pin, UserId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kiosk {
    pub kiosk_id:    KioskId,
    /// Client terminals, fixed for the kiosk's lifetime.
    pub num_clients: u32,
}

impl Kiosk {
    /// Terminal names as they appear in ledgers: "Client 1" .. "Client N".
    pub fn client_names(&self) -> Vec<String> {
        (1..=self.num_clients).map(|i| format!("Client {i}")).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub pin:     Pin,
}

/// Everything persisted for one kiosk. Users are sorted by `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskRegistry {
    pub kiosk: Kiosk,
    pub users: Vec<User>,
}

impl KioskRegistry {
    pub fn kiosk_id(&self) -> &str {
        &self.kiosk.kiosk_id
    }
}

pub struct RegistryGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> RegistryGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Build every kiosk of the run, sorted ascending by kiosk ID.
    pub fn generate(&self, rng: &mut StreamRng) -> Vec<KioskRegistry> {
        let ids = self.generate_kiosk_ids(rng);
        ids.into_iter()
            .map(|kiosk_id| {
                let num_users = rng.range_inclusive(
                    self.config.min_users_per_kiosk as u64,
                    self.config.max_users_per_kiosk as u64,
                ) as usize;
                let num_clients = rng.range_inclusive(
                    u64::from(self.config.min_clients),
                    u64::from(self.config.max_clients),
                ) as u32;
                let users = self.generate_users(num_users, rng);
                log::debug!(
                    "registry: kiosk {kiosk_id} with {} users, {num_clients} clients",
                    users.len()
                );
                KioskRegistry {
                    kiosk: Kiosk {
                        kiosk_id,
                        num_clients,
                    },
                    users,
                }
            })
            .collect()
    }

    /// Sample distinct IDs in [0, 9999] until `kiosk_count` are collected.
    pub fn generate_kiosk_ids(&self, rng: &mut StreamRng) -> Vec<KioskId> {
        let mut ids = BTreeSet::new();
        while ids.len() < self.config.kiosk_count {
            ids.insert(rng.range_inclusive(0, 9999) as u16);
        }
        ids.into_iter().map(format_kiosk_id).collect()
    }

    /// `count` users with distinct IDs, sorted by ID, each with its own PIN.
    pub fn generate_users(&self, count: usize, rng: &mut StreamRng) -> Vec<User> {
        let mut ids = BTreeSet::new();
        while ids.len() < count {
            ids.insert(self.random_user_id(rng));
        }
        ids.into_iter()
            .map(|user_id| User {
                user_id,
                pin: random_pin(rng),
            })
            .collect()
    }

    fn random_user_id(&self, rng: &mut StreamRng) -> UserId {
        let suffix = rng.range_inclusive(100_000, 999_999);
        format!("{}{suffix}", self.config.user_id_prefix)
    }
}

/// Uniform 4-digit PIN, zero-padded.
pub fn random_pin(rng: &mut StreamRng) -> Pin {
    format!("{:04}", rng.range_inclusive(0, 9999))
}
