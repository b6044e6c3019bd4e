//! The generation pipeline.
//!
//! EXECUTION ORDER (fixed):
//!   1. Registry: create kiosks and users, persist them.
//!   2. Simulate: for each stored kiosk: reload its registry, classify
//!                cohorts, simulate the day window, persist each day.
//!
//! RULES:
//!   - Phase 2 reads registries back from the store, never from phase 1
//!     memory, so either phase can run on its own.
//!   - All randomness flows through the RngBank.
//!   - A kiosk with missing registry files is skipped with a warning.
//!     Any other failure stops the run.

use crate::{
    config::GeneratorConfig,
    error::{SimError, SimResult},
    registry::{KioskRegistry, RegistryGenerator},
    report::{KioskSummary, RunReport, SkippedKiosk},
    rng::{RngBank, StreamSlot},
    simulator::simulate_registry,
    store::KioskStore,
};

pub struct KioskPipeline<S: KioskStore> {
    pub config: GeneratorConfig,
    pub store:  S,
    rng_bank:   RngBank,
}

impl<S: KioskStore> KioskPipeline<S> {
    /// Validates `config`. Pass `None` as the seed to draw one from entropy.
    pub fn new(config: GeneratorConfig, store: S, seed: Option<u64>) -> SimResult<Self> {
        config.validate()?;
        let rng_bank = match seed {
            Some(seed) => RngBank::new(seed),
            None => RngBank::from_entropy(),
        };
        Ok(Self {
            config,
            store,
            rng_bank,
        })
    }

    pub fn master_seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    /// Phase 1. Returns the registries that were written.
    pub fn generate_registry(&mut self) -> SimResult<Vec<KioskRegistry>> {
        let mut rng = self.rng_bank.for_stream(StreamSlot::Registry);
        let registries = RegistryGenerator::new(&self.config).generate(&mut rng);
        for registry in &registries {
            self.store.save_registry(registry)?;
        }
        log::info!("registry: wrote {} kiosks", registries.len());
        Ok(registries)
    }

    /// Phase 2 over every kiosk in the store.
    pub fn simulate_transactions(&mut self) -> SimResult<RunReport> {
        let kiosk_ids = self.store.list_kiosks()?;
        if kiosk_ids.is_empty() {
            return Err(SimError::NoKiosks {
                location: self.store.location(),
            });
        }

        let mut report = RunReport::new(self.master_seed());
        for kiosk_id in kiosk_ids {
            match self.simulate_kiosk(&kiosk_id) {
                Ok(summary) => report.kiosks.push(summary),
                Err(e) if e.is_recoverable() => {
                    log::warn!("{e}, skipping kiosk directory kiosk_{kiosk_id}");
                    report.skipped.push(SkippedKiosk {
                        kiosk_id,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        log::info!(
            "simulate: {} kiosks, {} transactions, {} skipped",
            report.kiosks.len(),
            report.total_transactions(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Phase 2 for a single kiosk key.
    pub fn simulate_kiosk(&mut self, kiosk_id: &str) -> SimResult<KioskSummary> {
        let registry = self.store.load_registry(kiosk_id)?;
        log::info!(
            "Generating transactions for kiosk {} ({} users, {} clients)...",
            registry.kiosk_id(),
            registry.users.len(),
            registry.kiosk.num_clients
        );

        let mut cohort_rng = self.rng_bank.for_kiosk(StreamSlot::Cohort, kiosk_id);
        let mut tx_rng = self.rng_bank.for_kiosk(StreamSlot::Transaction, kiosk_id);
        let (cohorts, logs) =
            simulate_registry(&self.config, &registry, &mut cohort_rng, &mut tx_rng)?;

        for log in &logs {
            self.store.save_transactions(kiosk_id, log)?;
        }
        Ok(KioskSummary::from_run(&registry, &cohorts, &logs))
    }

    /// Both phases back to back.
    pub fn run(&mut self) -> SimResult<RunReport> {
        self.generate_registry()?;
        self.simulate_transactions()
    }
}
