//! Synthetic transaction data for a network of water-dispensing kiosks.
//!
//! Two phases: a registry of kiosks, users and PINs is generated and
//! stored, then daily dispensing ledgers are simulated from the stored
//! registry. See `engine` for the fixed execution order.

pub mod audit;
pub mod cohort;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod report;
pub mod rng;
pub mod simulator;
pub mod store;
pub mod transaction;
pub mod types;
pub mod window;
