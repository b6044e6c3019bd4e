//! Kiosk persistence.
//!
//! RULE: Only the store knows where registries and ledgers live.
//! Generators and the simulator hand records to a KioskStore; they never
//! touch paths directly.

mod dir;
mod memory;

pub use dir::{DirStore, METADATA_FILE, USER_PIN_FILE};
pub use memory::MemoryStore;

use crate::{
    error::SimResult,
    registry::KioskRegistry,
    transaction::TransactionLog,
    types::KioskId,
};

/// A backing store for kiosk registries and their daily ledgers.
///
/// `kiosk_id` is the store's key for a kiosk. For `DirStore` that is the
/// suffix of the `kiosk_<id>` directory.
pub trait KioskStore {
    /// Human-readable location, for error messages.
    fn location(&self) -> String;

    /// Every kiosk the store knows about, ascending.
    fn list_kiosks(&self) -> SimResult<Vec<KioskId>>;

    /// Create or overwrite a kiosk's registry.
    fn save_registry(&mut self, registry: &KioskRegistry) -> SimResult<()>;

    /// Fails with `MissingRegistry` when any registry part is absent and
    /// `MalformedRegistry` when it cannot be parsed.
    fn load_registry(&self, kiosk_id: &str) -> SimResult<KioskRegistry>;

    /// Create or overwrite one kiosk-day ledger.
    fn save_transactions(&mut self, kiosk_id: &str, log: &TransactionLog) -> SimResult<()>;

    /// All ledgers of a kiosk, ascending by date.
    fn load_transactions(&self, kiosk_id: &str) -> SimResult<Vec<TransactionLog>>;
}
