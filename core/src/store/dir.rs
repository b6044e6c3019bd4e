//! Directory-per-kiosk layout:
//!
//! ```text
//! <root>/kiosk_<id>/kiosk_user_pin.csv
//! <root>/kiosk_<id>/kiosk_metadata.csv
//! <root>/kiosk_<id>/transactions_<id>_<MMDDYY>.csv
//! ```

use super::KioskStore;
use crate::{
    error::{SimError, SimResult},
    ledger::{LedgerReader, LedgerWriter},
    registry::KioskRegistry,
    transaction::{parse_ledger_file_name, TransactionLog},
    types::KioskId,
};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub const USER_PIN_FILE: &str = "kiosk_user_pin.csv";
pub const METADATA_FILE: &str = "kiosk_metadata.csv";
const KIOSK_DIR_PREFIX: &str = "kiosk_";

pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Nothing is created until the first write.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn kiosk_dir(&self, kiosk_id: &str) -> PathBuf {
        self.root.join(format!("{KIOSK_DIR_PREFIX}{kiosk_id}"))
    }

    fn create_kiosk_dir(&self, kiosk_id: &str) -> SimResult<PathBuf> {
        let dir = self.kiosk_dir(kiosk_id);
        fs::create_dir_all(&dir).map_err(|e| SimError::io(&dir, e))?;
        Ok(dir)
    }

    fn create(path: &Path) -> SimResult<BufWriter<File>> {
        File::create(path)
            .map(BufWriter::new)
            .map_err(|e| SimError::io(path, e))
    }

    /// Open a registry part, mapping absence to `MissingRegistry`.
    fn open_registry_file(kiosk_id: &str, path: &Path) -> SimResult<BufReader<File>> {
        match File::open(path) {
            Ok(f) => Ok(BufReader::new(f)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SimError::MissingRegistry {
                    kiosk_id: kiosk_id.to_string(),
                    path: path.to_path_buf(),
                })
            }
            Err(e) => Err(SimError::io(path, e)),
        }
    }
}

fn malformed(kiosk_id: &str, path: &Path, err: anyhow::Error) -> SimError {
    SimError::MalformedRegistry {
        kiosk_id: kiosk_id.to_string(),
        path: path.to_path_buf(),
        reason: format!("{err:#}"),
    }
}

fn write_failed(kiosk_id: &str, path: &Path, source: csv::Error) -> SimError {
    SimError::LedgerWrite {
        kiosk_id: kiosk_id.to_string(),
        path: path.to_path_buf(),
        source,
    }
}

impl KioskStore for DirStore {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn list_kiosks(&self) -> SimResult<Vec<KioskId>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SimError::io(&self.root, e)),
        };
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SimError::io(&self.root, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_prefix(KIOSK_DIR_PREFIX))
            {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn save_registry(&mut self, registry: &KioskRegistry) -> SimResult<()> {
        let dir = self.create_kiosk_dir(registry.kiosk_id())?;

        let kiosk_id = registry.kiosk_id();

        let users_path = dir.join(USER_PIN_FILE);
        LedgerWriter::write_users(Self::create(&users_path)?, &registry.users)
            .map_err(|e| write_failed(kiosk_id, &users_path, e))?;

        let meta_path = dir.join(METADATA_FILE);
        LedgerWriter::write_metadata(Self::create(&meta_path)?, &registry.kiosk)
            .map_err(|e| write_failed(kiosk_id, &meta_path, e))?;

        log::debug!("store: wrote registry to {}", dir.display());
        Ok(())
    }

    fn load_registry(&self, kiosk_id: &str) -> SimResult<KioskRegistry> {
        let dir = self.kiosk_dir(kiosk_id);

        let meta_path = dir.join(METADATA_FILE);
        let kiosk = LedgerReader::read_metadata(Self::open_registry_file(kiosk_id, &meta_path)?)
            .map_err(|e| malformed(kiosk_id, &meta_path, e))?;

        let users_path = dir.join(USER_PIN_FILE);
        let users = LedgerReader::read_users(Self::open_registry_file(kiosk_id, &users_path)?)
            .map_err(|e| malformed(kiosk_id, &users_path, e))?;

        Ok(KioskRegistry { kiosk, users })
    }

    fn save_transactions(&mut self, kiosk_id: &str, log: &TransactionLog) -> SimResult<()> {
        let dir = self.create_kiosk_dir(kiosk_id)?;
        let path = dir.join(log.file_name());
        LedgerWriter::write_transactions(Self::create(&path)?, &log.transactions)
            .map_err(|e| write_failed(kiosk_id, &path, e))
    }

    fn load_transactions(&self, kiosk_id: &str) -> SimResult<Vec<TransactionLog>> {
        let dir = self.kiosk_dir(kiosk_id);
        let entries = fs::read_dir(&dir).map_err(|e| SimError::io(&dir, e))?;
        let mut logs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SimError::io(&dir, e))?;
            let name = entry.file_name();
            let Some((ledger_kiosk, date)) = name.to_str().and_then(parse_ledger_file_name) else {
                continue;
            };
            let path = entry.path();
            let file = File::open(&path).map_err(|e| SimError::io(&path, e))?;
            let transactions = LedgerReader::read_transactions(BufReader::new(file))
                .map_err(|e| anyhow::anyhow!("{}: {e:#}", path.display()))?;
            logs.push(TransactionLog {
                kiosk_id: ledger_kiosk,
                date,
                transactions,
            });
        }
        logs.sort_by_key(|l| l.date);
        Ok(logs)
    }
}
