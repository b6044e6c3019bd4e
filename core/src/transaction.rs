//! Transaction records and per-day logs.

use crate::types::{KioskId, Pin, UserId, VolumeMl};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Ledger timestamp layout: `YYYY-MM-DD HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Response {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

/// One dispense attempt. Field names match the ledger header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "Timestamp", with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "Client_Name")]
    pub client_name: String,
    #[serde(rename = "User_ID")]
    pub user_id: UserId,
    #[serde(rename = "PIN")]
    pub pin: Pin,
    #[serde(rename = "Volume_ML")]
    pub volume_ml: VolumeMl,
    #[serde(rename = "Response")]
    pub response: Response,
}

/// All transactions of one kiosk on one day, ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionLog {
    pub kiosk_id:     KioskId,
    pub date:         NaiveDate,
    pub transactions: Vec<Transaction>,
}

impl TransactionLog {
    /// Build a log, sorting by timestamp. The sort is stable, so equal
    /// timestamps keep generation order.
    pub fn new(kiosk_id: KioskId, date: NaiveDate, mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by_key(|t| t.timestamp);
        Self {
            kiosk_id,
            date,
            transactions,
        }
    }

    /// `transactions_<kiosk_id>_<MMDDYY>.csv`
    pub fn file_name(&self) -> String {
        ledger_file_name(&self.kiosk_id, self.date)
    }

    pub fn is_chronological(&self) -> bool {
        self.transactions
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }

    pub fn total_volume_ml(&self) -> u64 {
        self.transactions.iter().map(|t| u64::from(t.volume_ml)).sum()
    }

    pub fn failures(&self) -> usize {
        self.transactions
            .iter()
            .filter(|t| t.response == Response::Fail)
            .count()
    }
}

pub fn ledger_file_name(kiosk_id: &str, date: NaiveDate) -> String {
    format!("transactions_{kiosk_id}_{}.csv", date.format("%m%d%y"))
}

/// Inverse of `ledger_file_name`; `None` for anything else.
pub fn parse_ledger_file_name(name: &str) -> Option<(KioskId, NaiveDate)> {
    let stem = name.strip_prefix("transactions_")?.strip_suffix(".csv")?;
    let (kiosk_id, date) = stem.rsplit_once('_')?;
    if date.len() != 6 {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, "%m%d%y").ok()?;
    Some((kiosk_id.to_string(), date))
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
