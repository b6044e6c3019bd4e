//! CSV encoding of registries and daily ledgers.
//!
//! Every file starts with its header row, even when it has no body.
//! Writers take any `io::Write`; the store decides where bytes land.

use crate::{
    registry::{Kiosk, User},
    transaction::Transaction,
};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Read, Write};

pub const USER_PIN_HEADER: [&str; 2] = ["User_ID", "PIN"];
pub const METADATA_HEADER: [&str; 2] = ["Kiosk_ID", "Num_Clients"];
pub const TRANSACTION_HEADER: [&str; 6] = [
    "Timestamp",
    "Client_Name",
    "User_ID",
    "PIN",
    "Volume_ML",
    "Response",
];

#[derive(Debug, Serialize, Deserialize)]
struct UserRow {
    #[serde(rename = "User_ID")]
    user_id: String,
    #[serde(rename = "PIN")]
    pin: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct MetadataRow {
    #[serde(rename = "Kiosk_ID")]
    kiosk_id: String,
    #[serde(rename = "Num_Clients")]
    num_clients: u32,
}

fn writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().has_headers(false).from_writer(out)
}

fn write_rows<W, T, I>(out: W, header: &[&str], rows: I) -> csv::Result<()>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut w = writer(out);
    w.write_record(header)?;
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

pub struct LedgerWriter;

impl LedgerWriter {
    /// `User_ID,PIN`, rows in the order given (the registry keeps them sorted).
    pub fn write_users<W: Write>(out: W, users: &[User]) -> csv::Result<()> {
        write_rows(
            out,
            &USER_PIN_HEADER,
            users.iter().map(|u| UserRow {
                user_id: u.user_id.clone(),
                pin: u.pin.clone(),
            }),
        )
    }

    /// `Kiosk_ID,Num_Clients`, exactly one row.
    pub fn write_metadata<W: Write>(out: W, kiosk: &Kiosk) -> csv::Result<()> {
        write_rows(
            out,
            &METADATA_HEADER,
            [MetadataRow {
                kiosk_id: kiosk.kiosk_id.clone(),
                num_clients: kiosk.num_clients,
            }],
        )
    }

    /// One kiosk-day. Header only when `transactions` is empty.
    pub fn write_transactions<W: Write>(out: W, transactions: &[Transaction]) -> csv::Result<()> {
        write_rows(out, &TRANSACTION_HEADER, transactions)
    }
}

pub struct LedgerReader;

impl LedgerReader {
    /// Users in file order. Duplicate IDs are rejected.
    pub fn read_users<R: Read>(input: R) -> anyhow::Result<Vec<User>> {
        let mut reader = csv::Reader::from_reader(input);
        let mut seen = HashSet::new();
        let mut users = Vec::new();
        for (i, row) in reader.deserialize::<UserRow>().enumerate() {
            let row = row.with_context(|| format!("user row {}", i + 1))?;
            if !seen.insert(row.user_id.clone()) {
                bail!("duplicate User_ID {} at row {}", row.user_id, i + 1);
            }
            users.push(User {
                user_id: row.user_id,
                pin: row.pin,
            });
        }
        Ok(users)
    }

    pub fn read_metadata<R: Read>(input: R) -> anyhow::Result<Kiosk> {
        let mut reader = csv::Reader::from_reader(input);
        let rows = reader
            .deserialize::<MetadataRow>()
            .collect::<Result<Vec<_>, _>>()
            .context("metadata row")?;
        let [row] = <[MetadataRow; 1]>::try_from(rows)
            .map_err(|rows| anyhow::anyhow!("expected exactly one row, found {}", rows.len()))?;
        if row.num_clients == 0 {
            bail!("Num_Clients must be at least 1");
        }
        Ok(Kiosk {
            kiosk_id: row.kiosk_id,
            num_clients: row.num_clients,
        })
    }

    pub fn read_transactions<R: Read>(input: R) -> anyhow::Result<Vec<Transaction>> {
        let mut reader = csv::Reader::from_reader(input);
        reader
            .deserialize::<Transaction>()
            .enumerate()
            .map(|(i, row)| row.with_context(|| format!("transaction row {}", i + 1)))
            .collect()
    }
}
