//! kiosk-gen: batch generator for synthetic kiosk registries and ledgers.
//!
//! Usage:
//!   kiosk-gen registry     --out-dir data --seed 12345
//!   kiosk-gen transactions --out-dir data --end-date 2025-11-13
//!   kiosk-gen run          --out-dir data --config kiosks.json --json
//!   kiosk-gen audit        --out-dir data

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use kiosk_core::{
    audit::audit_kiosk,
    config::GeneratorConfig,
    engine::KioskPipeline,
    report::RunReport,
    store::{DirStore, KioskStore},
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args
        .get(1)
        .map(String::as_str)
        .filter(|a| !a.starts_with("--"))
        .unwrap_or("run");
    let out_dir = flag_value(&args, "--out-dir").unwrap_or(".");
    let seed = flag_value(&args, "--seed")
        .map(|s| s.parse::<u64>().with_context(|| format!("bad --seed {s}")))
        .transpose()?;
    let json = args.iter().any(|a| a == "--json");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(raw) = flag_value(&args, "--end-date") {
        config.end_date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("bad --end-date {raw}, expected YYYY-MM-DD"))?;
    }

    let store = DirStore::open(out_dir);
    match command {
        "registry" => {
            let mut pipeline = KioskPipeline::new(config, store, seed)?;
            let registries = pipeline.generate_registry()?;
            println!(
                "Wrote {} kiosk registries to {out_dir} (seed {})",
                registries.len(),
                pipeline.master_seed()
            );
        }
        "transactions" => {
            let mut pipeline = KioskPipeline::new(config, store, seed)?;
            let report = pipeline.simulate_transactions()?;
            print_report(&report, json)?;
        }
        "run" => {
            let mut pipeline = KioskPipeline::new(config, store, seed)?;
            let report = pipeline.run()?;
            print_report(&report, json)?;
        }
        "audit" => run_audit(&store, &config, json)?,
        other => bail!("unknown command {other:?}; expected registry, transactions, run or audit"),
    }
    Ok(())
}

fn run_audit(store: &DirStore, config: &GeneratorConfig, json: bool) -> Result<()> {
    let mut reports = Vec::new();
    for kiosk_id in store.list_kiosks()? {
        match audit_kiosk(store, &kiosk_id, config) {
            Ok(report) => reports.push(report),
            Err(e) if e.is_recoverable() => log::warn!("{e}, skipping kiosk_{kiosk_id}"),
            Err(e) => return Err(e.into()),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("=== AUDIT ===");
        for r in &reports {
            let status = if r.is_clean() { "ok" } else { "VIOLATIONS" };
            println!(
                "  kiosk {} | days {:>3} | txns {:>6} | heavy user-days {:>4} | {status}",
                r.kiosk_id, r.days, r.transactions, r.heavy_user_days
            );
            for v in &r.violations {
                println!("      {v}");
            }
        }
    }

    let dirty = reports.iter().filter(|r| !r.is_clean()).count();
    if dirty > 0 {
        bail!("{dirty} kiosk(s) failed the audit");
    }
    Ok(())
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!("=== RUN SUMMARY ===");
    println!("  master seed:    {}", report.master_seed);
    println!("  kiosks:         {}", report.kiosks.len());
    println!("  skipped:        {}", report.skipped.len());
    println!("  total txns:     {}", report.total_transactions());
    println!();
    for k in &report.kiosks {
        println!(
            "  kiosk {} | users {:>3} (abusive {}) | clients {} | txns {:>5} | {:>8} mL | fail {:>3} | peak {} mL",
            k.kiosk_id,
            k.users,
            k.abusive_users,
            k.num_clients,
            k.transactions,
            k.total_volume_ml,
            k.failures,
            k.peak_user_day_ml
        );
    }
    for s in &report.skipped {
        println!("  skipped kiosk {}: {}", s.kiosk_id, s.reason);
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
