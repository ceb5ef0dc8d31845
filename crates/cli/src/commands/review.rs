use migsafe_registry::lifecycle;
use migsafe_storage::{JsonStorage, WorkerRecord};

use crate::OutputFormat;

use super::{fail, print_json};

fn print_worker(worker: &WorkerRecord, action: &str, output: OutputFormat) {
    match output {
        OutputFormat::Json => print_json(worker),
        OutputFormat::Text => {
            println!("{} {} ({})", action, worker.full_name, worker.id);
            println!("Status: {}", worker.status);
            if let Some(number) = &worker.registration_number {
                println!("Registration number: {}", number);
            }
            if worker.has_risk_flag {
                println!(
                    "Risk flag: {}",
                    worker.risk_flag_reason.as_deref().unwrap_or("(no reason)")
                );
            }
        }
    }
}

pub(crate) fn cmd_approve(
    rt: &tokio::runtime::Runtime,
    storage: &JsonStorage,
    id: &str,
    output: OutputFormat,
) {
    match rt.block_on(lifecycle::approve_worker(storage, id)) {
        Ok(worker) => print_worker(&worker, "Approved", output),
        Err(e) => fail(&e.to_string(), output),
    }
}

pub(crate) fn cmd_reject(
    rt: &tokio::runtime::Runtime,
    storage: &JsonStorage,
    id: &str,
    reason: &str,
    output: OutputFormat,
) {
    match rt.block_on(lifecycle::reject_worker(storage, id, reason)) {
        Ok(worker) => print_worker(&worker, "Rejected", output),
        Err(e) => fail(&e.to_string(), output),
    }
}

pub(crate) fn cmd_flag(
    rt: &tokio::runtime::Runtime,
    storage: &JsonStorage,
    id: &str,
    reason: &str,
    output: OutputFormat,
) {
    match rt.block_on(lifecycle::set_risk_flag(storage, id, reason)) {
        Ok(worker) => print_worker(&worker, "Flagged", output),
        Err(e) => fail(&e.to_string(), output),
    }
}

pub(crate) fn cmd_unflag(
    rt: &tokio::runtime::Runtime,
    storage: &JsonStorage,
    id: &str,
    output: OutputFormat,
) {
    match rt.block_on(lifecycle::clear_risk_flag(storage, id)) {
        Ok(worker) => print_worker(&worker, "Cleared flag on", output),
        Err(e) => fail(&e.to_string(), output),
    }
}
