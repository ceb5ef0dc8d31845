use migsafe_registry::{dates, query};
use migsafe_storage::{
    ComplaintRecord, ComplaintStatus, JsonStorage, RegistryStorage, RenewalRecord, RenewalStatus,
    WorkerRecord, WorkerStatus,
};

use crate::{Collection, OutputFormat};

use super::{fail, print_json};

/// Parse a `--status` value; `all` (or omission) means no filter.
fn parse_filter<T: std::str::FromStr<Err = String>>(
    raw: Option<&str>,
    output: OutputFormat,
) -> Option<T> {
    match raw {
        None | Some("all") => None,
        Some(s) => match s.parse::<T>() {
            Ok(status) => Some(status),
            Err(e) => fail(&e, output),
        },
    }
}

fn print_worker_line(worker: &WorkerRecord) {
    let number = worker.registration_number.as_deref().unwrap_or("-");
    let flag = if worker.has_risk_flag { " [risk]" } else { "" };
    println!(
        "{}  {}  {}  {}  {}{}",
        worker.id, number, worker.status, worker.full_name, worker.job_type, flag
    );
}

pub(crate) fn cmd_list(
    rt: &tokio::runtime::Runtime,
    storage: &JsonStorage,
    collection: Collection,
    status: Option<&str>,
    output: OutputFormat,
) {
    match collection {
        Collection::Workers => {
            let filter: Option<WorkerStatus> = parse_filter(status, output);
            let workers = match rt.block_on(storage.list_workers()) {
                Ok(w) => query::workers_by_status(w, filter),
                Err(e) => fail(&e.to_string(), output),
            };
            match output {
                OutputFormat::Json => print_json(&workers),
                OutputFormat::Text => {
                    for worker in &workers {
                        print_worker_line(worker);
                    }
                    println!("{} worker(s)", workers.len());
                }
            }
        }
        Collection::Complaints => {
            let filter: Option<ComplaintStatus> = parse_filter(status, output);
            let complaints = match rt.block_on(storage.list_complaints()) {
                Ok(c) => query::complaints_by_status(c, filter),
                Err(e) => fail(&e.to_string(), output),
            };
            match output {
                OutputFormat::Json => print_json(&complaints),
                OutputFormat::Text => {
                    for complaint in &complaints {
                        print_complaint_line(complaint);
                    }
                    println!("{} complaint(s)", complaints.len());
                }
            }
        }
        Collection::Renewals => {
            let filter: Option<RenewalStatus> = parse_filter(status, output);
            let renewals = match rt.block_on(storage.list_renewals()) {
                Ok(r) => query::renewals_by_status(r, filter),
                Err(e) => fail(&e.to_string(), output),
            };
            match output {
                OutputFormat::Json => print_json(&renewals),
                OutputFormat::Text => {
                    for renewal in &renewals {
                        print_renewal_line(renewal);
                    }
                    println!("{} renewal(s)", renewals.len());
                }
            }
        }
    }
}

fn print_complaint_line(complaint: &ComplaintRecord) {
    println!(
        "{}  {}  {}  {}",
        complaint.id,
        complaint.status,
        complaint.complaint_type.label(),
        complaint.complainant_name
    );
}

fn print_renewal_line(renewal: &RenewalRecord) {
    let number = renewal.registration_number.as_deref().unwrap_or("-");
    println!(
        "{}  {}  {}  {}",
        renewal.id, renewal.status, renewal.channel, number
    );
}

pub(crate) fn cmd_expiring(
    rt: &tokio::runtime::Runtime,
    storage: &JsonStorage,
    days: i64,
    output: OutputFormat,
) {
    let workers = match rt.block_on(storage.list_workers()) {
        Ok(w) => query::expiring_within(w, days, dates::today_utc()),
        Err(e) => fail(&e.to_string(), output),
    };
    match output {
        OutputFormat::Json => print_json(&workers),
        OutputFormat::Text => {
            for worker in &workers {
                let until = worker.stay_valid_until.as_deref().unwrap_or("-");
                println!(
                    "{}  {}  {}  expires {}",
                    worker.id,
                    worker.registration_number.as_deref().unwrap_or("-"),
                    worker.full_name,
                    until
                );
            }
            println!("{} worker(s) expiring within {} days", workers.len(), days);
        }
    }
}
