use migsafe_registry::stats;
use migsafe_storage::JsonStorage;

use crate::OutputFormat;

use super::{fail, print_json};

pub(crate) fn cmd_stats(
    rt: &tokio::runtime::Runtime,
    storage: &JsonStorage,
    output: OutputFormat,
) {
    let stats = match rt.block_on(stats::dashboard_stats(storage)) {
        Ok(s) => s,
        Err(e) => fail(&e.to_string(), output),
    };
    match output {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Text => {
            println!("Total workers:     {}", stats.total_workers);
            println!("  pending:         {}", stats.pending_workers);
            println!("  approved:        {}", stats.approved_workers);
            println!("  rejected:        {}", stats.rejected_workers);
            println!("Risk flagged:      {}", stats.risk_flagged);
            println!("Open complaints:   {}", stats.open_complaints);
            println!("Pending renewals:  {}", stats.pending_renewals);
            println!("Expiring soon:     {}", stats.expiring_soon);
        }
    }
}
