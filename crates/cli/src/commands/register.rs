use clap::Args;

use migsafe_registry::{lifecycle, NewWorker};
use migsafe_storage::JsonStorage;

use crate::OutputFormat;

use super::{fail, print_json};

#[derive(Args)]
pub(crate) struct RegisterArgs {
    /// Worker's full name
    #[arg(long)]
    name: String,

    /// Home state
    #[arg(long)]
    state: String,

    /// Home district
    #[arg(long)]
    district: String,

    /// Job type (e.g. Mason, Electrician)
    #[arg(long)]
    job_type: String,

    /// Mobile number
    #[arg(long)]
    mobile: Option<String>,

    /// Aadhaar number
    #[arg(long)]
    aadhaar: Option<String>,

    /// Current worksite location
    #[arg(long)]
    worksite: Option<String>,

    /// Employer name
    #[arg(long)]
    employer: Option<String>,

    /// Stay validity start date (YYYY-MM-DD)
    #[arg(long)]
    valid_from: Option<String>,

    /// Stay validity end date (YYYY-MM-DD)
    #[arg(long)]
    valid_until: Option<String>,
}

pub(crate) fn cmd_register(
    rt: &tokio::runtime::Runtime,
    storage: &JsonStorage,
    args: RegisterArgs,
    output: OutputFormat,
) {
    let new_worker = NewWorker {
        full_name: args.name,
        state: args.state,
        district: args.district,
        job_type: args.job_type,
        mobile_number: args.mobile,
        aadhaar_number: args.aadhaar,
        worksite_location: args.worksite,
        employer_name: args.employer,
        stay_valid_from: args.valid_from,
        stay_valid_until: args.valid_until,
        ..Default::default()
    };

    match rt.block_on(lifecycle::register_worker(storage, new_worker)) {
        Ok(worker) => match output {
            OutputFormat::Json => print_json(&worker),
            OutputFormat::Text => {
                println!("Registered {} ({})", worker.full_name, worker.id);
                println!("Status: {}", worker.status);
            }
        },
        Err(e) => fail(&e.to_string(), output),
    }
}
