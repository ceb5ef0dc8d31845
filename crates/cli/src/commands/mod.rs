pub(crate) mod list;
pub(crate) mod register;
pub(crate) mod review;
pub(crate) mod stats;

use std::process;

use crate::{report_error, OutputFormat};

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("error: could not serialize output: {}", e);
            process::exit(1);
        }
    }
}

/// Report a command failure and exit with status 1.
pub(crate) fn fail(message: &str, output: OutputFormat) -> ! {
    report_error(message, output);
    process::exit(1);
}
