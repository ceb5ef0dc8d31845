//! Registration-number and record-id generation.
//!
//! The externally visible registration number keeps the product-mandated
//! display format `MIG<millisecond timestamp><3-digit zero-padded suffix>`.
//! The timestamp-plus-small-random draw is not collision resistant on its
//! own, so assignment always goes through [`unique_id`], which re-draws
//! until the candidate is absent from the collection it is being assigned
//! into. The check runs inside the assignment snapshot, so a committed
//! number is unique.

use rand::Rng;
use time::OffsetDateTime;

/// Prefix of every registration number.
pub const REGISTRATION_PREFIX: &str = "MIG";

fn candidate(prefix: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("{}{}{:03}", prefix, millis, suffix)
}

/// Generate an id with the given prefix, re-drawing while `is_taken`
/// reports a collision.
pub fn unique_id(prefix: &str, is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = candidate(prefix);
        if !is_taken(&id) {
            return id;
        }
    }
}

/// Assign a registration number unique under `is_taken`.
pub fn unique_registration_number(is_taken: impl Fn(&str) -> bool) -> String {
    unique_id(REGISTRATION_PREFIX, is_taken)
}

/// Whether a string looks like a registration number:
/// `MIG` followed by at least a millisecond timestamp and 3-digit suffix.
pub fn is_registration_number(value: &str) -> bool {
    match value.strip_prefix(REGISTRATION_PREFIX) {
        Some(digits) => digits.len() >= 4 && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn candidates_match_the_display_format() {
        let number = candidate(REGISTRATION_PREFIX);
        assert!(is_registration_number(&number), "{}", number);
        // MIG + 13-digit millis (current era) + 3-digit suffix
        assert!(number.len() >= "MIG".len() + 13 + 3, "{}", number);
    }

    #[test]
    fn redraws_on_collision() {
        let first_draw = Cell::new(true);
        let number = unique_registration_number(|_| first_draw.replace(false));
        assert!(is_registration_number(&number));
        assert!(!first_draw.get(), "collision check was never consulted");
    }

    #[test]
    fn rejects_non_registration_numbers() {
        assert!(!is_registration_number("REG1234567890123"));
        assert!(!is_registration_number("MIG"));
        assert!(!is_registration_number("MIG12ab34"));
        assert!(!is_registration_number(""));
    }
}
