//! Best-effort push of committed records to a remote mirror.
//!
//! The local store is authoritative. Every successful mutation is pushed
//! to `MIGSAFE_MIRROR_URL` as `POST {base}/tables/{table}` with the record
//! as the JSON body; failures are logged and swallowed so the portal keeps
//! working when the mirror is down.

use serde::Serialize;

/// Handle to the configured mirror endpoint.
#[derive(Clone)]
pub(crate) struct Mirror {
    base_url: String,
}

impl Mirror {
    /// Read `MIGSAFE_MIRROR_URL`; `None` disables mirroring.
    pub(crate) fn from_env() -> Option<Self> {
        let base_url = std::env::var("MIGSAFE_MIRROR_URL").ok()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return None;
        }
        Some(Mirror { base_url })
    }

    /// Fire-and-forget push of a record to a mirror table.
    pub(crate) fn push<T: Serialize>(&self, table: &str, record: &T) {
        let url = format!("{}/tables/{}", self.base_url, table);
        let body = match serde_json::to_value(record) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("mirror: could not serialize record for {}: {}", table, e);
                return;
            }
        };
        // ureq is blocking; keep it off the async worker threads.
        tokio::task::spawn_blocking(move || {
            let agent = ureq::Agent::new_with_defaults();
            if let Err(e) = agent
                .post(&url)
                .header("content-type", "application/json")
                .send_json(&body)
            {
                eprintln!("mirror: push to {} failed: {}", url, e);
            }
        });
    }
}
