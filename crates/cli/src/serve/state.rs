//! Application state shared across request handlers.

use std::time::Duration;

use migsafe_storage::JsonStorage;

use crate::mirror::Mirror;

/// Application state shared across request handlers.
pub(crate) struct AppState {
    /// The portal's record store. All mutations go through its snapshots.
    pub(crate) storage: JsonStorage,
    /// Optional API key for the admin surface. None = no auth required.
    pub(crate) api_key: Option<String>,
    /// Optional key for the kiosk surface (`/esevai/*` routes).
    /// None = kiosk routes fall back to the admin key, if any.
    pub(crate) kiosk_key: Option<String>,
    /// Remote mirror; None = mirroring disabled.
    pub(crate) mirror: Option<Mirror>,
    /// Simulated fingerprint scanner delay for kiosk verification.
    pub(crate) scan_delay: Duration,
}
