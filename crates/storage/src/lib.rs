mod error;
mod json;
mod memory;
mod record;
mod traits;

pub use error::StorageError;
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use record::{
    BiometricRecord, ComplainantType, ComplaintRecord, ComplaintStatus, ComplaintType,
    RenewalChannel, RenewalRecord, RenewalStatus, WorkerRecord, WorkerStatus,
};
pub use traits::RegistryStorage;
