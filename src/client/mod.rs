//! Appliance client: transport, session and inventory lookups

pub mod inventory;
pub mod models;
pub mod session;
pub mod transport;

pub use inventory::{object_id, ObjectKind};
pub use models::{Channel, SnapshotExport, VolumeState};
pub use session::{Session, DEFAULT_TIMEOUT};
pub use transport::{ApiVersion, HttpTransport, Transport};
