//! # mvctl
//!
//! Client for the managed-volume endpoints of a storage appliance REST API:
//! - Open and close managed volumes for writes (begin/end snapshot)
//! - Resolve the snapshot covering a point in time
//! - Export snapshots as NFS/SMB shares and list their channels
//!
//! ## Usage
//!
//! ```no_run
//! use mvctl::{ops, ClientConfig, Session, TimeQuery};
//!
//! # async fn run() -> mvctl::Result<()> {
//! let config = ClientConfig::load(None)?;
//! let session = Session::connect(&config)?;
//!
//! ops::begin_snapshot(&session, "oracle-mv", None).await?;
//! // ... application writes to the volume's channels ...
//! ops::end_snapshot(&session, "oracle-mv", &ops::SlaChoice::Current, None).await?;
//!
//! let query = TimeQuery::parse("03-01-2024", "10:03")?;
//! let found = ops::get_snapshot(&session, "oracle-mv", &query, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### CLI
//! ```bash
//! mvctl --node 10.0.0.5 begin oracle-mv
//! mvctl end oracle-mv --sla Gold
//! mvctl snapshot oracle-mv --date 03-01-2024 --time 10:03
//! mvctl export <snapshot-id> --host-pattern 10.0.0.0/24
//! ```

pub mod client;
pub mod common;
pub mod ops;
pub mod resolver;

// Re-export commonly used types
pub use client::{HttpTransport, Session, Transport};
pub use common::{ClientConfig, Error, Result};
pub use ops::{NoopReason, Outcome};
pub use resolver::{resolve, Resolution, SnapshotRecord, TimeQuery};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
