//! Open and close managed volumes for writes

use serde_json::{json, Value};
use std::time::Duration;

use crate::client::{object_id, ApiVersion, ObjectKind, Session, Transport, VolumeState};
use crate::common::{Error, Result};
use crate::ops::{NoopReason, Outcome};

/// SLA Domain the snapshot produced by [`end_snapshot`] is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlaChoice {
    /// Keep the SLA currently assigned to the volume
    #[default]
    Current,
    /// Assign the SLA Domain with this name
    Named(String),
}

impl SlaChoice {
    /// `"current"` (any case) selects [`SlaChoice::Current`]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("current") {
            SlaChoice::Current
        } else {
            SlaChoice::Named(name.to_string())
        }
    }
}

/// Writable state and SLA assignment of the volume named `name`
pub async fn volume_state<T: Transport>(
    session: &Session<T>,
    name: &str,
    timeout: Option<Duration>,
) -> Result<VolumeState> {
    let id = object_id(session, name, ObjectKind::ManagedVolume, timeout).await?;
    state_by_id(session, &id, timeout).await
}

async fn state_by_id<T: Transport>(
    session: &Session<T>,
    id: &str,
    timeout: Option<Duration>,
) -> Result<VolumeState> {
    session
        .get_as(ApiVersion::Internal, &format!("/managed_volume/{}", id), timeout)
        .await
}

/// Open a managed volume for writes.
///
/// Every write until [`end_snapshot`] becomes part of the next snapshot.
pub async fn begin_snapshot<T: Transport>(
    session: &Session<T>,
    name: &str,
    timeout: Option<Duration>,
) -> Result<Outcome<Value>> {
    tracing::info!("begin_snapshot: searching for managed volume '{}'", name);
    let id = object_id(session, name, ObjectKind::ManagedVolume, timeout).await?;

    tracing::info!("begin_snapshot: determining the state of '{}'", name);
    let state = state_by_id(session, &id, timeout).await?;

    if state.is_writable {
        tracing::info!("begin_snapshot: '{}' is already writable", name);
        return Ok(Outcome::NoopAlready(NoopReason::AlreadyWritable));
    }

    tracing::info!("begin_snapshot: opening '{}' for writes", name);
    let response = session
        .post(
            ApiVersion::Internal,
            &format!("/managed_volume/{}/begin_snapshot", id),
            &json!({}),
            timeout,
        )
        .await?;

    Ok(Outcome::Applied(response))
}

/// Close a managed volume for writes, producing a snapshot of everything
/// written since [`begin_snapshot`].
///
/// # Errors
///
/// - `InvalidParameter` when `sla` is [`SlaChoice::Current`] and the volume
///   has no SLA Domain assigned.
/// - `NotFound` when the volume or the named SLA Domain does not exist.
pub async fn end_snapshot<T: Transport>(
    session: &Session<T>,
    name: &str,
    sla: &SlaChoice,
    timeout: Option<Duration>,
) -> Result<Outcome<Value>> {
    tracing::info!("end_snapshot: searching for managed volume '{}'", name);
    let id = object_id(session, name, ObjectKind::ManagedVolume, timeout).await?;

    tracing::info!("end_snapshot: determining the state of '{}'", name);
    let state = state_by_id(session, &id, timeout).await?;

    if !state.is_writable {
        tracing::info!("end_snapshot: '{}' is already read only", name);
        return Ok(Outcome::NoopAlready(NoopReason::AlreadyReadOnly));
    }

    let body = match sla {
        SlaChoice::Current => {
            if !state.has_sla() {
                return Err(Error::InvalidParameter(format!(
                    "the managed volume '{}' does not have an SLA Domain assigned; an SLA name is required",
                    name
                )));
            }
            json!({})
        }
        SlaChoice::Named(sla_name) => {
            tracing::info!("end_snapshot: searching for SLA Domain '{}'", sla_name);
            let sla_id = object_id(session, sla_name, ObjectKind::Sla, timeout).await?;
            json!({ "retentionConfig": { "slaId": sla_id } })
        }
    };

    tracing::info!("end_snapshot: closing '{}' for writes", name);
    let response = session
        .post(
            ApiVersion::Internal,
            &format!("/managed_volume/{}/end_snapshot", id),
            &body,
            timeout,
        )
        .await?;

    Ok(Outcome::Applied(response))
}
