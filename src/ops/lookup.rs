//! Read-only lookups: channels and snapshots of a managed volume

use std::time::Duration;

use crate::client::models::{Listing, VolumeSummary};
use crate::client::{object_id, ApiVersion, Channel, ObjectKind, Session, Transport};
use crate::common::{encode_query_value, Error, Result};
use crate::resolver::{resolve, Resolution, SnapshotRecord, TimeQuery};

/// Network channels (IP + mount point) of the volume's main export.
///
/// Fails with `NotFound` when no volume of that name exists or it has no
/// main export.
pub async fn channels<T: Transport>(
    session: &Session<T>,
    name: &str,
    timeout: Option<Duration>,
) -> Result<Vec<Channel>> {
    tracing::info!("channels: fetching export details for '{}'", name);
    let path = format!("/managed_volume?name={}", encode_query_value(name));
    let listing: Listing<VolumeSummary> = session
        .get_as(ApiVersion::Internal, &path, timeout)
        .await?;

    listing
        .data
        .into_iter()
        .find(|v| v.name == name)
        .and_then(|v| v.main_export)
        .map(|export| export.channels)
        .ok_or_else(|| Error::NotFound(format!("managed volume '{}' has no export", name)))
}

/// All snapshots of the volume with id `volume_id`, in appliance order
pub async fn list_snapshots<T: Transport>(
    session: &Session<T>,
    volume_id: &str,
    timeout: Option<Duration>,
) -> Result<Vec<SnapshotRecord>> {
    let listing: Listing<SnapshotRecord> = session
        .get_as(
            ApiVersion::Internal,
            &format!("/managed_volume/{}/snapshot", volume_id),
            timeout,
        )
        .await?;
    Ok(listing.data)
}

/// Find the snapshot of volume `name` that satisfies `query`.
///
/// See [`resolve`] for the selection rule.
pub async fn get_snapshot<T: Transport>(
    session: &Session<T>,
    name: &str,
    query: &TimeQuery,
    timeout: Option<Duration>,
) -> Result<Resolution> {
    tracing::info!("get_snapshot: searching for managed volume '{}'", name);
    let id = object_id(session, name, ObjectKind::ManagedVolume, timeout).await?;

    tracing::info!("get_snapshot: listing snapshots of '{}'", name);
    let snapshots = list_snapshots(session, &id, timeout).await?;

    tracing::info!(
        "get_snapshot: resolving {} among {} snapshots",
        query,
        snapshots.len()
    );
    let resolution = resolve(query, &snapshots);
    if resolution == Resolution::NotFound {
        tracing::warn!("get_snapshot: no snapshot of '{}' matches {}", name, query);
    }

    Ok(resolution)
}
