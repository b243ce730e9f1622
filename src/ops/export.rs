//! Export managed-volume snapshots as network shares

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::client::models::Listing;
use crate::client::{ApiVersion, Session, SnapshotExport, Transport};
use crate::common::{Error, Result};

/// File-sharing protocol of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShareType {
    #[default]
    Nfs,
    Smb,
}

impl std::str::FromStr for ShareType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "NFS" => Ok(ShareType::Nfs),
            "SMB" => Ok(ShareType::Smb),
            other => Err(Error::InvalidParameter(format!(
                "unknown share type '{}', expected NFS or SMB",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Hosts or IPs allowed to mount the share
    pub host_patterns: Vec<String>,
    pub share_type: ShareType,
    /// Allow exporting a snapshot whose data lives only in the cloud tier
    pub allow_cloud: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            host_patterns: vec!["*".to_string()],
            share_type: ShareType::Nfs,
            allow_cloud: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ExportOutcome {
    Exported(Value),
    SnapshotNotFound(String),
    CloudExportDisallowed,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRequest<'a> {
    host_patterns: &'a [String],
    share_type: ShareType,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotInfo {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    cloud_state: i64,
}

/// Export snapshot `snapshot_id` over the network.
///
/// A snapshot the appliance does not know and a cloud-resident snapshot with
/// `allow_cloud == false` are reported through [`ExportOutcome`], not as
/// errors.
pub async fn export_snapshot<T: Transport>(
    session: &Session<T>,
    snapshot_id: &str,
    options: &ExportOptions,
    timeout: Option<Duration>,
) -> Result<ExportOutcome> {
    if options.host_patterns.is_empty() {
        return Err(Error::InvalidParameter(
            "at least one host pattern is required".into(),
        ));
    }

    tracing::info!("export_snapshot: searching for snapshot '{}'", snapshot_id);
    let info = match session
        .get(
            ApiVersion::Internal,
            &format!("/managed_volume/snapshot/{}", snapshot_id),
            timeout,
        )
        .await
    {
        Ok(value) => serde_json::from_value::<SnapshotInfo>(value)?,
        Err(Error::Api {
            status: 404,
            message,
        }) => return Ok(ExportOutcome::SnapshotNotFound(message)),
        Err(e) => return Err(e),
    };

    if let Some(message) = info.message {
        return Ok(ExportOutcome::SnapshotNotFound(message));
    }
    if info.cloud_state == 1 && !options.allow_cloud {
        tracing::warn!(
            "export_snapshot: snapshot '{}' is in the cloud and cloud exports are disallowed",
            snapshot_id
        );
        return Ok(ExportOutcome::CloudExportDisallowed);
    }

    let body = serde_json::to_value(ExportRequest {
        host_patterns: &options.host_patterns,
        share_type: options.share_type,
    })?;

    tracing::info!(
        "export_snapshot: exporting '{}' over {:?}",
        snapshot_id,
        options.share_type
    );
    let response = session
        .post(
            ApiVersion::Internal,
            &format!("/managed_volume/snapshot/{}/export", snapshot_id),
            &body,
            timeout,
        )
        .await?;

    Ok(ExportOutcome::Exported(response))
}

/// Live exports of snapshot `snapshot_id`
pub async fn snapshot_exports<T: Transport>(
    session: &Session<T>,
    snapshot_id: &str,
    timeout: Option<Duration>,
) -> Result<Vec<SnapshotExport>> {
    tracing::info!("snapshot_exports: checking exports of snapshot '{}'", snapshot_id);
    let listing: Listing<SnapshotExport> = session
        .get_as(ApiVersion::Internal, "/managed_volume/snapshot/export", timeout)
        .await?;

    Ok(listing
        .data
        .into_iter()
        .filter(|e| e.snapshot_id == snapshot_id)
        .collect())
}
