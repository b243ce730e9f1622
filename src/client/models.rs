//! Wire types returned by the managed-volume endpoints

use serde::{Deserialize, Serialize};

/// Paged listing envelope: `{ "hasMore": false, "data": [...], "total": n }`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

/// Any inventory object carrying a name and an id
#[derive(Debug, Clone, Deserialize)]
pub struct NamedObject {
    pub id: String,
    pub name: String,
}

/// Writable state and SLA assignment of a managed volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeState {
    pub is_writable: bool,
    #[serde(default)]
    pub sla_assignment: String,
    #[serde(default)]
    pub effective_sla_domain_id: String,
}

impl VolumeState {
    /// Does the volume carry an SLA Domain its snapshots can default to?
    pub fn has_sla(&self) -> bool {
        self.sla_assignment != "Unassigned" && self.effective_sla_domain_id != "UNPROTECTED"
    }
}

/// A network endpoint of a managed volume's main export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub ip_address: String,
    pub mount_point: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainExport {
    #[serde(default)]
    pub channels: Vec<Channel>,
}

/// Entry of the managed-volume listing, reduced to what we read from it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub main_export: Option<MainExport>,
}

/// Live export of a managed-volume snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotExport {
    pub id: String,
    pub snapshot_id: String,
    #[serde(default)]
    pub channels: Vec<Channel>,
}
