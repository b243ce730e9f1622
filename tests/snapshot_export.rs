//! Snapshot lookup, channels and exports against a fake appliance

mod common;

use chrono::NaiveDateTime;
use common::{FakeAppliance, MV_ID, SLA_ID};
use mvctl::client::ApiVersion;
use mvctl::ops::{self, ExportOptions, ExportOutcome, ShareType};
use mvctl::{Error, Resolution, Session, TimeQuery};
use serde_json::json;

fn appliance() -> FakeAppliance {
    FakeAppliance::new()
        .with_volume(false, "Direct", SLA_ID)
        .with_snapshots(json!([
            { "id": "snap-1000", "date": "2024-03-01T10:00:00.000Z", "cloudState": 0 },
            { "id": "snap-1005", "date": "2024-03-01T10:05:00.000Z", "cloudState": 0 },
            { "id": "snap-1010", "date": "2024-03-01T10:10:00.000Z", "cloudState": 1 }
        ]))
}

fn at(s: &str) -> TimeQuery {
    TimeQuery::at(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap())
}

#[tokio::test]
async fn test_get_latest_snapshot() {
    let session = Session::new(appliance());

    let found = ops::get_snapshot(&session, "mv01", &TimeQuery::Latest, None)
        .await
        .unwrap();
    assert_eq!(found, Resolution::Found("snap-1010".into()));
}

#[tokio::test]
async fn test_get_snapshot_nearest_after() {
    let session = Session::new(appliance());

    let query = TimeQuery::parse("03-01-2024", "10:03").unwrap();
    let found = ops::get_snapshot(&session, "mv01", &query, None).await.unwrap();
    assert_eq!(found.id(), Some("snap-1005"));

    let found = ops::get_snapshot(&session, "mv01", &at("2024-03-01 10:00"), None)
        .await
        .unwrap();
    assert_eq!(found.id(), Some("snap-1000"));
}

#[tokio::test]
async fn test_get_snapshot_past_last() {
    let session = Session::new(appliance());

    let found = ops::get_snapshot(&session, "mv01", &at("2024-03-01 11:00"), None)
        .await
        .unwrap();
    assert_eq!(found, Resolution::NotFound);
}

#[tokio::test]
async fn test_get_snapshot_without_snapshots() {
    let session = Session::new(
        FakeAppliance::new()
            .with_volume(false, "Direct", SLA_ID)
            .with_snapshots(json!([])),
    );

    for query in [TimeQuery::Latest, at("2024-03-01 09:00")] {
        let found = ops::get_snapshot(&session, "mv01", &query, None).await.unwrap();
        assert_eq!(found, Resolution::NotFound);
    }
}

#[tokio::test]
async fn test_list_snapshots_keeps_cloud_flag() {
    let session = Session::new(appliance());

    let snapshots = ops::list_snapshots(&session, MV_ID, None).await.unwrap();
    assert_eq!(snapshots.len(), 3);
    assert!(!snapshots[0].cloud_resident);
    assert!(snapshots[2].cloud_resident);
}

#[tokio::test]
async fn test_channels() {
    let session = Session::new(FakeAppliance::new().on_get(
        ApiVersion::Internal,
        "/managed_volume?name=mv01",
        json!({ "data": [{
            "id": MV_ID,
            "name": "mv01",
            "mainExport": { "channels": [
                { "ipAddress": "10.0.0.21", "mountPoint": "/mnt/managedvolume/mv01_channel0" },
                { "ipAddress": "10.0.0.22", "mountPoint": "/mnt/managedvolume/mv01_channel1" }
            ]}
        }]}),
    ));

    let channels = ops::channels(&session, "mv01", None).await.unwrap();
    assert_eq!(channels.len(), 2);
    assert_eq!(channels[1].ip_address, "10.0.0.22");
    assert_eq!(channels[0].mount_point, "/mnt/managedvolume/mv01_channel0");
}

#[tokio::test]
async fn test_channels_uses_exact_name_entry() {
    let session = Session::new(FakeAppliance::new().on_get(
        ApiVersion::Internal,
        "/managed_volume?name=mv01",
        json!({ "data": [
            { "id": "mv-old", "name": "mv01-old", "mainExport": { "channels": [
                { "ipAddress": "10.0.0.99", "mountPoint": "/mnt/managedvolume/mv01-old_channel0" }
            ]}},
            { "id": MV_ID, "name": "mv01", "mainExport": { "channels": [
                { "ipAddress": "10.0.0.21", "mountPoint": "/mnt/managedvolume/mv01_channel0" }
            ]}}
        ]}),
    ));

    let channels = ops::channels(&session, "mv01", None).await.unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].ip_address, "10.0.0.21");
}

#[tokio::test]
async fn test_channels_not_found() {
    let session = Session::new(
        FakeAppliance::new()
            .on_get(
                ApiVersion::Internal,
                "/managed_volume?name=nope",
                json!({ "data": [] }),
            )
            .on_get(
                ApiVersion::Internal,
                "/managed_volume?name=bare",
                json!({ "data": [{ "id": "mv-bare", "name": "bare" }] }),
            ),
    );

    for name in ["nope", "bare"] {
        let err = ops::channels(&session, name, None).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)), "{}: {:?}", name, err);
    }
}

#[tokio::test]
async fn test_export_snapshot_defaults() {
    let session = Session::new(FakeAppliance::new().on_get(
        ApiVersion::Internal,
        "/managed_volume/snapshot/snap-1005",
        json!({ "id": "snap-1005", "cloudState": 0 }),
    ));

    let outcome = ops::export_snapshot(&session, "snap-1005", &ExportOptions::default(), None)
        .await
        .unwrap();
    assert!(matches!(outcome, ExportOutcome::Exported(_)));

    let posts = session.transport().posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "/managed_volume/snapshot/snap-1005/export");
    assert_eq!(posts[0].1, json!({ "hostPatterns": ["*"], "shareType": "NFS" }));
}

#[tokio::test]
async fn test_export_cloud_snapshot() {
    let session = Session::new(FakeAppliance::new().on_get(
        ApiVersion::Internal,
        "/managed_volume/snapshot/snap-1010",
        json!({ "id": "snap-1010", "cloudState": 1 }),
    ));

    let denied = ExportOptions {
        allow_cloud: false,
        ..Default::default()
    };
    let outcome = ops::export_snapshot(&session, "snap-1010", &denied, None)
        .await
        .unwrap();
    assert_eq!(outcome, ExportOutcome::CloudExportDisallowed);
    assert!(session.transport().posts().is_empty());

    let smb = ExportOptions {
        host_patterns: vec!["10.0.0.0/24".into()],
        share_type: ShareType::Smb,
        allow_cloud: true,
    };
    let outcome = ops::export_snapshot(&session, "snap-1010", &smb, None)
        .await
        .unwrap();
    assert!(matches!(outcome, ExportOutcome::Exported(_)));
    assert_eq!(
        session.transport().posts()[0].1,
        json!({ "hostPatterns": ["10.0.0.0/24"], "shareType": "SMB" })
    );
}

#[tokio::test]
async fn test_export_unknown_snapshot() {
    let session = Session::new(
        FakeAppliance::new()
            .on_get_status(
                ApiVersion::Internal,
                "/managed_volume/snapshot/gone",
                404,
                "Could not find snapshot with ID gone",
            )
            .on_get(
                ApiVersion::Internal,
                "/managed_volume/snapshot/odd",
                json!({ "message": "Could not find snapshot with ID odd" }),
            ),
    );

    for id in ["gone", "odd"] {
        let outcome = ops::export_snapshot(&session, id, &ExportOptions::default(), None)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ExportOutcome::SnapshotNotFound(format!("Could not find snapshot with ID {}", id))
        );
    }
    assert!(session.transport().posts().is_empty());
}

#[tokio::test]
async fn test_export_requires_host_pattern() {
    let session = Session::new(FakeAppliance::new());

    let options = ExportOptions {
        host_patterns: vec![],
        ..Default::default()
    };
    let err = ops::export_snapshot(&session, "snap-1005", &options, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
    assert!(session.transport().gets().is_empty());
}

#[tokio::test]
async fn test_snapshot_exports_filtered() {
    let session = Session::new(FakeAppliance::new().on_get(
        ApiVersion::Internal,
        "/managed_volume/snapshot/export",
        json!({ "data": [
            { "id": "exp-1", "snapshotId": "snap-1005", "channels": [
                { "ipAddress": "10.0.0.31", "mountPoint": "/mnt/export/exp-1" }
            ]},
            { "id": "exp-2", "snapshotId": "snap-1000" }
        ]}),
    ));

    let exports = ops::snapshot_exports(&session, "snap-1005", None).await.unwrap();
    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].id, "exp-1");
    assert_eq!(exports[0].channels[0].ip_address, "10.0.0.31");

    let none = ops::snapshot_exports(&session, "snap-9999", None).await.unwrap();
    assert!(none.is_empty());
}
