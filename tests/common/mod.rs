//! In-memory appliance used by the integration tests

#![allow(dead_code)]

use mvctl::client::{ApiVersion, Transport};
use mvctl::{Error, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const MV_ID: &str = "ManagedVolume:::0a1b";
pub const SLA_ID: &str = "sla-gold-0001";

enum Reply {
    Body(Value),
    Status(u16, String),
}

/// Canned GET replies keyed by (api, path); POSTs are recorded and
/// acknowledged with a queued async request.
pub struct FakeAppliance {
    routes: HashMap<(ApiVersion, String), Reply>,
    gets: Mutex<Vec<String>>,
    posts: Mutex<Vec<(String, Value)>>,
}

impl FakeAppliance {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            gets: Mutex::new(Vec::new()),
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn on_get(mut self, api: ApiVersion, path: &str, body: Value) -> Self {
        self.routes.insert((api, path.to_string()), Reply::Body(body));
        self
    }

    pub fn on_get_status(mut self, api: ApiVersion, path: &str, status: u16, message: &str) -> Self {
        self.routes
            .insert((api, path.to_string()), Reply::Status(status, message.to_string()));
        self
    }

    /// Register `mv01` with the given state
    pub fn with_volume(self, writable: bool, sla_assignment: &str, sla_id: &str) -> Self {
        self.on_get(
            ApiVersion::Internal,
            "/managed_volume?name=mv01",
            json!({ "hasMore": false, "data": [
                { "id": MV_ID, "name": "mv01" },
                { "id": "ManagedVolume:::ffff", "name": "mv01-old" }
            ]}),
        )
        .on_get(
            ApiVersion::Internal,
            &format!("/managed_volume/{}", MV_ID),
            json!({
                "id": MV_ID,
                "name": "mv01",
                "isWritable": writable,
                "slaAssignment": sla_assignment,
                "effectiveSlaDomainId": sla_id
            }),
        )
    }

    pub fn with_gold_sla(self) -> Self {
        self.on_get(
            ApiVersion::V1,
            "/sla_domain?name=Gold",
            json!({ "data": [
                { "id": SLA_ID, "name": "Gold" },
                { "id": "sla-gold-old", "name": "Gold Legacy" }
            ]}),
        )
    }

    pub fn with_snapshots(self, snapshots: Value) -> Self {
        self.on_get(
            ApiVersion::Internal,
            &format!("/managed_volume/{}/snapshot", MV_ID),
            json!({ "hasMore": false, "data": snapshots }),
        )
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }
}

impl Transport for FakeAppliance {
    async fn get(&self, api: ApiVersion, path: &str, _timeout: Duration) -> Result<Value> {
        self.gets.lock().unwrap().push(path.to_string());
        match self.routes.get(&(api, path.to_string())) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Status(status, message)) => Err(Error::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Err(Error::Api {
                status: 404,
                message: format!("no route for /api/{}{}", api, path),
            }),
        }
    }

    async fn post(
        &self,
        _api: ApiVersion,
        path: &str,
        body: &Value,
        _timeout: Duration,
    ) -> Result<Value> {
        self.posts
            .lock()
            .unwrap()
            .push((path.to_string(), body.clone()));
        Ok(json!({ "id": "MANAGED_VOLUME_REQUEST_01", "status": "QUEUED" }))
    }
}
