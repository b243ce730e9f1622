//! Name to ID resolution for appliance objects

use std::time::Duration;

use crate::client::models::{Listing, NamedObject};
use crate::client::session::Session;
use crate::client::transport::{ApiVersion, Transport};
use crate::common::{encode_query_value, Error, Result};

/// Kinds of objects that can be looked up by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    ManagedVolume,
    Sla,
}

impl ObjectKind {
    fn endpoint(&self) -> (ApiVersion, &'static str) {
        match self {
            ObjectKind::ManagedVolume => (ApiVersion::Internal, "/managed_volume"),
            ObjectKind::Sla => (ApiVersion::V1, "/sla_domain"),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::ManagedVolume => write!(f, "managed_volume"),
            ObjectKind::Sla => write!(f, "sla"),
        }
    }
}

/// Look up the id of the object of `kind` named exactly `name`.
///
/// The appliance's `name` filter is a substring match, so the listing is
/// narrowed to exact matches here. More than one exact match is an error.
pub async fn object_id<T: Transport>(
    session: &Session<T>,
    name: &str,
    kind: ObjectKind,
    timeout: Option<Duration>,
) -> Result<String> {
    let (api, endpoint) = kind.endpoint();
    let path = format!("{}?name={}", endpoint, encode_query_value(name));

    let listing: Listing<NamedObject> = session.get_as(api, &path, timeout).await?;
    let mut matches = listing.data.into_iter().filter(|o| o.name == name);

    match (matches.next(), matches.next()) {
        (Some(object), None) => {
            tracing::debug!("Resolved {} '{}' to {}", kind, name, object.id);
            Ok(object.id)
        }
        (None, _) => Err(Error::NotFound(format!(
            "the {} object '{}' was not found",
            kind, name
        ))),
        (Some(_), Some(_)) => Err(Error::InvalidParameter(format!(
            "multiple {} objects are named '{}'",
            kind, name
        ))),
    }
}
