use std::collections::BTreeMap;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One audited request, as persisted.
///
/// `payload` is the request body after redaction, or `None` when the body
/// was empty or not JSON. `actor` is the verified caller identity, or `None`
/// when the request carried no usable token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub endpoint: String,
    pub ip: String,
    pub query_params: BTreeMap<String, String>,
    pub path_params: BTreeMap<String, String>,
    pub payload: Option<serde_json::Value>,
    pub actor: Option<String>,
}

/// Drop sub-second precision; audit timestamps are stored at whole seconds.
pub fn at_second_precision(t: DateTime<Utc>) -> DateTime<Utc> {
    t.with_nanosecond(0).unwrap_or(t)
}
