//! Messages and helpers shared by every service contract

use chrono::{DateTime, TimeZone, Utc};
use prost_types::Timestamp;

/// Offset/limit window over a public listing
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct PageRequest {
    #[prost(int64, tag = "1")]
    pub offset: i64,
    #[prost(int64, tag = "2")]
    pub limit: i64,
}

pub fn to_timestamp(at: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: at.timestamp(),
        nanos: at.timestamp_subsec_nanos() as i32,
    }
}

pub fn from_timestamp(ts: &Timestamp) -> Option<DateTime<Utc>> {
    let nanos = u32::try_from(ts.nanos).ok()?;
    Utc.timestamp_opt(ts.seconds, nanos).single()
}
