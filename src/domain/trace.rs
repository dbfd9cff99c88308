//! Trace records consumed by the profile dashboard's trace viewer.
//!
//! Field numbers match the plugin's `trace_events.proto`, so the bytes produced
//! by [`prost::Message::encode_to_vec`] are what the dashboard decodes.

use std::collections::BTreeMap;

/// A complete timeline: devices with their resources, plus the events on them
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Trace {
    /// Devices keyed by device id
    #[prost(btree_map = "uint32, message", tag = "1")]
    pub devices: BTreeMap<u32, Device>,

    #[prost(message, repeated, tag = "4")]
    pub trace_events: Vec<TraceEvent>,
}

/// A device (e.g. an accelerator) shown as one group of rows
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Device {
    #[prost(string, tag = "1")]
    pub name: String,

    #[prost(uint32, tag = "2")]
    pub device_id: u32,

    /// Resources (rows) keyed by resource id
    #[prost(btree_map = "uint32, message", tag = "3")]
    pub resources: BTreeMap<u32, Resource>,
}

/// A single timeline row on a device
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Resource {
    #[prost(string, tag = "1")]
    pub name: String,

    #[prost(uint32, tag = "2")]
    pub resource_id: u32,
}

/// One span on a resource row, in picoseconds
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TraceEvent {
    #[prost(uint32, tag = "1")]
    pub device_id: u32,

    #[prost(uint32, tag = "2")]
    pub resource_id: u32,

    #[prost(string, tag = "3")]
    pub name: String,

    #[prost(uint64, tag = "9")]
    pub timestamp_ps: u64,

    #[prost(uint64, tag = "10")]
    pub duration_ps: u64,

    #[prost(btree_map = "string, string", tag = "11")]
    pub args: BTreeMap<String, String>,
}
