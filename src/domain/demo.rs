//! Built-in demo table: what `profile-demo` publishes.

use super::config::{DemoConfig, DemoConfigBuilder};
use super::error::DomainError;

/// Runs in the order the dashboard lists them
pub const DEMO_RUNS: [&str; 3] = ["foo", "bar", "baz"];

/// Runs that only carry a trace
pub const DEMO_TRACE_ONLY: [&str; 1] = ["foo"];

pub const FOO_TRACE: &str = r#"
devices { key: 2 value {
  name: 'Foo2'
  device_id: 2
  resources { key: 2 value {
    resource_id: 2
    name: 'R2.2'
  } }
} }
devices { key: 1 value {
  name: 'Foo1'
  device_id: 1
  resources { key: 2 value {
    resource_id: 1
    name: 'R1.2'
  } }
} }

trace_events {
  device_id: 1
  resource_id: 2
  name: "E1.2.1"
  timestamp_ps: 100000
  duration_ps: 10000
  args { key: "label" value: "E1.2.1" }
  args { key: "extra" value: "extra info" }
}
trace_events {
  device_id: 2
  resource_id: 2
  name: "E2.2.1"
  timestamp_ps: 105000
}
"#;

pub const BAR_TRACE: &str = r#"
# A single host device with two threads.
devices { key: 1 value {
  name: 'Host'
  device_id: 1
  resources { key: 1 value { resource_id: 1 name: 'main' } }
  resources { key: 2 value { resource_id: 2 name: 'input pipeline' } }
} }

trace_events {
  device_id: 1 resource_id: 1
  name: "Step 0"
  timestamp_ps: 0 duration_ps: 2000000
}
trace_events {
  device_id: 1 resource_id: 2
  name: "Iterator::GetNext"
  timestamp_ps: 250000 duration_ps: 500000
  args { key: "long_name" value: "Iterator::Prefetch::Map" }
}
trace_events {
  device_id: 1 resource_id: 1
  name: "Step 1"
  timestamp_ps: 2000000 duration_ps: 1750000
}
"#;

impl DemoConfig {
    /// The table `profile-demo` publishes, reading fixtures from the default directory
    pub fn demo() -> Result<Self, DomainError> {
        Self::demo_builder().build()
    }

    /// The demo table, left open so the fixture directory can be changed
    pub fn demo_builder() -> DemoConfigBuilder {
        let builder = DemoConfig::builder()
            .runs(DEMO_RUNS)
            .trace("foo", FOO_TRACE)
            .trace("bar", BAR_TRACE);
        DEMO_TRACE_ONLY
            .into_iter()
            .fold(builder, |builder, run| builder.trace_only(run))
    }
}
