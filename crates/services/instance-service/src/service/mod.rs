//! Service layer - dual-write orchestration over both stores.

mod instance_info_service;

pub use instance_info_service::{InstanceInfoManager, InstanceInfoService};
