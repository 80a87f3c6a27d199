use dyndns_core::tags::InstanceTag;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceDescription {
    pub public_ip_address: Option<String>,
    pub tags: Vec<InstanceTag>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReservationDescription {
    pub instances: Vec<InstanceDescription>,
}

/// Compute inventory lookup, restricted to instances carrying at least one of
/// the given tag keys.
pub trait InstanceInventory {
    fn describe_tagged_instance(
        &self,
        instance_id: &str,
        tag_keys: &[&str],
    ) -> Result<Vec<ReservationDescription>, String>;
}
