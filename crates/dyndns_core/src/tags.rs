use serde::{Deserialize, Serialize};

use crate::config::DynDnsConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceTag {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsTagValues {
    pub zone_id: Option<String>,
    pub hostname: Option<String>,
    pub ttl_override: Option<String>,
}

// Last value wins when a key appears more than once, matching the order the
// inventory API reports tags in.
pub fn scan_dns_tags(tags: &[InstanceTag], config: &DynDnsConfig) -> DnsTagValues {
    let mut values = DnsTagValues::default();
    for tag in tags {
        if tag.key == config.zoneid_tag {
            values.zone_id = Some(tag.value.clone());
        }
        if tag.key == config.hostname_tag {
            values.hostname = Some(tag.value.clone());
        }
        if tag.key == config.rr_ttl_tag {
            values.ttl_override = Some(tag.value.clone());
        }
    }
    values
}

pub fn parse_ttl_override(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(ttl) if ttl > 0 => Some(ttl),
        _ => None,
    }
}
