use serde::{Deserialize, Serialize};

pub const DEFAULT_ZONEID_TAG: &str = "dyndns:zoneid";
pub const DEFAULT_HOSTNAME_TAG: &str = "dyndns:hostname";
pub const DEFAULT_RR_TTL_TAG: &str = "dyndns:rr-ttl";
pub const DEFAULT_RR_TTL: i64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DynDnsConfig {
    pub zoneid_tag: String,
    pub hostname_tag: String,
    pub rr_ttl_tag: String,
    pub default_ttl: i64,
}

impl Default for DynDnsConfig {
    fn default() -> Self {
        Self {
            zoneid_tag: DEFAULT_ZONEID_TAG.to_string(),
            hostname_tag: DEFAULT_HOSTNAME_TAG.to_string(),
            rr_ttl_tag: DEFAULT_RR_TTL_TAG.to_string(),
            default_ttl: DEFAULT_RR_TTL,
        }
    }
}
