use aws_sdk_ec2::types::Filter;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use dyndns_core::config::DynDnsConfig;
use dyndns_core::tags::InstanceTag;
use dyndns_lambda::adapters::dns::{RecordChange, RecordUpserter};
use dyndns_lambda::adapters::inventory::{
    InstanceDescription, InstanceInventory, ReservationDescription,
};
use dyndns_lambda::adapters::log::{JsonLineSink, LogRecord, LogSink};
use dyndns_lambda::handlers::state_change::{handle_state_change, DEFAULT_STEPS};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct Ec2InstanceInventory {
    ec2_client: aws_sdk_ec2::Client,
}

impl InstanceInventory for Ec2InstanceInventory {
    fn describe_tagged_instance(
        &self,
        instance_id: &str,
        tag_keys: &[&str],
    ) -> Result<Vec<ReservationDescription>, String> {
        let client = self.ec2_client.clone();
        let instance_id = instance_id.to_string();
        let tag_keys: Vec<String> = tag_keys.iter().map(|key| key.to_string()).collect();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .describe_instances()
                    .filters(
                        Filter::builder()
                            .name("tag-key")
                            .set_values(Some(tag_keys))
                            .build(),
                    )
                    .instance_ids(instance_id)
                    .send()
                    .await
                    .map_err(|error| format!("describe_instances failed: {error}"))?;

                Ok(output
                    .reservations()
                    .iter()
                    .map(|reservation| ReservationDescription {
                        instances: reservation
                            .instances()
                            .iter()
                            .map(|instance| InstanceDescription {
                                public_ip_address: instance
                                    .public_ip_address()
                                    .map(str::to_string),
                                tags: instance
                                    .tags()
                                    .iter()
                                    .filter_map(|tag| match (tag.key(), tag.value()) {
                                        (Some(key), Some(value)) => Some(InstanceTag {
                                            key: key.to_string(),
                                            value: value.to_string(),
                                        }),
                                        _ => None,
                                    })
                                    .collect(),
                            })
                            .collect(),
                    })
                    .collect())
            })
        })
    }
}

struct Route53RecordUpserter {
    route53_client: aws_sdk_route53::Client,
}

impl RecordUpserter for Route53RecordUpserter {
    fn upsert_address_record(&self, change: &RecordChange) -> Result<String, String> {
        let client = self.route53_client.clone();
        let change = change.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let value = ResourceRecord::builder()
                    .value(change.address.clone())
                    .build()
                    .map_err(|error| format!("invalid resource record: {error}"))?;
                let record_set = ResourceRecordSet::builder()
                    .name(change.record_name.clone())
                    .r#type(RrType::A)
                    .ttl(change.ttl)
                    .resource_records(value)
                    .build()
                    .map_err(|error| format!("invalid resource record set: {error}"))?;
                let upsert = Change::builder()
                    .action(ChangeAction::Upsert)
                    .resource_record_set(record_set)
                    .build()
                    .map_err(|error| format!("invalid change entry: {error}"))?;
                let batch = ChangeBatch::builder()
                    .changes(upsert)
                    .build()
                    .map_err(|error| format!("invalid change batch: {error}"))?;

                let output = client
                    .change_resource_record_sets()
                    .hosted_zone_id(change.zone_id.clone())
                    .change_batch(batch)
                    .send()
                    .await
                    .map_err(|error| format!("change_resource_record_sets failed: {error}"))?;

                Ok(match output.change_info() {
                    Some(info) => format!("{info:?}"),
                    None => "no change info returned".to_string(),
                })
            })
        })
    }
}

fn config_from_env() -> Result<DynDnsConfig, Error> {
    let mut config = DynDnsConfig::default();
    if let Ok(value) = std::env::var("DYNDNS_ZONEID_TAG") {
        config.zoneid_tag = value;
    }
    if let Ok(value) = std::env::var("DYNDNS_HOSTNAME_TAG") {
        config.hostname_tag = value;
    }
    if let Ok(value) = std::env::var("DYNDNS_RR_TTL_TAG") {
        config.rr_ttl_tag = value;
    }
    if let Ok(value) = std::env::var("DYNDNS_DEFAULT_TTL") {
        config.default_ttl = value
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or_else(|| Error::from("DYNDNS_DEFAULT_TTL must be a positive integer"))?;
    }
    Ok(config)
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = config_from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let inventory = Ec2InstanceInventory {
        ec2_client: aws_sdk_ec2::Client::new(&aws_config),
    };
    let dns = Route53RecordUpserter {
        route53_client: aws_sdk_route53::Client::new(&aws_config),
    };
    let log = JsonLineSink::new("state_change_handler");

    handle_state_change(event.payload, &config, &inventory, &dns, &log, DEFAULT_STEPS)
        .map_err(|error| Error::from(error.to_string()))?;
    Ok(Value::Null)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let log = JsonLineSink::new("main");
    log.emit(LogRecord::info(format!(
        "dynamic DNS client for EC2 instances starting (version {})",
        env!("CARGO_PKG_VERSION")
    )));
    lambda_runtime::run(service_fn(handle_request)).await
}
