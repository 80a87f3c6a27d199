use dyndns_core::config::DynDnsConfig;
use dyndns_core::contract::parse_state_change;
use dyndns_core::tags::{parse_ttl_override, scan_dns_tags};
use serde_json::{json, Value};

use crate::adapters::dns::{RecordChange, RecordUpserter};
use crate::adapters::inventory::InstanceInventory;
use crate::adapters::log::{LogRecord, LogSink};
use crate::handlers::pipeline::{run_pipeline, PipelineError, Step, StepError};

pub const STEP_PARSE_EVENT: &str = "parse-event";
pub const STEP_RESOLVE_INSTANCE: &str = "resolve-instance-metadata";
pub const STEP_UPSERT_RECORD: &str = "upsert-zone-record";

pub const DEFAULT_STEPS: &[&str] = &[STEP_PARSE_EVENT, STEP_RESOLVE_INSTANCE, STEP_UPSERT_RECORD];

/// Per-invocation working state. Built fresh for every notification and
/// discarded once the pipeline returns; steps fill in the trailing fields as
/// they complete.
pub struct InvocationContext<'a> {
    pub event: Value,
    pub config: &'a DynDnsConfig,
    pub inventory: &'a dyn InstanceInventory,
    pub dns: &'a dyn RecordUpserter,
    pub log: &'a dyn LogSink,
    pub instance_id: Option<String>,
    pub ip_address: Option<String>,
    pub zone_id: Option<String>,
    pub hostname: Option<String>,
    pub rr_ttl: Option<i64>,
}

impl<'a> InvocationContext<'a> {
    pub fn new(
        event: Value,
        config: &'a DynDnsConfig,
        inventory: &'a dyn InstanceInventory,
        dns: &'a dyn RecordUpserter,
        log: &'a dyn LogSink,
    ) -> Self {
        Self {
            event,
            config,
            inventory,
            dns,
            log,
            instance_id: None,
            ip_address: None,
            zone_id: None,
            hostname: None,
            rr_ttl: None,
        }
    }
}

pub fn resolve_step<'a>(name: &str) -> Option<Step<InvocationContext<'a>>> {
    match name {
        STEP_PARSE_EVENT => Some(parse_event),
        STEP_RESOLVE_INSTANCE => Some(resolve_instance),
        STEP_UPSERT_RECORD => Some(upsert_record),
        _ => None,
    }
}

pub fn handle_state_change(
    event: Value,
    config: &DynDnsConfig,
    inventory: &dyn InstanceInventory,
    dns: &dyn RecordUpserter,
    log: &dyn LogSink,
    steps: &[&str],
) -> Result<(), PipelineError> {
    let mut ctx = InvocationContext::new(event, config, inventory, dns, log);
    run_pipeline(&mut ctx, log, steps, |name| resolve_step(name))
}

fn parse_event(ctx: &mut InvocationContext<'_>) -> Result<(), StepError> {
    match parse_state_change(&ctx.event) {
        Ok(instance_id) => {
            ctx.instance_id = Some(instance_id);
            Ok(())
        }
        Err(error) => {
            ctx.log.emit(
                LogRecord::error("received an invalid EC2 instance state-change notification")
                    .with_error(error.message())
                    .with_details(json!({ "event": ctx.event.to_string() })),
            );
            Err(StepError::InvalidEvent)
        }
    }
}

fn resolve_instance(ctx: &mut InvocationContext<'_>) -> Result<(), StepError> {
    let instance_id = ctx
        .instance_id
        .clone()
        .ok_or(StepError::MissingContext("an instance id"))?;

    ctx.log.emit(
        LogRecord::info("retrieving instance tags and public IP address").with_details(json!({
            "instance_id": instance_id.clone(),
            "zoneid_tag": ctx.config.zoneid_tag.clone(),
            "hostname_tag": ctx.config.hostname_tag.clone(),
        })),
    );

    let reservations = ctx
        .inventory
        .describe_tagged_instance(
            &instance_id,
            &[ctx.config.zoneid_tag.as_str(), ctx.config.hostname_tag.as_str()],
        )
        .map_err(|error| {
            ctx.log.emit(
                LogRecord::error("instance metadata query returned an error").with_error(error),
            );
            StepError::QueryFailed
        })?;

    ctx.log.emit(
        LogRecord::info("instance metadata query completed successfully").with_details(json!({
            "result": serde_json::to_value(&reservations)
                .expect("serialization of reservation descriptions should not fail"),
        })),
    );

    let Some(instance) = reservations
        .first()
        .and_then(|reservation| reservation.instances.first())
    else {
        ctx.log.emit(
            LogRecord::error("instance metadata query matched no tagged instance")
                .with_details(json!({ "instance_id": instance_id.clone() })),
        );
        return Err(StepError::NotConfigured(instance_id));
    };

    let scanned = scan_dns_tags(&instance.tags, ctx.config);

    let Some(zone_id) = scanned.zone_id else {
        ctx.log.emit(
            LogRecord::error("instance has no hosted zone id tag").with_details(json!({
                "instance_id": instance_id.clone(),
                "tag": ctx.config.zoneid_tag.clone(),
            })),
        );
        return Err(StepError::NotConfigured(instance_id));
    };

    let Some(hostname) = scanned.hostname else {
        ctx.log.emit(
            LogRecord::error("instance has no hostname tag").with_details(json!({
                "instance_id": instance_id.clone(),
                "tag": ctx.config.hostname_tag.clone(),
            })),
        );
        return Err(StepError::NotConfigured(instance_id));
    };

    let Some(ip_address) = instance.public_ip_address.clone() else {
        ctx.log.emit(
            LogRecord::error("instance has no public IPv4 address")
                .with_details(json!({ "instance_id": instance_id.clone() })),
        );
        return Err(StepError::NotConfigured(instance_id));
    };

    let rr_ttl = match scanned.ttl_override.as_deref() {
        Some(raw) => match parse_ttl_override(raw) {
            Some(ttl) => ttl,
            None => {
                ctx.log.emit(
                    LogRecord::warn("ignoring unparseable TTL override tag").with_details(json!({
                        "instance_id": instance_id.clone(),
                        "value": raw,
                    })),
                );
                ctx.config.default_ttl
            }
        },
        None => ctx.config.default_ttl,
    };

    ctx.instance_id = Some(instance_id);
    ctx.ip_address = Some(ip_address);
    ctx.zone_id = Some(zone_id);
    ctx.hostname = Some(hostname);
    ctx.rr_ttl = Some(rr_ttl);
    Ok(())
}

fn upsert_record(ctx: &mut InvocationContext<'_>) -> Result<(), StepError> {
    let zone_id = ctx
        .zone_id
        .clone()
        .ok_or(StepError::MissingContext("a hosted zone id"))?;
    let hostname = ctx
        .hostname
        .clone()
        .ok_or(StepError::MissingContext("a hostname"))?;
    let address = ctx
        .ip_address
        .clone()
        .ok_or(StepError::MissingContext("a public IP address"))?;
    let ttl = ctx
        .rr_ttl
        .ok_or(StepError::MissingContext("a resolved record TTL"))?;

    ctx.log.emit(
        LogRecord::info("creating or updating DNS resource record").with_details(json!({
            "zone_id": zone_id.clone(),
            "hostname": hostname.clone(),
            "ip_address": address.clone(),
            "rr_ttl": ttl,
        })),
    );

    let change = RecordChange {
        zone_id,
        record_name: hostname,
        address,
        ttl,
    };
    let receipt = ctx.dns.upsert_address_record(&change).map_err(|error| {
        ctx.log
            .emit(LogRecord::error("DNS zone data update returned an error").with_error(error));
        StepError::UpdateFailed
    })?;

    ctx.log.emit(
        LogRecord::info("DNS resource record change submitted successfully")
            .with_details(json!({ "result": receipt })),
    );
    Ok(())
}
