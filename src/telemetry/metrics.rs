//! Prometheus metrics setup and metric definitions

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const PERMISSION_CHECKS: &str = "hireboard_permission_checks_total";
pub const PERMISSION_UPDATES: &str = "hireboard_permission_updates_total";
pub const IMPERSONATION_TRANSITIONS: &str = "hireboard_impersonation_transitions_total";
pub const AUDIT_ENTRIES: &str = "hireboard_audit_entries_total";
pub const AUTH_EVENTS: &str = "hireboard_auth_events_total";

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Register metric descriptions and emit initial zero values so Prometheus output
/// includes HELP/TYPE lines for all metrics from startup.
pub fn describe_metrics() {
    describe_counter!(
        PERMISSION_CHECKS,
        "Capability checks evaluated, by result (granted/denied/store_error)"
    );
    describe_counter!(
        PERMISSION_UPDATES,
        "Tenant permission upserts, by outcome (upserted/retried/failed)"
    );
    describe_counter!(
        IMPERSONATION_TRANSITIONS,
        "Impersonation start/stop transitions"
    );
    describe_counter!(
        AUDIT_ENTRIES,
        "Audit entries by outcome (written/dropped/failed)"
    );
    describe_counter!(AUTH_EVENTS, "Sign-in and sign-out attempts by outcome");

    counter!(PERMISSION_CHECKS, "result" => "granted").absolute(0);
    counter!(PERMISSION_UPDATES, "outcome" => "upserted").absolute(0);
    counter!(IMPERSONATION_TRANSITIONS, "action" => "impersonate_tenant").absolute(0);
    counter!(AUDIT_ENTRIES, "outcome" => "written").absolute(0);
    counter!(AUTH_EVENTS, "action" => "login", "outcome" => "success").absolute(0);
}

pub fn record_permission_check(granted: bool) {
    let result = if granted { "granted" } else { "denied" };
    counter!(PERMISSION_CHECKS, "result" => result).increment(1);
}

pub fn record_permission_store_error() {
    counter!(PERMISSION_CHECKS, "result" => "store_error").increment(1);
}

pub fn record_permission_update(outcome: &'static str) {
    counter!(PERMISSION_UPDATES, "outcome" => outcome).increment(1);
}

pub fn record_impersonation(action: &'static str) {
    counter!(IMPERSONATION_TRANSITIONS, "action" => action).increment(1);
}

pub fn record_audit(outcome: &'static str) {
    counter!(AUDIT_ENTRIES, "outcome" => outcome).increment(1);
}

pub fn record_auth_event(action: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(AUTH_EVENTS, "action" => action, "outcome" => outcome).increment(1);
}
