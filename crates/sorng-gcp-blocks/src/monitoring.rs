//! Google Cloud Monitoring operations.
//!
//! Covers metric descriptors, time series, alert policies, notification
//! channels and monitored resource descriptors. Read operations only ask for
//! the read scope; mutations ask for the full monitoring scope.
//!
//! API base: `https://monitoring.googleapis.com/v3`

use crate::descriptor::{FieldShape, HttpMethod, InputField, OperationDescriptor};

const SERVICE: &str = "monitoring";

pub const SCOPE_MONITORING: &str = "https://www.googleapis.com/auth/monitoring";
pub const SCOPE_MONITORING_READ: &str = "https://www.googleapis.com/auth/monitoring.read";
pub const SCOPE_MONITORING_WRITE: &str = "https://www.googleapis.com/auth/monitoring.write";
pub const SCOPE_CLOUD_PLATFORM: &str = "https://www.googleapis.com/auth/cloud-platform";

const READ: &[&str] = &[SCOPE_CLOUD_PLATFORM, SCOPE_MONITORING, SCOPE_MONITORING_READ];
const WRITE: &[&str] = &[SCOPE_CLOUD_PLATFORM, SCOPE_MONITORING];

fn read(id: &str, path: &str) -> OperationDescriptor {
    OperationDescriptor::new(id, SERVICE, HttpMethod::Get, path).with_scopes(READ)
}

fn write(id: &str, method: HttpMethod, path: &str) -> OperationDescriptor {
    OperationDescriptor::new(id, SERVICE, method, path).with_scopes(WRITE)
}

fn alert_policy_fields() -> Vec<InputField> {
    vec![
        InputField::new("displayName", FieldShape::String).required(),
        InputField::new("documentation", FieldShape::Object),
        InputField::new("userLabels", FieldShape::Object),
        InputField::new("conditions", FieldShape::Array).required(),
        InputField::new("combiner", FieldShape::String),
        InputField::new("enabled", FieldShape::Boolean),
        InputField::new("notificationChannels", FieldShape::Array),
        InputField::new("alertStrategy", FieldShape::Object),
        InputField::new("severity", FieldShape::String),
    ]
}

/// All Cloud Monitoring descriptors.
pub fn operations() -> Vec<OperationDescriptor> {
    vec![
        // ── Metric descriptors ──────────────────────────────────────
        read("monitoring.projects.metricDescriptors.list", "v3/{+name}/metricDescriptors")
            .with_query(&["filter", "pageSize", "pageToken"]),
        read("monitoring.projects.metricDescriptors.get", "v3/{+name}"),
        write("monitoring.projects.metricDescriptors.create", HttpMethod::Post, "v3/{+name}/metricDescriptors")
            .with_whole_body(),
        write("monitoring.projects.metricDescriptors.delete", HttpMethod::Delete, "v3/{+name}"),
        // ── Time series ─────────────────────────────────────────────
        read("monitoring.projects.timeSeries.list", "v3/{+name}/timeSeries").with_query(&[
            "filter",
            "interval.startTime",
            "interval.endTime",
            "aggregation.alignmentPeriod",
            "aggregation.perSeriesAligner",
            "aggregation.crossSeriesReducer",
            "aggregation.groupByFields",
            "orderBy",
            "view",
            "pageSize",
            "pageToken",
        ]),
        write("monitoring.projects.timeSeries.create", HttpMethod::Post, "v3/{+name}/timeSeries")
            .with_fields(vec![InputField::new("timeSeries", FieldShape::Array).required()])
            .with_scopes(&[SCOPE_CLOUD_PLATFORM, SCOPE_MONITORING, SCOPE_MONITORING_WRITE]),
        // ── Alert policies ──────────────────────────────────────────
        read("monitoring.projects.alertPolicies.list", "v3/{+name}/alertPolicies")
            .with_query(&["filter", "orderBy", "pageSize", "pageToken"]),
        read("monitoring.projects.alertPolicies.get", "v3/{+name}"),
        write("monitoring.projects.alertPolicies.create", HttpMethod::Post, "v3/{+name}/alertPolicies")
            .with_fields(alert_policy_fields()),
        write("monitoring.projects.alertPolicies.patch", HttpMethod::Patch, "v3/{+name}")
            .with_fields(alert_policy_fields())
            .with_query(&["updateMask"]),
        write("monitoring.projects.alertPolicies.delete", HttpMethod::Delete, "v3/{+name}"),
        // ── Notification channels ───────────────────────────────────
        read("monitoring.projects.notificationChannels.list", "v3/{+name}/notificationChannels")
            .with_query(&["filter", "orderBy", "pageSize", "pageToken"]),
        read("monitoring.projects.notificationChannels.get", "v3/{+name}"),
        write("monitoring.projects.notificationChannels.delete", HttpMethod::Delete, "v3/{+name}")
            .with_query(&["force"]),
        // ── Monitored resource descriptors ──────────────────────────
        read(
            "monitoring.projects.monitoredResourceDescriptors.list",
            "v3/{+name}/monitoredResourceDescriptors",
        )
        .with_query(&["filter", "pageSize", "pageToken"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::BodyMode;

    #[test]
    fn reads_use_read_scope_and_no_body() {
        for d in operations().into_iter().filter(|d| d.method == HttpMethod::Get) {
            assert!(d.scopes.iter().any(|s| s == SCOPE_MONITORING_READ), "{}", d.id);
            assert_eq!(d.body_mode, BodyMode::None, "{}", d.id);
        }
    }

    #[test]
    fn alert_policy_patch_takes_update_mask() {
        let patch = operations()
            .into_iter()
            .find(|d| d.id == "monitoring.projects.alertPolicies.patch")
            .unwrap();
        assert_eq!(patch.query_fields, vec!["updateMask".to_string()]);
        assert_eq!(patch.body_mode, BodyMode::AssembledFields);
    }
}
