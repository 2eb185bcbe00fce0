//! Google Cloud Pub/Sub operations.
//!
//! Covers topics, subscriptions, and message publishing/pulling.
//!
//! API base: `https://pubsub.googleapis.com/v1`

use crate::descriptor::{FieldShape, HttpMethod, InputField, OperationDescriptor};

const SERVICE: &str = "pubsub";

pub const SCOPE_PUBSUB: &str = "https://www.googleapis.com/auth/pubsub";
pub const SCOPE_CLOUD_PLATFORM: &str = "https://www.googleapis.com/auth/cloud-platform";

const SCOPES: &[&str] = &[SCOPE_CLOUD_PLATFORM, SCOPE_PUBSUB];

fn op(id: &str, method: HttpMethod, path: &str) -> OperationDescriptor {
    OperationDescriptor::new(id, SERVICE, method, path).with_scopes(SCOPES)
}

/// All Pub/Sub descriptors.
pub fn operations() -> Vec<OperationDescriptor> {
    vec![
        // ── Topics ──────────────────────────────────────────────────
        op("pubsub.projects.topics.list", HttpMethod::Get, "v1/{+project}/topics")
            .with_query(&["pageSize", "pageToken"]),
        op("pubsub.projects.topics.get", HttpMethod::Get, "v1/{+topic}"),
        op("pubsub.projects.topics.create", HttpMethod::Put, "v1/{+name}").with_fields(vec![
            InputField::new("labels", FieldShape::Object),
            InputField::new("messageStoragePolicy", FieldShape::Object),
            InputField::new("kmsKeyName", FieldShape::String),
            InputField::new("schemaSettings", FieldShape::Object),
            InputField::new("messageRetentionDuration", FieldShape::String),
        ]),
        op("pubsub.projects.topics.patch", HttpMethod::Patch, "v1/{+name}").with_whole_body(),
        op("pubsub.projects.topics.delete", HttpMethod::Delete, "v1/{+topic}"),
        op("pubsub.projects.topics.publish", HttpMethod::Post, "v1/{+topic}:publish")
            .with_fields(vec![InputField::new("messages", FieldShape::Array).required()]),
        // ── Subscriptions ───────────────────────────────────────────
        op("pubsub.projects.subscriptions.list", HttpMethod::Get, "v1/{+project}/subscriptions")
            .with_query(&["pageSize", "pageToken"]),
        op("pubsub.projects.subscriptions.get", HttpMethod::Get, "v1/{+subscription}"),
        op("pubsub.projects.subscriptions.create", HttpMethod::Put, "v1/{+name}").with_whole_body(),
        op("pubsub.projects.subscriptions.delete", HttpMethod::Delete, "v1/{+subscription}"),
        op("pubsub.projects.subscriptions.pull", HttpMethod::Post, "v1/{+subscription}:pull")
            .with_fields(vec![
                InputField::new("maxMessages", FieldShape::Integer).required(),
                InputField::new("returnImmediately", FieldShape::Boolean),
            ]),
        op(
            "pubsub.projects.subscriptions.acknowledge",
            HttpMethod::Post,
            "v1/{+subscription}:acknowledge",
        )
        .with_fields(vec![InputField::new("ackIds", FieldShape::Array).required()]),
        op(
            "pubsub.projects.subscriptions.modifyAckDeadline",
            HttpMethod::Post,
            "v1/{+subscription}:modifyAckDeadline",
        )
        .with_fields(vec![
            InputField::new("ackIds", FieldShape::Array).required(),
            InputField::new("ackDeadlineSeconds", FieldShape::Integer).required(),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::BodyMode;

    #[test]
    fn every_operation_requests_pubsub_scope() {
        for d in operations() {
            assert_eq!(d.service, "pubsub");
            assert!(d.scopes.iter().any(|s| s == SCOPE_PUBSUB), "{}", d.id);
            assert!(d.path_template.starts_with("v1/"), "{}", d.id);
        }
    }

    #[test]
    fn publish_assembles_messages() {
        let publish = operations()
            .into_iter()
            .find(|d| d.id == "pubsub.projects.topics.publish")
            .unwrap();
        assert_eq!(publish.body_mode, BodyMode::AssembledFields);
        assert_eq!(publish.input_fields[0].name, "messages");
    }
}
