//! Google Cloud Run operations.
//!
//! Covers Cloud Run services, revisions, jobs, executions and worker pools
//! (v2 API). List and create calls are scoped to the configured project via
//! the `{projectId}` marker; everything else addresses a full resource name.
//!
//! API base: `https://run.googleapis.com/v2`

use crate::descriptor::{HttpMethod, OperationDescriptor};

const SERVICE: &str = "run";

pub const SCOPE_CLOUD_PLATFORM: &str = "https://www.googleapis.com/auth/cloud-platform";

const LOCATION_PARENT: &str = "v2/projects/{projectId}/locations/{location}";

fn op(id: &str, method: HttpMethod, path: &str) -> OperationDescriptor {
    OperationDescriptor::new(id, SERVICE, method, path).with_scopes(&[SCOPE_CLOUD_PLATFORM])
}

fn collection(kind: &str) -> String {
    format!("{}/{}", LOCATION_PARENT, kind)
}

/// All Cloud Run descriptors.
pub fn operations() -> Vec<OperationDescriptor> {
    vec![
        // ── Services ────────────────────────────────────────────────
        op("run.projects.locations.services.list", HttpMethod::Get, &collection("services"))
            .with_query(&["pageSize", "pageToken", "showDeleted"]),
        op("run.projects.locations.services.get", HttpMethod::Get, "v2/{+name}"),
        op("run.projects.locations.services.create", HttpMethod::Post, &collection("services"))
            .with_whole_body()
            .with_query(&["serviceId", "validateOnly"]),
        op("run.projects.locations.services.patch", HttpMethod::Patch, "v2/{+name}")
            .with_whole_body()
            .with_query(&["updateMask", "validateOnly", "allowMissing"]),
        op("run.projects.locations.services.delete", HttpMethod::Delete, "v2/{+name}")
            .with_query(&["validateOnly", "etag"]),
        // ── Revisions ───────────────────────────────────────────────
        op("run.projects.locations.services.revisions.list", HttpMethod::Get, "v2/{+parent}/revisions")
            .with_query(&["pageSize", "pageToken", "showDeleted"]),
        op("run.projects.locations.services.revisions.get", HttpMethod::Get, "v2/{+name}"),
        op("run.projects.locations.services.revisions.delete", HttpMethod::Delete, "v2/{+name}")
            .with_query(&["validateOnly", "etag"]),
        // ── Jobs ────────────────────────────────────────────────────
        op("run.projects.locations.jobs.list", HttpMethod::Get, &collection("jobs"))
            .with_query(&["pageSize", "pageToken", "showDeleted"]),
        op("run.projects.locations.jobs.get", HttpMethod::Get, "v2/{+name}"),
        op("run.projects.locations.jobs.create", HttpMethod::Post, &collection("jobs"))
            .with_whole_body()
            .with_query(&["jobId", "validateOnly"]),
        op("run.projects.locations.jobs.delete", HttpMethod::Delete, "v2/{+name}")
            .with_query(&["validateOnly", "etag"]),
        op("run.projects.locations.jobs.run", HttpMethod::Post, "v2/{+name}:run").with_whole_body(),
        // ── Executions ──────────────────────────────────────────────
        op("run.projects.locations.jobs.executions.list", HttpMethod::Get, "v2/{+parent}/executions")
            .with_query(&["pageSize", "pageToken", "showDeleted"]),
        op("run.projects.locations.jobs.executions.cancel", HttpMethod::Post, "v2/{+name}:cancel")
            .with_whole_body(),
        op("run.projects.locations.jobs.executions.delete", HttpMethod::Delete, "v2/{+name}")
            .with_query(&["validateOnly", "etag"]),
        // ── Worker pools ────────────────────────────────────────────
        op("run.projects.locations.workerPools.list", HttpMethod::Get, &collection("workerPools"))
            .with_query(&["pageSize", "pageToken", "showDeleted"]),
        op("run.projects.locations.workerPools.get", HttpMethod::Get, "v2/{+name}"),
        op("run.projects.locations.workerPools.create", HttpMethod::Post, &collection("workerPools"))
            .with_whole_body()
            .with_query(&["workerPoolId", "validateOnly"]),
        op("run.projects.locations.workerPools.patch", HttpMethod::Patch, "v2/{+name}")
            .with_whole_body()
            .with_query(&["updateMask", "validateOnly", "allowMissing", "forceNewRevision"]),
        op("run.projects.locations.workerPools.delete", HttpMethod::Delete, "v2/{+name}")
            .with_query(&["validateOnly", "etag"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template;
    use serde_json::json;

    #[test]
    fn list_uses_configured_project() {
        let list = operations()
            .into_iter()
            .find(|d| d.id == "run.projects.locations.services.list")
            .unwrap();
        let params = json!({"location": "europe-west1"}).as_object().cloned().unwrap();
        let url = template::expand(
            "https://run.googleapis.com",
            &list.path_template,
            &params,
            Some("demo"),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://run.googleapis.com/v2/projects/demo/locations/europe-west1/services"
        );
    }
}
