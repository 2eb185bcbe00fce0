use mockito::Matcher;
use serde_json::{json, Map, Value};
use sorng_gcp_blocks::{
    AppConfig, Block, Catalog, ChannelSink, ErrorKind, InvocationError, InvokerSettings,
    OperationDescriptor, OperationInvoker, TemplateError,
};
use std::sync::Arc;

fn input(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap_or_default()
}

fn descriptor(catalog: &Catalog, id: &str) -> OperationDescriptor {
    catalog.get(id).cloned().unwrap_or_else(|| panic!("missing {id}"))
}

#[tokio::test]
async fn create_topic_without_topic_id_fails_before_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let create: OperationDescriptor = serde_json::from_value(json!({
        "id": "pubsub.projects.topics.create",
        "service": "pubsub",
        "method": "POST",
        "pathTemplate": "v1/{+parent}/topics/{topicId}",
        "bodyMode": "wholeBody"
    }))
    .unwrap();

    let invoker = OperationInvoker::new(InvokerSettings::default().with_endpoint(server.url()));
    let err = invoker
        .invoke(&create, &AppConfig::with_access_token("tok"), &input(json!({"parent": "projects/demo"})))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InvocationError::RequestConstruction(TemplateError::MissingParameter(ref f)) if f == "topicId"
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn list_alert_policies_from_builtin_catalog() {
    let catalog = Catalog::builtin().unwrap();
    let list = descriptor(&catalog, "monitoring.projects.alertPolicies.list");

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v3/projects/demo/alertPolicies")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("filter".into(), "enabled = true".into()),
            Matcher::UrlEncoded("pageSize".into(), "50".into()),
        ]))
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_body(r#"{"alertPolicies":[{"name":"projects/demo/alertPolicies/1"}]}"#)
        .create_async()
        .await;

    let invoker = OperationInvoker::new(InvokerSettings::default().with_endpoint(server.url()));
    let out = invoker
        .invoke(
            &list,
            &AppConfig::with_access_token("tok"),
            &input(json!({"name": "projects/demo", "filter": "enabled = true", "pageSize": 50})),
        )
        .await
        .unwrap();

    assert_eq!(out["alertPolicies"][0]["name"], "projects/demo/alertPolicies/1");
    mock.assert_async().await;
}

#[tokio::test]
async fn run_job_block_emits_operation() {
    let catalog = Catalog::builtin().unwrap();
    let run_job = descriptor(&catalog, "run.projects.locations.jobs.run");

    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v2/projects/demo/locations/us-central1/jobs/nightly:run")
        .match_body(Matcher::Json(json!({"overrides": {"taskCount": 2}})))
        .with_status(200)
        .with_body(r#"{"name":"projects/demo/locations/us-central1/operations/op-1","done":false}"#)
        .create_async()
        .await;

    let (sink, mut rx) = ChannelSink::channel(1);
    let block = Block::new(
        run_job,
        OperationInvoker::new(InvokerSettings::default().with_endpoint(server.url())),
        Arc::new(sink),
    );

    block
        .run(
            &AppConfig::with_access_token("tok"),
            &input(json!({
                "name": "projects/demo/locations/us-central1/jobs/nightly",
                "requestBody": {"overrides": {"taskCount": 2}}
            })),
        )
        .await
        .unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(event["done"], false);
}

#[tokio::test]
async fn rejected_call_reports_status_to_caller() {
    let catalog = Catalog::builtin().unwrap();
    let get = descriptor(&catalog, "run.projects.locations.workerPools.get");

    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/v2/projects/demo/locations/us-central1/workerPools/wp")
        .with_status(404)
        .with_body(r#"{"error":{"code":404,"message":"Resource not found","status":"NOT_FOUND"}}"#)
        .create_async()
        .await;

    let invoker = OperationInvoker::new(InvokerSettings::default().with_endpoint(server.url()));
    let err = invoker
        .invoke(
            &get,
            &AppConfig::with_access_token("tok"),
            &input(json!({"name": "projects/demo/locations/us-central1/workerPools/wp"})),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteRejected);
    let wire: String = err.into();
    let report: Value = serde_json::from_str(&wire).unwrap();
    assert_eq!(report["status"], 404);
    assert_eq!(report["statusText"], "Not Found");
    assert_eq!(report["kind"], "remoteRejected");
}
