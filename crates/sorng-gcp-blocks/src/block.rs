//! A block binds one descriptor to an invoker and an event sink.
//!
//! Running a block performs the operation and forwards the decoded payload
//! downstream. Failures go back to the caller and are never emitted.

use crate::client::OperationInvoker;
use crate::config::AppConfig;
use crate::descriptor::OperationDescriptor;
use crate::error::InvocationError;
use crate::sink::{EventSink, SinkError};
use log::debug;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockError {
    #[error(transparent)]
    Invocation(#[from] InvocationError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// One runnable Google Cloud operation.
#[derive(Clone)]
pub struct Block {
    descriptor: Arc<OperationDescriptor>,
    invoker: OperationInvoker,
    sink: Arc<dyn EventSink>,
}

impl Block {
    pub fn new(
        descriptor: OperationDescriptor,
        invoker: OperationInvoker,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            invoker,
            sink,
        }
    }

    pub fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    /// Invoke the operation and emit the result. Returns the emitted payload.
    pub async fn run(&self, config: &AppConfig, input: &Map<String, Value>) -> Result<Value, BlockError> {
        let payload = self.invoker.invoke(&self.descriptor, config, input).await?;
        self.sink.emit(payload.clone()).await?;
        debug!("GCP block {} emitted result", self.descriptor.id);
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InvokerSettings;
    use crate::descriptor::{FieldShape, HttpMethod, InputField};
    use crate::sink::ChannelSink;
    use serde_json::json;

    fn publish() -> OperationDescriptor {
        OperationDescriptor::new("pubsub.projects.topics.publish", "pubsub", HttpMethod::Post, "v1/{+topic}:publish")
            .with_fields(vec![InputField::new("messages", FieldShape::Array).required()])
    }

    #[tokio::test]
    async fn success_is_emitted() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/projects/p/topics/t:publish")
            .match_body(mockito::Matcher::Json(json!({"messages": [{"data": "aGk="}]})))
            .with_status(200)
            .with_body(r#"{"messageIds":["42"]}"#)
            .create_async()
            .await;

        let (sink, mut rx) = ChannelSink::channel(1);
        let block = Block::new(
            publish(),
            OperationInvoker::new(InvokerSettings::default().with_endpoint(server.url())),
            Arc::new(sink),
        );
        let input = json!({"topic": "projects/p/topics/t", "messages": [{"data": "aGk="}]});
        let out = block
            .run(&AppConfig::with_access_token("t"), input.as_object().unwrap())
            .await
            .unwrap();

        assert_eq!(out, json!({"messageIds": ["42"]}));
        assert_eq!(rx.recv().await, Some(json!({"messageIds": ["42"]})));
    }

    #[tokio::test]
    async fn failure_is_not_emitted() {
        let (sink, mut rx) = ChannelSink::channel(1);
        let block = Block::new(publish(), OperationInvoker::default(), Arc::new(sink));

        let err = block.run(&AppConfig::default(), &Map::new()).await.unwrap_err();
        assert!(matches!(err, BlockError::Invocation(InvocationError::Auth(_))));
        assert!(rx.try_recv().is_err());
    }
}
