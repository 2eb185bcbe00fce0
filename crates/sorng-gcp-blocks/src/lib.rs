//! # sorng-gcp-blocks – data-driven Google Cloud operation blocks
//!
//! Every Google Cloud REST operation is described by an
//! [`OperationDescriptor`] (method, path template, body mode, scopes) and run
//! through one generic [`OperationInvoker`]. There is no per-operation code.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  Block  (block.rs)                               │
//! │  └── invoke → EventSink::emit  (sink.rs)         │
//! ├──────────────────────────────────────────────────┤
//! │  OperationInvoker  (client.rs)                   │
//! │  ├── CredentialResolver   (auth.rs)              │
//! │  ├── expand / query_pairs (template.rs)          │
//! │  ├── assemble             (body.rs)              │
//! │  └── send → classify → decode                    │
//! ├──────────────────────────────────────────────────┤
//! │  Catalog  (catalog.rs)                           │
//! │  └── monitoring · pubsub · run descriptors       │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Services
//!
//! | Service           | Module         | API Base                                    |
//! |-------------------|----------------|---------------------------------------------|
//! | Pub/Sub           | `pubsub`       | `https://pubsub.googleapis.com/v1`           |
//! | Cloud Run         | `run`          | `https://run.googleapis.com/v2`              |
//! | Cloud Monitoring  | `monitoring`   | `https://monitoring.googleapis.com/v3`       |

pub mod error;
pub mod config;
pub mod descriptor;
pub mod auth;
pub mod template;
pub mod body;
pub mod client;

// Descriptor tables
pub mod catalog;
pub mod monitoring;
pub mod pubsub;
pub mod run;

// Result forwarding
pub mod sink;
pub mod block;

// ── Re-exports for ergonomic access ─────────────────────────────────────

pub use auth::CredentialResolver;
pub use block::{Block, BlockError};
pub use catalog::{Catalog, CatalogError};
pub use client::{InvocationStage, InvokerSettings, OperationInvoker};
pub use config::{AppConfig, Credentials, ServiceAccountKey};
pub use descriptor::{
    BodyMode, CredentialModes, FieldShape, HttpMethod, InputField, OperationDescriptor,
};
pub use error::{
    AuthError, ErrorKind, ErrorReport, InvocationError, InvocationResult, TemplateError,
};
pub use sink::{ChannelSink, EventSink, SinkError};
