//! gRPC interface for Showcase.
//!
//! Serves the `google.showcase.v1.Showcase` service and the
//! `google.longrunning.Operations` mixin on top of the `showcase` core.

pub mod convert;
pub mod server;

// Generated protobuf modules live in `showcase-proto`
pub use showcase_proto as proto;
pub use showcase_proto::google;

pub use server::{ShowcaseGrpcService, serve, serve_with_shutdown};
