//! Shared Protocol Buffer definitions for Showcase.
//!
//! This crate contains the Showcase service schema (`google.showcase.v1`), the
//! long-running operations mixin (`google.longrunning`) and the RPC status
//! model (`google.rpc`), compiled by `tonic_build` in build.rs.

pub mod google {
    pub mod rpc {
        tonic::include_proto!("google.rpc");
    }

    pub mod longrunning {
        tonic::include_proto!("google.longrunning");
    }

    pub mod showcase {
        pub mod v1 {
            tonic::include_proto!("google.showcase.v1");
        }
    }
}

pub use prost_types;

// Re-export Showcase API types for convenience
pub use google::showcase::v1::*;

pub use google::longrunning::{
    CancelOperationRequest, DeleteOperationRequest, GetOperationRequest, ListOperationsRequest,
    ListOperationsResponse, Operation, WaitOperationRequest, operation,
};
pub use google::rpc::Status as RpcStatus;

pub use google::longrunning::operations_client::OperationsClient;
pub use google::longrunning::operations_server::OperationsServer;
pub use google::showcase::v1::showcase_client::ShowcaseClient;
pub use google::showcase::v1::showcase_server::ShowcaseServer;

/// Type URL of `LongrunningMetadata` when packed into `google.protobuf.Any`.
pub const LONGRUNNING_METADATA_TYPE_URL: &str =
    "type.googleapis.com/google.showcase.v1.LongrunningMetadata";

/// Type URL of `LongrunningResponse` when packed into `google.protobuf.Any`.
pub const LONGRUNNING_RESPONSE_TYPE_URL: &str =
    "type.googleapis.com/google.showcase.v1.LongrunningResponse";
