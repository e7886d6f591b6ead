//! Conversions between protobuf messages and core types.

use chrono::{DateTime, Utc};
use prost::Message;
use prost_types::Any;
use showcase::{OperationOutcome, OperationSnapshot, OperationState, ShowcaseError, StatusSpec};
use tonic::Status;

use crate::proto::{
    LONGRUNNING_METADATA_TYPE_URL, LONGRUNNING_RESPONSE_TYPE_URL, LongrunningMetadata,
    LongrunningResponse, Operation, RpcStatus, operation,
};

pub fn status_from_proto(status: RpcStatus) -> StatusSpec {
    StatusSpec {
        code: status.code,
        message: status.message,
    }
}

pub fn status_to_proto(status: StatusSpec) -> RpcStatus {
    RpcStatus {
        code: status.code,
        message: status.message,
        details: Vec::new(),
    }
}

/// Convert a ShowcaseError to a tonic Status for gRPC responses.
pub fn showcase_error_to_status(error: ShowcaseError) -> Status {
    if error.is_client_error() {
        tracing::debug!(%error, "rejecting request");
    }
    match error {
        ShowcaseError::RetryNotFound { .. } => Status::not_found(error.to_string()),
        ShowcaseError::OperationNotFound { .. } => Status::not_found(error.to_string()),
        ShowcaseError::RetryExhausted { .. } => Status::out_of_range(error.to_string()),
        ShowcaseError::InvalidPageToken { .. } => Status::invalid_argument(error.to_string()),
        ShowcaseError::InvalidArgument { .. } => Status::invalid_argument(error.to_string()),
        ShowcaseError::Configured(status) => {
            Status::new(tonic::Code::from(status.code), status.message)
        }
    }
}

pub fn timestamp_to_datetime(timestamp: &prost_types::Timestamp) -> Result<DateTime<Utc>, Status> {
    let nanos = u32::try_from(timestamp.nanos)
        .map_err(|_| Status::invalid_argument("completion_time.nanos must be non-negative"))?;
    DateTime::from_timestamp(timestamp.seconds, nanos)
        .ok_or_else(|| Status::invalid_argument("completion_time is out of range"))
}

pub fn datetime_to_timestamp(time: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: time.timestamp(),
        nanos: i32::try_from(time.timestamp_subsec_nanos()).unwrap_or(0),
    }
}

/// Converts a wire duration into a sleepable one. Negative durations are rejected.
pub fn proto_duration_to_std(
    field: &str,
    duration: prost_types::Duration,
) -> Result<std::time::Duration, Status> {
    std::time::Duration::try_from(duration)
        .map_err(|e| Status::invalid_argument(format!("{field} is not a valid duration: {e}")))
}

pub fn chrono_to_proto_duration(duration: chrono::Duration) -> prost_types::Duration {
    let seconds = duration.num_seconds();
    let nanos = (duration - chrono::Duration::seconds(seconds))
        .num_nanoseconds()
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(0);
    prost_types::Duration { seconds, nanos }
}

fn pack<M: Message>(type_url: &str, message: &M) -> Any {
    Any {
        type_url: type_url.to_string(),
        value: message.encode_to_vec(),
    }
}

/// Renders a registry snapshot as a `google.longrunning.Operation`.
pub fn snapshot_to_operation(snapshot: OperationSnapshot) -> Operation {
    let OperationSnapshot { name, state } = snapshot;
    match state {
        OperationState::Pending { time_remaining } => Operation {
            name,
            metadata: Some(pack(
                LONGRUNNING_METADATA_TYPE_URL,
                &LongrunningMetadata {
                    time_remaining: Some(chrono_to_proto_duration(time_remaining)),
                },
            )),
            done: false,
            result: None,
        },
        OperationState::Done(OperationOutcome::Succeeded { content }) => Operation {
            name,
            metadata: None,
            done: true,
            result: Some(operation::Result::Response(pack(
                LONGRUNNING_RESPONSE_TYPE_URL,
                &LongrunningResponse { content },
            ))),
        },
        OperationState::Done(OperationOutcome::Failed(status)) => Operation {
            name,
            metadata: None,
            done: true,
            result: Some(operation::Result::Error(status_to_proto(status))),
        },
    }
}

/// Decodes the metadata of a pending operation, if it carries any.
pub fn operation_metadata(operation: &Operation) -> Option<LongrunningMetadata> {
    operation
        .metadata
        .as_ref()
        .filter(|any| any.type_url == LONGRUNNING_METADATA_TYPE_URL)
        .and_then(|any| LongrunningMetadata::decode(any.value.as_slice()).ok())
}

/// Decodes the response of a successfully completed operation.
pub fn operation_response(operation: &Operation) -> Option<LongrunningResponse> {
    match &operation.result {
        Some(operation::Result::Response(any)) if any.type_url == LONGRUNNING_RESPONSE_TYPE_URL => {
            LongrunningResponse::decode(any.value.as_slice()).ok()
        }
        _ => None,
    }
}
