//! RPC status codes and the `(code, message)` pair callers use to describe a
//! desired outcome.

use std::fmt;

/// Canonical RPC status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Code {
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl Code {
    /// Maps a wire value onto a code; anything outside the known range is `Unknown`.
    pub fn from_i32(value: i32) -> Code {
        match value {
            0 => Code::Ok,
            1 => Code::Cancelled,
            2 => Code::Unknown,
            3 => Code::InvalidArgument,
            4 => Code::DeadlineExceeded,
            5 => Code::NotFound,
            6 => Code::AlreadyExists,
            7 => Code::PermissionDenied,
            8 => Code::ResourceExhausted,
            9 => Code::FailedPrecondition,
            10 => Code::Aborted,
            11 => Code::OutOfRange,
            12 => Code::Unimplemented,
            13 => Code::Internal,
            14 => Code::Unavailable,
            15 => Code::DataLoss,
            16 => Code::Unauthenticated,
            _ => Code::Unknown,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A `(code, message)` pair describing a desired or actual outcome.
///
/// A spec with code `Ok` always means "no error", whatever its message says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSpec {
    pub code: i32,
    pub message: String,
}

impl StatusSpec {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code: code.as_i32(),
            message: message.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(Code::Ok, String::new())
    }

    pub fn is_ok(&self) -> bool {
        self.code == Code::Ok.as_i32()
    }

    pub fn code(&self) -> Code {
        Code::from_i32(self.code)
    }
}

/// Returns the spec only if it describes an actual failure.
pub fn non_ok(status: Option<&StatusSpec>) -> Option<&StatusSpec> {
    status.filter(|s| !s.is_ok())
}
