//! Stateless request handling shared by the echo-style RPCs.

use crate::error::ShowcaseError;
use crate::status::{StatusSpec, non_ok};

/// Fails with the configured status when it is non-OK.
pub fn check(error: Option<&StatusSpec>) -> Result<(), ShowcaseError> {
    match non_ok(error) {
        Some(status) => Err(ShowcaseError::Configured(status.clone())),
        None => Ok(()),
    }
}

/// Returns `content` unchanged unless `error` describes a failure.
pub fn echo(content: String, error: Option<&StatusSpec>) -> Result<String, ShowcaseError> {
    check(error)?;
    Ok(content)
}

/// Words of `content` in order, split on any run of whitespace.
pub fn expand_words(content: &str) -> impl Iterator<Item = &str> {
    content.split_whitespace()
}

/// Accumulates client-streamed content until the stream closes.
#[derive(Debug, Default)]
pub struct Collector {
    parts: Vec<String>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one inbound item; a non-OK error aborts the whole collection.
    pub fn push(
        &mut self,
        content: String,
        error: Option<&StatusSpec>,
    ) -> Result<(), ShowcaseError> {
        check(error)?;
        self.parts.push(content);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Joins everything collected with single spaces, in arrival order.
    pub fn finish(self) -> String {
        self.parts.join(" ")
    }
}
