//! Stateless page computation over the integers `[0, max_response]`.

use crate::config::MAX_PAGE_SIZE;
use crate::error::ShowcaseError;

/// Inputs of a single page fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub max_response: i32,
    pub page_size: i32,
    pub page_token: String,
    pub page_size_override: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub responses: Vec<i32>,
    /// Empty on the last page.
    pub next_page_token: String,
}

/// Parses a page token holding a non-negative decimal offset no greater than `max`.
/// The empty token means offset 0.
pub fn parse_offset_token(token: &str, max: usize) -> Result<usize, ShowcaseError> {
    if token.is_empty() {
        return Ok(0);
    }
    let invalid = |reason: String| ShowcaseError::InvalidPageToken {
        token: token.to_string(),
        reason,
    };
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("must be a non-negative integer".to_string()));
    }
    let offset: usize = token
        .parse()
        .map_err(|e| invalid(format!("not a valid integer: {e}")))?;
    if offset > max {
        return Err(invalid(format!("must not exceed {max}")));
    }
    Ok(offset)
}

/// Computes the page described by `request`.
///
/// The page holds the increasing integers `[start, start + size)` clipped to
/// `max_response`, where `start` comes from the page token and `size` is the
/// first positive value among `page_size_override`, `page_size` and
/// `default_page_size`, at most [`MAX_PAGE_SIZE`]. Identical inputs always
/// produce identical pages.
pub fn paginate(request: &PageRequest, default_page_size: i32) -> Result<Page, ShowcaseError> {
    let max = usize::try_from(request.max_response).map_err(|_| {
        ShowcaseError::invalid_argument("max_response", "must be non-negative")
    })?;
    let start = parse_offset_token(&request.page_token, max)?;

    let size = [
        request.page_size_override,
        request.page_size,
        default_page_size,
    ]
    .into_iter()
    .find(|&s| s > 0)
    .ok_or_else(|| ShowcaseError::invalid_argument("page_size", "no positive page size"))?;
    if size > MAX_PAGE_SIZE {
        return Err(ShowcaseError::invalid_argument(
            "page_size",
            format!("must not exceed {MAX_PAGE_SIZE}"),
        ));
    }
    // i32 -> usize cannot fail for positive values on supported targets.
    let size = usize::try_from(size).unwrap_or(1);

    let next = start.saturating_add(size);
    let end = next.min(max + 1);
    let responses = (start..end)
        .map(|n| i32::try_from(n).unwrap_or(i32::MAX))
        .collect();
    let next_page_token = if next <= max {
        next.to_string()
    } else {
        String::new()
    };

    Ok(Page {
        responses,
        next_page_token,
    })
}
