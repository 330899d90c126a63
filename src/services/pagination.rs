//! Pagination service
//!
//! Slices an ordered collection into fixed-size, 1-indexed pages and builds the
//! JSON envelope returned by the paginated endpoints.

use serde::Serialize;
use thiserror::Error;

/// Default number of rows per page
pub const DEFAULT_PER_PAGE: usize = 25;

/// Errors raised by [`paginate`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// Page numbers start at 1
    #[error("Invalid page number: {0}")]
    InvalidPage(i64),

    /// Page size must be positive
    #[error("Page size must be greater than zero")]
    InvalidPageSize,
}

/// Metadata describing one page of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDescriptor {
    /// 1-indexed page number
    pub page: u64,
    /// Rows per page
    pub per_page: usize,
    /// Rows in the whole collection
    pub total_rows: usize,
    /// Whether a further page exists
    pub has_more: bool,
    /// Page number to request next, present iff `has_more`
    pub next_page: Option<u64>,
}

/// A bounded contiguous view over a collection plus its metadata
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    /// Rows on this page, in collection order
    pub rows: &'a [T],
    /// Counts and continuation info
    pub descriptor: PageDescriptor,
}

/// Compute the requested page of `items`.
///
/// `start = (page - 1) * page_size` and `end = start + page_size`, both clipped
/// to the collection length. A page past the end is empty with `has_more = false`.
/// Arithmetic saturates, so absurdly large page numbers behave like any other
/// page past the end.
///
/// # Errors
/// * [`PaginationError::InvalidPage`] if `page_number < 1`
/// * [`PaginationError::InvalidPageSize`] if `page_size == 0`
pub fn paginate<T>(
    items: &[T],
    page_number: i64,
    page_size: usize,
) -> Result<Page<'_, T>, PaginationError> {
    if page_number < 1 {
        return Err(PaginationError::InvalidPage(page_number));
    }
    if page_size == 0 {
        return Err(PaginationError::InvalidPageSize);
    }

    let page = page_number as u64;
    let size = page_size as u64;
    let total = items.len() as u64;

    let start = (page - 1).saturating_mul(size);
    let end = start.saturating_add(size);
    let has_more = end < total;

    let rows = &items[start.min(total) as usize..end.min(total) as usize];

    Ok(Page {
        rows,
        descriptor: PageDescriptor {
            page,
            per_page: page_size,
            total_rows: items.len(),
            has_more,
            next_page: has_more.then(|| page + 1),
        },
    })
}

/// Parse the raw `page` query parameter.
///
/// An absent parameter means page 1. Anything that is not a positive integer
/// is rejected; non-numeric and non-positive values are the same condition.
pub fn parse_page_param(raw: Option<&str>) -> Result<i64, PaginationError> {
    let Some(raw) = raw else {
        return Ok(1);
    };

    match raw.trim().parse::<i64>() {
        Ok(page) if page >= 1 => Ok(page),
        Ok(page) => Err(PaginationError::InvalidPage(page)),
        Err(_) => Err(PaginationError::InvalidPage(0)),
    }
}

/// Percent-encode a single path segment.
///
/// Every byte outside `A-Z a-z 0-9 _ . - ~` is escaped, so `/` inside a file or
/// sheet name cannot split the segment.
pub fn quote_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Build the relative URL of page `page` under `base_path`
pub fn next_page_url(base_path: &str, page: u64) -> String {
    format!("{}?page={}", base_path, page)
}

/// Response body for every paginated endpoint
#[derive(Debug, Serialize)]
pub struct PageEnvelope<'a, T: Serialize> {
    /// Source file name, when the route names one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<&'a str>,
    /// Sheet name, when the route names one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<&'a str>,
    /// 1-indexed page number
    pub page: u64,
    /// Rows per page
    pub per_page: usize,
    /// Rows in the whole collection
    pub total_rows: usize,
    /// Whether a further page exists
    pub has_more: bool,
    /// Relative URL of the next page, or null
    pub next_page: Option<String>,
    /// Rows on this page
    pub data: &'a [T],
}

impl<'a, T: Serialize> PageEnvelope<'a, T> {
    /// Wrap a page, resolving its next-page reference against `base_path`
    pub fn new(page: Page<'a, T>, base_path: &str) -> Self {
        let descriptor = page.descriptor;
        Self {
            file: None,
            sheet: None,
            page: descriptor.page,
            per_page: descriptor.per_page,
            total_rows: descriptor.total_rows,
            has_more: descriptor.has_more,
            next_page: descriptor
                .next_page
                .map(|next| next_page_url(base_path, next)),
            data: page.rows,
        }
    }

    /// Attach the file and sheet names to the envelope
    pub fn with_source(mut self, file: &'a str, sheet: &'a str) -> Self {
        self.file = Some(file);
        self.sheet = Some(sheet);
        self
    }
}
