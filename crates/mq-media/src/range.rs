//! `Range` header resolution.
//!
//! Only the single-range form `bytes=START-[END]` is recognized. Anything
//! else (suffix ranges, multi-range lists, garbage) degrades to serving the
//! whole resource; a malformed header is never an error for the client.

/// An inclusive, non-empty byte interval of a resource of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    start: u64,
    end: u64,
    total_size: u64,
}

impl ByteRange {
    /// Build a range, checking `start <= end < total_size`.
    pub fn new(start: u64, end: u64, total_size: u64) -> Option<Self> {
        if start <= end && end < total_size {
            Some(Self {
                start,
                end,
                total_size,
            })
        } else {
            None
        }
    }

    /// The whole resource, or `None` if it is empty.
    pub fn full(total_size: u64) -> Option<Self> {
        total_size
            .checked_sub(1)
            .and_then(|end| Self::new(0, end, total_size))
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last byte offset, inclusive.
    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Number of bytes covered; always at least 1.
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total_size)
    }
}

/// Outcome of resolving a `Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedRange {
    /// Serve the entire resource with status 200.
    Full,
    /// Serve the given interval with status 206.
    Partial(ByteRange),
    /// The range starts beyond the resource; answer 416.
    Unsatisfiable { total_size: u64 },
}

impl ResolvedRange {
    /// `Content-Range` value for a 416 response.
    pub fn unsatisfied_content_range(total_size: u64) -> String {
        format!("bytes */{total_size}")
    }
}

/// Resolve an optional `Range` header value against a resource length.
///
/// `end` is clamped to the last byte. A start at or past the end of the
/// resource, or an inverted range, is unsatisfiable.
pub fn resolve(range_header: Option<&str>, total_size: u64) -> ResolvedRange {
    let Some((start, end)) = range_header.and_then(parse_range_header) else {
        return ResolvedRange::Full;
    };

    let Some(last) = total_size.checked_sub(1) else {
        return ResolvedRange::Unsatisfiable { total_size };
    };

    let end = end.unwrap_or(last).min(last);
    match ByteRange::new(start, end, total_size) {
        Some(range) => ResolvedRange::Partial(range),
        None => ResolvedRange::Unsatisfiable { total_size },
    }
}

/// Parse a `Range: bytes=START-END` header value.
///
/// Returns `(start, Option<end>)` where `end` is `None` for open-ended ranges
/// like `bytes=500-`.
pub fn parse_range_header(value: &str) -> Option<(u64, Option<u64>)> {
    let bytes_prefix = value.trim().strip_prefix("bytes=")?;
    let (start_str, end_str) = bytes_prefix.split_once('-')?;

    let start = parse_digits(start_str)?;
    let end = if end_str.is_empty() {
        None
    } else {
        Some(parse_digits(end_str)?)
    };

    Some((start, end))
}

/// Parse a non-empty run of ASCII digits; rejects signs, spaces, and lists.
fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
