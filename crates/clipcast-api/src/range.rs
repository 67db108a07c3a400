//! HTTP `Range` header parsing and validation.

/// A validated byte range within a resource of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Parse a `Range: bytes=START-END` header value.
///
/// Returns `(start, Option<end>)` where `end` is `None` for open-ended ranges
/// like `bytes=500-`. `start` is required; suffix ranges (`bytes=-500`) and
/// anything non-numeric parse as `None` and are answered with 416.
pub fn parse_range_header(value: &str) -> Option<(u64, Option<u64>)> {
    let spec = value.strip_prefix("bytes=")?;
    let (start_str, end_str) = spec.split_once('-')?;

    let start: u64 = start_str.trim().parse().ok()?;
    let end_str = end_str.trim();
    let end: Option<u64> = if end_str.is_empty() {
        None
    } else {
        Some(end_str.parse().ok()?)
    };

    Some((start, end))
}

/// Resolve a parsed range against the resource size.
///
/// `None` means the range is unsatisfiable: `start` past the end, or
/// `start > end`. An `end` past the final byte is clamped, per RFC 9110.
pub fn resolve_range(start: u64, end: Option<u64>, total_size: u64) -> Option<ByteRange> {
    if total_size == 0 || start >= total_size {
        return None;
    }

    let end = end.unwrap_or(total_size - 1).min(total_size - 1);
    if start > end {
        return None;
    }

    Some(ByteRange { start, end })
}
