//! Multipart form data parser for file uploads.
//!
//! Parses `multipart/form-data` bodies into named parts: plain text fields and
//! file fields. This is a synchronous parser that works on the already-collected
//! body bytes. It never fails: malformed segments are dropped, and callers that
//! care can observe the drops through [`parse_multipart_with`].

use std::collections::HashMap;
use std::collections::hash_map;

use bytes::Bytes;
use filehost_model::error::{FileHostError, FileHostErrorCode};

/// An uploaded file extracted from a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// The `filename` attribute of the part's `Content-Disposition`.
    pub filename: String,
    /// The part's own `Content-Type` header, if the client sent one.
    pub content_type: Option<String>,
    /// The raw payload, byte-for-byte.
    pub data: Bytes,
}

/// One named value of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// A plain field, decoded as UTF-8 and trimmed.
    Field(String),
    /// A file field.
    File(FilePart),
}

/// A parsed multipart form-data submission.
///
/// Part names are unique; when the body repeats a name, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: HashMap<String, Part>,
}

impl MultipartForm {
    /// Look up a part by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    /// Look up a plain field by name. File parts are not returned.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        match self.parts.get(name)? {
            Part::Field(value) => Some(value),
            Part::File(_) => None,
        }
    }

    /// Look up a file part by name. Plain fields are not returned.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FilePart> {
        match self.parts.get(name)? {
            Part::File(file) => Some(file),
            Part::Field(_) => None,
        }
    }

    /// Number of parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether no part was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Iterate over `(name, part)` pairs in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, Part> {
        self.parts.iter()
    }

    /// Consume the form, returning the underlying map.
    #[must_use]
    pub fn into_parts(self) -> HashMap<String, Part> {
        self.parts
    }
}

/// Why a segment contributed nothing to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No blank line separates the part headers from the part body.
    MissingHeaderSeparator,
    /// The `Content-Disposition` header has no `name` attribute.
    MissingName,
}

/// A segment dropped by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedSegment {
    /// Zero-based position of the segment in the body.
    pub index: usize,
    /// Length of the raw segment in bytes.
    pub len: usize,
    /// Why it was dropped.
    pub reason: SkipReason,
}

/// Extract the boundary string from a `Content-Type: multipart/form-data; boundary=...` header.
///
/// # Errors
///
/// Returns an error if the Content-Type is not multipart/form-data or the
/// boundary parameter is missing or empty.
pub fn extract_boundary(content_type: &str) -> Result<String, FileHostError> {
    let params = HeaderParams::parse(content_type);
    if !params.value().eq_ignore_ascii_case("multipart/form-data") {
        return Err(FileHostError::with_message(
            FileHostErrorCode::InvalidContentType,
            format!("Expected Content-Type multipart/form-data, got: {content_type}"),
        ));
    }

    params.get("boundary").map(ToOwned::to_owned).ok_or_else(|| {
        FileHostError::with_message(
            FileHostErrorCode::InvalidContentType,
            "Missing boundary in Content-Type",
        )
    })
}

/// Parse a multipart/form-data body into named parts.
///
/// An empty boundary, or one that never appears in `body`, yields an empty form.
#[must_use]
pub fn parse_multipart(body: &[u8], boundary: &str) -> MultipartForm {
    parse_multipart_with(body, boundary, |_| {})
}

/// Parse a multipart/form-data body, reporting every dropped segment to `on_skip`.
///
/// The result is identical to [`parse_multipart`].
pub fn parse_multipart_with<F>(body: &[u8], boundary: &str, mut on_skip: F) -> MultipartForm
where
    F: FnMut(SkippedSegment),
{
    let mut form = MultipartForm::default();
    if boundary.is_empty() {
        return form;
    }

    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    // Skip the preamble (everything before the first delimiter). The preamble
    // need not end with a line break.
    let Some(first) = find_delimiter(body, delimiter, 0, false) else {
        return form;
    };
    let mut cursor = first + delimiter.len();
    let mut index = 0;

    while cursor < body.len() && !body[cursor..].starts_with(b"--") {
        let Some(next) = find_delimiter(body, delimiter, cursor, true) else {
            break;
        };

        let segment = &body[cursor..next];
        match parse_segment(segment) {
            Ok((name, part)) => {
                form.parts.insert(name, part);
            }
            Err(reason) => on_skip(SkippedSegment {
                index,
                len: segment.len(),
                reason,
            }),
        }

        index += 1;
        cursor = next + delimiter.len();
    }

    form
}

/// Turn one raw segment into a named part.
fn parse_segment(segment: &[u8]) -> Result<(String, Part), SkipReason> {
    let segment = skip_line_break(segment);
    let (headers, body) =
        split_headers_body(segment).ok_or(SkipReason::MissingHeaderSeparator)?;
    // The line break before the next delimiter belongs to the delimiter.
    let body = strip_trailing_line_break(body);

    let headers = String::from_utf8_lossy(headers);
    let disposition = header_value(&headers, "content-disposition")
        .map(HeaderParams::parse)
        .unwrap_or_default();
    let name = disposition.get("name").ok_or(SkipReason::MissingName)?;

    let part = match disposition.get("filename") {
        Some(filename) => Part::File(FilePart {
            filename: filename.to_owned(),
            content_type: header_value(&headers, "content-type")
                .filter(|v| !v.is_empty())
                .map(ToOwned::to_owned),
            data: Bytes::copy_from_slice(body),
        }),
        None => Part::Field(String::from_utf8_lossy(body).trim().to_owned()),
    };

    Ok((name.to_owned(), part))
}

/// Find the first header named `name` (case-insensitive) and return its trimmed value.
fn header_value<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
    headers.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}

/// Split a part into headers and body at the first blank line.
///
/// Both `\r\n\r\n` and bare `\n\n` are accepted; whichever comes first wins.
fn split_headers_body(part: &[u8]) -> Option<(&[u8], &[u8])> {
    let crlf = find_bytes(part, b"\r\n\r\n").map(|pos| (pos, 4));
    let lf = find_bytes(part, b"\n\n").map(|pos| (pos, 2));
    let (pos, len) = match (crlf, lf) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    Some((&part[..pos], &part[pos + len..]))
}

/// Find the next real delimiter at or after `from`.
///
/// A match only counts when it is followed by `--`, a line break (after
/// optional transport padding), or the end of the body, and, when
/// `line_anchored` is set, starts a line. Payload bytes such as
/// `--<boundary>suffix` are therefore never mistaken for one.
fn find_delimiter(
    body: &[u8],
    delimiter: &[u8],
    from: usize,
    line_anchored: bool,
) -> Option<usize> {
    let mut start = from;
    while start <= body.len() {
        let pos = start + find_bytes(&body[start..], delimiter)?;
        let at_line_start = !line_anchored || pos == 0 || body[pos - 1] == b'\n';
        if at_line_start && is_delimiter_tail(&body[pos + delimiter.len()..]) {
            return Some(pos);
        }
        start = pos + 1;
    }
    None
}

/// Whether the bytes after a candidate delimiter complete it.
fn is_delimiter_tail(rest: &[u8]) -> bool {
    if rest.starts_with(b"--") {
        return true;
    }
    let padded = skip_padding(rest);
    padded.is_empty() || padded.starts_with(b"\r\n") || padded.starts_with(b"\n")
}

/// Find the position of a needle in a haystack.
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Skip spaces and tabs.
fn skip_padding(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t'))
        .unwrap_or(data.len());
    &data[start..]
}

/// Skip transport padding and the line break that ends a delimiter line.
fn skip_line_break(data: &[u8]) -> &[u8] {
    let data = skip_padding(data);
    data.strip_prefix(b"\r\n")
        .or_else(|| data.strip_prefix(b"\n"))
        .unwrap_or(data)
}

/// Strip one trailing `\r\n` (or bare `\n`).
fn strip_trailing_line_break(data: &[u8]) -> &[u8] {
    data.strip_suffix(b"\r\n")
        .or_else(|| data.strip_suffix(b"\n"))
        .unwrap_or(data)
}

// ---------------------------------------------------------------------------
// HeaderParams
// ---------------------------------------------------------------------------

/// A tokenized header value such as `form-data; name="file"; filename="a.txt"`.
///
/// Attribute names are case-insensitive. The first occurrence of an attribute
/// wins; missing and empty attributes are both reported as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderParams {
    value: String,
    params: Vec<(String, String)>,
}

impl HeaderParams {
    /// Tokenize a header value.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut parsed = Self::default();

        for (i, segment) in split_params(input).into_iter().enumerate() {
            let segment = segment.trim();
            match segment.split_once('=') {
                Some((key, raw)) => {
                    let key = key.trim().to_ascii_lowercase();
                    if key.is_empty() || parsed.params.iter().any(|(k, _)| *k == key) {
                        continue;
                    }
                    parsed.params.push((key, unquote(raw.trim())));
                }
                None if i == 0 => parsed.value = segment.to_owned(),
                None => {}
            }
        }

        parsed
    }

    /// The leading token before the first `;` (e.g. `form-data`).
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value of attribute `name`, or `None` when it is missing or empty.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// Split on `;` outside double quotes.
fn split_params(input: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                segments.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&input[start..]);
    segments
}

/// Remove surrounding quotes, resolving `\"` and `\\` escapes.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"') else {
        return raw.to_owned();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.peek() {
                Some(&next @ ('"' | '\\')) => {
                    out.push(next);
                    chars.next();
                }
                _ => out.push('\\'),
            },
            _ => out.push(c),
        }
    }
    out
}
