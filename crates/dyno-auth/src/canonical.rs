//! Canonical request construction for AWS Signature Version 4.
//!
//! The canonical request is:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Each component is normalized so that the signature is deterministic.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except the unreserved characters `A-Z a-z 0-9 - _ . ~` is encoded.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build the full canonical request string from its components.
///
/// Every header passed in is signed.
///
/// # Examples
///
/// ```
/// use dyno_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "GET",
///     "/test.txt",
///     &[],
///     &[("host", "examplebucket.s3.amazonaws.com")],
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(canonical.starts_with("GET\n/test.txt\n\nhost:"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    path: &str,
    query: &[(&str, &str)],
    headers: &[(&str, &str)],
    payload_hash: &str,
) -> String {
    let canonical_uri = build_canonical_uri(path);
    let canonical_query = build_canonical_query_string(query);
    let canonical_headers = build_canonical_headers(headers);
    let signed_headers = build_signed_headers_string(headers);

    format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n\n{signed_headers}\n{payload_hash}"
    )
}

/// Build the canonical URI. Each path segment is percent-encoded while the
/// `/` separators are kept. An empty path becomes `/`.
///
/// # Examples
///
/// ```
/// use dyno_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri("/test$file.text"), "/test%24file.text");
/// assert_eq!(build_canonical_uri(""), "/");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_owned();
    }
    path.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}

/// Build the canonical query string.
///
/// Keys and values are percent-encoded (including `/`), then sorted by key
/// and by value for repeated keys. A parameter with no value renders as
/// `key=`.
///
/// # Examples
///
/// ```
/// use dyno_auth::canonical::build_canonical_query_string;
///
/// assert_eq!(build_canonical_query_string(&[("lifecycle", "")]), "lifecycle=");
/// assert_eq!(build_canonical_query_string(&[("b", "2"), ("a", "x/y")]), "a=x%2Fy&b=2");
/// ```
#[must_use]
pub fn build_canonical_query_string(query: &[(&str, &str)]) -> String {
    let mut params: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| (uri_encode(k), uri_encode(v)))
        .collect();
    params.sort_unstable();

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical headers block.
///
/// Names are lowercased, values trimmed with inner whitespace runs collapsed
/// to one space, and lines sorted by name. Repeated names are joined with
/// commas. No trailing newline is added; the caller supplies the blank line
/// that follows.
#[must_use]
pub fn build_canonical_headers(headers: &[(&str, &str)]) -> String {
    lowercase_headers(headers)
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the `;`-separated, sorted list of lowercased header names.
///
/// # Examples
///
/// ```
/// use dyno_auth::canonical::build_signed_headers_string;
///
/// assert_eq!(
///     build_signed_headers_string(&[("X-Amz-Date", "x"), ("Host", "h")]),
///     "host;x-amz-date"
/// );
/// ```
#[must_use]
pub fn build_signed_headers_string(headers: &[(&str, &str)]) -> String {
    lowercase_headers(headers)
        .into_keys()
        .collect::<Vec<_>>()
        .join(";")
}

fn lowercase_headers(headers: &[(&str, &str)]) -> BTreeMap<String, String> {
    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let trimmed_value = collapse_whitespace(value.trim());
        header_map
            .entry(name.to_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&trimmed_value);
            })
            .or_insert(trimmed_value);
    }
    header_map
}

/// Percent-encode a path segment or query component.
#[must_use]
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_should_keep_slashes_in_path() {
        assert_eq!(build_canonical_uri("/a/b c/d"), "/a/b%20c/d");
        assert_eq!(build_canonical_uri("/"), "/");
    }

    #[test]
    fn test_should_encode_reserved_characters_in_path() {
        assert_eq!(build_canonical_uri("/test$file.text"), "/test%24file.text");
        assert_eq!(build_canonical_uri("/100%"), "/100%25");
    }

    #[test]
    fn test_should_encode_unicode_as_utf8_bytes() {
        assert_eq!(uri_encode("é"), "%C3%A9");
    }

    #[test]
    fn test_should_sort_and_encode_query_parameters() {
        assert_eq!(
            build_canonical_query_string(&[("prefix", "a b"), ("delimiter", "/"), ("max-keys", "2")]),
            "delimiter=%2F&max-keys=2&prefix=a%20b"
        );
    }

    #[test]
    fn test_should_render_empty_query_value() {
        assert_eq!(build_canonical_query_string(&[("lifecycle", "")]), "lifecycle=");
        assert_eq!(build_canonical_query_string(&[]), "");
    }

    #[test]
    fn test_should_sort_duplicate_query_keys_by_value() {
        assert_eq!(
            build_canonical_query_string(&[("k", "b"), ("k", "a")]),
            "k=a&k=b"
        );
    }

    #[test]
    fn test_should_build_canonical_headers_sorted_and_lowercased() {
        let headers = [
            ("X-Amz-Date", "20130524T000000Z"),
            ("Host", "examplebucket.s3.amazonaws.com"),
            ("Range", "bytes=0-9"),
            ("x-amz-content-sha256", EMPTY_HASH),
        ];
        let expected = format!(
            "host:examplebucket.s3.amazonaws.com\nrange:bytes=0-9\nx-amz-content-sha256:{EMPTY_HASH}\nx-amz-date:20130524T000000Z"
        );
        assert_eq!(build_canonical_headers(&headers), expected);
        assert_eq!(
            build_signed_headers_string(&headers),
            "host;range;x-amz-content-sha256;x-amz-date"
        );
    }

    #[test]
    fn test_should_collapse_whitespace_in_header_values() {
        let headers = [("Host", "  example.com  "), ("X-Custom", "a   b   c")];
        assert_eq!(build_canonical_headers(&headers), "host:example.com\nx-custom:a b c");
    }

    #[test]
    fn test_should_build_canonical_request_matching_aws_example() {
        use sha2::{Digest, Sha256};

        let headers = [
            ("host", "examplebucket.s3.amazonaws.com"),
            ("range", "bytes=0-9"),
            ("x-amz-content-sha256", EMPTY_HASH),
            ("x-amz-date", "20130524T000000Z"),
        ];
        let canonical = build_canonical_request("GET", "/test.txt", &[], &headers, EMPTY_HASH);

        let expected = format!(
            "GET\n/test.txt\n\nhost:examplebucket.s3.amazonaws.com\nrange:bytes=0-9\nx-amz-content-sha256:{EMPTY_HASH}\nx-amz-date:20130524T000000Z\n\nhost;range;x-amz-content-sha256;x-amz-date\n{EMPTY_HASH}"
        );
        assert_eq!(canonical, expected);

        let hash = hex::encode(Sha256::digest(canonical.as_bytes()));
        assert_eq!(
            hash,
            "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972"
        );
    }
}
