//! Query string parsing and serialization.
//!
//! [`QueryParams`] is the `URLSearchParams` of this crate: an ordered,
//! multi-valued view of the `?key=value&...` part of a location. It never
//! fails to parse; malformed escapes are kept literally and invalid UTF-8 is
//! replaced.
//!
//! # Example
//!
//! ```
//! use gpui_access_gate::QueryParams;
//!
//! let query = QueryParams::from_query_string("?page=2&status=active&tag=a&tag=b");
//! assert_eq!(query.get("page"), Some("2"));
//! assert_eq!(query.get_as::<u32>("page"), Some(2));
//! assert_eq!(query.get_all("tag"), vec!["a", "b"]);
//! assert_eq!(query.to_query_string(), "page=2&status=active&tag=a&tag=b");
//! ```

/// Ordered query string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    ///
    /// A segment without `=` is read as a key with an empty value; empty
    /// segments are skipped.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
                (decode_uri_component(key), decode_uri_component(value))
            })
            .collect();

        Self { pairs }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First value for `key`, parsed as `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Append a value, keeping any existing ones.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Replace every value for `key` with a single one.
    ///
    /// The key keeps the position of its first occurrence.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(index) = self.pairs.iter().position(|(k, _)| *k == key) {
            self.pairs[index].1 = value;
            let mut seen = false;
            self.pairs.retain(|(k, _)| {
                if *k != key {
                    return true;
                }
                let keep = !seen;
                seen = true;
                keep
            });
        } else {
            self.pairs.push((key, value));
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Iterate `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize back into a query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    encode_uri_component(key),
                    encode_uri_component(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs, counting repeated keys.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Percent-encode everything outside the unreserved set, byte by byte.
pub(crate) fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(byte));
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Decode `%XX` escapes and `+`. Bad escapes are kept as written.
pub(crate) fn decode_uri_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let decoded = bytes
                    .get(i + 1..i + 3)
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                if let Some(byte) = decoded {
                    out.push(byte);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_basic() {
        let query = QueryParams::from_query_string("page=1&sort=name&status=active");

        assert_eq!(query.get("page"), Some("1"));
        assert_eq!(query.get("sort"), Some("name"));
        assert_eq!(query.get("status"), Some("active"));
        assert_eq!(query.get("missing"), None);
        assert_eq!(query.len(), 3);
    }

    #[test]
    fn test_leading_question_mark_and_bare_keys() {
        let query = QueryParams::from_query_string("?search&&team=3");
        assert_eq!(query.get("search"), Some(""));
        assert_eq!(query.get("team"), Some("3"));
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn test_multiple_values() {
        let query = QueryParams::from_query_string("program=1&program=2");
        assert_eq!(query.get_all("program"), vec!["1", "2"]);
        assert_eq!(query.get("program"), Some("1"));
    }

    #[test]
    fn test_set_collapses_repeated_key() {
        let mut query = QueryParams::from_query_string("a=1&b=2&a=3");
        query.set("a", "9");
        assert_eq!(query.to_query_string(), "a=9&b=2");

        query.set("c", "x");
        assert_eq!(query.to_query_string(), "a=9&b=2&c=x");

        query.remove("b");
        assert!(!query.contains("b"));
    }

    #[test]
    fn test_uri_encoding() {
        assert_eq!(encode_uri_component("hello world"), "hello%20world");
        assert_eq!(encode_uri_component("a@b.c"), "a%40b.c");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn test_uri_decoding() {
        assert_eq!(decode_uri_component("hello%20world"), "hello world");
        assert_eq!(decode_uri_component("hello+world"), "hello world");
        assert_eq!(decode_uri_component("%C3%A9"), "é");
    }

    #[test]
    fn test_malformed_escapes_do_not_panic() {
        assert_eq!(decode_uri_component("%"), "%");
        assert_eq!(decode_uri_component("%4"), "%4");
        assert_eq!(decode_uri_component("%zz"), "%zz");
        assert_eq!(decode_uri_component("%é"), "%é");
        assert_eq!(decode_uri_component("%FF"), "\u{FFFD}");
    }

    #[test]
    fn test_round_trip_of_encoded_values() {
        let mut query = QueryParams::new();
        query.append("search", "Jane & John");
        query.append("started_at", "2024-01-01");

        let parsed = QueryParams::from_query_string(&query.to_query_string());
        assert_eq!(parsed, query);
    }

    #[test]
    fn test_empty_query_string() {
        assert!(QueryParams::from_query_string("").is_empty());
        assert!(QueryParams::from_query_string("?").is_empty());
    }
}
