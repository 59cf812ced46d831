//! Incoming URL parsing
//!
//! Splits whatever the host hands us (a bare path, a path with query and
//! fragment, or a full URL) into decoded path segments plus the parts that
//! matching ignores.

use percent_encoding::percent_decode_str;
use url::Url;

const BASE: &str = "http://sheetnav.local/";

/// A parsed navigation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Decoded, non-empty path segments
    pub segments: Vec<String>,
    /// Normalized path, still percent-encoded
    pub path: String,
    /// Decoded query pairs in order of appearance
    pub query: Vec<(String, String)>,
    /// Decoded fragment
    pub hash: Option<String>,
    raw_query: Option<String>,
    raw_hash: Option<String>,
}

impl Location {
    /// Parse a path or an http(s) URL.
    ///
    /// Returns `None` for anything else: other schemes (`mailto:x`,
    /// `foo:bar`) and segments or fragments whose percent-escapes are not
    /// valid UTF-8. A colon inside a path needs a leading slash (`/a:b`).
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        // A leading `//` would otherwise be read as a host name.
        let input = if input.starts_with("//") {
            format!("/{}", input.trim_start_matches('/'))
        } else {
            input.to_string()
        };

        let base = Url::parse(BASE).ok()?;
        let url = base.join(&input).ok()?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        let encoded: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

        let segments = encoded
            .iter()
            .map(|s| decode(s))
            .collect::<Option<Vec<_>>>()?;

        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let hash = match url.fragment().filter(|f| !f.is_empty()) {
            Some(fragment) => Some(decode(fragment)?),
            None => None,
        };

        Some(Self {
            segments,
            path: format!("/{}", encoded.join("/")),
            query,
            hash,
            raw_query: url.query().filter(|q| !q.is_empty()).map(str::to_string),
            raw_hash: url.fragment().filter(|f| !f.is_empty()).map(str::to_string),
        })
    }

    /// Same query and fragment, different path
    pub fn with_path(&self, path: &str) -> Option<Self> {
        let mut location = Self::parse(path)?;
        location.query = self.query.clone();
        location.hash = self.hash.clone();
        location.raw_query = self.raw_query.clone();
        location.raw_hash = self.raw_hash.clone();
        Some(location)
    }

    /// Path plus query and fragment as they were given
    pub fn full_path(&self) -> String {
        let mut full = self.path.clone();
        if let Some(query) = &self.raw_query {
            full.push('?');
            full.push_str(query);
        }
        if let Some(hash) = &self.raw_hash {
            full.push('#');
            full.push_str(hash);
        }
        full
    }
}

fn decode(encoded: &str) -> Option<String> {
    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path() {
        let location = Location::parse("/sheets/abc123").unwrap();
        assert_eq!(location.segments, vec!["sheets", "abc123"]);
        assert_eq!(location.path, "/sheets/abc123");
        assert!(location.query.is_empty());
        assert_eq!(location.hash, None);
        assert_eq!(location.full_path(), "/sheets/abc123");
    }

    #[test]
    fn test_query_and_fragment() {
        let location = Location::parse("/sheets/pets?tier=3&pack=turtle#food").unwrap();
        assert_eq!(location.segments, vec!["sheets", "pets"]);
        assert_eq!(
            location.query,
            vec![
                ("tier".to_string(), "3".to_string()),
                ("pack".to_string(), "turtle".to_string())
            ]
        );
        assert_eq!(location.hash.as_deref(), Some("food"));
        assert_eq!(location.full_path(), "/sheets/pets?tier=3&pack=turtle#food");
    }

    #[test]
    fn test_normalizes_slashes() {
        let location = Location::parse("//sheets///pets/").unwrap();
        assert_eq!(location.segments, vec!["sheets", "pets"]);
        assert_eq!(location.path, "/sheets/pets");

        let root = Location::parse("/").unwrap();
        assert!(root.segments.is_empty());
        assert_eq!(root.path, "/");
    }

    #[test]
    fn test_decodes_segments() {
        let location = Location::parse("/sheets/super%20auto%20pets").unwrap();
        assert_eq!(location.segments[1], "super auto pets");
        assert_eq!(location.path, "/sheets/super%20auto%20pets");
    }

    #[test]
    fn test_full_url() {
        let location = Location::parse("https://example.com/sheets?x=1").unwrap();
        assert_eq!(location.segments, vec!["sheets"]);
        assert_eq!(location.query, vec![("x".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(Location::parse("foo:bar"), None);
        assert_eq!(Location::parse("mailto:x@y"), None);
        assert_eq!(Location::parse("javascript:alert(1)"), None);
        assert_eq!(Location::parse("file:///sheets"), None);

        let colon = Location::parse("/a:b").unwrap();
        assert_eq!(colon.segments, vec!["a:b"]);
    }

    #[test]
    fn test_rejects_invalid_utf8_escapes() {
        assert_eq!(Location::parse("/sheets/%FF"), None);
        assert_eq!(Location::parse("/sheets/pets#%C3"), None);
        assert!(Location::parse("/sheets/%C3%A9").is_some());
    }

    #[test]
    fn test_with_path_keeps_query() {
        let location = Location::parse("/?ref=home#top").unwrap();
        let moved = location.with_path("/sheets").unwrap();
        assert_eq!(moved.full_path(), "/sheets?ref=home#top");
    }
}
