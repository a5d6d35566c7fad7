//! Entity tags for conditional requests.
//!
//! A tag is the SHA-256 of the canonical JSON representation of a resource. `serde_json` keeps
//! struct fields in declaration order and `Value` maps sorted, so the same representation always
//! hashes to the same tag.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex digest of the JSON representation of `representation`.
pub fn compute<T: Serialize + ?Sized>(representation: &T) -> String {
    // Serializing the wire structs cannot fail: they hold no maps with non-string keys.
    let bytes = serde_json::to_vec(representation).unwrap_or_default();
    hex::encode(Sha256::digest(&bytes))
}

/// Quoted form used in the `ETag` header.
pub fn quoted(etag: &str) -> String {
    format!("\"{etag}\"")
}

/// Does an `If-None-Match` header value match the current tag?
///
/// Accepts `*`, comma separated lists and weak validators (`W/"..."`), comparing the opaque
/// part only. A candidate without the surrounding quotes is malformed and never matches.
pub fn if_none_match(header: &str, current: &str) -> bool {
    header.split(',').map(str::trim).any(|candidate| {
        if candidate == "*" {
            return true;
        }
        let candidate = candidate.strip_prefix("W/").unwrap_or(candidate);
        candidate
            .strip_prefix('"')
            .and_then(|c| c.strip_suffix('"'))
            .is_some_and(|opaque| opaque == current)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_changes_with_representation() {
        let before = compute(&json!({"status": null}));
        let after = compute(&json!({"status": "http://zrc/statussen/1"}));
        assert_ne!(before, after);
        assert_eq!(before, compute(&json!({"status": null})));
        assert_eq!(before.len(), 64);
    }

    #[test]
    fn test_if_none_match_variants() {
        let tag = compute(&json!({"a": 1}));

        assert!(if_none_match(&quoted(&tag), &tag));
        assert!(if_none_match(&format!("W/{}", quoted(&tag)), &tag));
        assert!(if_none_match(&format!("\"old\", {}", quoted(&tag)), &tag));
        assert!(if_none_match("*", &tag));
        assert!(!if_none_match("\"old\"", &tag));
        assert!(!if_none_match("", &tag));
        assert!(!if_none_match(&tag, &tag));
        assert!(!if_none_match(&format!("W/{tag}"), &tag));
    }
}
