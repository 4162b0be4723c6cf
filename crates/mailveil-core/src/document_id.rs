//! Document identifiers: caller-supplied or derived from content.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Hex characters kept from the content hash.
pub const CONTENT_ID_LEN: usize = 8;

static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{1,128}$").unwrap());

/// Key under which a document's entity map is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate a caller-supplied id. Ids double as file names, so only
    /// `[A-Za-z0-9_.-]` is allowed and `.`/`..` are refused.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if !ID_RE.is_match(&id) || id == "." || id == ".." {
            return Err(Error::InvalidDocumentId(id));
        }
        Ok(Self(id))
    }

    /// Deterministic id: first 8 hex chars of SHA-256 of the content.
    pub fn from_content(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(CONTENT_ID_LEN);
        Self(digest)
    }

    /// Caller id if given (and non-blank), else the content id.
    pub fn resolve(explicit: Option<&str>, text: &str) -> Result<Self> {
        match explicit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => Self::new(id),
            None => Ok(Self::from_content(text)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_id_is_stable() {
        let a = DocumentId::from_content("Dear Manisha, hello.");
        let b = DocumentId::from_content("Dear Manisha, hello.");
        let c = DocumentId::from_content("Dear Naveen, hello.");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), CONTENT_ID_LEN);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_empty_content_has_id() {
        // sha256("") = e3b0c442...
        assert_eq!(DocumentId::from_content("").as_str(), "e3b0c442");
    }

    #[test]
    fn test_explicit_ids_validated() {
        assert_eq!(DocumentId::resolve(Some("email_1"), "x").unwrap().as_str(), "email_1");
        assert_eq!(DocumentId::resolve(Some("  "), "").unwrap().as_str(), "e3b0c442");
        assert!(DocumentId::new("../etc/passwd").is_err());
        assert!(DocumentId::new("..").is_err());
        assert!(DocumentId::new("a/b").is_err());
    }
}
