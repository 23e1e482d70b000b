use sha2::{Digest, Sha256};

use common::{Error, Result};

/// Content hash of a strategy's point-calculation algorithm.
///
/// Variables mutate at runtime; the fingerprint is the stable identity an
/// audit trail ties back to "which exact formula produced this award". Each
/// strategy embeds its canonical algorithm definition as a compiled-in
/// string and digests it once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// SHA-256 over the canonical algorithm definition.
    ///
    /// A blank definition fails: a strategy whose logic cannot be
    /// fingerprinted must never enter the catalog, so construction aborts
    /// instead of falling back.
    pub fn of_algorithm(definition: &str) -> Result<Self> {
        if definition.trim().is_empty() {
            return Err(Error::Fingerprint(
                "algorithm definition is empty".to_string(),
            ));
        }
        let digest = Sha256::digest(definition.as_bytes());
        Ok(Self(hex::encode(digest)))
    }

    /// 64-character lowercase hex digest.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_64_hex_chars() {
        let fp = Fingerprint::of_algorithm("award = basic + bonus").unwrap();
        assert_eq!(fp.as_hex().len(), 64);
        assert!(fp.as_hex().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!fp.as_hex().chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn identical_definitions_share_a_hash() {
        let a = Fingerprint::of_algorithm("award = basic + bonus").unwrap();
        let b = Fingerprint::of_algorithm("award = basic + bonus").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn changed_definition_changes_the_hash() {
        let a = Fingerprint::of_algorithm("award = basic + bonus").unwrap();
        let b = Fingerprint::of_algorithm("award = basic + bonus * 2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn blank_definition_is_fatal() {
        assert!(Fingerprint::of_algorithm("").is_err());
        assert!(Fingerprint::of_algorithm("   \n\t").is_err());
    }
}
