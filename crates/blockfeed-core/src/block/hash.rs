use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Opaque block identity handed out by the hashing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockHash(String);

impl BlockHash {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "block_hash" });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BlockHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BlockHash {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BlockHash> for String {
    fn from(value: BlockHash) -> Self {
        value.0
    }
}

/// Content hashing collaborator: canonical block bytes in, identity out.
pub trait BlockHasher {
    fn hash_block(&self, canonical: &[u8]) -> String;
}

impl<F> BlockHasher for F
where
    F: Fn(&[u8]) -> String,
{
    fn hash_block(&self, canonical: &[u8]) -> String {
        self(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_hash() {
        let err = BlockHash::new("  ").expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptyField { field: "block_hash" }));
    }

    #[test]
    fn closures_are_hashers() {
        let hasher = |bytes: &[u8]| format!("len-{}", bytes.len());
        assert_eq!(hasher.hash_block(b"abc"), "len-3");
    }
}
