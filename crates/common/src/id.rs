//! ID and token generation.

use ulid::Ulid;
use uuid::Uuid;

/// Generator for entity identifiers and access tokens.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new entity ID.
    ///
    /// IDs are lowercase ULIDs, so rows created later sort after earlier ones
    /// (modulo same-millisecond collisions).
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate an opaque bearer token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // v4 carries no timestamp
        Uuid::new_v4().simple().to_string()
    }

    /// Returns whether `id` has the shape of an ID produced by [`Self::generate`].
    #[must_use]
    pub fn is_valid_id(id: &str) -> bool {
        id.len() == 26 && Ulid::from_string(id).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
        assert!(IdGenerator::is_valid_id(&id1));
    }

    #[test]
    fn test_generate_token() {
        let id_gen = IdGenerator::new();
        let token = id_gen.generate_token();

        assert_eq!(token.len(), 32);
        assert_ne!(token, id_gen.generate_token());
        assert!(!IdGenerator::is_valid_id(&token));
    }

    #[test]
    fn test_is_valid_id_rejects_garbage() {
        assert!(!IdGenerator::is_valid_id(""));
        assert!(!IdGenerator::is_valid_id("not-an-id"));
    }
}
