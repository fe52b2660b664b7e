//! Confirm-token and group-id generation.
//!
//! The confirm token is the sole credential for the public confirmation
//! endpoint, so it must be unguessable: UUID v4 gives 122 bits of entropy.
//! Tokens are never reused; a resend mints a fresh one.

/// Generate a new confirmation token.
pub fn new_confirm_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a group id shared by the manuscripts of one bulk-send batch
/// for one client.
pub fn new_group_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tokens_are_distinct() {
        let tokens: HashSet<String> = (0..100).map(|_| new_confirm_token()).collect();
        assert_eq!(tokens.len(), 100);
    }

    #[test]
    fn test_token_is_hyphenated_uuid() {
        let token = new_confirm_token();
        assert_eq!(token.len(), 36);
        assert_eq!(token.matches('-').count(), 4);
    }
}
