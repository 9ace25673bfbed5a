/// Pattern every request id must match.
pub const ID_PATTERN: &str = "^[A-Za-z0-9_-]{1,128}$";

/// Mint a fresh, collision-resistant request id.
pub fn mint_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// True if `id` matches [`ID_PATTERN`].
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
