//! Bearer token codec.
//!
//! A token encodes `user_id:token_version` (URL-safe base64). The version
//! half must match the one stored on the user row; logout rotates it, which
//! invalidates every previously issued token at once.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use uuid::Uuid;

pub(crate) fn encode_token(user_id: Uuid, token_version: Uuid) -> String {
    URL_SAFE_NO_PAD.encode(format!("{user_id}:{token_version}"))
}

pub(crate) fn decode_token(token: &str) -> Option<(Uuid, Uuid)> {
    let bytes = URL_SAFE_NO_PAD.decode(token.as_bytes()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let (user_id, version) = decoded.split_once(':')?;
    Some((Uuid::parse_str(user_id).ok()?, Uuid::parse_str(version).ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let user_id = Uuid::new_v4();
        let version = Uuid::new_v4();
        let token = encode_token(user_id, version);
        assert_eq!(decode_token(&token), Some((user_id, version)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(decode_token("not a token"), None);
        assert_eq!(decode_token(""), None);
        let missing_version = URL_SAFE_NO_PAD.encode(Uuid::new_v4().to_string());
        assert_eq!(decode_token(&missing_version), None);
    }
}
