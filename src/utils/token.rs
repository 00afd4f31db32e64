use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length")
}

/// `<session id>.<hex HMAC-SHA256 of the id>`
pub fn sign_session_id(secret: &str, id: Uuid) -> String {
    let mut mac = mac(secret);
    mac.update(id.as_bytes());
    format!("{}.{}", id, hex::encode(mac.finalize().into_bytes()))
}

/// Returns the session id when the token was signed with `secret`.
pub fn verify_session_token(secret: &str, token: &str) -> Option<Uuid> {
    let (id, signature) = token.trim().split_once('.')?;
    let id = Uuid::parse_str(id).ok()?;
    let signature = hex::decode(signature).ok()?;
    let mut mac = mac(secret);
    mac.update(id.as_bytes());
    mac.verify_slice(&signature).ok()?;
    Some(id)
}
