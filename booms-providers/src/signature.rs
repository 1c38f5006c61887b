//! HMAC-SHA256 webhook signature verification, shared by every
//! provider adapter (spec.md §6's webhook secrets). Each provider sends
//! the signature in a different header, but the underlying check is
//! identical: hex-encoded `HMAC-SHA256(secret, payload)`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("malformed signature header")]
    Malformed,
    #[error("signature mismatch")]
    Mismatch,
}

/// Computes the lowercase-hex HMAC-SHA256 of `payload` under `secret`.
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies `signature_hex` against the HMAC-SHA256 of `payload` under
/// `secret`, using a constant-time comparison.
pub fn verify(secret: &str, payload: &[u8], signature_hex: &str) -> Result<(), SignatureError> {
    let expected = hex::decode(signature_hex.trim()).map_err(|_| SignatureError::Malformed)?;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    mac.verify_slice(&expected).map_err(|_| SignatureError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_signature() {
        let secret = "shh";
        let payload = b"{\"ok\":true}";
        let signature = sign(secret, payload);
        assert!(verify(secret, payload, &signature).is_ok());
    }

    #[test]
    fn rejects_tampered_payload() {
        let secret = "shh";
        let signature = sign(secret, b"original");
        assert!(matches!(verify(secret, b"tampered", &signature), Err(SignatureError::Mismatch)));
    }

    #[test]
    fn rejects_malformed_header() {
        assert!(matches!(verify("shh", b"payload", "not-hex!!"), Err(SignatureError::Malformed)));
    }
}
