//! Password encryption against the service's RSA public key
//!
//! The service hands out an SPKI PEM public key and expects passwords
//! encrypted with PKCS#1 v1.5 padding, base64-encoded. This module only
//! calls the primitive; key handling and padding come from the `rsa` crate.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use goban_core::error::{HarnessError, Result};

/// Encrypt a password for submission in a register/login/reset payload
pub fn encrypt_password(password: &str, public_key_pem: &str) -> Result<String> {
    let public_key = RsaPublicKey::from_public_key_pem(public_key_pem)
        .map_err(|e| HarnessError::Encryption(format!("invalid public key: {}", e)))?;

    let mut rng = rand::thread_rng();
    let ciphertext = public_key
        .encrypt(&mut rng, Pkcs1v15Encrypt, password.as_bytes())
        .map_err(|e| HarnessError::Encryption(e.to_string()))?;

    Ok(BASE64.encode(ciphertext))
}

/// Check whether a string parses as an SPKI PEM public key
pub fn is_valid_pem(public_key_pem: &str) -> bool {
    RsaPublicKey::from_public_key_pem(public_key_pem).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs8::EncodePublicKey;
    use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};

    fn test_key() -> (RsaPrivateKey, String) {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 512).unwrap();
        let pem = private_key
            .to_public_key()
            .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
            .unwrap();
        (private_key, pem)
    }

    #[test]
    fn test_encrypt_round_trip() {
        let (private_key, pem) = test_key();

        let encrypted = encrypt_password("Test123456!", &pem).unwrap();
        let ciphertext = BASE64.decode(encrypted).unwrap();
        let decrypted = private_key.decrypt(Pkcs1v15Encrypt, &ciphertext).unwrap();

        assert_eq!(decrypted, b"Test123456!");
    }

    #[test]
    fn test_invalid_pem_rejected() {
        let err = encrypt_password("Test123456!", "not a pem").unwrap_err();
        assert_eq!(err.kind(), "encryption");
    }

    #[test]
    fn test_pem_validity() {
        let (_, pem) = test_key();
        assert!(is_valid_pem(&pem));
        assert!(!is_valid_pem("-----BEGIN PUBLIC KEY-----garbage"));
    }
}
