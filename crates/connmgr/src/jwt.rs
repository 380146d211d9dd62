// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal Ed25519-signed JWT minting for the `connserver` helper's
//! `KEY=<jwt>` invocation. Only what `StartConnServer` needs: an
//! `{alg:"EdDSA",typ:"JWT"}` header, an arbitrary claims object, and a
//! detached signature over `base64(header).base64(payload)`.

use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey};
use serde::Serialize;

fn b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Claims minted for the `connserver` helper process.
#[derive(Debug, Serialize)]
pub struct ConnServerClaims<'a> {
    #[serde(rename = "clientType")]
    pub client_type: &'a str,
    pub conn: &'a str,
}

pub fn mint_connserver_jwt(signing_key: &SigningKey, connection_name: &str) -> String {
    let header = serde_json::json!({"alg": "EdDSA", "typ": "JWT"});
    let claims = ConnServerClaims { client_type: "connserver", conn: connection_name };
    let header_b64 = b64(&serde_json::to_vec(&header).unwrap_or_default());
    let claims_b64 = b64(&serde_json::to_vec(&claims).unwrap_or_default());
    let signing_input = format!("{header_b64}.{claims_b64}");
    let signature: Signature = signing_key.sign(signing_input.as_bytes());
    format!("{signing_input}.{}", b64(&signature.to_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::VerifyingKey;
    use rand::rngs::OsRng;

    #[test]
    fn minted_jwt_has_three_segments_and_verifies() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key: VerifyingKey = signing_key.verifying_key();
        let jwt = mint_connserver_jwt(&signing_key, "myhost");
        let parts: Vec<&str> = jwt.split('.').collect();
        assert_eq!(parts.len(), 3);

        let signing_input = format!("{}.{}", parts[0], parts[1]);
        let sig_bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(parts[2]).unwrap();
        let sig = Signature::from_slice(&sig_bytes).unwrap();
        assert!(verifying_key.verify_strict(signing_input.as_bytes(), &sig).is_ok());
    }
}
