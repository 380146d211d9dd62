// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::id::Oid;
use crate::meta::Meta;
use crate::otype::Otype;
use serde::{Deserialize, Serialize};

/// The singleton holding the daemon's Ed25519 JWT signing keypair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainServer {
    pub oid: Oid,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub meta: Meta,
    /// Base64-encoded Ed25519 public key.
    pub public_key_b64: String,
    /// Base64-encoded Ed25519 private key.
    pub private_key_b64: String,
}

impl MainServer {
    pub fn singleton_oid() -> Oid {
        Oid::from_u128(0)
    }

    pub fn new(public_key: Vec<u8>, private_key: Vec<u8>) -> Self {
        use base64::Engine;
        let b64 = base64::engine::general_purpose::STANDARD;
        Self {
            oid: Self::singleton_oid(),
            version: 0,
            meta: Meta::default(),
            public_key_b64: b64.encode(public_key),
            private_key_b64: b64.encode(private_key),
        }
    }
}

super::impl_header!(MainServer, Otype::MainServer);
