// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]

//! serde types for the ERC-2335 JSON container.
//!
//! Modeled after `ream`'s `EncryptedKeystore`/`FunctionBlock<P>` shape
//! (`{"function": ..., "params": {...}, "message": "..."}`), but `params` is
//! kept as a loosely-typed map rather than a tagged enum so unknown/invalid
//! `function` values can be mapped to the specific `Unsupported*` error
//! variants this crate's decoder distinguishes, instead of a single opaque
//! parse failure.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::KeystoreError;

/// Top-level ERC-2335 document. Unknown fields (`uuid`, `description`, ...)
/// are ignored by default since this struct does not `deny_unknown_fields`.
#[derive(Deserialize)]
pub struct KeystoreJson {
    /// Must be `4`; any other value is rejected upstream.
    pub version: u64,
    /// Must be empty; any other value is rejected upstream.
    #[serde(default)]
    pub path: String,
    /// Optional hex-encoded 48-byte public key to bind the decrypted key against.
    #[serde(default)]
    pub pubkey: Option<String>,
    /// The crypto triple.
    pub crypto: CryptoJson,
}

/// The `crypto` object.
#[derive(Deserialize)]
pub struct CryptoJson {
    /// `crypto.kdf`.
    pub kdf: RawFunctionBlock,
    /// `crypto.checksum`.
    pub checksum: RawFunctionBlock,
    /// `crypto.cipher`.
    pub cipher: RawFunctionBlock,
}

/// A `{"function": ..., "params": {...}, "message": "..."}` block whose
/// `function` has not yet been matched against a known value.
#[derive(Deserialize)]
pub struct RawFunctionBlock {
    /// The function name, e.g. `"scrypt"`, `"aes-128-ctr"`, `"sha256"`.
    pub function: String,
    /// Function-specific parameters.
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Function-specific message (hex-encoded ciphertext/checksum, or empty).
    #[serde(default)]
    pub message: String,
}

/// Parse the full document; any structural failure (missing field, wrong
/// JSON type, invalid syntax) is reported as `MalformedJson`.
pub fn parse(json_bytes: &[u8]) -> Result<KeystoreJson, KeystoreError> {
    serde_json::from_slice(json_bytes).map_err(|_| KeystoreError::MalformedJson)
}

impl RawFunctionBlock {
    /// Fetch a required `u64` parameter.
    pub fn param_u64(&self, name: &str) -> Result<u64, KeystoreError> {
        self.params
            .get(name)
            .and_then(Value::as_u64)
            .ok_or(KeystoreError::MalformedJson)
    }

    /// Fetch a required `u32` parameter.
    pub fn param_u32(&self, name: &str) -> Result<u32, KeystoreError> {
        Ok(self.param_u64(name)?.try_into().map_err(|_| KeystoreError::MalformedJson)?)
    }

    /// Fetch a required string parameter.
    pub fn param_str(&self, name: &str) -> Result<&str, KeystoreError> {
        self.params
            .get(name)
            .and_then(Value::as_str)
            .ok_or(KeystoreError::MalformedJson)
    }
}
