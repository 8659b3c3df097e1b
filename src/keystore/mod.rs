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
#![warn(missing_docs)]

//! ERC-2335 validator keystore ingestion: JSON parsing, KDF, password
//! normalization, AES-128-CTR decryption and BLS12-381 pubkey binding.

mod decoder;
mod hex_field;
mod kdf;
mod password;
mod schema;
mod scanner;

pub use decoder::decode;
pub use kdf::Kdf;
pub use scanner::{scan_dir, ScanError, ScanFailure, ScanReport};

use thiserror::Error;
use zeroize::Zeroizing;

/// 48-byte BLS12-381 G1 compressed public key.
pub type PubkeyBytes = [u8; 48];

/// Keystore decode/scan errors.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum KeystoreError {
    /// The keystore JSON could not be parsed at all.
    #[error("malformed keystore json")]
    MalformedJson,
    /// `version` was present but not `4`.
    #[error("unsupported keystore version")]
    UnsupportedVersion,
    /// `path` was non-empty; only the empty derivation path is accepted.
    #[error("unsupported derivation path")]
    UnsupportedPath,
    /// `crypto.kdf.function` was neither `scrypt` nor `pbkdf2`.
    #[error("unsupported kdf function")]
    UnsupportedKdf,
    /// `crypto.kdf.params` failed a structural sanity check (e.g. `n` not a power of two).
    #[error("invalid kdf parameters: {0}")]
    InvalidKdfParams(&'static str),
    /// `crypto.cipher.function` was not `aes-128-ctr`.
    #[error("unsupported cipher function")]
    UnsupportedCipher,
    /// `crypto.checksum.function` was not `sha256`.
    #[error("unsupported checksum function")]
    UnsupportedChecksumFn,
    /// A hex field decoded to the wrong byte length.
    #[error("field {field} expected {expected} bytes, got {got}")]
    FieldSize {
        /// Name of the offending field.
        field: &'static str,
        /// Contractual length.
        expected: usize,
        /// Decoded length.
        got: usize,
    },
    /// A hex field was not valid case-insensitive hex, or had odd length.
    #[error("malformed hex in field {0}")]
    MalformedHex(&'static str),
    /// The checksum did not match; the password is wrong (or the ciphertext/checksum was tampered with).
    #[error("bad password")]
    BadPassword,
    /// The derived BLS public key did not match the `pubkey` field in the JSON.
    #[error("derived pubkey does not match keystore pubkey")]
    KeyPairMismatch,
    /// The decrypted or derived secret key was not a valid BLS12-381 scalar.
    #[error("invalid bls secret key")]
    InvalidSecretKey,
}

/// An immutable, decoded ERC-2335 keystore: a BLS12-381 keypair plus the
/// constant metadata fields this revision accepts.
///
/// `privkey` is wrapped so its backing buffer is zeroized on drop; it is
/// never mutated or cloned implicitly.
pub struct KeystoreRecord {
    pubkey: PubkeyBytes,
    privkey: Zeroizing<[u8; 32]>,
    path: String,
    readonly: bool,
}

impl KeystoreRecord {
    pub(crate) fn new(pubkey: PubkeyBytes, privkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            privkey: Zeroizing::new(privkey),
            path: String::new(),
            readonly: false,
        }
    }

    /// The 48-byte compressed BLS12-381 public key.
    pub fn pubkey(&self) -> &PubkeyBytes {
        &self.pubkey
    }

    /// The 32-byte BLS12-381 secret scalar. Lives only as long as the record does.
    pub fn privkey(&self) -> &[u8; 32] {
        &self.privkey
    }

    /// The derivation path; always empty in this revision.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this record represents a read-only (non-signing) keystore.
    /// Always `false` for records constructed from disk.
    pub fn readonly(&self) -> bool {
        self.readonly
    }
}

impl std::fmt::Debug for KeystoreRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystoreRecord")
            .field("pubkey", &hex::encode(self.pubkey))
            .field("path", &self.path)
            .field("readonly", &self.readonly)
            .finish_non_exhaustive()
    }
}
