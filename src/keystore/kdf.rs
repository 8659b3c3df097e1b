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

//! scrypt / PBKDF2 key derivation, producing the 32-byte `DK` ERC-2335 splits
//! into an AES-128 key and a checksum prefix.

use std::num::NonZeroU32;

use super::KeystoreError;

/// A parsed `crypto.kdf` block, ready to derive the 32-byte key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kdf {
    /// scrypt, per `crypto.kdf.params`: `dklen`, `n` (power of two), `r`, `p`, `salt`.
    Scrypt {
        /// Requested derived-key length; must be 32.
        dklen: u64,
        /// CPU/memory cost parameter; must be a power of two.
        n: u64,
        /// Block size parameter.
        r: u32,
        /// Parallelization parameter.
        p: u32,
        /// Salt bytes (32 bytes, enforced by the schema parser).
        salt: Vec<u8>,
    },
    /// PBKDF2-HMAC-SHA256, per `crypto.kdf.params`: `dklen`, `c`, `prf`, `salt`.
    Pbkdf2 {
        /// Requested derived-key length; must be 32.
        dklen: u64,
        /// Iteration count; must be nonzero.
        c: u32,
        /// Salt bytes (32 bytes, enforced by the schema parser).
        salt: Vec<u8>,
    },
}

impl Kdf {
    /// Derive the 32-byte symmetric key `DK` from a sanitized password.
    pub fn derive(&self, password: &[u8]) -> Result<[u8; 32], KeystoreError> {
        match self {
            Kdf::Scrypt { dklen, n, r, p, salt } => derive_scrypt(*dklen, *n, *r, *p, salt, password),
            Kdf::Pbkdf2 { dklen, c, salt } => derive_pbkdf2(*dklen, *c, salt, password),
        }
    }
}

fn derive_scrypt(
    dklen: u64,
    n: u64,
    r: u32,
    p: u32,
    salt: &[u8],
    password: &[u8],
) -> Result<[u8; 32], KeystoreError> {
    if dklen != 32 {
        return Err(KeystoreError::InvalidKdfParams("dklen must be 32"));
    }
    // A non-power-of-two `n` is rejected outright rather than silently
    // truncated via `log2(n)`, per the ERC-2335 hardening this crate applies.
    if n < 2 || !n.is_power_of_two() {
        return Err(KeystoreError::InvalidKdfParams("n must be a power of two >= 2"));
    }
    let log_n = n.trailing_zeros();
    let log_n: u8 = log_n
        .try_into()
        .map_err(|_| KeystoreError::InvalidKdfParams("n too large"))?;

    let params = scrypt::Params::new(log_n, r, p, 32)
        .map_err(|_| KeystoreError::InvalidKdfParams("scrypt parameters out of range"))?;

    let mut out = [0u8; 32];
    scrypt::scrypt(password, salt, &params, &mut out)
        .map_err(|_| KeystoreError::InvalidKdfParams("scrypt derivation failed"))?;
    Ok(out)
}

fn derive_pbkdf2(dklen: u64, c: u32, salt: &[u8], password: &[u8]) -> Result<[u8; 32], KeystoreError> {
    if dklen != 32 {
        return Err(KeystoreError::InvalidKdfParams("dklen must be 32"));
    }
    let iterations =
        NonZeroU32::new(c).ok_or(KeystoreError::InvalidKdfParams("c must be nonzero"))?;

    let mut out = [0u8; 32];
    ring::pbkdf2::derive(ring::pbkdf2::PBKDF2_HMAC_SHA256, iterations, salt, password, &mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_power_of_two_n() {
        let kdf = Kdf::Scrypt {
            dklen: 32,
            n: 3,
            r: 8,
            p: 1,
            salt: vec![0u8; 32],
        };
        assert!(matches!(
            kdf.derive(b"pw"),
            Err(KeystoreError::InvalidKdfParams(_))
        ));
    }

    #[test]
    fn rejects_zero_pbkdf2_iterations() {
        let kdf = Kdf::Pbkdf2 {
            dklen: 32,
            c: 0,
            salt: vec![0u8; 32],
        };
        assert!(matches!(
            kdf.derive(b"pw"),
            Err(KeystoreError::InvalidKdfParams(_))
        ));
    }

    #[test]
    fn scrypt_and_pbkdf2_agree_on_shape() {
        // Same salt/password through both KDFs should produce 32 bytes each,
        // and (overwhelmingly likely) different keys.
        let salt = vec![0x11u8; 32];
        let scrypt_dk = Kdf::Scrypt {
            dklen: 32,
            n: 1024,
            r: 8,
            p: 1,
            salt: salt.clone(),
        }
        .derive(b"testpassword")
        .unwrap();
        let pbkdf2_dk = Kdf::Pbkdf2 {
            dklen: 32,
            c: 1024,
            salt,
        }
        .derive(b"testpassword")
        .unwrap();
        assert_eq!(scrypt_dk.len(), 32);
        assert_eq!(pbkdf2_dk.len(), 32);
        assert_ne!(scrypt_dk, pbkdf2_dk);
    }
}
