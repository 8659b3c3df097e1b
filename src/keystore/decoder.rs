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

//! Orchestrates the ERC-2335 decode algorithm: parse -> sanitize -> derive
//! -> verify checksum -> decrypt -> bind pubkey.

use aes::cipher::{KeyIvInit, StreamCipher};
use subtle::ConstantTimeEq;

use super::{hex_field, kdf::Kdf, password, schema, KeystoreError, KeystoreRecord};

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

/// Decode an ERC-2335 keystore JSON document with the given raw password
/// bytes (UTF-8), producing a bound BLS12-381 keypair.
///
/// The password is sanitized internally (NFKD + control-code stripping);
/// callers must not pre-sanitize it themselves.
pub fn decode(json_bytes: &[u8], password: &[u8]) -> Result<KeystoreRecord, KeystoreError> {
    let doc = schema::parse(json_bytes)?;

    if doc.version != 4 {
        return Err(KeystoreError::UnsupportedVersion);
    }
    if !doc.path.is_empty() {
        return Err(KeystoreError::UnsupportedPath);
    }

    let password_str = std::str::from_utf8(password).map_err(|_| KeystoreError::MalformedJson)?;
    let sanitized = password::sanitize(password_str);

    let kdf = parse_kdf(&doc.crypto.kdf)?;
    let dk = kdf.derive(&sanitized)?;

    if doc.crypto.checksum.function != "sha256" {
        return Err(KeystoreError::UnsupportedChecksumFn);
    }
    let checksum = hex_field::decode_fixed::<32>("checksum.message", &doc.crypto.checksum.message)?;

    if doc.crypto.cipher.function != "aes-128-ctr" {
        return Err(KeystoreError::UnsupportedCipher);
    }
    let iv = hex_field::decode_fixed::<16>("cipher.params.iv", doc.crypto.cipher.params.get("iv").and_then(serde_json::Value::as_str).unwrap_or_default())?;
    let ciphertext = hex_field::decode("cipher.message", &doc.crypto.cipher.message)?;

    // Password verification MUST precede any use of the decrypted plaintext.
    let mut preimage = Vec::with_capacity(16 + ciphertext.len());
    preimage.extend_from_slice(&dk[16..32]);
    preimage.extend_from_slice(&ciphertext);
    let computed = ring::digest::digest(&ring::digest::SHA256, &preimage);
    let matches: bool = computed.as_ref().ct_eq(&checksum[..]).into();
    if !matches {
        return Err(KeystoreError::BadPassword);
    }

    let mut privkey = ciphertext;
    if privkey.len() != 32 {
        return Err(KeystoreError::FieldSize {
            field: "cipher.message",
            expected: 32,
            got: privkey.len(),
        });
    }
    let mut cipher = Aes128Ctr::new((&dk[0..16]).into(), (&iv).into());
    cipher.apply_keystream(&mut privkey);

    let mut privkey_arr = [0u8; 32];
    privkey_arr.copy_from_slice(&privkey);
    zeroize::Zeroize::zeroize(&mut privkey);

    let derived_pubkey = derive_pubkey(&privkey_arr)?;

    let pubkey = match &doc.pubkey {
        Some(hex_pubkey) => {
            let supplied = hex_field::decode_fixed::<48>("pubkey", hex_pubkey)?;
            if supplied != derived_pubkey {
                return Err(KeystoreError::KeyPairMismatch);
            }
            supplied
        }
        None => derived_pubkey,
    };

    Ok(KeystoreRecord::new(pubkey, privkey_arr))
}

fn parse_kdf(block: &schema::RawFunctionBlock) -> Result<Kdf, KeystoreError> {
    match block.function.as_str() {
        "scrypt" => Ok(Kdf::Scrypt {
            dklen: block.param_u64("dklen")?,
            n: block.param_u64("n")?,
            r: block.param_u32("r")?,
            p: block.param_u32("p")?,
            salt: hex_field::decode_fixed::<32>("kdf.params.salt", block.param_str("salt")?)?.to_vec(),
        }),
        "pbkdf2" => {
            let prf = block.param_str("prf")?;
            if prf != "hmac-sha256" {
                return Err(KeystoreError::UnsupportedKdf);
            }
            Ok(Kdf::Pbkdf2 {
                dklen: block.param_u64("dklen")?,
                c: block.param_u32("c")?,
                salt: hex_field::decode_fixed::<32>("kdf.params.salt", block.param_str("salt")?)?.to_vec(),
            })
        }
        _ => Err(KeystoreError::UnsupportedKdf),
    }
}

fn derive_pubkey(privkey: &[u8; 32]) -> Result<[u8; 48], KeystoreError> {
    let sk = blst::min_pk::SecretKey::from_bytes(privkey).map_err(|_| KeystoreError::InvalidSecretKey)?;
    let pk = sk.sk_to_pk();
    Ok(pk.to_bytes())
}
