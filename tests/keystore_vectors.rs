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

//! End-to-end ERC-2335 decode tests against the EIP-2335 reference vectors.

use amunchain::keystore::decode;

const SCRYPT_VECTOR: &str = r#"{
    "crypto": {
        "kdf": {
            "function": "scrypt",
            "params": {
                "dklen": 32,
                "n": 262144,
                "p": 1,
                "r": 8,
                "salt": "d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa"
            },
            "message": ""
        },
        "checksum": {
            "function": "sha256",
            "params": {},
            "message": "149aafa27b041f3523c53d7acba1905fa6b1c90f9fef137568101f44b531a3c"
        },
        "cipher": {
            "function": "aes-128-ctr",
            "params": { "iv": "264daa3f303d7259501c93d997d84fe" },
            "message": "54ecc8863c0550351eee5720f3be6a5d4a016025aa91cd6436cfec938d6a8d3"
        }
    },
    "pubkey": "9612d7a727c9d0a22e185a1c768478dfe919cada9266988cb32359c11f2b7b27f4ae4040902382ae2910c15e2b420d07",
    "path": "",
    "version": 4
}"#;

const EXPECTED_SECRET: &str = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26";

#[test]
fn decodes_the_eip_2335_scrypt_vector() {
    let record = decode(SCRYPT_VECTOR.as_bytes(), b"testpassword").unwrap();
    assert_eq!(hex::encode(record.privkey()), EXPECTED_SECRET);
    assert_eq!(record.readonly(), false);
}

#[test]
fn wrong_password_fails_the_checksum_not_the_decrypt() {
    let err = decode(SCRYPT_VECTOR.as_bytes(), b"not the right password").unwrap_err();
    assert_eq!(err, amunchain::keystore::KeystoreError::BadPassword);
}

#[test]
fn malformed_container_is_rejected_before_any_crypto_runs() {
    let err = decode(b"{not json", b"testpassword").unwrap_err();
    assert_eq!(err, amunchain::keystore::KeystoreError::MalformedJson);
}
