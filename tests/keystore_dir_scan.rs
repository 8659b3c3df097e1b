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

//! Directory-scan resilience: one corrupted keystore among three must not
//! prevent the other two from decoding.

use std::io::Write;

use amunchain::keystore::scan_dir;

const VALID_KEYSTORE: &str = r#"{
    "crypto": {
        "kdf": {
            "function": "scrypt",
            "params": {
                "dklen": 32,
                "n": 1024,
                "p": 1,
                "r": 8,
                "salt": "d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa"
            },
            "message": ""
        },
        "checksum": {
            "function": "sha256",
            "params": {},
            "message": "DEADBEEF"
        },
        "cipher": {
            "function": "aes-128-ctr",
            "params": { "iv": "264daa3f303d7259501c93d997d84fe" },
            "message": "54ecc8863c0550351eee5720f3be6a5d4a016025aa91cd6436cfec938d6a8d3"
        }
    },
    "path": "",
    "version": 4
}"#;

fn write_file(dir: &std::path::Path, name: &str, contents: &[u8]) {
    let mut f = std::fs::File::create(dir.join(name)).unwrap();
    f.write_all(contents).unwrap();
}

#[test]
fn one_corrupted_keystore_does_not_block_the_others() {
    let keystore_dir = tempfile::tempdir().unwrap();
    let password_dir = tempfile::tempdir().unwrap();

    // validator_0: well-formed but checksum does not match (wrong password
    // scenario, the most common real-world failure).
    write_file(keystore_dir.path(), "validator_0.json", VALID_KEYSTORE.as_bytes());
    write_file(password_dir.path(), "validator_0.txt", b"testpassword");

    // validator_1: not JSON at all.
    write_file(keystore_dir.path(), "validator_1.json", b"not json");
    write_file(password_dir.path(), "validator_1.txt", b"testpassword");

    // validator_2: missing its password file entirely.
    write_file(keystore_dir.path(), "validator_2.json", VALID_KEYSTORE.as_bytes());

    // A non-json file the scanner must ignore outright.
    write_file(keystore_dir.path(), "notes.txt", b"not a keystore");

    let report = scan_dir(keystore_dir.path(), password_dir.path()).unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.failures.len(), 3);
    let failed_names: Vec<String> = report
        .failures
        .iter()
        .map(|f| f.keystore_path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(failed_names.contains(&"validator_0.json".to_string()));
    assert!(failed_names.contains(&"validator_1.json".to_string()));
    assert!(failed_names.contains(&"validator_2.json".to_string()));
}
