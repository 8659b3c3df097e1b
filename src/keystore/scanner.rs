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

//! Pairs keystore JSON files with sibling password files and decodes each
//! pair independently. One bad keystore never sinks the batch.

use std::path::{Path, PathBuf};

use super::{decoder, KeystoreError, KeystoreRecord};

/// One keystore/password pair that failed to decode, with enough context to
/// act on it without re-scanning the directory.
#[derive(Debug)]
pub struct ScanFailure {
    /// Path to the offending keystore JSON file.
    pub keystore_path: PathBuf,
    /// Why the pair failed.
    pub error: ScanError,
}

/// Why a single keystore/password pair failed.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// No `<basename>.txt` was found in the password directory.
    #[error("missing password file")]
    MissingPasswordFile,
    /// The keystore or password file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The keystore failed to decode.
    #[error("decode error: {0}")]
    Decode(#[from] KeystoreError),
}

/// Outcome of scanning a directory: the successfully decoded records plus
/// per-file failure detail for callers that want more than a log line.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Keystores that decoded successfully.
    pub records: Vec<KeystoreRecord>,
    /// Keystores that did not, with the reason.
    pub failures: Vec<ScanFailure>,
}

/// Scan `keystore_dir` for `*.json` files, pair each with
/// `password_dir/<basename>.txt`, and decode independently.
///
/// Synchronous; suitable for CLI tools and tests. Async callers should
/// dispatch this to a blocking pool (`tokio::task::spawn_blocking`) since
/// scrypt/PBKDF2 derivation is CPU-bound.
pub fn scan_dir(keystore_dir: &Path, password_dir: &Path) -> std::io::Result<ScanReport> {
    let mut report = ScanReport::default();

    for entry in std::fs::read_dir(keystore_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            tracing::debug!(path = %path.display(), "skipping non-json entry");
            continue;
        }

        match decode_one(&path, password_dir) {
            Ok(record) => report.records.push(record),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "keystore decode failed");
                report.failures.push(ScanFailure {
                    keystore_path: path,
                    error,
                });
            }
        }
    }

    Ok(report)
}

fn decode_one(keystore_path: &Path, password_dir: &Path) -> Result<KeystoreRecord, ScanError> {
    let stem = keystore_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or(ScanError::MissingPasswordFile)?;
    let password_path = password_dir.join(format!("{stem}.txt"));
    if !password_path.exists() {
        return Err(ScanError::MissingPasswordFile);
    }

    let json_bytes = std::fs::read(keystore_path)?;
    let password = std::fs::read(&password_path)?;

    Ok(decoder::decode(&json_bytes, &password)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents).unwrap();
    }

    const VALID_KEYSTORE: &str = r#"{
        "crypto": {
            "kdf": {
                "function": "scrypt",
                "params": { "dklen": 32, "n": 1024, "p": 1, "r": 8, "salt": "1111111111111111111111111111111111111111111111111111111111111111" },
                "message": ""
            },
            "checksum": { "function": "sha256", "params": {}, "message": "00" },
            "cipher": { "function": "aes-128-ctr", "params": { "iv": "00" }, "message": "00" }
        },
        "path": "",
        "version": 4
    }"#;

    #[test]
    fn missing_password_file_is_reported_not_fatal() {
        let keystore_dir = tempfile::tempdir().unwrap();
        let password_dir = tempfile::tempdir().unwrap();
        write_file(keystore_dir.path(), "validator_0.json", VALID_KEYSTORE.as_bytes());

        let report = scan_dir(keystore_dir.path(), password_dir.path()).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, ScanError::MissingPasswordFile));
    }

    #[test]
    fn non_json_entries_are_skipped_silently() {
        let keystore_dir = tempfile::tempdir().unwrap();
        let password_dir = tempfile::tempdir().unwrap();
        write_file(keystore_dir.path(), "README.md", b"not a keystore");

        let report = scan_dir(keystore_dir.path(), password_dir.path()).unwrap();
        assert!(report.records.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn one_bad_keystore_does_not_abort_the_batch() {
        let keystore_dir = tempfile::tempdir().unwrap();
        let password_dir = tempfile::tempdir().unwrap();
        write_file(keystore_dir.path(), "bad.json", b"not json at all");
        write_file(password_dir.path(), "bad.txt", b"pw");

        let report = scan_dir(keystore_dir.path(), password_dir.path()).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, ScanError::Decode(KeystoreError::MalformedJson)));
    }
}
