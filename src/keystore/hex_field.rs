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

//! Case-insensitive hex decoding with contractual field-size checks.

use super::KeystoreError;

/// Decode a hex string (with or without a leading `0x`), case-insensitive.
pub fn decode(field: &'static str, s: &str) -> Result<Vec<u8>, KeystoreError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|_| KeystoreError::MalformedHex(field))
}

/// Decode a hex string into a fixed-size array, failing with `FieldSize`
/// when the decoded length does not match `N`.
pub fn decode_fixed<const N: usize>(field: &'static str, s: &str) -> Result<[u8; N], KeystoreError> {
    let bytes = decode(field, s)?;
    if bytes.len() != N {
        return Err(KeystoreError::FieldSize {
            field,
            expected: N,
            got: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}
