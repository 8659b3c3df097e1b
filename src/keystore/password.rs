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

//! ERC-2335 password normalization: NFKD then strip control code points.
//!
//! Omitting this step is a compatibility break — it is not optional, and
//! every caller of [`sanitize`] must route passwords through it before they
//! reach the KDF.

use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

/// Normalize a raw UTF-8 password per ERC-2335: NFKD normalization, then
/// removal of `U+0000..=U+001F`, `U+007F`, and `U+0080..=U+009F`.
pub fn sanitize(raw: &str) -> Zeroizing<Vec<u8>> {
    let normalized: String = raw
        .nfkd()
        .filter(|c| !is_stripped_control(*c))
        .collect();
    Zeroizing::new(normalized.into_bytes())
}

fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}' | '\u{0080}'..='\u{009F}')
}
