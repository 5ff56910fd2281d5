// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Decoding of the legacy text encodings embedded in ETL records.
//!
//! The older archives store JIS X 0201 codes (ASCII plus half-width katakana) read through
//! Shift_JIS, the kanji archives store JIS X 0208 row/cell pairs that decode through
//! ISO-2022-JP. The helpers here also normalize kana the way the archive documentation
//! presents them: widened to full width, optionally folded to hiragana, and with the obsolete
//! kana restored.

use crate::{EtlResult, error::Details};
use encoding_rs::{Encoding, ISO_2022_JP, SHIFT_JIS};

/// Full-width forms of U+FF61..=U+FF9F, in code point order.
const FULL_WIDTH_KANA: &str = "。「」、・ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン゛゜";

const HALF_WIDTH_KANA_START: u32 = 0xff61;
const HALF_WIDTH_VOICED_MARK: char = '\u{ff9e}';
const HALF_WIDTH_SEMI_VOICED_MARK: char = '\u{ff9f}';

/// Escape sequence switching ISO-2022-JP to JIS X 0208-1983.
pub const ISO_2022_JP_KANJI_IN: &str = "1b2442";
/// Escape sequence switching ISO-2022-JP back to ASCII.
pub const ISO_2022_JP_ASCII_IN: &str = "1b2842";

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> EtlResult<String> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(Details::DecodeText {
            encoding: encoding.name(),
            bytes: bytes.to_vec(),
        }
        .into());
    }
    Ok(text.into_owned())
}

pub fn decode_shift_jis(bytes: &[u8]) -> EtlResult<String> {
    decode_with(SHIFT_JIS, bytes)
}

pub fn decode_iso_2022_jp(bytes: &[u8]) -> EtlResult<String> {
    decode_with(ISO_2022_JP, bytes)
}

/// Decodes 7-bit ASCII. Any byte above 0x7f is an error.
pub fn decode_ascii(bytes: &[u8]) -> EtlResult<String> {
    if !bytes.is_ascii() {
        return Err(Details::DecodeText {
            encoding: "ASCII",
            bytes: bytes.to_vec(),
        }
        .into());
    }
    // ASCII is valid UTF-8
    Ok(bytes.iter().copied().map(char::from).collect())
}

/// Parses a string of hex digit pairs into bytes.
pub fn decode_hex(hex: &str) -> EtlResult<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return Err(Details::HexString(hex.to_string()).into());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| Details::HexString(hex.to_string()).into())
        })
        .collect()
}

/// Returns the only character of `s`.
pub fn single_char(s: &str) -> EtlResult<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Details::SingleCharacter(s.to_string()).into()),
    }
}

fn widen_half_width_kana(c: char) -> Option<char> {
    let index = (c as u32).checked_sub(HALF_WIDTH_KANA_START)?;
    FULL_WIDTH_KANA.chars().nth(index as usize)
}

fn voiced(c: char) -> Option<char> {
    let base = c as u32;
    // voiceable kana sit on every second code point of their row, every third for ハ行
    let voiceable = match c {
        'ウ' => return Some('ヴ'),
        'カ'..='チ' => (base - 'カ' as u32) % 2 == 0,
        'ツ'..='ト' => (base - 'ツ' as u32) % 2 == 0,
        'ハ'..='ホ' => (base - 'ハ' as u32) % 3 == 0,
        _ => false,
    };
    voiceable.then(|| char::from_u32(base + 1)).flatten()
}

fn semi_voiced(c: char) -> Option<char> {
    match c {
        'ハ'..='ホ' if (c as u32 - 'ハ' as u32) % 3 == 0 => char::from_u32(c as u32 + 2),
        _ => None,
    }
}

/// Widens half-width katakana to full width, merging a following (semi-)voiced sound mark into
/// the kana it modifies. Other characters are kept as they are.
pub fn widen_kana(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        let Some(wide) = widen_half_width_kana(c) else {
            out.push(c);
            continue;
        };
        let merged = match chars.peek() {
            Some(&HALF_WIDTH_VOICED_MARK) => voiced(wide),
            Some(&HALF_WIDTH_SEMI_VOICED_MARK) => semi_voiced(wide),
            _ => None,
        };
        match merged {
            Some(merged) => {
                chars.next();
                out.push(merged);
            }
            None => out.push(wide),
        }
    }
    out
}

/// Widens ASCII, digits and half-width katakana to their full-width forms.
///
/// The quotes follow the Japanese typographic convention: `"` becomes `”` and `'` becomes `’`.
pub fn to_full_width(s: &str) -> String {
    widen_kana(s)
        .chars()
        .map(|c| match c {
            ' ' => '\u{3000}',
            '"' => '”',
            '\'' => '’',
            '!'..='~' => char::from_u32(c as u32 - 0x21 + 0xff01).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Folds full-width katakana to hiragana.
pub fn katakana_to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ァ'..='ヶ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Restores the obsolete kana ヰ/ヱ (and ゐ/ゑ) that the archives store under the codes of the
/// small ィ/ェ (and ぃ/ぇ).
pub fn restore_obsolete_kana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ィ' => 'ヰ',
            'ェ' => 'ヱ',
            'ぃ' => 'ゐ',
            'ぇ' => 'ゑ',
            _ => c,
        })
        .collect()
}
