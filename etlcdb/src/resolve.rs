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

//! Character lookups consumed by the converter chains.
//!
//! Converters never own their lookup tables. The caller builds the resolvers once, at startup,
//! and hands them to the pipeline through a [`ConvertContext`](crate::convert::ConvertContext).
//!
//! Two capabilities are needed:
//!
//! * a [`CodeResolver`] mapping a [`CompositeCode`] (the row/cell pair of a CO-59 code) to a
//!   character. Lookups may fail.
//! * an [`AlphabetResolver`] mapping a 6-bit index to a symbol. It is total over `0..64`.

use crate::{EtlResult, error::Details, text::single_char};
use log::debug;
use regex_lite::Regex;
use std::{collections::HashMap, fmt, io::Read, sync::OnceLock};

/// A two-component key resolved through an external table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeCode {
    pub row: u64,
    pub cell: u64,
}

impl CompositeCode {
    pub fn new(row: u64, cell: u64) -> Self {
        Self { row, cell }
    }
}

impl fmt::Display for CompositeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.cell)
    }
}

/// Resolves a composite code to the character it identifies.
pub trait CodeResolver: Send + Sync {
    /// Should return [`Details::ResolveCode`] when the table has no entry for `code`.
    fn resolve(&self, code: &CompositeCode) -> EtlResult<char>;
}

/// Resolves a 6-bit index to a symbol.
pub trait AlphabetResolver: Send + Sync {
    /// Only the low 6 bits of `sextet` are significant.
    fn resolve(&self, sextet: u8) -> char;
}

const T56_SYMBOLS: &[u8; 64] = b"0123456789[#@:>? ABCDEFGHI&.](<  JKLMNOPQR-$*);'|/STUVWXYZ ,%=\"!";

/// The 64 symbol alphabet the ETL archives use for their coded text fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct T56;

impl AlphabetResolver for T56 {
    fn resolve(&self, sextet: u8) -> char {
        char::from(T56_SYMBOLS[usize::from(sextet & 0x3f)])
    }
}

/// An in-memory CO-59 table.
#[derive(Clone, Debug, Default)]
pub struct Co59Table {
    entries: HashMap<CompositeCode, char>,
}

impl Co59Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: CompositeCode, character: char) -> Option<char> {
        self.entries.insert(code, character)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses the published table format: whitespace separated `<char>:<row>,<cell>` entries.
    pub fn parse_str(text: &str) -> EtlResult<Self> {
        static ENTRY: OnceLock<Regex> = OnceLock::new();
        let entry = ENTRY.get_or_init(|| {
            Regex::new(r"^(?P<char>[^:]+):(?P<row>[0-9]+),(?P<cell>[0-9]+)$")
                .expect("Regex is valid")
        });

        let mut table = Self::new();
        for token in text.split_whitespace() {
            let caps = entry
                .captures(token)
                .ok_or_else(|| Details::Co59Entry(token.to_string()))?;
            let character = single_char(&caps["char"])
                .map_err(|_| Details::Co59Entry(token.to_string()))?;
            let row = caps["row"]
                .parse()
                .map_err(|_| Details::Co59Entry(token.to_string()))?;
            let cell = caps["cell"]
                .parse()
                .map_err(|_| Details::Co59Entry(token.to_string()))?;
            table.insert(CompositeCode::new(row, cell), character);
        }

        debug!("Parsed a CO-59 table of {} entries", table.len());
        Ok(table)
    }

    /// Parses an EUC-JP encoded table, the encoding the archive distributes it in.
    pub fn from_euc_jp(bytes: &[u8]) -> EtlResult<Self> {
        let (text, had_errors) = encoding_rs::EUC_JP.decode_without_bom_handling(bytes);
        if had_errors {
            return Err(Details::DecodeText {
                encoding: encoding_rs::EUC_JP.name(),
                bytes: bytes.iter().copied().take(16).collect(),
            }
            .into());
        }
        Self::parse_str(&text)
    }

    /// Reads an EUC-JP encoded table from `reader`.
    pub fn from_reader<R: Read>(mut reader: R) -> EtlResult<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| Details::OpenSource(e, "CO-59 table".to_string()))?;
        Self::from_euc_jp(&bytes)
    }
}

impl FromIterator<(CompositeCode, char)> for Co59Table {
    fn from_iter<T: IntoIterator<Item = (CompositeCode, char)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl CodeResolver for Co59Table {
    fn resolve(&self, code: &CompositeCode) -> EtlResult<char> {
        self.entries
            .get(code)
            .copied()
            .ok_or_else(|| Details::ResolveCode(*code).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn t56_alphabet() {
        assert_eq!(T56.resolve(0), '0');
        assert_eq!(T56.resolve(17), 'A');
        assert_eq!(T56.resolve(33), 'J');
        assert_eq!(T56.resolve(50), 'S');
        assert_eq!(T56.resolve(16), ' ');
        assert_eq!(T56.resolve(63), '!');
        // only the low six bits are significant
        assert_eq!(T56.resolve(64 + 17), 'A');
    }

    #[test]
    fn t56_is_total() {
        let symbols: String = (0..64).map(|i| T56.resolve(i)).collect();
        assert_eq!(symbols.chars().count(), 64);
    }

    #[test]
    fn parse_co59_entries() -> EtlResult<()> {
        let table = Co59Table::parse_str("亜:16,1 唖:16,2\n娃:16,3\n")?;
        assert_eq!(table.len(), 3);
        assert_eq!(table.resolve(&CompositeCode::new(16, 2))?, '唖');
        Ok(())
    }

    #[test]
    fn missing_code_is_a_lookup_error() {
        let table: Co59Table = [(CompositeCode::new(1, 1), 'あ')].into_iter().collect();
        let err = table.resolve(&CompositeCode::new(1, 2)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "There is no character for code (1, 2) in the lookup table"
        );
    }

    #[test]
    fn invalid_co59_entry() {
        let err = Co59Table::parse_str("亜:16").unwrap_err();
        assert!(matches!(err.details(), Details::Co59Entry(token) if token == "亜:16"));
    }

    #[test]
    fn co59_from_euc_jp() -> EtlResult<()> {
        // "亜:16,1" in EUC-JP
        let bytes = [0xb0, 0xa1, b':', b'1', b'6', b',', b'1'];
        let table = Co59Table::from_reader(&bytes[..])?;
        assert_eq!(table.resolve(&CompositeCode::new(16, 1))?, '亜');
        Ok(())
    }
}
