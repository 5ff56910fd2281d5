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

//! Sequential bit-level reads from a byte buffer.
//!
//! Bits are addressed MSB-first: bit 0 is the high bit of the first byte, and values wider than
//! the space left in a byte continue into the high bits of the next one. ETL records routinely
//! place 36-bit and 6-bit fields across byte boundaries.

use crate::{EtlResult, error::Details, schema::FieldType, types::Value};
use serde::{Serialize, Serializer};
use std::fmt;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A cursor over a byte buffer that reads fields of arbitrary bit width.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// The offset, in bits, of the next bit to be read.
    #[inline]
    pub fn position(&self) -> usize {
        self.bit_pos
    }

    /// Number of bits left in the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.bit_pos)
    }

    fn ensure(&self, width: usize) -> EtlResult<()> {
        if width > self.remaining() {
            return Err(Details::OutOfBounds {
                offset: self.bit_pos,
                width,
                available: self.data.len() * 8,
            }
            .into());
        }
        Ok(())
    }

    fn check_width(width: usize, valid: bool, reason: &'static str) -> EtlResult<()> {
        if !valid {
            return Err(Details::CursorWidth { width, reason }.into());
        }
        Ok(())
    }

    #[inline]
    fn bit_at(&self, bit_pos: usize) -> u8 {
        (self.data[bit_pos / 8] >> (7 - bit_pos % 8)) & 1
    }

    /// Reads the next `width` bits as an unsigned integer. At most 64 bits can be read at once.
    pub fn read_uint(&mut self, width: usize) -> EtlResult<u64> {
        Self::check_width(width, width <= 64, "an unsigned integer holds at most 64 bits")?;
        self.ensure(width)?;

        let mut value = 0u64;
        for pos in self.bit_pos..self.bit_pos + width {
            value = (value << 1) | u64::from(self.bit_at(pos));
        }
        self.bit_pos += width;

        Ok(value)
    }

    /// Reads the next `width` bits as a byte run. `width` must be a multiple of 8.
    pub fn read_bytes(&mut self, width: usize) -> EtlResult<Vec<u8>> {
        Self::check_width(width, width % 8 == 0, "byte runs must be a whole number of octets")?;
        self.ensure(width)?;

        if self.bit_pos % 8 == 0 {
            let start = self.bit_pos / 8;
            let bytes = self.data[start..start + width / 8].to_vec();
            self.bit_pos += width;
            return Ok(bytes);
        }

        let mut bytes = Vec::with_capacity(width / 8);
        for _ in 0..width / 8 {
            bytes.push(self.read_uint(8)? as u8);
        }
        Ok(bytes)
    }

    /// Reads the next `width` bits and renders them as a lowercase hex string of `width / 4`
    /// digits.
    pub fn read_hex(&mut self, width: usize) -> EtlResult<String> {
        Self::check_width(width, width % 4 == 0, "hex runs must be a whole number of nibbles")?;
        self.ensure(width)?;

        let mut hex = String::with_capacity(width / 4);
        for _ in 0..width / 4 {
            let nibble = self.read_uint(4)? as usize;
            hex.push(char::from(HEX_DIGITS[nibble]));
        }
        Ok(hex)
    }

    /// Reads the next `width` bits keeping their bit-level structure.
    pub fn read_bit_string(&mut self, width: usize) -> EtlResult<BitString> {
        self.ensure(width)?;

        let mut data = vec![0u8; width.div_ceil(8)];
        for i in 0..width {
            data[i / 8] |= self.bit_at(self.bit_pos + i) << (7 - i % 8);
        }
        self.bit_pos += width;

        Ok(BitString { data, len: width })
    }

    /// Advances the cursor by `width` bits without producing a value.
    pub fn skip(&mut self, width: usize) -> EtlResult<()> {
        self.ensure(width)?;
        self.bit_pos += width;
        Ok(())
    }

    /// Reads the next field of the given type.
    ///
    /// Returns `None` for padding: its bits are consumed but never exposed.
    pub fn read(&mut self, field_type: &FieldType) -> EtlResult<Option<Value>> {
        let width = field_type.width() as usize;
        let value = match field_type {
            FieldType::UInt(_) => Value::UInt(self.read_uint(width)?),
            FieldType::Hex(_) => Value::Hex(self.read_hex(width)?),
            FieldType::Bytes(_) => Value::Bytes(self.read_bytes(width)?),
            FieldType::Bits(_) => Value::Bits(self.read_bit_string(width)?),
            FieldType::Pad(_) => {
                self.skip(width)?;
                return Ok(None);
            }
        };
        Ok(Some(value))
    }
}

/// An opaque run of bits whose length need not be a multiple of 8.
///
/// Converters re-slice it with [`BitString::cut`], e.g. into the sextets of a CO-59 code.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitString {
    /// Bits packed MSB-first; unused trailing bits of the last byte are zero.
    data: Vec<u8>,
    len: usize,
}

impl BitString {
    /// Builds a bit string from the first `len` bits of `bytes`.
    ///
    /// Returns `None` if `bytes` holds fewer than `len` bits.
    pub fn from_bytes(bytes: &[u8], len: usize) -> Option<Self> {
        let mut cursor = BitCursor::new(bytes);
        cursor.read_bit_string(len).ok()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        (index < self.len).then(|| (self.data[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    /// Cuts the bit string into consecutive groups of `k` bits, each read as an unsigned
    /// integer. A trailing group shorter than `k` is yielded as is.
    ///
    /// # Panics
    ///
    /// If `k` is 0 or greater than 64.
    pub fn cut(&self, k: usize) -> Vec<u64> {
        assert!(k > 0 && k <= 64, "group width must be in 1..=64, got {k}");

        let mut cursor = BitCursor::new(&self.data);
        let mut groups = Vec::with_capacity(self.len.div_ceil(k));
        let mut left = self.len;
        while left > 0 {
            let width = left.min(k);
            // Reads stay within `len`, which is never larger than the packed data.
            groups.push(cursor.read_uint(width).unwrap_or_default());
            left -= width;
        }
        groups
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString(0b{self})")
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            f.write_str(if self.get(i) == Some(true) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl Serialize for BitString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
