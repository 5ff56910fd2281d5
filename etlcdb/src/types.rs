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

//! Logic handling the values of decoded records.

use crate::{EtlResult, bits::BitString, error::Details, raster::Raster};
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumDiscriminants};

/// A value of a raw or derived field.
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(ValueKind), derive(Display, Hash))]
pub enum Value {
    /// An unsigned integer field, or a numeric code point.
    UInt(u64),
    /// A lowercase hex rendering of raw bits.
    Hex(String),
    /// A literal byte run.
    Bytes(Vec<u8>),
    /// Bits kept for later re-slicing.
    Bits(BitString),
    /// Decoded text.
    String(String),
    /// A resolved character identity.
    Char(char),
    /// A composite code, e.g. the two sextets of a CO-59 coordinate.
    Code(Vec<u64>),
    /// A reconstructed image.
    Raster(Raster),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        ValueKind::from(self)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Raster> for Value {
    fn from(value: Raster) -> Self {
        Self::Raster(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::UInt(n) => serializer.serialize_u64(*n),
            Value::Hex(s) | Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(bytes) => serializer.collect_seq(bytes),
            Value::Bits(bits) => bits.serialize(serializer),
            Value::Char(c) => serializer.serialize_char(*c),
            Value::Code(parts) => serializer.collect_seq(parts),
            Value::Raster(raster) => raster.serialize(serializer),
        }
    }
}

/// A decoded record: an ordered mapping from field names to values.
///
/// A record starts with the non-padding raw fields of its schema and then accumulates derived
/// fields in the order their converters are declared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
    /// Maps field names to their position in `fields`.
    lookup: BTreeMap<String, usize>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
            lookup: BTreeMap::new(),
        }
    }

    /// Binds `name` to `value`. An existing field of the same name is replaced in place.
    pub fn put<V: Into<Value>>(&mut self, name: impl Into<String>, value: V) {
        let name = name.into();
        let value = value.into();
        match self.lookup.get(&name) {
            Some(&position) => self.fields[position].1 = value,
            None => {
                self.lookup.insert(name.clone(), self.fields.len());
                self.fields.push((name, value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.lookup.get(name).map(|&position| &self.fields[position].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Like [`get`](Self::get), but a missing field is an error.
    pub fn field(&self, name: &str) -> EtlResult<&Value> {
        self.get(name)
            .ok_or_else(|| Details::GetField(name.to_string()).into())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_fields(self) -> Vec<(String, Value)> {
        self.fields
    }

    pub fn get_uint(&self, name: &str) -> EtlResult<u64> {
        match self.field(name)? {
            Value::UInt(n) => Ok(*n),
            other => Err(mismatch(name, ValueKind::UInt, other)),
        }
    }

    pub fn get_hex(&self, name: &str) -> EtlResult<&str> {
        match self.field(name)? {
            Value::Hex(s) => Ok(s),
            other => Err(mismatch(name, ValueKind::Hex, other)),
        }
    }

    pub fn get_bytes(&self, name: &str) -> EtlResult<&[u8]> {
        match self.field(name)? {
            Value::Bytes(bytes) => Ok(bytes),
            other => Err(mismatch(name, ValueKind::Bytes, other)),
        }
    }

    pub fn get_bits(&self, name: &str) -> EtlResult<&BitString> {
        match self.field(name)? {
            Value::Bits(bits) => Ok(bits),
            other => Err(mismatch(name, ValueKind::Bits, other)),
        }
    }

    pub fn get_str(&self, name: &str) -> EtlResult<&str> {
        match self.field(name)? {
            Value::String(s) => Ok(s),
            other => Err(mismatch(name, ValueKind::String, other)),
        }
    }

    pub fn get_char(&self, name: &str) -> EtlResult<char> {
        match self.field(name)? {
            Value::Char(c) => Ok(*c),
            other => Err(mismatch(name, ValueKind::Char, other)),
        }
    }

    pub fn get_code(&self, name: &str) -> EtlResult<&[u64]> {
        match self.field(name)? {
            Value::Code(parts) => Ok(parts),
            other => Err(mismatch(name, ValueKind::Code, other)),
        }
    }

    pub fn get_raster(&self, name: &str) -> EtlResult<&Raster> {
        match self.field(name)? {
            Value::Raster(raster) => Ok(raster),
            other => Err(mismatch(name, ValueKind::Raster, other)),
        }
    }
}

fn mismatch(field: &str, expected: ValueKind, found: &Value) -> crate::Error {
    Details::FieldValue {
        field: field.to_string(),
        expected,
        found: found.kind(),
    }
    .into()
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
