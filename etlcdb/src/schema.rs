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

//! Fixed-length record schemas.
//!
//! A [`RecordSchema`] is an ordered list of [`Field`]s whose bit widths add up to exactly the
//! record length. Schemas are validated when they are built; a schema that does not describe its
//! record exactly is a programming error and never reaches the decoder.

use crate::{EtlResult, error::Details};
use bon::bon;
use std::collections::{BTreeMap, HashSet};
use strum_macros::{Display, EnumDiscriminants};

/// The type of a field together with its width in bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(FieldKind), derive(Display, Hash))]
pub enum FieldType {
    /// An unsigned, big-endian integer of at most 64 bits.
    UInt(u32),
    /// Bits rendered as a lowercase hex string, one digit per nibble.
    Hex(u32),
    /// A literal run of octets.
    Bytes(u32),
    /// An opaque bit string that converters may re-slice.
    Bits(u32),
    /// Bits that are consumed but never exposed.
    Pad(u32),
}

impl FieldType {
    /// Width of the field in bits.
    pub fn width(&self) -> u32 {
        match *self {
            FieldType::UInt(width)
            | FieldType::Hex(width)
            | FieldType::Bytes(width)
            | FieldType::Bits(width)
            | FieldType::Pad(width) => width,
        }
    }

    pub fn kind(&self) -> FieldKind {
        FieldKind::from(self)
    }

    fn check_width(&self) -> Result<(), &'static str> {
        let width = self.width();
        if width == 0 {
            return Err("fields must be at least one bit wide");
        }
        match self {
            FieldType::UInt(_) if width > 64 => Err("integers are at most 64 bits wide"),
            FieldType::Hex(_) if width % 4 != 0 => Err("hex fields must be a multiple of 4 bits"),
            FieldType::Bytes(_) if width % 8 != 0 => {
                Err("byte fields must be a multiple of 8 bits")
            }
            _ => Ok(()),
        }
    }
}

/// A named field of a [`RecordSchema`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// Key of the field in decoded records. Meaningless for padding.
    pub name: String,
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn uint(name: impl Into<String>, width: u32) -> Self {
        Self::new(name, FieldType::UInt(width))
    }

    pub fn hex(name: impl Into<String>, width: u32) -> Self {
        Self::new(name, FieldType::Hex(width))
    }

    /// A raw byte run of `octets` bytes.
    pub fn bytes(name: impl Into<String>, octets: u32) -> Self {
        Self::new(name, FieldType::Bytes(octets * 8))
    }

    pub fn bits(name: impl Into<String>, width: u32) -> Self {
        Self::new(name, FieldType::Bits(width))
    }

    pub fn pad(name: impl Into<String>, width: u32) -> Self {
        Self::new(name, FieldType::Pad(width))
    }

    #[inline]
    pub fn is_padding(&self) -> bool {
        matches!(self.field_type, FieldType::Pad(_))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.field_type.width()
    }
}

/// The layout of one fixed-length record.
#[derive(Clone, Debug)]
pub struct RecordSchema {
    record_length: u32,
    fields: Vec<Field>,
    /// Maps the names of non-padding fields to their position in `fields`.
    lookup: BTreeMap<String, usize>,
}

#[bon]
impl RecordSchema {
    /// Builds and validates a schema.
    ///
    /// Fails when the field widths do not add up to `record_length * 8`, when a field width is
    /// not valid for its type, or when two non-padding fields share a name.
    #[builder(finish_fn = build)]
    pub fn builder(record_length: u32, fields: Vec<Field>) -> EtlResult<RecordSchema> {
        let mut lookup = BTreeMap::new();
        let mut declared_bits = 0usize;

        for (position, field) in fields.iter().enumerate() {
            field
                .field_type
                .check_width()
                .map_err(|reason| Details::FieldWidth {
                    name: field.name.clone(),
                    kind: field.field_type.kind(),
                    width: field.width(),
                    reason,
                })?;
            declared_bits += field.width() as usize;

            if field.is_padding() {
                continue;
            }
            if field.name.is_empty() {
                return Err(Details::EmptyFieldName.into());
            }
            if lookup.insert(field.name.clone(), position).is_some() {
                return Err(Details::DuplicateFieldName(field.name.clone()).into());
            }
        }

        let expected_bits = record_length as usize * 8;
        if declared_bits != expected_bits {
            return Err(Details::SchemaLength {
                declared_bits,
                expected_bits,
                record_length,
            }
            .into());
        }

        Ok(RecordSchema {
            record_length,
            fields,
            lookup,
        })
    }

    /// Length of one record in octets.
    #[inline]
    pub fn record_length(&self) -> usize {
        self.record_length as usize
    }

    /// All fields in declaration order, padding included.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The field named `name`. Padding fields cannot be looked up.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.lookup.get(name).map(|&position| &self.fields[position])
    }

    /// Names of the fields a decoded record contains, in declaration order.
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|field| !field.is_padding())
            .map(|field| field.name.as_str())
    }

    pub(crate) fn output_name_set(&self) -> HashSet<&str> {
        self.output_names().collect()
    }
}
