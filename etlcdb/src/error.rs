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

use crate::{
    resolve::CompositeCode,
    schema::FieldKind,
    types::ValueKind,
};
use std::{error::Error as _, fmt};

/// Errors encountered while decoding ETL records.
///
/// To inspect the details of the error use [`details`](Self::details) or
/// [`into_details`](Self::into_details) to get a [`Details`] which contains more precise error
/// information.
#[derive(thiserror::Error, Debug)]
#[repr(transparent)]
#[error(transparent)]
pub struct Error {
    details: Box<Details>,
}

impl Error {
    pub fn new(details: Details) -> Self {
        Self {
            details: Box::new(details),
        }
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn into_details(self) -> Details {
        *self.details
    }
}

impl From<Details> for Error {
    fn from(details: Details) -> Self {
        Self::new(details)
    }
}

#[derive(thiserror::Error)]
pub enum Details {
    #[error(
        "Fields of the schema declare {declared_bits} bits, but a record of {record_length} octets holds {expected_bits} bits"
    )]
    SchemaLength {
        declared_bits: usize,
        expected_bits: usize,
        record_length: u32,
    },

    #[error("Field '{name}' of kind {kind} has an invalid width of {width} bits: {reason}")]
    FieldWidth {
        name: String,
        kind: FieldKind,
        width: u32,
        reason: &'static str,
    },

    #[error("Field names must not be empty")]
    EmptyFieldName,

    #[error("Field '{0}' is declared more than once")]
    DuplicateFieldName(String),

    #[error("Derived field '{0}' collides with an existing field of the same name")]
    FieldNameCollision(String),

    #[error("Cannot read {width} bits at bit offset {offset}: the buffer only holds {available} bits")]
    OutOfBounds {
        offset: usize,
        width: usize,
        available: usize,
    },

    #[error("Cannot read {width} bits at once: {reason}")]
    CursorWidth { width: usize, reason: &'static str },

    #[error("Chunk of {actual} octets does not match the record length of {expected} octets")]
    ChunkLength { expected: usize, actual: usize },

    #[error("Failed to read a record from the source")]
    ReadRecord(#[source] std::io::Error),

    #[error("Failed to open '{1}'")]
    OpenSource(#[source] std::io::Error, String),

    #[error("Record has no field named '{0}'")]
    GetField(String),

    #[error("Field '{field}' was expected to hold {expected}, found {found}")]
    FieldValue {
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("There is no character for code {0} in the lookup table")]
    ResolveCode(CompositeCode),

    #[error("Field '{field}' holds a code of {parts} components, expected {expected}")]
    CodeComponents {
        field: String,
        parts: usize,
        expected: usize,
    },

    #[error("Bytes {bytes:02x?} are not valid {encoding}")]
    DecodeText {
        encoding: &'static str,
        bytes: Vec<u8>,
    },

    #[error("Invalid hex string '{0}'")]
    HexString(String),

    #[error("Expected exactly one character, got '{0}'")]
    SingleCharacter(String),

    #[error("Cannot reconstruct a raster with a bit depth of {bit_depth} scaled by {scale}")]
    RasterParameters { bit_depth: u8, scale: u8 },

    #[error(
        "Raster of {width}x{height} at {bit_depth} bits per sample needs {needed} bits, the buffer holds {available}"
    )]
    RasterTooShort {
        width: u32,
        height: u32,
        bit_depth: u8,
        needed: usize,
        available: usize,
    },

    #[error("Invalid entry '{0}' in the CO-59 table")]
    Co59Entry(String),

    #[error("Unknown archive identifier '{0}'")]
    UnknownArchive(String),
}

impl fmt::Debug for Details {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut msg = self.to_string();
        if let Some(e) = self.source() {
            msg.extend([": ", &e.to_string()]);
        }
        write!(f, "{msg}")
    }
}
