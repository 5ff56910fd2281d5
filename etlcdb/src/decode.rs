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

//! Decoding of a single fixed-length record.

use crate::{EtlResult, bits::BitCursor, error::Details, schema::RecordSchema, types::Record};

/// Decodes one record chunk according to `schema`.
///
/// `chunk` must be exactly `schema.record_length()` octets long. The returned record holds every
/// non-padding field of the schema, in declaration order.
pub fn decode_record(schema: &RecordSchema, chunk: &[u8]) -> EtlResult<Record> {
    if chunk.len() != schema.record_length() {
        return Err(Details::ChunkLength {
            expected: schema.record_length(),
            actual: chunk.len(),
        }
        .into());
    }

    let mut cursor = BitCursor::new(chunk);
    let mut record = Record::with_capacity(schema.fields().len());
    for field in schema.fields() {
        if let Some(value) = cursor.read(&field.field_type)? {
            record.put(field.name.as_str(), value);
        }
    }
    Ok(record)
}
