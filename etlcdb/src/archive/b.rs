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

//! The B layouts of ETL8B and ETL9B: binarized kanji and hiragana samples.
//!
//! The first record of every B file is a header and carries no sample.

use super::{
    common::{self, IMAGE, IMAGE_DATA},
    g::kanji_pipeline,
};
use crate::{
    EtlResult,
    convert::RecordFormat,
    schema::{Field, RecordSchema},
};

pub(super) const ETL8B_RECORD_LENGTH: u32 = 512;
pub(super) const ETL9B_RECORD_LENGTH: u32 = 576;

pub(super) fn schema(record_length: u32) -> EtlResult<RecordSchema> {
    let mut fields = vec![
        Field::uint("Serial Sheet Number", 16),
        Field::hex("JIS Kanji Code", 16),
        Field::bytes("JIS Typical Reading", 4),
        Field::bytes(IMAGE_DATA, 504),
    ];
    let trailing = (record_length.saturating_sub(ETL8B_RECORD_LENGTH)) * 8;
    if trailing > 0 {
        fields.push(Field::pad("(uncertain)", trailing));
    }

    RecordSchema::builder()
        .record_length(record_length)
        .fields(fields)
        .build()
}

pub(super) fn format(record_length: u32) -> EtlResult<RecordFormat> {
    let pipeline = kanji_pipeline().with(IMAGE, common::image(64, 63, 1, 1));
    RecordFormat::new(schema(record_length)?, pipeline, true)
}
