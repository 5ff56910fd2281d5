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

//! The M layout of ETL1, ETL6 and ETL7: alphanumerics, symbols and katakana.

use super::common::{self, CHAR, IMAGE, IMAGE_DATA, UNICODE};
use crate::{
    EtlResult,
    convert::{ConvertContext, Pipeline, RecordFormat},
    schema::{Field, RecordSchema},
    text::{restore_obsolete_kana, single_char, widen_kana},
    types::{Record, Value},
};

pub(super) const RECORD_LENGTH: u32 = 2052;

pub(super) fn schema() -> EtlResult<RecordSchema> {
    RecordSchema::builder()
        .record_length(RECORD_LENGTH)
        .fields(vec![
            Field::uint("Data Number", 16),
            Field::bytes("Character Code", 2),
            Field::uint("Serial Sheet Number", 16),
            Field::hex("JIS Code", 8),
            Field::hex("EBCDIC Code", 8),
            Field::uint("Evaluation of Individual Character Image", 8),
            Field::uint("Evaluation of Character Group", 8),
            Field::uint("Male-Female Code", 8),
            Field::uint("Age of Writer", 8),
            Field::uint("Serial Data Number", 32),
            Field::uint("Industry Classification Code", 16),
            Field::uint("Occupation Classification Code", 16),
            Field::uint("Sheet Gatherring Date", 16),
            Field::uint("Scanning Date", 16),
            Field::uint("Sample Position Y on Sheet", 8),
            Field::uint("Sample Position X on Sheet", 8),
            Field::uint("Minimum Scanned Level", 8),
            Field::uint("Maximum Scanned Level", 8),
            Field::pad("Undefined1", 16),
            Field::pad("Undefined2", 16),
            Field::bytes(IMAGE_DATA, 2016),
            Field::pad("Undefined3", 32),
        ])
        .build()
}

/// The JIS X 0201 character of the record, with half-width katakana widened.
fn jis_char(record: &Record, _: &ConvertContext<'_>) -> EtlResult<Value> {
    let text = common::shift_jis_text(record, "JIS Code")?;
    let text = restore_obsolete_kana(&widen_kana(&text));
    Ok(single_char(&text)?.into())
}

pub(super) fn format() -> EtlResult<RecordFormat> {
    let pipeline = Pipeline::new()
        .with(CHAR, jis_char)
        .with(UNICODE, common::unicode)
        .with(IMAGE, common::image(64, 63, 4, 16));
    RecordFormat::new(schema()?, pipeline, false)
}
