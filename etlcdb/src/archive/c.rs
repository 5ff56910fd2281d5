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

//! The C layout of ETL3, ETL4 and ETL5: alphanumerics, hiragana and katakana.

use super::common::{self, CHAR, IMAGE, IMAGE_DATA, UNICODE};
use crate::{
    EtlResult,
    convert::{ConvertContext, Pipeline, RecordFormat},
    schema::{Field, RecordSchema},
    text::{katakana_to_hiragana, restore_obsolete_kana, single_char, to_full_width},
    types::{Record, Value},
};

pub(super) const RECORD_LENGTH: u32 = 2952;

const FOUR_CHARACTER_CODE: &str = "four_character_code";
const SHIFT_JIS_CHAR: &str = "shift_jis_char";

/// Sample attributes, each stored as a 36-bit word.
const ATTRIBUTES: [&str; 15] = [
    "Evaluation of Individual Character Image",
    "Evaluation of Character Group",
    "Sample Position Y on Sheet",
    "Sample Position X on Sheet",
    "Male-Female Code",
    "Age of Writer",
    "Industry Classification Code",
    "Occupation Classification Code",
    "Sheet Gatherring Date",
    "Scanning Date",
    "Number of X-Axis Sampling Points",
    "Number of Y-Axis Sampling Points",
    "Number of Levels of Pixel",
    "Magnification of Scanning Lenz",
    "Serial Data Number (old)",
];

pub(super) fn schema() -> EtlResult<RecordSchema> {
    let mut fields = vec![
        Field::uint("Serial Data Number", 36),
        Field::uint("Serial Sheet Number", 36),
        Field::hex("JIS Code", 8),
        Field::pad("(pad1)", 28),
        Field::hex("EBCDIC Code", 8),
        Field::pad("(pad2)", 28),
        Field::bits("4 Character Code", 24),
        Field::bits("Spaces", 12),
    ];
    fields.extend(ATTRIBUTES.iter().map(|&name| Field::uint(name, 36)));
    fields.push(Field::pad("(undefined)", 1008));
    fields.push(Field::bytes(IMAGE_DATA, 2736));

    RecordSchema::builder()
        .record_length(RECORD_LENGTH)
        .fields(fields)
        .build()
}

fn shift_jis_char(record: &Record, _: &ConvertContext<'_>) -> EtlResult<Value> {
    Ok(common::shift_jis_text(record, "JIS Code")?.into())
}

/// The character of the record. The first letter of the four character code tells hiragana
/// (`H`) and katakana (`K`) samples apart, both of which are stored as half-width katakana.
fn kana_char(record: &Record, _: &ConvertContext<'_>) -> EtlResult<Value> {
    let text = record.get_str(SHIFT_JIS_CHAR)?;
    let text = match record.get_str(FOUR_CHARACTER_CODE)?.chars().next() {
        Some('H') => restore_obsolete_kana(&katakana_to_hiragana(&to_full_width(text))),
        Some('K') => restore_obsolete_kana(&to_full_width(text)),
        _ => text.to_string(),
    };
    Ok(single_char(&text)?.into())
}

pub(super) fn format() -> EtlResult<RecordFormat> {
    let pipeline = Pipeline::new()
        .with(FOUR_CHARACTER_CODE, common::t56_text("4 Character Code"))
        .with("spaces", common::t56_text("Spaces"))
        .with(IMAGE, common::image(72, 76, 4, 16))
        .with(SHIFT_JIS_CHAR, shift_jis_char)
        .with(CHAR, kana_char)
        .with(UNICODE, common::unicode);
    RecordFormat::new(schema()?, pipeline, false)
}
