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

//! The G layouts of ETL8G and ETL9G: 16-level kanji and hiragana samples.

use super::common::{self, CHAR, IMAGE, IMAGE_DATA, UNICODE};
use crate::{
    EtlResult,
    convert::{Pipeline, RecordFormat},
    schema::{Field, RecordSchema},
};

pub(super) const RECORD_LENGTH: u32 = 8199;

pub(super) const JIS_KANJI_CODE: &str = "jis_kanji_code";

/// Trailing padding of the two generations, in bits.
#[derive(Clone, Copy, Debug)]
pub(super) struct Padding {
    pub(super) undefined: u32,
    pub(super) uncertain: u32,
}

pub(super) const ETL8G: Padding = Padding {
    undefined: 240,
    uncertain: 88,
};

pub(super) const ETL9G: Padding = Padding {
    undefined: 272,
    uncertain: 56,
};

pub(super) fn schema(padding: Padding) -> EtlResult<RecordSchema> {
    RecordSchema::builder()
        .record_length(RECORD_LENGTH)
        .fields(vec![
            Field::uint("Serial Sheet Number", 16),
            Field::hex("JIS Kanji Code", 16),
            Field::bytes("JIS Typical Reading", 8),
            Field::uint("Serial Data Number", 32),
            Field::uint("Evaluation of Individual Character Image", 8),
            Field::uint("Evaluation of Character Group", 8),
            Field::uint("Male-Female Code", 8),
            Field::uint("Age of Writer", 8),
            Field::uint("Industry Classification Code", 16),
            Field::uint("Occupation Classification Code", 16),
            Field::uint("Sheet Gatherring Date", 16),
            Field::uint("Scanning Date", 16),
            Field::uint("Sample Position X on Sheet", 8),
            Field::uint("Sample Position Y on Sheet", 8),
            Field::pad("(undefined)", padding.undefined),
            Field::bytes(IMAGE_DATA, 8128),
            Field::pad("(uncertain)", padding.uncertain),
        ])
        .build()
}

/// Derivations shared by the G and B layouts, up to and including `unicode`.
pub(super) fn kanji_pipeline() -> Pipeline {
    Pipeline::new()
        .with(JIS_KANJI_CODE, common::iso_2022_jp_escaped("JIS Kanji Code"))
        .with(
            "jis_typical_reading",
            common::ascii_text("JIS Typical Reading"),
        )
        .with(CHAR, common::iso_2022_jp_char(JIS_KANJI_CODE))
        .with(UNICODE, common::unicode)
}

pub(super) fn format(padding: Padding) -> EtlResult<RecordFormat> {
    let pipeline = kanji_pipeline().with(IMAGE, common::image(128, 127, 4, 16));
    RecordFormat::new(schema(padding)?, pipeline, false)
}
