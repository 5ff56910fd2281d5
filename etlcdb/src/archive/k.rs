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

//! The K layout of ETL2: printed characters identified by CO-59 codes.

use super::common::{self, CHAR, IMAGE, IMAGE_DATA, UNICODE};
use crate::{
    EtlResult,
    convert::{ConvertContext, Pipeline, RecordFormat},
    error::Details,
    resolve::CompositeCode,
    schema::{Field, RecordSchema},
    types::{Record, Value},
};

pub(super) const RECORD_LENGTH: u32 = 2745;

const CO59_CODE: &str = "co59_code";

pub(super) fn schema() -> EtlResult<RecordSchema> {
    RecordSchema::builder()
        .record_length(RECORD_LENGTH)
        .fields(vec![
            Field::uint("Serial Data Number", 36),
            Field::uint("Mark of Style", 6),
            Field::pad("Spaces", 30),
            Field::bits("Contents", 36),
            Field::bits("Style", 36),
            Field::pad("Zeros", 24),
            Field::bits("CO-59 Code", 12),
            Field::pad("(undefined)", 180),
            Field::bytes(IMAGE_DATA, 2700),
        ])
        .build()
}

/// The two sextets of the CO-59 code.
fn co59_code(record: &Record, _: &ConvertContext<'_>) -> EtlResult<Value> {
    Ok(Value::Code(record.get_bits("CO-59 Code")?.cut(6)))
}

fn co59_char(record: &Record, context: &ConvertContext<'_>) -> EtlResult<Value> {
    let code = record.get_code(CO59_CODE)?;
    let &[row, cell] = code else {
        return Err(Details::CodeComponents {
            field: CO59_CODE.to_string(),
            parts: code.len(),
            expected: 2,
        }
        .into());
    };
    Ok(context.codes.resolve(&CompositeCode::new(row, cell))?.into())
}

fn mark_of_style(record: &Record, context: &ConvertContext<'_>) -> EtlResult<Value> {
    let sextet = record.get_uint("Mark of Style")? as u8;
    Ok(context.alphabet.resolve(sextet).to_string().into())
}

pub(super) fn format() -> EtlResult<RecordFormat> {
    let pipeline = Pipeline::new()
        .with(CO59_CODE, co59_code)
        .with(CHAR, co59_char)
        .with(UNICODE, common::unicode)
        .with(IMAGE, common::image(60, 60, 6, 4))
        .with("mark_of_style", mark_of_style)
        .with("contents", common::t56_text("Contents"))
        .with("style", common::t56_text("Style"));
    RecordFormat::new(schema()?, pipeline, false)
}
