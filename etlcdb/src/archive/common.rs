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

//! Converters shared by several layouts.

use crate::{
    EtlResult,
    convert::ConvertContext,
    raster::reconstruct,
    text::{decode_ascii, decode_hex, decode_iso_2022_jp, decode_shift_jis, single_char},
    types::{Record, Value},
};

pub(super) const IMAGE_DATA: &str = "Image Data";
pub(super) const CHAR: &str = "char";
pub(super) const UNICODE: &str = "unicode";
pub(super) const IMAGE: &str = "image";

/// The code point of the `char` field.
pub(super) fn unicode(record: &Record, _: &ConvertContext<'_>) -> EtlResult<Value> {
    Ok(Value::UInt(u64::from(u32::from(record.get_char(CHAR)?))))
}

/// Reconstructs the `Image Data` field as a `width` x `height` raster.
pub(super) fn image(
    width: u32,
    height: u32,
    bit_depth: u8,
    scale: u8,
) -> impl Fn(&Record, &ConvertContext<'_>) -> EtlResult<Value> + Send + Sync + 'static {
    move |record, _| {
        let buffer = record.get_bytes(IMAGE_DATA)?;
        Ok(reconstruct(buffer, width, height, bit_depth, scale)?.into())
    }
}

/// Spells the sextets of a bit string field in the T56 alphabet.
pub(super) fn t56_text(
    field: &'static str,
) -> impl Fn(&Record, &ConvertContext<'_>) -> EtlResult<Value> + Send + Sync + 'static {
    move |record, context| {
        let text: String = record
            .get_bits(field)?
            .cut(6)
            .into_iter()
            .map(|sextet| context.alphabet.resolve(sextet as u8))
            .collect();
        Ok(text.into())
    }
}

/// Decodes the single byte rendered in a hex field through Shift_JIS.
pub(super) fn shift_jis_text(record: &Record, field: &str) -> EtlResult<String> {
    decode_shift_jis(&decode_hex(record.get_hex(field)?)?)
}

/// Wraps a JIS X 0208 code rendered in hex with the ISO-2022-JP escape sequences.
pub(super) fn iso_2022_jp_escaped(
    field: &'static str,
) -> impl Fn(&Record, &ConvertContext<'_>) -> EtlResult<Value> + Send + Sync + 'static {
    use crate::text::{ISO_2022_JP_ASCII_IN, ISO_2022_JP_KANJI_IN};
    move |record, _| {
        let code = record.get_hex(field)?;
        Ok(format!("{ISO_2022_JP_KANJI_IN}{code}{ISO_2022_JP_ASCII_IN}").into())
    }
}

/// Decodes an ISO-2022-JP escaped hex field into exactly one character.
pub(super) fn iso_2022_jp_char(
    field: &'static str,
) -> impl Fn(&Record, &ConvertContext<'_>) -> EtlResult<Value> + Send + Sync + 'static {
    move |record, _| {
        let text = decode_iso_2022_jp(&decode_hex(record.get_str(field)?)?)?;
        Ok(single_char(&text)?.into())
    }
}

/// Decodes a byte field as ASCII.
pub(super) fn ascii_text(
    field: &'static str,
) -> impl Fn(&Record, &ConvertContext<'_>) -> EtlResult<Value> + Send + Sync + 'static {
    move |record, _| Ok(decode_ascii(record.get_bytes(field)?)?.into())
}
