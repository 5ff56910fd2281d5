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

mod common;

use common::{BitWriter, TestResult, image};
use etlcdb::{
    Archive, ArchiveReader, Co59Table, CompositeCode, ConvertContext, DecodedRecord, Layout,
    T56, Value, error::Details,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn decode_one(archive: Archive, input: &[u8], context: ConvertContext<'_>) -> anyhow::Result<DecodedRecord> {
    let format = archive.format()?;
    let mut reader = ArchiveReader::builder(input, &format)
        .context(context)
        .build();
    let decoded = reader
        .next()
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("no record decoded"))?;
    assert!(reader.next().is_none());
    assert!(
        reader.warnings().iter().all(|w| !matches!(w, etlcdb::Warning::TruncatedRecord { .. })),
        "{:?}",
        reader.warnings()
    );
    Ok(decoded)
}

fn m_record(jis_code: u8) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.uint(1, 16)
        .bytes(b"A ")
        .uint(2, 16)
        .uint(u64::from(jis_code), 8)
        .uint(0xc1, 8)
        .uint(0, 8)
        .uint(0, 8)
        .uint(1, 8)
        .uint(23, 8)
        .uint(4096, 32)
        .uint(0, 16)
        .uint(0, 16)
        .uint(0x7305, 16)
        .uint(0x7306, 16)
        .uint(3, 8)
        .uint(4, 8)
        .uint(0, 8)
        .uint(15, 8)
        .zeros(32)
        .bytes(&image(2016, &[0xf0, 0x0f]))
        .zeros(32);
    w.finish()
}

#[rstest]
#[case::ascii(0x41, 'A')]
#[case::katakana(0xb1, 'ア')]
#[case::obsolete_wi(0xa8, 'ヰ')]
#[case::obsolete_we(0xaa, 'ヱ')]
fn m_layout(#[case] jis_code: u8, #[case] expected: char) -> TestResult {
    let input = m_record(jis_code);
    assert_eq!(input.len(), 2052);

    for archive in [Archive::Etl1, Archive::Etl6, Archive::Etl7] {
        let decoded = decode_one(archive, &input, ConvertContext::default())?;
        let record = &decoded.record;

        assert_eq!(record.get_uint("Data Number")?, 1);
        assert_eq!(record.get_bytes("Character Code")?, b"A ");
        assert_eq!(record.get_hex("EBCDIC Code")?, "c1");
        assert_eq!(record.get_uint("Serial Data Number")?, 4096);
        assert_eq!(record.get_uint("Maximum Scanned Level")?, 15);
        assert_eq!(record.get_char("char")?, expected);
        assert_eq!(record.get_uint("unicode")?, u64::from(u32::from(expected)));

        let raster = record.get_raster("image")?;
        assert_eq!((raster.width(), raster.height()), (64, 63));
        assert_eq!(&raster.samples()[..4], &[240, 0, 0, 240]);
        assert!(decoded.failures.is_empty());
    }
    Ok(())
}

fn k_record(row: u64, cell: u64) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.uint(7, 36)
        .uint(17, 6)
        .zeros(30)
        .sextets(&[17, 18, 19, 0, 1, 2])
        .sextets(&[33, 34, 35, 16, 16, 16])
        .zeros(24)
        .sextets(&[row, cell])
        .zeros(180)
        .bytes(&image(2700, &[0xfc, 0x18, 0x1f]));
    w.finish()
}

#[test]
fn k_layout() -> TestResult {
    let input = k_record(16, 1);
    assert_eq!(input.len(), 2745);

    let codes: Co59Table = [(CompositeCode::new(16, 1), '亜')].into_iter().collect();
    let decoded = decode_one(Archive::Etl2, &input, ConvertContext::new(&codes, &T56))?;
    let record = &decoded.record;

    assert_eq!(record.get_uint("Serial Data Number")?, 7);
    assert_eq!(record.get_code("co59_code")?, &[16, 1]);
    assert_eq!(record.get_char("char")?, '亜');
    assert_eq!(record.get_uint("unicode")?, 0x4e9c);
    assert_eq!(record.get_str("mark_of_style")?, "A");
    assert_eq!(record.get_str("contents")?, "ABC012");
    assert_eq!(record.get_str("style")?, "JKL   ");

    let raster = record.get_raster("image")?;
    assert_eq!((raster.width(), raster.height()), (60, 60));
    assert_eq!(&raster.samples()[..4], &[252, 4, 128, 124]);
    assert!(decoded.failures.is_empty());
    Ok(())
}

#[test]
fn k_layout_without_a_code_table() -> TestResult {
    let decoded = decode_one(Archive::Etl2, &k_record(16, 1), ConvertContext::default())?;
    let record = &decoded.record;

    assert!(!record.contains("char"));
    assert!(!record.contains("unicode"));
    assert_eq!(record.get_str("contents")?, "ABC012");
    assert!(record.contains("image"));

    let failed: Vec<_> = decoded.failures.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(failed, vec!["char", "unicode"]);
    assert!(matches!(
        decoded.failures[0].error.details(),
        Details::ResolveCode(code) if *code == CompositeCode::new(16, 1)
    ));
    Ok(())
}

fn c_record(kind: u64, jis_code: u8) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.uint(11, 36)
        .uint(12, 36)
        .uint(u64::from(jis_code), 8)
        .zeros(28)
        .uint(0, 8)
        .zeros(28)
        .sextets(&[kind, 16, 16, 16])
        .sextets(&[16, 16]);
    for attribute in 0..15 {
        w.uint(attribute, 36);
    }
    w.zeros(1008).bytes(&image(2736, &[0x12]));
    w.finish()
}

#[rstest]
#[case::hiragana(24, 0xb1, "H   ", 'あ')]
#[case::hiragana_obsolete(24, 0xa8, "H   ", 'ゐ')]
#[case::katakana(34, 0xb1, "K   ", 'ア')]
#[case::katakana_obsolete(34, 0xaa, "K   ", 'ヱ')]
#[case::alphanumeric(17, 0x41, "A   ", 'A')]
fn c_layout(
    #[case] kind: u64,
    #[case] jis_code: u8,
    #[case] four_character_code: &str,
    #[case] expected: char,
) -> TestResult {
    let input = c_record(kind, jis_code);
    assert_eq!(input.len(), 2952);

    let decoded = decode_one(Archive::Etl4, &input, ConvertContext::default())?;
    let record = &decoded.record;

    assert_eq!(record.get_uint("Serial Sheet Number")?, 12);
    assert_eq!(record.get_uint("Serial Data Number (old)")?, 14);
    assert_eq!(record.get_str("four_character_code")?, four_character_code);
    assert_eq!(record.get_str("spaces")?, "  ");
    assert_eq!(record.get_char("char")?, expected);
    assert_eq!(record.get_uint("unicode")?, u64::from(u32::from(expected)));

    let raster = record.get_raster("image")?;
    assert_eq!((raster.width(), raster.height()), (72, 76));
    assert_eq!(&raster.samples()[..2], &[16, 32]);
    assert!(decoded.failures.is_empty());
    Ok(())
}

fn g_record(jis_kanji_code: u64, undefined: usize, uncertain: usize) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.uint(5, 16)
        .uint(jis_kanji_code, 16)
        .bytes(b"A.I     ")
        .uint(9, 32)
        .uint(0, 8)
        .uint(0, 8)
        .uint(2, 8)
        .uint(31, 8)
        .uint(0, 16)
        .uint(0, 16)
        .uint(0, 16)
        .uint(0, 16)
        .uint(6, 8)
        .uint(7, 8)
        .zeros(undefined)
        .bytes(&image(8128, &[0xf1]))
        .zeros(uncertain);
    w.finish()
}

#[rstest]
#[case::etl8g(Archive::Etl8g, 240, 88)]
#[case::etl9g(Archive::Etl9g, 272, 56)]
fn g_layouts(
    #[case] archive: Archive,
    #[case] undefined: usize,
    #[case] uncertain: usize,
) -> TestResult {
    let input = g_record(0x2422, undefined, uncertain);
    assert_eq!(input.len(), 8199);

    let decoded = decode_one(archive, &input, ConvertContext::default())?;
    let record = &decoded.record;

    assert_eq!(record.get_uint("Serial Sheet Number")?, 5);
    assert_eq!(record.get_hex("JIS Kanji Code")?, "2422");
    assert_eq!(record.get_uint("Sample Position Y on Sheet")?, 7);
    assert_eq!(record.get_str("jis_kanji_code")?, "1b244224221b2842");
    assert_eq!(record.get_str("jis_typical_reading")?, "A.I     ");
    assert_eq!(record.get("char"), Some(&Value::Char('あ')));
    assert_eq!(record.get_uint("unicode")?, 0x3042);

    let raster = record.get_raster("image")?;
    assert_eq!((raster.width(), raster.height()), (128, 127));
    assert_eq!(&raster.samples()[..3], &[240, 16, 0]);
    assert!(decoded.failures.is_empty());
    Ok(())
}

#[test]
fn g_layout_with_an_undecodable_code() -> TestResult {
    let input = g_record(0x7f7f, 240, 88);
    let decoded = decode_one(Archive::Etl8g, &input, ConvertContext::default())?;

    let failed: Vec<_> = decoded.failures.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(failed, vec!["char", "unicode"]);
    assert_eq!(decoded.record.get_str("jis_kanji_code")?, "1b24427f7f1b2842");
    assert!(decoded.record.contains("image"));
    Ok(())
}

fn b_record(record_length: usize, jis_kanji_code: u64) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.uint(3, 16)
        .uint(jis_kanji_code, 16)
        .bytes(b"KI  ")
        .bytes(&image(504, &[0b1000_0001]));
    w.zeros(record_length * 8 - w.bit_len());
    w.finish()
}

#[rstest]
#[case::etl8b(Archive::Etl8b, 512)]
#[case::etl9b(Archive::Etl9b, 576)]
fn b_layouts(#[case] archive: Archive, #[case] record_length: usize) -> TestResult {
    // the leading record is a header
    let mut input = vec![0xff; record_length];
    input.extend(b_record(record_length, 0x3021));

    let decoded = decode_one(archive, &input, ConvertContext::default())?;
    let record = &decoded.record;

    assert_eq!(decoded.index, 0);
    assert_eq!(decoded.offset, record_length as u64);
    assert_eq!(record.get_uint("Serial Sheet Number")?, 3);
    assert_eq!(record.get_str("jis_kanji_code")?, "1b244230211b2842");
    assert_eq!(record.get_str("jis_typical_reading")?, "KI  ");
    assert_eq!(record.get_char("char")?, '亜');
    assert_eq!(record.get_uint("unicode")?, 0x4e9c);

    let raster = record.get_raster("image")?;
    assert!(raster.is_binary());
    assert_eq!((raster.width(), raster.height()), (64, 63));
    assert_eq!(&raster.samples()[..9], &[1, 0, 0, 0, 0, 0, 0, 1, 0]);
    Ok(())
}

#[test]
fn layouts_of_all_archives() -> TestResult {
    let lengths: Vec<_> = [Layout::M, Layout::K, Layout::C, Layout::G8, Layout::B8]
        .iter()
        .map(|layout| layout.record_length())
        .collect();
    assert_eq!(lengths, vec![2052, 2745, 2952, 8199, 512]);
    assert_eq!(Archive::detect("ETL9B_1")?.layout().record_length(), 576);
    Ok(())
}
