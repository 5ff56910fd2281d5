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

//! A decoder for the fixed-length binary records of the
//! **[ETL Character Database](http://etlcdb.db.aist.go.jp/)**, a family of legacy archives of
//! handwritten and printed Japanese character samples.
//!
//! Records of the archives are bit-packed: fields of 36 or 6 bits straddle byte boundaries, and
//! the sample images are stored at 1, 4 or 6 bits per pixel. Decoding a record happens in two
//! steps:
//!
//! 1. A [`RecordSchema`] describes the raw fields of a record. A [`RecordReader`] streams
//!    records out of any [`std::io::Read`] and extracts the raw fields of each one.
//! 2. A [`Pipeline`] of named converters derives higher level fields (the character identity, its
//!    code point, the reconstructed [`Raster`]) from the raw ones. A converter that fails on a
//!    record leaves its field absent and never aborts the rest of the record.
//!
//! The schemas and pipelines of every archive are available through [`Archive`], and an
//! [`ArchiveReader`] puts both steps together:
//!
//! ```no_run
//! use etlcdb::{Archive, ArchiveReader, Co59Table, ConvertContext, T56};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let path = "ETL2/ETL2_1";
//! let format = Archive::detect(path)?.format()?;
//! let codes = Co59Table::from_reader(std::fs::File::open("euc_co59.dat")?)?;
//! let context = ConvertContext::new(&codes, &T56);
//!
//! let mut reader = ArchiveReader::open(path, &format, context)?;
//! for record in reader.by_ref() {
//!     let record = record?;
//!     println!("{} {:?}", record.index, record.record.get("char"));
//! }
//! for warning in reader.warnings() {
//!     eprintln!("{warning}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Records, values and warnings implement [`serde::Serialize`], so their metadata can be written
//! out without knowing the schema they were decoded with.
//!
//! # Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade. Truncated records and failed
//! conversions are reported at the `warn` level, besides being returned to the caller.
//!
//! # MSRV
//!
//! The current MSRV is 1.88.0.

mod archive;
mod bits;
mod convert;
mod decode;
mod raster;
mod reader;

pub mod error;
pub mod resolve;
pub mod schema;
pub mod text;
pub mod types;

pub use archive::{Archive, Layout};
pub use bits::{BitCursor, BitString};
pub use convert::{ConversionFailure, ConvertContext, Converter, Pipeline, RecordFormat};
pub use decode::decode_record;
pub use error::Error;
pub use raster::{Raster, reconstruct};
pub use reader::{ArchiveReader, DecodedRecord, RecordReader, Warning, read_records};
pub use resolve::{AlphabetResolver, Co59Table, CodeResolver, CompositeCode, T56};
pub use schema::{Field, FieldKind, FieldType, RecordSchema};
pub use types::{Record, Value, ValueKind};

/// A convenience type alias for `Result`s with `Error`s.
pub type EtlResult<T> = Result<T, Error>;

#[cfg(test)]
mod tests {
    use crate::{Archive, ArchiveReader, Value};
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_an_etl8b_file_with_its_header() -> crate::EtlResult<()> {
        let format = Archive::Etl8b.format()?;
        let mut input = vec![0xaa; 512];
        let mut sample = vec![0; 512];
        // Serial Sheet Number 1, JIS Kanji Code 0x3021, reading "A   "
        sample[..8].copy_from_slice(&[0x00, 0x01, 0x30, 0x21, b'A', b' ', b' ', b' ']);
        input.extend(sample);

        let records = ArchiveReader::new(&input[..], &format).collect::<Result<Vec<_>, _>>()?;
        assert_eq!(records.len(), 1);

        let record = &records[0].record;
        assert_eq!(record.get_uint("Serial Sheet Number")?, 1);
        assert_eq!(record.get_str("jis_kanji_code")?, "1b244230211b2842");
        assert_eq!(record.get_str("jis_typical_reading")?, "A   ");
        assert_eq!(record.get("char"), Some(&Value::Char('亜')));
        assert_eq!(record.get_uint("unicode")?, 0x4e9c);
        assert!(record.get_raster("image")?.samples().iter().all(|&s| s == 0));
        assert!(records[0].failures.is_empty());
        Ok(())
    }
}
