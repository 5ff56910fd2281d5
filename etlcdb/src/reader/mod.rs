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

//! Logic handling reading ETL archives at user level.

mod chunk;

use crate::{
    EtlResult,
    convert::{ConversionFailure, ConvertContext, RecordFormat},
    decode::decode_record,
    error::Details,
    schema::RecordSchema,
    types::Record,
};
use bon::bon;
use chunk::{Chunks, Fill};
use log::{debug, warn};
use serde::Serialize;
use std::{
    fmt,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

/// A recoverable problem met while reading an archive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The source ended in the middle of a record. The partial record was discarded.
    TruncatedRecord {
        offset: u64,
        expected: usize,
        actual: usize,
    },
    /// A converter failed on the record starting at `offset`.
    ConversionFailed {
        offset: u64,
        field: String,
        reason: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TruncatedRecord {
                offset,
                expected,
                actual,
            } => write!(
                f,
                "Discarded a truncated record of {actual} octets at offset {offset}, expected {expected}"
            ),
            Warning::ConversionFailed {
                offset,
                field,
                reason,
            } => write!(
                f,
                "Failed to convert field '{field}' of the record at offset {offset}: {reason}"
            ),
        }
    }
}

/// Streams raw records out of a source of fixed-length records.
///
/// To be used as an iterator:
///
/// ```no_run
/// # use etlcdb::{Archive, RecordReader};
/// # use std::io::Cursor;
/// # let input = Cursor::new(Vec::<u8>::new());
/// let format = Archive::Etl1.format().unwrap();
/// for record in RecordReader::new(input, format.schema()) {
///     match record {
///         Ok(r) => println!("{:?}", r.get("Serial Data Number")),
///         Err(e) => println!("Error: {}", e),
///     };
/// }
/// ```
///
/// The sequence ends at the end of the source, after a truncated final record, or after the
/// first I/O error. The source is released as soon as the sequence ends.
#[derive(Debug)]
pub struct RecordReader<'a, R> {
    chunks: Chunks<R>,
    schema: &'a RecordSchema,
    skip_first: bool,
    count: u64,
    warnings: Vec<Warning>,
}

#[bon]
impl<'a, R: Read> RecordReader<'a, R> {
    /// Creates a `RecordReader` that decodes every record of `source`.
    pub fn new(source: R, schema: &'a RecordSchema) -> RecordReader<'a, R> {
        RecordReader::builder(source, schema).build()
    }

    /// Creates a `RecordReader`, optionally discarding the first record of the source.
    #[builder(finish_fn = build)]
    pub fn builder(
        #[builder(start_fn)] source: R,
        #[builder(start_fn)] schema: &'a RecordSchema,
        #[builder(default)] skip_first: bool,
    ) -> RecordReader<'a, R> {
        RecordReader {
            chunks: Chunks::new(source, schema.record_length()),
            schema,
            skip_first,
            count: 0,
            warnings: Vec::new(),
        }
    }

    #[inline]
    pub fn schema(&self) -> &RecordSchema {
        self.schema
    }

    /// Number of bytes consumed from the source so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.chunks.consumed
    }

    /// Warnings raised so far.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Reads the next record together with the byte offset it starts at.
    pub fn next_with_offset(&mut self) -> EtlResult<Option<(u64, Record)>> {
        loop {
            if self.chunks.is_closed() {
                return Ok(None);
            }

            let offset = self.chunks.consumed;
            match self.chunks.fill() {
                Err(e) => {
                    self.chunks.close();
                    return Err(Details::ReadRecord(e).into());
                }
                Ok(Fill::End) => {
                    debug!("Reached the end of the source after {} records", self.count);
                    self.chunks.close();
                    return Ok(None);
                }
                Ok(Fill::Partial(actual)) => {
                    let expected = self.schema.record_length();
                    warn!(
                        "Discarding a truncated record of {actual} octets at offset {offset}, expected {expected}"
                    );
                    self.warnings.push(Warning::TruncatedRecord {
                        offset,
                        expected,
                        actual,
                    });
                    self.chunks.close();
                    return Ok(None);
                }
                Ok(Fill::Full) if self.skip_first => {
                    debug!("Skipping the leading record at offset {offset}");
                    self.skip_first = false;
                }
                Ok(Fill::Full) => {
                    self.skip_first = false;
                    let record = decode_record(self.schema, &self.chunks.buf)?;
                    self.count += 1;
                    return Ok(Some((offset, record)));
                }
            }
        }
    }
}

impl<R: Read> Iterator for RecordReader<'_, R> {
    type Item = EtlResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_with_offset() {
            Ok(next) => next.map(|(_, record)| Ok(record)),
            Err(e) => {
                // to prevent keep on reading after the first error occurs
                self.chunks.close();
                Some(Err(e))
            }
        }
    }
}

/// Decodes the records of `source` lazily. Shorthand for [`RecordReader::builder`].
pub fn read_records<R: Read>(
    source: R,
    schema: &RecordSchema,
    skip_first: bool,
) -> RecordReader<'_, R> {
    RecordReader::builder(source, schema)
        .skip_first(skip_first)
        .build()
}

/// A fully converted record of an archive.
#[derive(Debug, Serialize)]
pub struct DecodedRecord {
    /// Position of the record among the yielded records, starting at 0.
    pub index: u64,
    /// Byte offset of the record in the source.
    pub offset: u64,
    pub record: Record,
    /// Converters that failed on this record.
    pub failures: Vec<ConversionFailure>,
}

/// Decodes the records of an archive and derives their fields.
///
/// ```no_run
/// # use etlcdb::{Archive, ArchiveReader, ConvertContext};
/// let format = Archive::Etl8b.format().unwrap();
/// let reader = ArchiveReader::open("ETL8B2C1", &format, ConvertContext::default()).unwrap();
/// for record in reader {
///     let record = record.unwrap();
///     println!("{}: {:?}", record.index, record.record.get("char"));
/// }
/// ```
#[derive(Debug)]
pub struct ArchiveReader<'a, R> {
    records: RecordReader<'a, R>,
    format: &'a RecordFormat,
    context: ConvertContext<'a>,
    index: u64,
    warnings: Vec<Warning>,
}

#[bon]
impl<'a, R: Read> ArchiveReader<'a, R> {
    pub fn new(source: R, format: &'a RecordFormat) -> ArchiveReader<'a, R> {
        ArchiveReader::builder(source, format).build()
    }

    /// Creates an `ArchiveReader`.
    ///
    /// Without a `context` the converters see the T56 alphabet and an empty CO-59 table.
    /// `skip_first` defaults to the setting of the format.
    #[builder(finish_fn = build)]
    pub fn builder(
        #[builder(start_fn)] source: R,
        #[builder(start_fn)] format: &'a RecordFormat,
        context: Option<ConvertContext<'a>>,
        skip_first: Option<bool>,
    ) -> ArchiveReader<'a, R> {
        let records = RecordReader::builder(source, format.schema())
            .skip_first(skip_first.unwrap_or(format.skip_first()))
            .build();
        ArchiveReader {
            records,
            format,
            context: context.unwrap_or_default(),
            index: 0,
            warnings: Vec::new(),
        }
    }

    #[inline]
    pub fn format(&self) -> &RecordFormat {
        self.format
    }

    /// Number of bytes consumed from the source so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.records.position()
    }

    /// Truncation and conversion warnings raised so far.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    fn read_next(&mut self) -> EtlResult<Option<DecodedRecord>> {
        let next = self.records.next_with_offset();
        self.warnings.append(&mut self.records.take_warnings());
        let Some((offset, mut record)) = next? else {
            return Ok(None);
        };

        let failures = self.format.pipeline().evaluate(&mut record, &self.context);
        self.warnings
            .extend(failures.iter().map(|failure| Warning::ConversionFailed {
                offset,
                field: failure.field.clone(),
                reason: failure.error.to_string(),
            }));

        let index = self.index;
        self.index += 1;
        Ok(Some(DecodedRecord {
            index,
            offset,
            record,
            failures,
        }))
    }
}

impl<'a> ArchiveReader<'a, BufReader<File>> {
    /// Opens the archive file at `path`.
    pub fn open(
        path: impl AsRef<Path>,
        format: &'a RecordFormat,
        context: ConvertContext<'a>,
    ) -> EtlResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Details::OpenSource(e, path.display().to_string()))?;
        debug!("Reading records from {}", path.display());
        Ok(ArchiveReader::builder(BufReader::new(file), format)
            .context(context)
            .build())
    }
}

impl<R: Read> Iterator for ArchiveReader<'_, R> {
    type Item = EtlResult<DecodedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_next() {
            Ok(opt) => opt.map(Ok),
            Err(e) => {
                self.records.chunks.close();
                Some(Err(e))
            }
        }
    }
}
