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

use criterion::{Criterion, criterion_group, criterion_main};
use etlcdb::{Archive, ArchiveReader, RecordFormat, decode_record, read_records};
use std::{hint::black_box, time::Duration};

/// `n_records` records of `format` with a pseudo-random pattern, headers included.
fn make_input(format: &RecordFormat, n_records: usize) -> Vec<u8> {
    let len = format.schema().record_length() * (n_records + usize::from(format.skip_first()));
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

fn bench_decode_record(c: &mut Criterion, archive: Archive, name: &str) -> anyhow::Result<()> {
    let format = archive.format()?;
    let chunk = make_input(&format, 1);
    let chunk = &chunk[chunk.len() - format.schema().record_length()..];
    c.bench_function(name, |b| {
        b.iter(|| decode_record(format.schema(), black_box(chunk)))
    });
    Ok(())
}

fn bench_read_raw(
    c: &mut Criterion,
    archive: Archive,
    n_records: usize,
    name: &str,
) -> anyhow::Result<()> {
    let format = archive.format()?;
    let input = make_input(&format, n_records);
    c.bench_function(name, |b| {
        b.iter(|| {
            read_records(black_box(&input[..]), format.schema(), format.skip_first()).count()
        })
    });
    Ok(())
}

fn bench_read_converted(
    c: &mut Criterion,
    archive: Archive,
    n_records: usize,
    name: &str,
) -> anyhow::Result<()> {
    let format = archive.format()?;
    let input = make_input(&format, n_records);
    c.bench_function(name, |b| {
        b.iter(|| ArchiveReader::new(black_box(&input[..]), &format).count())
    });
    Ok(())
}

fn bench_decode_etl2_record(c: &mut Criterion) {
    bench_decode_record(c, Archive::Etl2, "ETL2, decode 1 record").unwrap();
}

fn bench_decode_etl9g_record(c: &mut Criterion) {
    bench_decode_record(c, Archive::Etl9g, "ETL9G, decode 1 record").unwrap();
}

fn bench_read_etl1_100_records(c: &mut Criterion) {
    bench_read_raw(c, Archive::Etl1, 100, "ETL1, read 100 raw records").unwrap();
}

fn bench_read_etl8b_1000_records(c: &mut Criterion) {
    bench_read_raw(c, Archive::Etl8b, 1000, "ETL8B, read 1000 raw records").unwrap();
}

fn bench_convert_etl3_100_records(c: &mut Criterion) {
    bench_read_converted(c, Archive::Etl3, 100, "ETL3, convert 100 records").unwrap();
}

fn bench_convert_etl8g_100_records(c: &mut Criterion) {
    bench_read_converted(c, Archive::Etl8g, 100, "ETL8G, convert 100 records").unwrap();
}

criterion_group!(
    benches,
    bench_decode_etl2_record,
    bench_decode_etl9g_record,
    bench_read_etl1_100_records,
    bench_read_etl8b_1000_records,
);

criterion_group!(
    name = long_benches;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(10));
    targets =
        bench_convert_etl3_100_records,
        bench_convert_etl8g_100_records
);

criterion_main!(benches, long_benches);
