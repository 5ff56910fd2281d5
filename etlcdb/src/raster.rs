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

//! Reconstruction of the bit-packed images stored in ETL records.

use crate::{EtlResult, bits::BitCursor, error::Details};
use serde::Serialize;

/// A grayscale (or binary) image unpacked from a record.
///
/// Samples are stored row-major, row 0 first. Binary rasters (`bit_depth == 1`) hold 0 or 1;
/// deeper rasters hold the scaled 8-bit intensity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Raster {
    width: u32,
    height: u32,
    bit_depth: u8,
    samples: Vec<u8>,
}

impl Raster {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bit depth of the packed samples the raster was reconstructed from.
    #[inline]
    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    /// Whether the raster is a two-level image of 0/1 samples.
    pub fn is_binary(&self) -> bool {
        self.bit_depth == 1
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// The sample at column `x` of row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // `chunks` panics on a zero chunk size, an empty raster simply has no rows
        self.samples.chunks(self.width.max(1) as usize)
    }
}

/// Unpacks `width * height` samples of `bit_depth` bits each from `buffer`.
///
/// Samples are read MSB-first in row-major order. For a bit depth of 1 the samples are kept as
/// 0/1 values and `scale` is ignored. Otherwise every sample is multiplied by `scale`, which maps
/// the deepest representable sample close to white (4-bit samples scaled by 16 span 0..=240).
///
/// Fails when the bit depth is outside `1..=8`, when scaling would overflow an 8-bit sample, or
/// when `buffer` is too short for the requested dimensions. Trailing bytes are ignored.
pub fn reconstruct(
    buffer: &[u8],
    width: u32,
    height: u32,
    bit_depth: u8,
    scale: u8,
) -> EtlResult<Raster> {
    if bit_depth == 0 || bit_depth > 8 {
        return Err(Details::RasterParameters { bit_depth, scale }.into());
    }
    let max_sample = (1u16 << bit_depth) - 1;
    let scale = if bit_depth == 1 { 1 } else { scale };
    if scale == 0 || max_sample * u16::from(scale) > u16::from(u8::MAX) {
        return Err(Details::RasterParameters { bit_depth, scale }.into());
    }

    // saturates on overflow, which no buffer can satisfy
    let count = (width as usize).saturating_mul(height as usize);
    let needed = count.saturating_mul(bit_depth as usize);
    let available = buffer.len().saturating_mul(8);
    if needed > available {
        return Err(Details::RasterTooShort {
            width,
            height,
            bit_depth,
            needed,
            available,
        }
        .into());
    }

    let mut cursor = BitCursor::new(buffer);
    let mut samples = Vec::with_capacity(count);
    for _ in 0..count {
        let sample = cursor.read_uint(bit_depth as usize)? as u8;
        samples.push(sample * scale);
    }

    Ok(Raster {
        width,
        height,
        bit_depth,
        samples,
    })
}
