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

#![allow(dead_code)]

pub type TestResult = anyhow::Result<()>;

/// Packs values MSB-first into a byte buffer, the way ETL records are laid out.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn bit(&mut self, set: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if set {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 1 << (7 - self.len % 8);
        }
        self.len += 1;
    }

    pub fn uint(&mut self, value: u64, width: usize) -> &mut Self {
        for i in (0..width).rev() {
            self.bit((value >> i) & 1 == 1);
        }
        self
    }

    /// Writes `sextets` as consecutive 6-bit values.
    pub fn sextets(&mut self, sextets: &[u64]) -> &mut Self {
        for &sextet in sextets {
            self.uint(sextet, 6);
        }
        self
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        for &byte in data {
            self.uint(u64::from(byte), 8);
        }
        self
    }

    pub fn zeros(&mut self, width: usize) -> &mut Self {
        for _ in 0..width {
            self.bit(false);
        }
        self
    }

    pub fn bit_len(&self) -> usize {
        self.len
    }

    /// The packed bytes. Panics unless a whole number of octets was written.
    pub fn finish(&self) -> Vec<u8> {
        assert_eq!(self.len % 8, 0, "{} bits is not a whole number of octets", self.len);
        self.bytes.clone()
    }
}

/// An image buffer of `len` octets starting with `head`.
pub fn image(len: usize, head: &[u8]) -> Vec<u8> {
    let mut image = vec![0; len];
    image[..head.len()].copy_from_slice(head);
    image
}
