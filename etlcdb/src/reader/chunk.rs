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

use std::io::{ErrorKind, Read};

/// Outcome of filling one record-sized chunk.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Fill {
    /// The chunk holds a complete record.
    Full,
    /// The source ended after `0 < n < len` bytes.
    Partial(usize),
    /// The source ended exactly at a record boundary.
    End,
}

/// Internal fixed-size chunk reader.
#[derive(Debug)]
pub(super) struct Chunks<R> {
    source: Option<R>,
    /// Internal buffering to reduce allocation.
    pub(super) buf: Vec<u8>,
    /// Number of bytes consumed from the source so far.
    pub(super) consumed: u64,
}

impl<R: Read> Chunks<R> {
    pub(super) fn new(source: R, chunk_len: usize) -> Self {
        Self {
            source: Some(source),
            buf: vec![0; chunk_len],
            consumed: 0,
        }
    }

    pub(super) fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Releases the source. Further fills report the end of the stream.
    pub(super) fn close(&mut self) {
        self.source = None;
    }

    /// Reads the next chunk into `buf`, retrying short and interrupted reads.
    pub(super) fn fill(&mut self) -> std::io::Result<Fill> {
        let Some(source) = self.source.as_mut() else {
            return Ok(Fill::End);
        };

        let mut filled = 0;
        while filled < self.buf.len() {
            match source.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.consumed += filled as u64;

        Ok(match filled {
            0 => Fill::End,
            n if n == self.buf.len() => Fill::Full,
            n => Fill::Partial(n),
        })
    }
}
