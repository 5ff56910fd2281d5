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

//! The record formats of the ETL Character Database.
//!
//! Every archive of the family stores fixed-length records in one of seven layouts. An
//! [`Archive`] names a dataset and resolves to the [`RecordFormat`] of its layout:
//!
//! ```
//! # use etlcdb::{Archive, Layout};
//! let archive = Archive::detect("ETL8B2C1").unwrap();
//! assert_eq!(archive, Archive::Etl8b);
//! assert_eq!(archive.layout(), Layout::B8);
//!
//! let format = archive.format().unwrap();
//! assert_eq!(format.schema().record_length(), 512);
//! assert!(format.skip_first());
//! ```

mod b;
mod c;
mod common;
mod g;
mod k;
mod m;

use crate::{EtlResult, convert::RecordFormat, error::Details};
use regex_lite::Regex;
use std::{ffi::OsStr, path::Path, str::FromStr, sync::OnceLock};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// A dataset of the ETL Character Database.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
pub enum Archive {
    #[strum(serialize = "ETL1")]
    Etl1,
    #[strum(serialize = "ETL2")]
    Etl2,
    #[strum(serialize = "ETL3")]
    Etl3,
    #[strum(serialize = "ETL4")]
    Etl4,
    #[strum(serialize = "ETL5")]
    Etl5,
    #[strum(serialize = "ETL6")]
    Etl6,
    #[strum(serialize = "ETL7")]
    Etl7,
    #[strum(serialize = "ETL8G")]
    Etl8g,
    #[strum(serialize = "ETL8B")]
    Etl8b,
    #[strum(serialize = "ETL9G")]
    Etl9g,
    #[strum(serialize = "ETL9B")]
    Etl9b,
}

/// A record layout, shared by one or more archives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Layout {
    M,
    K,
    C,
    G8,
    B8,
    G9,
    B9,
}

impl Layout {
    /// Length of one record in octets.
    pub fn record_length(&self) -> u32 {
        match self {
            Layout::M => m::RECORD_LENGTH,
            Layout::K => k::RECORD_LENGTH,
            Layout::C => c::RECORD_LENGTH,
            Layout::G8 | Layout::G9 => g::RECORD_LENGTH,
            Layout::B8 => b::ETL8B_RECORD_LENGTH,
            Layout::B9 => b::ETL9B_RECORD_LENGTH,
        }
    }

    /// Builds the schema and converter pipeline of the layout.
    pub fn format(&self) -> EtlResult<RecordFormat> {
        match self {
            Layout::M => m::format(),
            Layout::K => k::format(),
            Layout::C => c::format(),
            Layout::G8 => g::format(g::ETL8G),
            Layout::G9 => g::format(g::ETL9G),
            Layout::B8 => b::format(b::ETL8B_RECORD_LENGTH),
            Layout::B9 => b::format(b::ETL9B_RECORD_LENGTH),
        }
    }
}

impl Archive {
    pub fn layout(&self) -> Layout {
        match self {
            Archive::Etl1 | Archive::Etl6 | Archive::Etl7 => Layout::M,
            Archive::Etl2 => Layout::K,
            Archive::Etl3 | Archive::Etl4 | Archive::Etl5 => Layout::C,
            Archive::Etl8g => Layout::G8,
            Archive::Etl8b => Layout::B8,
            Archive::Etl9g => Layout::G9,
            Archive::Etl9b => Layout::B9,
        }
    }

    /// Builds the record format of the archive.
    pub fn format(&self) -> EtlResult<RecordFormat> {
        self.layout().format()
    }

    /// Identifies the archive a file belongs to from its name.
    ///
    /// The part of the file name before the first `_` is taken as the identifier, e.g.
    /// `ETL9G_01`. When that is not a known identifier it must be an identifier followed by a
    /// data file suffix: `C` (`ETL1C`), `LC` or `SC` (`ETL7LC`), or a part number and volume
    /// (`ETL8B2C1`). Other names, such as the `ETL1INFO` documentation files, are rejected.
    pub fn detect(path: impl AsRef<Path>) -> EtlResult<Archive> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| Details::UnknownArchive(path.display().to_string()))?;

        let prefix = name.split('_').next().unwrap_or(name);
        if let Ok(archive) = Archive::from_str(prefix) {
            return Ok(archive);
        }

        static DATA_SUFFIX: OnceLock<Regex> = OnceLock::new();
        let data_suffix = DATA_SUFFIX
            .get_or_init(|| Regex::new(r"^(?:[LS]?C|[0-9]+C[0-9]+)$").expect("Regex is valid"));

        Archive::iter()
            .filter_map(|archive| {
                let suffix = prefix.strip_prefix(<&'static str>::from(archive))?;
                data_suffix.is_match(suffix).then_some(archive)
            })
            .max_by_key(|archive| <&'static str>::from(archive).len())
            .ok_or_else(|| Details::UnknownArchive(name.to_string()).into())
    }
}
