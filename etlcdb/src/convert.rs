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

//! Derived field evaluation.
//!
//! A [`Pipeline`] is an ordered list of named [`Converter`]s. Each converter reads the record
//! built so far, raw fields and the derived fields of earlier converters alike, and produces one
//! new value. A failing converter leaves its field absent without affecting the others.

use crate::{
    EtlResult, Error,
    error::Details,
    resolve::{AlphabetResolver, Co59Table, CodeResolver, T56},
    schema::RecordSchema,
    types::{Record, Value},
};
use log::warn;
use serde::Serialize;
use std::{collections::HashSet, fmt, sync::OnceLock};

/// The resolvers available to converters while a pipeline is evaluated.
#[derive(Clone, Copy)]
pub struct ConvertContext<'a> {
    pub codes: &'a dyn CodeResolver,
    pub alphabet: &'a dyn AlphabetResolver,
}

impl<'a> ConvertContext<'a> {
    pub fn new(codes: &'a dyn CodeResolver, alphabet: &'a dyn AlphabetResolver) -> Self {
        Self { codes, alphabet }
    }
}

impl Default for ConvertContext<'_> {
    /// A context with the T56 alphabet and an empty code table.
    fn default() -> Self {
        static EMPTY: OnceLock<Co59Table> = OnceLock::new();
        Self {
            codes: EMPTY.get_or_init(Co59Table::new),
            alphabet: &T56,
        }
    }
}

impl fmt::Debug for ConvertContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertContext").finish_non_exhaustive()
    }
}

type ConvertFn = dyn Fn(&Record, &ConvertContext<'_>) -> EtlResult<Value> + Send + Sync;

/// A named derivation of one field.
pub struct Converter {
    name: String,
    function: Box<ConvertFn>,
}

impl Converter {
    pub fn new<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Record, &ConvertContext<'_>) -> EtlResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            function: Box::new(function),
        }
    }

    /// Name of the derived field.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, record: &Record, context: &ConvertContext<'_>) -> EtlResult<Value> {
        (self.function)(record, context)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A converter that failed on one record.
#[derive(Debug)]
pub struct ConversionFailure {
    pub field: String,
    pub error: Error,
}

impl Serialize for ConversionFailure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ConversionFailure", 2)?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("reason", &self.error.to_string())?;
        state.end()
    }
}

/// An ordered list of converters.
#[derive(Debug, Default)]
pub struct Pipeline {
    converters: Vec<Converter>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `converter` to the pipeline.
    pub fn push(&mut self, converter: Converter) {
        self.converters.push(converter);
    }

    /// Appends a converter, builder style.
    pub fn with<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Record, &ConvertContext<'_>) -> EtlResult<Value> + Send + Sync + 'static,
    {
        self.push(Converter::new(name, function));
        self
    }

    pub fn converters(&self) -> &[Converter] {
        &self.converters
    }

    /// Names of the derived fields, in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.converters.iter().map(Converter::name)
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Applies every converter to `record` in order.
    ///
    /// Successful values are bound under the converter name. Failures are logged and returned;
    /// the corresponding field stays absent and evaluation moves on to the next converter.
    pub fn evaluate(
        &self,
        record: &mut Record,
        context: &ConvertContext<'_>,
    ) -> Vec<ConversionFailure> {
        let mut failures = Vec::new();
        for converter in &self.converters {
            match converter.apply(record, context) {
                Ok(value) => record.put(converter.name(), value),
                Err(error) => {
                    warn!("Failed to convert field '{}': {error}", converter.name());
                    failures.push(ConversionFailure {
                        field: converter.name().to_string(),
                        error,
                    });
                }
            }
        }
        failures
    }
}

/// A record schema together with the pipeline deriving the fields of its records.
#[derive(Debug)]
pub struct RecordFormat {
    schema: RecordSchema,
    pipeline: Pipeline,
    skip_first: bool,
}

impl RecordFormat {
    /// Fails when a derived field name repeats, or shadows a raw field of the schema.
    pub fn new(schema: RecordSchema, pipeline: Pipeline, skip_first: bool) -> EtlResult<Self> {
        let raw = schema.output_name_set();
        let mut derived = HashSet::new();
        for name in pipeline.names() {
            if raw.contains(name) || !derived.insert(name) {
                return Err(Details::FieldNameCollision(name.to_string()).into());
            }
        }
        Ok(Self {
            schema,
            pipeline,
            skip_first,
        })
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Whether the first record of a file is a header to be discarded.
    pub fn skip_first(&self) -> bool {
        self.skip_first
    }
}
