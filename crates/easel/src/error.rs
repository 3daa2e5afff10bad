// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::model::BucketName;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] SerialisationError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The caller handed over data that violates the bucket contract. These are
/// not recoverable by normalization and must surface to the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("Measure group must be the last header of dimension {dimension}")]
    MeasureGroupNotLast { dimension: usize },
    #[error("Measure group occurs in more than one dimension")]
    MeasureGroupInMultipleDimensions,
    #[error("Duplicate local identifier '{local_identifier}' across buckets")]
    DuplicateLocalIdentifier { local_identifier: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown chart type: '{name}'")]
    UnknownChartType { name: String },
    #[error("Invalid UI configuration: {reason}")]
    InvalidUiConfig { reason: String },
    #[error("Failed to read reference point file '{path}': {source}")]
    ReferencePointFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum SerialisationError {
    #[error("JSON serialisation failed: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("YAML serialisation failed: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
}

/// A recoverable shape anomaly the normalization resolved on its own. The
/// result is still valid; warnings tell the host what was changed so the UI
/// can explain it.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizationWarning {
    #[error("Dropped {dropped} measure(s) over the limit of {limit} in bucket {bucket:?}")]
    MeasuresTruncated {
        bucket: BucketName,
        limit: usize,
        dropped: usize,
    },
    #[error("Dropped {dropped} attribute(s) over the limit of {limit} in bucket {bucket:?}")]
    AttributesTruncated {
        bucket: BucketName,
        limit: usize,
        dropped: usize,
    },
    #[error("Removed {count} derived measure(s) not supported here")]
    DerivedMeasuresRemoved { count: usize },
    #[error("Removed {count} arithmetic measure(s) built on derived measures")]
    ArithmeticFromDerivedRemoved { count: usize },
    #[error("Removed derived measure '{local_identifier}' whose master is not present")]
    DanglingDerivedRemoved { local_identifier: String },
    #[error("Removed duplicate item '{local_identifier}' from bucket {bucket:?}")]
    DuplicateItemRemoved {
        bucket: BucketName,
        local_identifier: String,
    },
    #[error("Removed filter on '{attribute}' no longer backed by any bucket item")]
    UnusedFilterRemoved { attribute: String },
    #[error("Removed a sort item that no longer resolves against the buckets")]
    InvalidSortRemoved,
    #[error("Moved date item '{local_identifier}' out of the stack bucket")]
    DateRemovedFromStack { local_identifier: String },
}

pub type Result<T> = std::result::Result<T, VisualizationError>;
pub type StructuralResult<T> = std::result::Result<T, StructuralError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
