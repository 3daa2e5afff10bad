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

//! Structural checks on execution dimensions. Unlike normalization, a
//! violation here is a data-contract bug in the caller and is fatal.

use crate::error::{StructuralError, StructuralResult};
use crate::model::{Dimension, MEASURE_GROUP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureGroupLocation {
    pub dimension_index: usize,
    pub header_index: usize,
}

/// Locates the measure group across dimensions. The measure group must occur
/// in at most one dimension and must be that dimension's last header.
pub fn find_measure_group_in_dimensions(
    dimensions: &[Dimension],
) -> StructuralResult<Option<MeasureGroupLocation>> {
    let mut found: Option<MeasureGroupLocation> = None;
    for (dimension_index, dimension) in dimensions.iter().enumerate() {
        let Some(header_index) = dimension
            .item_identifiers
            .iter()
            .position(|id| id == MEASURE_GROUP)
        else {
            continue;
        };
        if found.is_some() {
            return Err(StructuralError::MeasureGroupInMultipleDimensions);
        }
        if header_index + 1 != dimension.item_identifiers.len() {
            return Err(StructuralError::MeasureGroupNotLast {
                dimension: dimension_index,
            });
        }
        found = Some(MeasureGroupLocation {
            dimension_index,
            header_index,
        });
    }
    Ok(found)
}
