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

use crate::error::NormalizationWarning;
use crate::model::{Bucket, ExtendedReferencePoint, SortItem, SortLocator};

fn identifier_exists(buckets: &[Bucket], local_identifier: &str) -> bool {
    buckets
        .iter()
        .flat_map(|b| &b.items)
        .any(|item| item.local_identifier() == local_identifier)
}

fn sort_resolves(sort: &SortItem, buckets: &[Bucket]) -> bool {
    match sort {
        SortItem::Attribute {
            attribute_identifier,
            ..
        } => identifier_exists(buckets, attribute_identifier),
        SortItem::Measure { locators, .. } => locators.iter().all(|locator| match locator {
            SortLocator::Attribute {
                attribute_identifier,
                ..
            } => identifier_exists(buckets, attribute_identifier),
            SortLocator::Measure { measure_identifier } => {
                identifier_exists(buckets, measure_identifier)
            }
        }),
    }
}

/// Drops sort items pointing at identifiers the normalized layout no longer
/// contains.
pub fn remove_invalid_sort(
    extended: &mut ExtendedReferencePoint,
    warnings: &mut Vec<NormalizationWarning>,
) {
    let buckets = &extended.buckets;
    let before = extended.properties.sort_items.len();
    extended
        .properties
        .sort_items
        .retain(|sort| sort_resolves(sort, buckets));
    for _ in extended.properties.sort_items.len()..before {
        warnings.push(NormalizationWarning::InvalidSortRemoved);
    }
}
