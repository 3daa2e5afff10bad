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

use super::ChartConfigurator;
use crate::bucket_helper::{
    find_bucket, get_attribute_items, get_measure_items, get_preferred_bucket_items,
};
use crate::error::NormalizationWarning;
use crate::model::{
    Bucket, BucketItem, BucketName, ChartType, ExtendedReferencePoint, ItemKind, ReferencePoint,
};
use crate::translations::TranslationContext;
use crate::ui_config::{self, limits, UiConfig};
use crate::ui_config_helpers::{recompute_can_add_items, set_bucket_titles};

const COLUMN_PREFERENCE: &[BucketName] =
    &[BucketName::Columns, BucketName::Stack, BucketName::Segment];

/// Tables keep every measure and split attributes into rows and columns.
/// Row totals survive the reshaping as long as their attribute does.
pub struct PivotTableConfigurator;

impl ChartConfigurator for PivotTableConfigurator {
    fn chart_type(&self) -> ChartType {
        ChartType::Table
    }

    fn default_ui_config(&self, _input_buckets: &[Bucket]) -> UiConfig {
        ui_config::table_ui_config()
    }

    fn classify_buckets(
        &self,
        extended: &mut ExtendedReferencePoint,
        original: &ReferencePoint,
        _warnings: &mut Vec<NormalizationWarning>,
    ) {
        let source = extended.buckets.clone();
        let measures = get_measure_items(&source);
        let columns = get_preferred_bucket_items(
            &source,
            COLUMN_PREFERENCE,
            &[ItemKind::Attribute, ItemKind::Date],
        );
        let column_ids: Vec<&str> = columns.iter().map(BucketItem::local_identifier).collect();
        let rows: Vec<BucketItem> = get_attribute_items(&source)
            .into_iter()
            .filter(|item| !column_ids.contains(&item.local_identifier()))
            .take(limits::MAX_TABLE_CATEGORIES_COUNT)
            .collect();

        let mut row_bucket = Bucket::new(BucketName::Attribute, rows);
        if let Some(previous) = find_bucket(&original.buckets, BucketName::Attribute) {
            let row_ids: Vec<&str> = row_bucket
                .items
                .iter()
                .map(BucketItem::local_identifier)
                .collect();
            row_bucket.totals = previous
                .totals
                .iter()
                .filter(|t| row_ids.contains(&t.attribute_identifier.as_str()))
                .cloned()
                .collect();
        }

        extended.buckets = vec![
            Bucket::new(BucketName::Measures, measures),
            row_bucket,
            Bucket::new(BucketName::Columns, columns),
        ];
    }

    fn enrich_ui_config(
        &self,
        extended: &mut ExtendedReferencePoint,
        context: Option<&TranslationContext>,
    ) {
        set_bucket_titles(extended, ChartType::Table, context);
        recompute_can_add_items(extended);
    }
}
