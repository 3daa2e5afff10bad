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
    get_attribute_items_without_stacks, get_measure_items, get_stack_items,
    limit_number_of_measures_in_buckets,
};
use crate::error::NormalizationWarning;
use crate::model::{
    Bucket, BucketItem, BucketName, ChartType, ExtendedReferencePoint, ItemKind, ReferencePoint,
};
use crate::translations::TranslationContext;
use crate::ui_config::{self, limits, UiConfig};
use crate::ui_config_helpers::{recompute_can_add_items, set_bucket_titles};

/// One measure colored over a row attribute and a column attribute.
pub struct HeatmapConfigurator;

impl ChartConfigurator for HeatmapConfigurator {
    fn chart_type(&self) -> ChartType {
        ChartType::Heatmap
    }

    fn default_ui_config(&self, _input_buckets: &[Bucket]) -> UiConfig {
        ui_config::heatmap_ui_config()
    }

    fn classify_buckets(
        &self,
        extended: &mut ExtendedReferencePoint,
        _original: &ReferencePoint,
        _warnings: &mut Vec<NormalizationWarning>,
    ) {
        let source = extended.buckets.clone();
        let measures = get_measure_items(&limit_number_of_measures_in_buckets(&source, 1, false));

        let mut non_stack =
            get_attribute_items_without_stacks(&source, &[ItemKind::Attribute, ItemKind::Date])
                .into_iter();
        let views: Vec<BucketItem> = non_stack.by_ref().take(limits::MAX_CATEGORIES_COUNT).collect();
        let mut stacks: Vec<BucketItem> =
            get_stack_items(&source, &[ItemKind::Attribute, ItemKind::Date])
                .into_iter()
                .take(limits::MAX_STACKS_COUNT)
                .collect();
        if stacks.is_empty() {
            stacks = non_stack.take(limits::MAX_STACKS_COUNT).collect();
        }

        extended.buckets = vec![
            Bucket::new(BucketName::Measures, measures),
            Bucket::new(BucketName::View, views),
            Bucket::new(BucketName::Stack, stacks),
        ];
    }

    fn enrich_ui_config(
        &self,
        extended: &mut ExtendedReferencePoint,
        context: Option<&TranslationContext>,
    ) {
        set_bucket_titles(extended, ChartType::Heatmap, context);
        recompute_can_add_items(extended);
    }
}
