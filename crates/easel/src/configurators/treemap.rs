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
    get_all_measures, get_attribute_items_without_stacks, get_measure_items, get_stack_items,
    limit_number_of_measures_in_buckets,
};
use crate::error::NormalizationWarning;
use crate::model::{
    Bucket, BucketItem, BucketName, ChartType, ExtendedReferencePoint, ItemKind, ReferencePoint,
};
use crate::translations::TranslationContext;
use crate::ui_config::{self, limits, UiConfig};
use crate::ui_config_helpers::{recompute_can_add_items, set_bucket_titles, warn_on_closed_bucket};

/// Treemaps slice one measure by a view and a segment attribute, or render
/// several measures as top level tiles when no attribute is present.
pub struct TreemapConfigurator;

impl ChartConfigurator for TreemapConfigurator {
    fn chart_type(&self) -> ChartType {
        ChartType::Treemap
    }

    fn default_ui_config(&self, input_buckets: &[Bucket]) -> UiConfig {
        let has_non_stack_attributes = !get_attribute_items_without_stacks(
            input_buckets,
            &[ItemKind::Attribute, ItemKind::Date],
        )
        .is_empty();
        let has_multiple_measures = get_all_measures(input_buckets)
            .iter()
            .filter(|m| !m.is_derived())
            .count()
            > 1;
        ui_config::treemap_ui_config(has_non_stack_attributes, has_multiple_measures)
    }

    fn classify_buckets(
        &self,
        extended: &mut ExtendedReferencePoint,
        _original: &ReferencePoint,
        _warnings: &mut Vec<NormalizationWarning>,
    ) {
        let source = extended.buckets.clone();
        let mut non_stack =
            get_attribute_items_without_stacks(&source, &[ItemKind::Attribute, ItemKind::Date])
                .into_iter()
                .filter(|item| !item.is_date());
        let views: Vec<BucketItem> = non_stack
            .by_ref()
            .take(extended.ui_config.items_limit(BucketName::View))
            .collect();

        let measure_limit = if views.is_empty() {
            limits::MAX_METRICS_COUNT
        } else {
            limits::DEFAULT_TREEMAP_MEASURES_COUNT
        };
        let measures = get_measure_items(&limit_number_of_measures_in_buckets(
            &source,
            measure_limit,
            false,
        ));

        let mut segments: Vec<BucketItem> = get_stack_items(&source, &[ItemKind::Attribute])
            .into_iter()
            .take(limits::MAX_STACKS_COUNT)
            .collect();
        if segments.is_empty() && !views.is_empty() {
            segments = non_stack.take(limits::MAX_STACKS_COUNT).collect();
        }

        extended.buckets = vec![
            Bucket::new(BucketName::Measures, measures),
            Bucket::new(BucketName::View, views),
            Bucket::new(BucketName::Segment, segments),
        ];
    }

    fn enrich_ui_config(
        &self,
        extended: &mut ExtendedReferencePoint,
        context: Option<&TranslationContext>,
    ) {
        set_bucket_titles(extended, ChartType::Treemap, context);
        recompute_can_add_items(extended);
        warn_on_closed_bucket(extended, BucketName::View, context);
    }
}
