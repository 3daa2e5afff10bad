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

use super::{select_view_items, ChartConfigurator};
use crate::bucket_helper::{
    get_attribute_items, get_attribute_items_without_stacks, get_measure_items, get_stack_items,
    limit_number_of_measures_in_buckets,
};
use crate::error::NormalizationWarning;
use crate::model::{
    Bucket, BucketItem, BucketName, ChartType, ExtendedReferencePoint, ItemKind, ReferencePoint,
};
use crate::translations::TranslationContext;
use crate::ui_config::{self, limits, UiConfig};
use crate::ui_config_helpers::{
    disable_stack_for_multiple_measures, recompute_can_add_items, set_bucket_titles,
};

pub struct LineConfigurator;

fn master_count(items: &[BucketItem]) -> usize {
    items
        .iter()
        .filter(|item| item.as_measure().is_some_and(|m| !m.is_derived()))
        .count()
}

impl ChartConfigurator for LineConfigurator {
    fn chart_type(&self) -> ChartType {
        ChartType::Line
    }

    fn default_ui_config(&self, _input_buckets: &[Bucket]) -> UiConfig {
        ui_config::line_ui_config()
    }

    fn classify_buckets(
        &self,
        extended: &mut ExtendedReferencePoint,
        _original: &ReferencePoint,
        _warnings: &mut Vec<NormalizationWarning>,
    ) {
        let source = extended.buckets.clone();
        let measures = get_measure_items(&limit_number_of_measures_in_buckets(
            &source,
            limits::MAX_METRICS_COUNT,
            true,
        ));
        let trends = select_view_items(
            get_attribute_items_without_stacks(&source, &[ItemKind::Attribute]),
            limits::MAX_CATEGORIES_COUNT,
        );

        // segmenting draws one line per segment value, which only reads
        // well with a single measure
        let mut segments = if master_count(&measures) > 1 {
            Vec::new()
        } else {
            get_stack_items(&source, &[ItemKind::Attribute])
        };
        let all_attributes = get_attribute_items(&source);
        if segments.is_empty() && master_count(&measures) <= 1 && all_attributes.len() > 1 {
            segments = all_attributes[1..]
                .iter()
                .filter(|item| !item.is_date())
                .take(limits::MAX_STACKS_COUNT)
                .cloned()
                .collect();
        }
        let segment_ids: Vec<&str> = segments.iter().map(BucketItem::local_identifier).collect();
        let trends: Vec<BucketItem> = trends
            .into_iter()
            .filter(|item| !segment_ids.contains(&item.local_identifier()))
            .collect();

        extended.buckets = vec![
            Bucket::new(BucketName::Measures, measures),
            Bucket::new(BucketName::Trend, trends),
            Bucket::new(BucketName::Segment, segments),
        ];
    }

    fn enrich_ui_config(
        &self,
        extended: &mut ExtendedReferencePoint,
        context: Option<&TranslationContext>,
    ) {
        set_bucket_titles(extended, ChartType::Line, context);
        recompute_can_add_items(extended);
        disable_stack_for_multiple_measures(extended, BucketName::Segment, context);
    }
}
