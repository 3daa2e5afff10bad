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

use super::{select_view_items, ChartConfigurator, ConfiguratorState};
use crate::bucket_helper::{
    get_all_measures_show_on_secondary_axis, get_attribute_items,
    get_attribute_items_without_stacks, get_filtered_measures_for_stacked_charts,
    get_measure_items, get_stack_items,
};
use crate::error::NormalizationWarning;
use crate::model::{
    AxisKind, Bucket, BucketItem, BucketName, ChartType, ExtendedReferencePoint, ItemKind,
    ReferencePoint,
};
use crate::properties::{
    column_bar_supported_properties, PropertyPath, OPTIONAL_STACKING_PROPERTIES,
};
use crate::translations::TranslationContext;
use crate::ui_config::{self, limits, UiConfig};
use crate::ui_config_helpers::{
    disable_stack_for_multiple_measures, downgrade_open_as_report, recompute_can_add_items,
    set_bucket_titles, set_secondary_axis_visibility,
};

/// Column and bar share one policy; only the rendered orientation differs.
pub struct ColumnBarConfigurator {
    chart_type: ChartType,
}

impl ColumnBarConfigurator {
    pub fn new(chart_type: ChartType) -> Self {
        Self { chart_type }
    }
}

fn master_count(items: &[BucketItem]) -> usize {
    items
        .iter()
        .filter(|item| item.as_measure().is_some_and(|m| !m.is_derived()))
        .count()
}

impl ChartConfigurator for ColumnBarConfigurator {
    fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    fn default_ui_config(&self, _input_buckets: &[Bucket]) -> UiConfig {
        ui_config::column_bar_ui_config()
    }

    fn classify_buckets(
        &self,
        extended: &mut ExtendedReferencePoint,
        _original: &ReferencePoint,
        _warnings: &mut Vec<NormalizationWarning>,
    ) {
        let source = extended.buckets.clone();
        let measures =
            get_filtered_measures_for_stacked_charts(&source, limits::MAX_METRICS_COUNT);
        let view_limit = extended.ui_config.items_limit(BucketName::View);
        let views = select_view_items(
            get_attribute_items_without_stacks(&source, &[ItemKind::Attribute]),
            view_limit,
        );
        let mut stacks = get_stack_items(&source, &[ItemKind::Attribute]);

        // a single measure with spare attributes stacks by the next non-date
        // attribute; multiple measures and stacking are mutually exclusive
        let all_attributes = get_attribute_items(&source);
        if stacks.is_empty() && master_count(&measures) <= 1 && all_attributes.len() > 1 {
            stacks = all_attributes[1..]
                .iter()
                .filter(|item| !item.is_date())
                .take(limits::MAX_STACKS_COUNT)
                .cloned()
                .collect();
        }
        let stack_ids: Vec<&str> = stacks.iter().map(BucketItem::local_identifier).collect();
        let views: Vec<BucketItem> = views
            .into_iter()
            .filter(|item| !stack_ids.contains(&item.local_identifier()))
            .collect();

        extended.buckets = vec![
            Bucket::new(BucketName::Measures, measures),
            Bucket::new(BucketName::View, views),
            Bucket::new(BucketName::Stack, stacks),
        ];
    }

    fn axis_policy(
        &self,
        extended: &ExtendedReferencePoint,
        _previous: &ConfiguratorState,
    ) -> Option<AxisKind> {
        let all = get_measure_items(&extended.buckets);
        let secondary = get_all_measures_show_on_secondary_axis(&extended.buckets);
        let axis = if secondary.is_empty() {
            AxisKind::Primary
        } else if secondary.len() == all.len() {
            AxisKind::Secondary
        } else {
            AxisKind::Dual
        };
        Some(axis)
    }

    fn supported_properties(&self, axis: Option<AxisKind>) -> Vec<PropertyPath> {
        let mut paths = column_bar_supported_properties(axis.unwrap_or(AxisKind::Primary));
        paths.extend_from_slice(OPTIONAL_STACKING_PROPERTIES);
        paths
    }

    fn enrich_ui_config(
        &self,
        extended: &mut ExtendedReferencePoint,
        context: Option<&TranslationContext>,
    ) {
        set_bucket_titles(extended, self.chart_type, context);
        recompute_can_add_items(extended);
        disable_stack_for_multiple_measures(extended, BucketName::Stack, context);
        set_secondary_axis_visibility(extended, true);
        downgrade_open_as_report(extended);
    }

    fn wants_recommendations(&self) -> bool {
        self.chart_type == ChartType::Column
    }
}
