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
use crate::bucket_helper::{find_bucket, get_attribute_items, get_bucket_items};
use crate::error::NormalizationWarning;
use crate::model::{
    AxisKind, Bucket, BucketItem, BucketName, ChartType, ExtendedReferencePoint, ReferencePoint,
};
use crate::properties::{
    combo_supported_properties, ControlProperties, PropertyPath, OPTIONAL_STACKING_PROPERTIES,
};
use crate::translations::TranslationContext;
use crate::ui_config::{self, limits, UiConfig};
use crate::ui_config_helpers::{
    downgrade_open_as_report, recompute_can_add_items, set_bucket_titles,
    set_secondary_axis_visibility,
};

pub struct ComboConfigurator;

impl ComboConfigurator {
    fn primary_type(&self, extended: &ExtendedReferencePoint) -> ChartType {
        extended
            .properties
            .controls
            .primary_chart_type
            .unwrap_or(ChartType::Column)
    }

    fn secondary_type(&self, extended: &ExtendedReferencePoint) -> ChartType {
        extended
            .properties
            .controls
            .secondary_chart_type
            .unwrap_or(ChartType::Line)
    }
}

impl ChartConfigurator for ComboConfigurator {
    fn chart_type(&self) -> ChartType {
        ChartType::Combo
    }

    fn default_ui_config(&self, _input_buckets: &[Bucket]) -> UiConfig {
        ui_config::combo_ui_config()
    }

    fn classify_buckets(
        &self,
        extended: &mut ExtendedReferencePoint,
        _original: &ReferencePoint,
        _warnings: &mut Vec<NormalizationWarning>,
    ) {
        let source = extended.buckets.clone();
        let has_explicit_split = [BucketName::Measures, BucketName::SecondaryMeasures]
            .iter()
            .any(|name| find_bucket(&source, *name).is_some_and(|b| !b.items.is_empty()));

        let (mut primary, mut secondary): (Vec<BucketItem>, Vec<BucketItem>) = if has_explicit_split
        {
            let primary = get_bucket_items(&source, BucketName::Measures);
            let mut secondary = get_bucket_items(&source, BucketName::SecondaryMeasures);
            let claimed: Vec<String> = primary
                .iter()
                .chain(&secondary)
                .map(|item| item.local_identifier().to_string())
                .collect();
            secondary.extend(
                source
                    .iter()
                    .filter(|b| {
                        b.local_identifier != BucketName::Measures
                            && b.local_identifier != BucketName::SecondaryMeasures
                    })
                    .flat_map(|b| &b.items)
                    .filter(|item| {
                        item.is_measure()
                            && !claimed.contains(&item.local_identifier().to_string())
                    })
                    .cloned(),
            );
            (primary, secondary)
        } else {
            source
                .iter()
                .flat_map(|b| &b.items)
                .filter(|item| item.is_measure())
                .cloned()
                .partition(|item| {
                    item.as_measure()
                        .is_none_or(|m| m.show_on_secondary_axis != Some(true))
                })
        };
        for item in primary.iter_mut().filter_map(BucketItem::as_measure_mut) {
            item.show_on_secondary_axis = Some(false);
        }
        for item in secondary.iter_mut().filter_map(BucketItem::as_measure_mut) {
            item.show_on_secondary_axis = Some(true);
        }

        let views = select_view_items(
            get_attribute_items(&source),
            limits::MAX_CATEGORIES_COUNT,
        );

        let mut primary_bucket = Bucket::new(BucketName::Measures, primary);
        primary_bucket.chart_type = Some(self.primary_type(extended));
        let mut secondary_bucket = Bucket::new(BucketName::SecondaryMeasures, secondary);
        secondary_bucket.chart_type = Some(self.secondary_type(extended));
        extended.buckets = vec![
            primary_bucket,
            secondary_bucket,
            Bucket::new(BucketName::View, views),
        ];
    }

    fn axis_policy(
        &self,
        extended: &ExtendedReferencePoint,
        _previous: &ConfiguratorState,
    ) -> Option<AxisKind> {
        let primary = get_bucket_items(&extended.buckets, BucketName::Measures);
        let secondary = get_bucket_items(&extended.buckets, BucketName::SecondaryMeasures);
        let axis = if secondary.is_empty() {
            AxisKind::Primary
        } else if primary.is_empty() {
            AxisKind::Secondary
        } else {
            AxisKind::Dual
        };
        Some(axis)
    }

    fn supported_properties(&self, axis: Option<AxisKind>) -> Vec<PropertyPath> {
        let mut paths = combo_supported_properties(axis.unwrap_or(AxisKind::Primary));
        paths.extend_from_slice(OPTIONAL_STACKING_PROPERTIES);
        paths
    }

    fn default_control_properties(&self, extended: &ExtendedReferencePoint) -> ControlProperties {
        ControlProperties {
            primary_chart_type: Some(ChartType::Column),
            secondary_chart_type: Some(ChartType::Line),
            stack_measures: Some(self.primary_type(extended) == ChartType::Area),
            ..ControlProperties::default()
        }
    }

    fn enrich_ui_config(
        &self,
        extended: &mut ExtendedReferencePoint,
        context: Option<&TranslationContext>,
    ) {
        // stacking only applies when the primary series renders stacked
        let stackable_primary = matches!(
            self.primary_type(extended),
            ChartType::Column | ChartType::Area
        );
        if let Some(stacking) = extended.ui_config.optional_stacking.as_mut() {
            stacking.supported = stackable_primary;
        }
        set_bucket_titles(extended, ChartType::Combo, context);
        recompute_can_add_items(extended);
        set_secondary_axis_visibility(extended, true);
        downgrade_open_as_report(extended);
    }
}
