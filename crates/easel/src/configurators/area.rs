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
    get_attribute_items_without_stacks, get_measure_items, get_stack_items,
    limit_number_of_measures_in_buckets,
};
use crate::error::NormalizationWarning;
use crate::model::{
    Bucket, BucketItem, BucketName, ChartType, ExtendedReferencePoint, ItemKind, ReferencePoint,
};
use crate::properties::{
    ControlProperties, PropertyPath, BASE_SUPPORTED_PROPERTIES, OPTIONAL_STACKING_PROPERTIES,
};
use crate::translations::TranslationContext;
use crate::ui_config::{self, limits, UiConfig};
use crate::ui_config_helpers::{recompute_can_add_items, set_bucket_titles};

pub struct AreaConfigurator;

fn master_count(items: &[BucketItem]) -> usize {
    items
        .iter()
        .filter(|item| item.as_measure().is_some_and(|m| !m.is_derived()))
        .count()
}

impl ChartConfigurator for AreaConfigurator {
    fn chart_type(&self) -> ChartType {
        ChartType::Area
    }

    fn default_ui_config(&self, _input_buckets: &[Bucket]) -> UiConfig {
        ui_config::area_ui_config()
    }

    fn classify_buckets(
        &self,
        extended: &mut ExtendedReferencePoint,
        _original: &ReferencePoint,
        warnings: &mut Vec<NormalizationWarning>,
    ) {
        let source = extended.buckets.clone();
        // a date cannot stack an area chart; it becomes a view candidate
        let (date_stacks, attribute_stacks): (Vec<BucketItem>, Vec<BucketItem>) =
            get_stack_items(&source, &[ItemKind::Attribute, ItemKind::Date])
                .into_iter()
                .partition(BucketItem::is_date);
        for item in &date_stacks {
            warnings.push(NormalizationWarning::DateRemovedFromStack {
                local_identifier: item.local_identifier().to_string(),
            });
        }

        let measure_limit = if attribute_stacks.is_empty() {
            limits::MAX_METRICS_COUNT
        } else {
            1
        };
        let measures = get_measure_items(&limit_number_of_measures_in_buckets(
            &source,
            measure_limit,
            false,
        ));

        let view_limit = if !attribute_stacks.is_empty() || master_count(&measures) > 1 {
            limits::MAX_CATEGORIES_COUNT
        } else {
            limits::MAX_VIEW_COUNT
        };
        let view_candidates = get_attribute_items_without_stacks(&source, &[ItemKind::Attribute]);
        let views = select_view_items(view_candidates, view_limit);

        let stacks: Vec<BucketItem> = attribute_stacks
            .into_iter()
            .take(limits::MAX_STACKS_COUNT)
            .collect();

        extended.buckets = vec![
            Bucket::new(BucketName::Measures, measures),
            Bucket::new(BucketName::View, views),
            Bucket::new(BucketName::Stack, stacks),
        ];
    }

    fn supported_properties(&self, _axis: Option<crate::model::AxisKind>) -> Vec<PropertyPath> {
        let mut paths = BASE_SUPPORTED_PROPERTIES.to_vec();
        paths.extend_from_slice(OPTIONAL_STACKING_PROPERTIES);
        paths
    }

    fn default_control_properties(&self, _extended: &ExtendedReferencePoint) -> ControlProperties {
        ControlProperties {
            stack_measures: Some(true),
            ..ControlProperties::default()
        }
    }

    fn enrich_ui_config(
        &self,
        extended: &mut ExtendedReferencePoint,
        context: Option<&TranslationContext>,
    ) {
        // percent stacking implies stacking
        if extended.properties.controls.stack_measures_to_percent == Some(true) {
            extended.properties.controls.stack_measures = Some(true);
        }
        set_bucket_titles(extended, ChartType::Area, context);
        recompute_can_add_items(extended);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket_helper::{get_bucket_items, get_items_local_identifiers};
    use crate::configurators::{extended_reference_point, ConfiguratorState, NormalizationOptions};
    use crate::model::{AttributeItem, FilterBucket, MeasureItem, DATE_DATASET_ATTRIBUTE};

    fn metric(id: &str) -> BucketItem {
        BucketItem::Metric(MeasureItem::new(id))
    }

    fn attribute(id: &str) -> BucketItem {
        BucketItem::Attribute(AttributeItem::new(id, &format!("attr.{id}")))
    }

    fn date(id: &str) -> BucketItem {
        BucketItem::Date(AttributeItem::new(id, DATE_DATASET_ATTRIBUTE))
    }

    fn normalize(reference_point: &ReferencePoint) -> crate::configurators::NormalizationOutcome {
        extended_reference_point(
            ChartType::Area,
            reference_point,
            &ConfiguratorState::default(),
            NormalizationOptions::default(),
            None,
        )
    }

    #[test]
    fn attribute_stack_survives_with_empty_view() {
        let rp = ReferencePoint {
            buckets: vec![
                Bucket::new(BucketName::Measures, vec![metric("m1")]),
                Bucket::new(BucketName::Stack, vec![attribute("a1")]),
            ],
            filters: FilterBucket::default(),
            properties: None,
        };
        let outcome = normalize(&rp);
        assert!(get_bucket_items(&outcome.reference_point.buckets, BucketName::View).is_empty());
        assert_eq!(
            get_items_local_identifiers(&get_bucket_items(
                &outcome.reference_point.buckets,
                BucketName::Stack
            )),
            vec!["a1"]
        );
    }

    #[test]
    fn date_stack_moves_to_view_with_warning() {
        let rp = ReferencePoint {
            buckets: vec![
                Bucket::new(BucketName::Measures, vec![metric("m1"), metric("m2")]),
                Bucket::new(BucketName::Stack, vec![date("d1")]),
            ],
            filters: FilterBucket::default(),
            properties: None,
        };
        let outcome = normalize(&rp);
        assert_eq!(
            get_items_local_identifiers(&get_bucket_items(
                &outcome.reference_point.buckets,
                BucketName::View
            )),
            vec!["d1"]
        );
        assert!(get_bucket_items(&outcome.reference_point.buckets, BucketName::Stack).is_empty());
        assert!(outcome.warnings.iter().any(|w| matches!(
            w,
            NormalizationWarning::DateRemovedFromStack { local_identifier } if local_identifier == "d1"
        )));
    }

    #[test]
    fn two_attributes_fill_the_view_without_stack() {
        let rp = ReferencePoint {
            buckets: vec![
                Bucket::new(BucketName::Measures, vec![metric("m1")]),
                Bucket::new(BucketName::View, vec![date("d1"), attribute("a1")]),
            ],
            filters: FilterBucket::default(),
            properties: None,
        };
        let outcome = normalize(&rp);
        assert_eq!(
            get_items_local_identifiers(&get_bucket_items(
                &outcome.reference_point.buckets,
                BucketName::View
            )),
            vec!["d1", "a1"]
        );
    }

    #[test]
    fn percent_stacking_forces_stacking_on() {
        use crate::properties::VisualizationProperties;
        let mut properties = VisualizationProperties::default();
        properties.controls.stack_measures = Some(false);
        properties.controls.stack_measures_to_percent = Some(true);
        let rp = ReferencePoint {
            buckets: vec![Bucket::new(BucketName::Measures, vec![metric("m1")])],
            filters: FilterBucket::default(),
            properties: Some(properties),
        };
        let outcome = normalize(&rp);
        assert_eq!(
            outcome.reference_point.properties.controls.stack_measures,
            Some(true)
        );
    }
}
