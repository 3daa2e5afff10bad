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
use crate::bucket_helper::{transform_measure_buckets, MeasureBucketSpec};
use crate::error::NormalizationWarning;
use crate::model::{
    Bucket, BucketName, ChartType, ExtendedReferencePoint, ReferencePoint,
};
use crate::translations::TranslationContext;
use crate::ui_config::{self, limits, UiConfig};
use crate::ui_config_helpers::{recompute_can_add_items, set_bucket_titles};

/// A headline shows one number and an optional comparison number. All
/// attributes drop; an over time comparison keeps its derived measure as the
/// secondary value.
pub struct HeadlineConfigurator;

impl ChartConfigurator for HeadlineConfigurator {
    fn chart_type(&self) -> ChartType {
        ChartType::Headline
    }

    fn default_ui_config(&self, _input_buckets: &[Bucket]) -> UiConfig {
        ui_config::headline_ui_config()
    }

    fn classify_buckets(
        &self,
        extended: &mut ExtendedReferencePoint,
        _original: &ReferencePoint,
        _warnings: &mut Vec<NormalizationWarning>,
    ) {
        let source = extended.buckets.clone();
        extended.buckets = transform_measure_buckets(
            &[
                MeasureBucketSpec::new(
                    BucketName::Measures,
                    limits::DEFAULT_HEADLINE_METRICS_COUNT,
                    &[],
                ),
                MeasureBucketSpec::new(
                    BucketName::SecondaryMeasures,
                    limits::DEFAULT_HEADLINE_METRICS_COUNT,
                    &[BucketName::TertiaryMeasures],
                ),
            ],
            &source,
        );
    }

    fn enrich_ui_config(
        &self,
        extended: &mut ExtendedReferencePoint,
        context: Option<&TranslationContext>,
    ) {
        set_bucket_titles(extended, ChartType::Headline, context);
        recompute_can_add_items(extended);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket_helper::{get_bucket_items, get_items_local_identifiers};
    use crate::configurators::{extended_reference_point, ConfiguratorState, NormalizationOptions};
    use crate::model::{
        AttributeItem, BucketFilter, BucketItem, DateFilter, DateGranularity, FilterBucket,
        FilterInterval, FilterItem, IntervalBound, IntervalKind, MeasureItem,
        OverTimeComparisonType, DATE_DATASET_ATTRIBUTE,
    };

    fn metric(id: &str) -> BucketItem {
        BucketItem::Metric(MeasureItem::new(id))
    }

    fn derived(id: &str, master: &str) -> BucketItem {
        let mut item = MeasureItem::new(id);
        item.master_local_identifier = Some(master.to_string());
        item.over_time_comparison_type = Some(OverTimeComparisonType::SamePeriodPreviousYear);
        BucketItem::Metric(item)
    }

    fn attribute(id: &str) -> BucketItem {
        BucketItem::Attribute(AttributeItem::new(id, &format!("attr.{id}")))
    }

    fn global_date_filter() -> FilterBucket {
        FilterBucket {
            items: vec![FilterItem {
                local_identifier: "f1".to_string(),
                attribute: DATE_DATASET_ATTRIBUTE.to_string(),
                auto_created: None,
                filters: vec![BucketFilter::Date(DateFilter {
                    attribute: DATE_DATASET_ATTRIBUTE.to_string(),
                    over_time_comparison_type: None,
                    interval: Some(FilterInterval {
                        name: "last_year".to_string(),
                        granularity: DateGranularity::Year,
                        kind: IntervalKind::Relative,
                        from: Some(IntervalBound::Relative(-1)),
                        to: Some(IntervalBound::Relative(-1)),
                    }),
                })],
            }],
        }
    }

    fn normalize(reference_point: &ReferencePoint) -> ExtendedReferencePoint {
        extended_reference_point(
            ChartType::Headline,
            reference_point,
            &ConfiguratorState::default(),
            NormalizationOptions::default(),
            None,
        )
        .reference_point
    }

    #[test]
    fn attributes_drop_and_measures_split() {
        let rp = ReferencePoint {
            buckets: vec![
                Bucket::new(BucketName::Measures, vec![metric("m1"), metric("m2")]),
                Bucket::new(BucketName::View, vec![attribute("a1")]),
            ],
            filters: FilterBucket::default(),
            properties: None,
        };
        let result = normalize(&rp);
        assert_eq!(
            get_items_local_identifiers(&get_bucket_items(&result.buckets, BucketName::Measures)),
            vec!["m1"]
        );
        assert_eq!(
            get_items_local_identifiers(&get_bucket_items(
                &result.buckets,
                BucketName::SecondaryMeasures
            )),
            vec!["m2"]
        );
        assert!(result
            .buckets
            .iter()
            .all(|b| b.items.iter().all(BucketItem::is_measure)));
    }

    #[test]
    fn derived_measure_becomes_secondary_under_date_filter() {
        let rp = ReferencePoint {
            buckets: vec![Bucket::new(
                BucketName::Measures,
                vec![metric("m1"), derived("m1_pop", "m1")],
            )],
            filters: global_date_filter(),
            properties: None,
        };
        let result = normalize(&rp);
        assert_eq!(
            get_items_local_identifiers(&get_bucket_items(&result.buckets, BucketName::Measures)),
            vec!["m1"]
        );
        assert_eq!(
            get_items_local_identifiers(&get_bucket_items(
                &result.buckets,
                BucketName::SecondaryMeasures
            )),
            vec!["m1_pop"]
        );
    }

    #[test]
    fn derived_measure_drops_without_date_filter() {
        let rp = ReferencePoint {
            buckets: vec![Bucket::new(
                BucketName::Measures,
                vec![metric("m1"), derived("m1_pop", "m1")],
            )],
            filters: FilterBucket::default(),
            properties: None,
        };
        let result = normalize(&rp);
        assert_eq!(
            get_items_local_identifiers(&get_bucket_items(&result.buckets, BucketName::Measures)),
            vec!["m1"]
        );
        assert!(get_bucket_items(&result.buckets, BucketName::SecondaryMeasures).is_empty());
    }
}
