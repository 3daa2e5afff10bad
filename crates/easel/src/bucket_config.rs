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

//! Cross-chart configuration steps shared by every configurator pipeline.

use crate::bucket_helper::{
    remove_all_arithmetic_measures_from_derived, remove_all_derived_measures,
};
use crate::bucket_rules::{
    comparison_and_trending_recommendation_enabled, is_comparison_over_time_allowed,
    is_show_in_percent_allowed, over_time_comparison_recommendation_enabled,
    percent_recommendation_enabled, previous_period_recommendation_enabled,
};
use crate::error::NormalizationWarning;
use crate::model::{Bucket, ExtendedReferencePoint, ReferencePoint};
use tracing::debug;

/// Resets show-in-percent on measures in buckets where the percent rules no
/// longer hold, and mirrors the eligibility into the UI config.
pub fn configure_percent(extended: &mut ExtendedReferencePoint) {
    let buckets_snapshot = extended.buckets.clone();
    for bucket in extended.buckets.iter_mut() {
        if !bucket.items.iter().any(|item| item.is_measure()) {
            continue;
        }
        let allowed = is_show_in_percent_allowed(
            &buckets_snapshot,
            &extended.filters,
            bucket.local_identifier,
        );
        if !allowed {
            for item in bucket.items.iter_mut() {
                if let Some(measure) = item.as_measure_mut() {
                    measure.show_in_percent = false;
                }
            }
        }
        if let Some(config) = extended.ui_config.bucket_mut(bucket.local_identifier) {
            if config.is_show_in_percent_visible {
                config.is_show_in_percent_enabled = allowed;
            }
        }
    }
}

/// Strips derived measures, and arithmetic measures built on them, whenever
/// the chart cannot render an over-time comparison: either the chart type
/// supports none, or no global date filter anchors the comparison.
pub fn configure_over_time_comparison(
    extended: &mut ExtendedReferencePoint,
    original_buckets: &[Bucket],
    week_filters_enabled: bool,
    warnings: &mut Vec<NormalizationWarning>,
) {
    let allowed = extended.ui_config.supports_over_time_comparison()
        && is_comparison_over_time_allowed(
            &extended.buckets,
            &extended.filters,
            week_filters_enabled,
        );
    if allowed {
        return;
    }
    let arithmetic_removed =
        remove_all_arithmetic_measures_from_derived(&mut extended.buckets, original_buckets);
    let derived_removed = remove_all_derived_measures(&mut extended.buckets);
    if arithmetic_removed > 0 {
        warnings.push(NormalizationWarning::ArithmeticFromDerivedRemoved {
            count: arithmetic_removed,
        });
    }
    if derived_removed > 0 {
        warnings.push(NormalizationWarning::DerivedMeasuresRemoved {
            count: derived_removed,
        });
    }
    if arithmetic_removed + derived_removed > 0 {
        debug!(
            derived = derived_removed,
            arithmetic = arithmetic_removed,
            "removed comparison measures without an over-time context"
        );
    }
}

/// Recomputes the recommendation flags the host surfaces as UI affordances.
/// These only suggest; nothing downstream depends on them.
pub fn apply_recommendations(extended: &mut ExtendedReferencePoint, week_filters_enabled: bool) {
    let buckets = &extended.buckets;
    let filters = &extended.filters;
    let as_reference_point = ReferencePoint {
        buckets: buckets.clone(),
        filters: filters.clone(),
        properties: Some(extended.properties.clone()),
    };
    let supports_comparison = extended.ui_config.supports_over_time_comparison();
    let recommendations = &mut extended.ui_config.recommendations;
    recommendations.comparison_and_trending =
        comparison_and_trending_recommendation_enabled(buckets, filters);
    recommendations.percent = percent_recommendation_enabled(buckets, filters);
    recommendations.previous_period = previous_period_recommendation_enabled(buckets, filters);
    recommendations.over_time_comparison = supports_comparison
        && over_time_comparison_recommendation_enabled(&as_reference_point, week_filters_enabled);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AttributeItem, BucketFilter, BucketItem, BucketName, DateFilter, DateGranularity,
        FilterBucket, FilterInterval, FilterItem, IntervalKind, MeasureItem,
        OverTimeComparisonType, DATE_DATASET_ATTRIBUTE,
    };
    use crate::properties::VisualizationProperties;
    use crate::ui_config;

    fn metric(id: &str) -> BucketItem {
        let mut m = MeasureItem::new(id);
        m.show_in_percent = true;
        BucketItem::Metric(m)
    }

    fn derived(id: &str, master: &str) -> BucketItem {
        let mut m = MeasureItem::new(id);
        m.master_local_identifier = Some(master.into());
        m.over_time_comparison_type = Some(OverTimeComparisonType::SamePeriodPreviousYear);
        BucketItem::Metric(m)
    }

    fn date_filters() -> FilterBucket {
        FilterBucket {
            items: vec![FilterItem {
                local_identifier: "f1".into(),
                attribute: DATE_DATASET_ATTRIBUTE.into(),
                auto_created: None,
                filters: vec![BucketFilter::Date(DateFilter {
                    attribute: DATE_DATASET_ATTRIBUTE.into(),
                    over_time_comparison_type: None,
                    interval: Some(FilterInterval {
                        name: "last_year".into(),
                        granularity: DateGranularity::Year,
                        kind: IntervalKind::Relative,
                        from: Some(crate::model::IntervalBound::Relative(-1)),
                        to: Some(crate::model::IntervalBound::Relative(-1)),
                    }),
                })],
            }],
        }
    }

    fn extended(buckets: Vec<Bucket>, filters: FilterBucket) -> ExtendedReferencePoint {
        ExtendedReferencePoint {
            buckets,
            filters,
            properties: VisualizationProperties::default(),
            ui_config: ui_config::column_bar_ui_config(),
        }
    }

    #[test]
    fn percent_reset_when_multiple_masters() {
        let mut ext = extended(
            vec![
                Bucket::new(BucketName::Measures, vec![metric("m1"), metric("m2")]),
                Bucket::new(
                    BucketName::View,
                    vec![BucketItem::Attribute(AttributeItem::new("a1", "attr.a1"))],
                ),
            ],
            FilterBucket::default(),
        );
        configure_percent(&mut ext);
        for item in &ext.buckets[0].items {
            assert!(!item.as_measure().unwrap().show_in_percent);
        }
        assert!(
            !ext.ui_config
                .bucket(BucketName::Measures)
                .unwrap()
                .is_show_in_percent_enabled
        );
    }

    #[test]
    fn percent_kept_for_single_measure_with_category() {
        let mut ext = extended(
            vec![
                Bucket::new(BucketName::Measures, vec![metric("m1")]),
                Bucket::new(
                    BucketName::View,
                    vec![BucketItem::Attribute(AttributeItem::new("a1", "attr.a1"))],
                ),
            ],
            FilterBucket::default(),
        );
        configure_percent(&mut ext);
        assert!(ext.buckets[0].items[0].as_measure().unwrap().show_in_percent);
    }

    #[test]
    fn comparison_stripped_without_date_filter() {
        let mut ext = extended(
            vec![Bucket::new(
                BucketName::Measures,
                vec![metric("m1"), derived("m1_pop", "m1")],
            )],
            FilterBucket::default(),
        );
        let original = ext.buckets.clone();
        let mut warnings = Vec::new();
        configure_over_time_comparison(&mut ext, &original, false, &mut warnings);
        assert_eq!(ext.buckets[0].items.len(), 1);
        assert!(warnings
            .iter()
            .any(|w| matches!(w, NormalizationWarning::DerivedMeasuresRemoved { count: 1 })));
    }

    #[test]
    fn comparison_kept_with_date_filter_on_supporting_chart() {
        let mut ext = extended(
            vec![Bucket::new(
                BucketName::Measures,
                vec![metric("m1"), derived("m1_pop", "m1")],
            )],
            date_filters(),
        );
        let original = ext.buckets.clone();
        let mut warnings = Vec::new();
        configure_over_time_comparison(&mut ext, &original, false, &mut warnings);
        assert_eq!(ext.buckets[0].items.len(), 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn comparison_always_stripped_when_chart_has_no_supported_types() {
        let mut ext = extended(
            vec![Bucket::new(
                BucketName::Measures,
                vec![metric("m1"), derived("m1_pop", "m1")],
            )],
            date_filters(),
        );
        ext.ui_config = ui_config::area_ui_config();
        let original = ext.buckets.clone();
        let mut warnings = Vec::new();
        configure_over_time_comparison(&mut ext, &original, false, &mut warnings);
        assert_eq!(ext.buckets[0].items.len(), 1);
    }
}
