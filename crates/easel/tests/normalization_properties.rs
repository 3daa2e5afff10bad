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

use easel::model::{AttributeItem, BucketItem, FilterBucket, MeasureItem, DATE_DATASET_ATTRIBUTE};
use easel::{
    extended_reference_point, Bucket, BucketName, ChartType, ConfiguratorState,
    NormalizationOptions, ReferencePoint,
};
use proptest::prelude::*;

fn chart_type_strategy() -> impl Strategy<Value = ChartType> {
    prop_oneof![
        Just(ChartType::Column),
        Just(ChartType::Bar),
        Just(ChartType::Line),
        Just(ChartType::Area),
        Just(ChartType::Combo),
        Just(ChartType::Scatter),
        Just(ChartType::Bubble),
        Just(ChartType::Heatmap),
        Just(ChartType::Treemap),
        Just(ChartType::Headline),
        Just(ChartType::Table),
    ]
}

fn reference_point_strategy() -> impl Strategy<Value = ReferencePoint> {
    (0usize..6, 0usize..4, 0usize..2).prop_map(|(measures, attributes, dates)| {
        let metric_items: Vec<BucketItem> = (0..measures)
            .map(|i| BucketItem::Metric(MeasureItem::new(&format!("m{i}"))))
            .collect();
        let mut view_items: Vec<BucketItem> = (0..dates)
            .map(|i| {
                BucketItem::Date(AttributeItem::new(&format!("d{i}"), DATE_DATASET_ATTRIBUTE))
            })
            .collect();
        view_items.extend((0..attributes).map(|i| {
            BucketItem::Attribute(AttributeItem::new(&format!("a{i}"), &format!("attr.a{i}")))
        }));
        ReferencePoint {
            buckets: vec![
                Bucket::new(BucketName::Measures, metric_items),
                Bucket::new(BucketName::View, view_items),
            ],
            filters: FilterBucket::default(),
            properties: None,
        }
    })
}

proptest! {
    #[test]
    fn normalization_is_idempotent(
        chart_type in chart_type_strategy(),
        rp in reference_point_strategy()
    ) {
        let first = extended_reference_point(
            chart_type,
            &rp,
            &ConfiguratorState::default(),
            NormalizationOptions::default(),
            None,
        );
        let canonical = ReferencePoint {
            buckets: first.reference_point.buckets.clone(),
            filters: first.reference_point.filters.clone(),
            properties: Some(first.reference_point.properties.clone()),
        };
        let second = extended_reference_point(
            chart_type,
            &canonical,
            &first.state,
            NormalizationOptions::default(),
            None,
        );
        prop_assert_eq!(first.reference_point.buckets, second.reference_point.buckets);
        prop_assert_eq!(first.reference_point.filters, second.reference_point.filters);
    }

    #[test]
    fn bucket_limits_always_hold(
        chart_type in chart_type_strategy(),
        rp in reference_point_strategy()
    ) {
        let result = extended_reference_point(
            chart_type,
            &rp,
            &ConfiguratorState::default(),
            NormalizationOptions::default(),
            None,
        )
        .reference_point;
        for bucket in &result.buckets {
            let limit = result.ui_config.items_limit(bucket.local_identifier);
            // the generator emits no derived measures, so the master-only
            // limit equals the plain item count
            prop_assert!(
                bucket.items.len() <= limit,
                "bucket {:?} holds {} items over limit {}",
                bucket.local_identifier,
                bucket.items.len(),
                limit
            );
        }
    }

    #[test]
    fn no_duplicate_identifiers_after_normalization(
        chart_type in chart_type_strategy(),
        rp in reference_point_strategy()
    ) {
        let result = extended_reference_point(
            chart_type,
            &rp,
            &ConfiguratorState::default(),
            NormalizationOptions::default(),
            None,
        )
        .reference_point;
        let mut seen = std::collections::HashSet::new();
        for item in result.buckets.iter().flat_map(|b| &b.items) {
            prop_assert!(
                seen.insert(item.local_identifier().to_string()),
                "duplicate item {}",
                item.local_identifier()
            );
        }
    }
}
