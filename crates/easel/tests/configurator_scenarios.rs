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

use easel::bucket_helper::{get_bucket_items, get_items_local_identifiers};
use easel::bucket_rules::has_global_date_filter_ignore_all_time;
use easel::error::NormalizationWarning;
use easel::model::{
    AttributeItem, BucketFilter, BucketItem, DateFilter, DateGranularity, FilterBucket,
    FilterInterval, FilterItem, IntervalBound, IntervalKind, MeasureItem, OverTimeComparisonType,
    DATE_DATASET_ATTRIBUTE,
};
use easel::{
    extended_reference_point, Bucket, BucketName, ChartType, ConfiguratorState,
    NormalizationOptions, NormalizationOutcome, ReferencePoint,
};

fn metric(id: &str) -> BucketItem {
    BucketItem::Metric(MeasureItem::new(id))
}

fn arithmetic(id: &str, operands: &[&str]) -> BucketItem {
    let mut item = MeasureItem::new(id);
    item.operand_local_identifiers =
        Some(operands.iter().map(|o| Some((*o).to_string())).collect());
    BucketItem::Metric(item)
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

fn date(id: &str) -> BucketItem {
    BucketItem::Date(AttributeItem::new(id, DATE_DATASET_ATTRIBUTE))
}

fn date_filter_named(name: &str) -> FilterBucket {
    FilterBucket {
        items: vec![FilterItem {
            local_identifier: "f_date".to_string(),
            attribute: DATE_DATASET_ATTRIBUTE.to_string(),
            auto_created: None,
            filters: vec![BucketFilter::Date(DateFilter {
                attribute: DATE_DATASET_ATTRIBUTE.to_string(),
                over_time_comparison_type: None,
                interval: Some(FilterInterval {
                    name: name.to_string(),
                    granularity: DateGranularity::Year,
                    kind: IntervalKind::Relative,
                    from: Some(IntervalBound::Relative(-1)),
                    to: Some(IntervalBound::Relative(0)),
                }),
            })],
        }],
    }
}

fn reference_point(buckets: Vec<Bucket>, filters: FilterBucket) -> ReferencePoint {
    ReferencePoint {
        buckets,
        filters,
        properties: None,
    }
}

fn normalize(chart_type: ChartType, rp: &ReferencePoint) -> NormalizationOutcome {
    extended_reference_point(
        chart_type,
        rp,
        &ConfiguratorState::default(),
        NormalizationOptions::default(),
        None,
    )
}

#[test]
fn area_with_stacks_only_keeps_first_stack_and_empty_view() {
    let rp = reference_point(
        vec![
            Bucket::new(BucketName::Measures, vec![metric("m1"), metric("m2")]),
            Bucket::new(BucketName::View, vec![]),
            Bucket::new(
                BucketName::Stack,
                vec![attribute("a1"), attribute("a2"), attribute("a3")],
            ),
        ],
        FilterBucket::default(),
    );
    let result = normalize(ChartType::Area, &rp).reference_point;
    assert!(get_bucket_items(&result.buckets, BucketName::View).is_empty());
    assert_eq!(
        get_items_local_identifiers(&get_bucket_items(&result.buckets, BucketName::Stack)),
        vec!["a1"]
    );
}

#[test]
fn column_with_three_measures_and_date_view_leaves_stack_empty() {
    let rp = reference_point(
        vec![
            Bucket::new(
                BucketName::Measures,
                vec![metric("m1"), metric("m2"), metric("m3")],
            ),
            Bucket::new(BucketName::View, vec![date("d1")]),
        ],
        FilterBucket::default(),
    );
    let result = normalize(ChartType::Column, &rp).reference_point;
    assert_eq!(
        get_items_local_identifiers(&get_bucket_items(&result.buckets, BucketName::Measures)),
        vec!["m1", "m2", "m3"]
    );
    assert_eq!(
        get_items_local_identifiers(&get_bucket_items(&result.buckets, BucketName::View)),
        vec!["d1"]
    );
    assert!(get_bucket_items(&result.buckets, BucketName::Stack).is_empty());
}

#[test]
fn derived_measure_without_master_is_dropped_even_with_date_filter() {
    let rp = reference_point(
        vec![Bucket::new(
            BucketName::Measures,
            vec![derived("m2_pop", "m2")],
        )],
        date_filter_named("last_year"),
    );
    let outcome = normalize(ChartType::Column, &rp);
    assert!(get_bucket_items(&outcome.reference_point.buckets, BucketName::Measures).is_empty());
    assert!(outcome.warnings.iter().any(|w| matches!(
        w,
        NormalizationWarning::DanglingDerivedRemoved { local_identifier } if local_identifier == "m2_pop"
    )));
}

#[test]
fn date_in_stack_bucket_becomes_column_view() {
    let rp = reference_point(
        vec![
            Bucket::new(BucketName::Measures, vec![metric("m1")]),
            Bucket::new(BucketName::Stack, vec![date("d1")]),
        ],
        FilterBucket::default(),
    );
    let result = normalize(ChartType::Column, &rp).reference_point;
    assert_eq!(
        get_items_local_identifiers(&get_bucket_items(&result.buckets, BucketName::View)),
        vec!["d1"]
    );
    assert!(get_bucket_items(&result.buckets, BucketName::Stack).is_empty());
}

#[test]
fn combo_places_arithmetic_and_masters_on_primary_axis() {
    let rp = reference_point(
        vec![Bucket::new(
            BucketName::Measures,
            vec![arithmetic("am", &["m1", "m2"]), metric("m1"), metric("m2")],
        )],
        date_filter_named("last_year"),
    );
    let result = normalize(ChartType::Combo, &rp).reference_point;
    let primary = get_bucket_items(&result.buckets, BucketName::Measures);
    assert_eq!(
        get_items_local_identifiers(&primary),
        vec!["am", "m1", "m2"]
    );
    assert!(primary.iter().all(|item| {
        item.as_measure()
            .is_some_and(|m| m.show_on_secondary_axis == Some(false))
    }));
    let secondary = result
        .buckets
        .iter()
        .find(|b| b.local_identifier == BucketName::SecondaryMeasures);
    assert!(secondary.is_some_and(|b| b.items.is_empty()));
}

#[test]
fn scatter_excludes_tertiary_measures_from_selection() {
    let rp = reference_point(
        vec![
            Bucket::new(BucketName::Measures, vec![]),
            Bucket::new(BucketName::SecondaryMeasures, vec![]),
            Bucket::new(BucketName::View, vec![metric("m1"), metric("m2")]),
            Bucket::new(BucketName::TertiaryMeasures, vec![metric("m3")]),
        ],
        FilterBucket::default(),
    );
    let result = normalize(ChartType::Scatter, &rp).reference_point;
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
    assert!(!result
        .buckets
        .iter()
        .flat_map(|b| &b.items)
        .any(|item| item.local_identifier() == "m3"));
}

#[test]
fn relative_filter_with_zero_bounds_round_trips() {
    let interval = FilterInterval {
        name: "this_year".to_string(),
        granularity: DateGranularity::Year,
        kind: IntervalKind::Relative,
        from: Some(IntervalBound::Relative(0)),
        to: Some(IntervalBound::Relative(0)),
    };
    let serialized = serde_json::to_string(&interval).unwrap();
    assert!(serialized.contains("\"from\":0"));
    assert!(serialized.contains("\"to\":0"));
    let restored: FilterInterval = serde_json::from_str(&serialized).unwrap();
    assert_eq!(restored, interval);
}

#[test]
fn all_time_interval_does_not_count_as_global_date_filter() {
    let all_time = date_filter_named("all_time");
    let custom = date_filter_named("custom");
    assert!(!has_global_date_filter_ignore_all_time(&[], &all_time));
    assert!(has_global_date_filter_ignore_all_time(&[], &custom));
}

#[test]
fn filters_for_surviving_items_stay_and_dropped_items_go() {
    let filters = FilterBucket {
        items: vec![
            FilterItem {
                local_identifier: "f_a1".to_string(),
                attribute: "attr.a1".to_string(),
                auto_created: Some(false),
                filters: vec![],
            },
            FilterItem {
                local_identifier: "f_a9".to_string(),
                attribute: "attr.a9".to_string(),
                auto_created: Some(true),
                filters: vec![],
            },
        ],
    };
    let rp = reference_point(
        vec![
            Bucket::new(BucketName::Measures, vec![metric("m1")]),
            Bucket::new(BucketName::View, vec![attribute("a1")]),
        ],
        filters,
    );
    let result = normalize(ChartType::Column, &rp).reference_point;
    let surviving: Vec<&str> = result
        .filters
        .items
        .iter()
        .map(|f| f.attribute.as_str())
        .collect();
    assert!(surviving.contains(&"attr.a1"));
    assert!(!surviving.contains(&"attr.a9"));
}
