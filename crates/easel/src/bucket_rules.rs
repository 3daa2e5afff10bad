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

//! Boolean eligibility predicates over buckets and filters. Composites are
//! conjunctions of the named primitives so each policy stays auditable.

use crate::bucket_helper::{
    find_bucket, get_all_measures, get_bucket_items, get_date_items, get_measure_items,
    get_stack_items, get_view_items, has_derived_bucket_items,
};
use crate::model::{
    Bucket, BucketFilter, BucketName, DateGranularity, FilterBucket, ItemKind, MeasureItem,
    ReferencePoint,
};

pub type Rule = fn(&[Bucket], &FilterBucket) -> bool;

/// Short-circuits on the first failing rule.
pub fn all_rules_met(rules: &[Rule], buckets: &[Bucket], filters: &FilterBucket) -> bool {
    rules.iter().all(|rule| rule(buckets, filters))
}

pub fn has_one_measure(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    get_measure_items(buckets).len() == 1
}

pub fn has_no_measures(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    get_measure_items(buckets).is_empty()
}

pub fn has_more_than_one_measure(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    get_measure_items(buckets).len() > 1
}

fn master_measures(items: &[MeasureItem]) -> usize {
    items.iter().filter(|m| !m.is_derived()).count()
}

pub fn get_master_measures_count(buckets: &[Bucket], bucket: BucketName) -> usize {
    let items: Vec<MeasureItem> = get_bucket_items(buckets, bucket)
        .iter()
        .filter_map(|item| item.as_measure().cloned())
        .collect();
    master_measures(&items)
}

/// Derived measures ride along with their master and do not count here.
pub fn has_one_master_measure_in_bucket(buckets: &[Bucket], bucket: BucketName) -> bool {
    get_master_measures_count(buckets, bucket) == 1
}

pub fn has_one_master_measure(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    master_measures(&get_all_measures(buckets)) == 1
}

pub fn no_derived_measure_present(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    !has_derived_bucket_items(buckets)
}

pub fn has_no_stacks(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    get_stack_items(buckets, &[ItemKind::Attribute]).is_empty()
}

pub fn has_no_stacks_with_date(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    get_stack_items(buckets, &[ItemKind::Attribute, ItemKind::Date]).is_empty()
}

fn categories(buckets: &[Bucket]) -> Vec<crate::model::BucketItem> {
    get_view_items(buckets, &[ItemKind::Attribute, ItemKind::Date])
}

pub fn has_one_category(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    categories(buckets).len() == 1
}

pub fn has_no_categories(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    categories(buckets).is_empty()
}

pub fn has_some_categories(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    !categories(buckets).is_empty()
}

pub fn has_date_in_categories(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    categories(buckets).iter().any(|item| item.is_date())
}

pub fn has_some_segment_by_items(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    find_bucket(buckets, BucketName::Segment).is_some_and(|b| !b.items.is_empty())
}

/// Comparison over weeks has no defined period alignment. Bucket dates are
/// authoritative; the global date filter only decides when no date item is
/// placed at all.
pub fn has_no_week_granularity(buckets: &[Bucket], filters: &FilterBucket) -> bool {
    let date_items = get_date_items(buckets);
    if date_items.is_empty() {
        return crate::bucket_helper::get_date_filter(filters)
            .and_then(crate::model::FilterItem::date_filter)
            .and_then(|d| d.interval.as_ref())
            .is_none_or(|interval| interval.granularity != DateGranularity::Week);
    }
    !date_items.iter().any(|item| item.week_granularity())
}

/// Any global date filter counts, the unrestricted all-time one included.
pub fn has_global_date_filter(_buckets: &[Bucket], filters: &FilterBucket) -> bool {
    filters
        .items
        .iter()
        .any(|item| item.date_filter().is_some_and(|d| d.interval.is_some()))
}

/// A real user-picked range: the first filter item must be a date filter with
/// an interval not named all-time. A date filter buried behind other filter
/// items does not qualify.
pub fn has_global_date_filter_ignore_all_time(
    _buckets: &[Bucket],
    filters: &FilterBucket,
) -> bool {
    filters
        .items
        .first()
        .and_then(crate::model::FilterItem::date_filter)
        .and_then(|d| d.interval.as_ref())
        .is_some_and(|interval| !interval.is_all_time())
}

pub fn has_used_date(buckets: &[Bucket], filters: &FilterBucket) -> bool {
    has_global_date_filter(buckets, filters) || !get_date_items(buckets).is_empty()
}

pub fn has_no_measure_date_filter(buckets: &[Bucket], _filters: &FilterBucket) -> bool {
    !get_all_measures(buckets)
        .iter()
        .any(|m| m.filters.iter().any(BucketFilter::is_date))
}

pub fn has_no_ranking_filter(filters: &FilterBucket) -> bool {
    !filters
        .items
        .iter()
        .any(|item| matches!(item.filters.first(), Some(BucketFilter::Ranking(_))))
}

pub fn has_no_measure_value_filter_by_derived(buckets: &[Bucket], filters: &FilterBucket) -> bool {
    let measures = get_all_measures(buckets);
    !filters.items.iter().any(|item| {
        matches!(
            item.filters.first(),
            Some(BucketFilter::MeasureValue(mvf)) if measures
                .iter()
                .any(|m| m.local_identifier == mvf.measure_local_identifier && m.is_derived())
        )
    })
}

pub fn is_show_in_percent_allowed(
    buckets: &[Bucket],
    filters: &FilterBucket,
    bucket: BucketName,
) -> bool {
    all_rules_met(&[has_some_categories], buckets, filters)
        && has_one_master_measure_in_bucket(buckets, bucket)
        && has_no_ranking_filter(filters)
        && has_no_measure_value_filter_by_derived(buckets, filters)
}

pub fn is_comparison_over_time_allowed(
    buckets: &[Bucket],
    filters: &FilterBucket,
    week_filters_enabled: bool,
) -> bool {
    has_global_date_filter(buckets, filters)
        && (week_filters_enabled || has_no_week_granularity(buckets, filters))
}

pub fn percent_recommendation_enabled(buckets: &[Bucket], filters: &FilterBucket) -> bool {
    all_rules_met(
        &[has_one_master_measure, has_one_category, has_no_stacks],
        buckets,
        filters,
    ) && has_no_ranking_filter(filters)
}

pub fn comparison_and_trending_recommendation_enabled(
    buckets: &[Bucket],
    filters: &FilterBucket,
) -> bool {
    all_rules_met(
        &[has_one_measure, no_derived_measure_present, has_no_categories],
        buckets,
        filters,
    )
}

pub fn previous_period_recommendation_enabled(buckets: &[Bucket], filters: &FilterBucket) -> bool {
    all_rules_met(
        &[
            has_one_measure,
            has_one_category,
            no_derived_measure_present,
            has_no_stacks,
        ],
        buckets,
        filters,
    )
}

pub fn over_time_comparison_recommendation_enabled(
    reference_point: &ReferencePoint,
    week_filters_enabled: bool,
) -> bool {
    let buckets = &reference_point.buckets;
    let filters = &reference_point.filters;
    all_rules_met(
        &[
            no_derived_measure_present,
            has_one_measure,
            has_no_stacks,
            has_date_in_categories,
            has_no_measure_date_filter,
        ],
        buckets,
        filters,
    ) && has_global_date_filter(buckets, filters)
        && (week_filters_enabled || has_no_week_granularity(buckets, filters))
}
