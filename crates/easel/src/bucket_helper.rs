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

//! Pure queries and edits over bucket collections. Absent buckets behave as
//! empty ones; nothing in this module fails.

use crate::error::NormalizationWarning;
use crate::model::{
    Bucket, BucketFilter, BucketItem, BucketName, ExtendedReferencePoint, FilterBucket,
    FilterItem, ItemKind, MeasureItem, OverTimeComparisonType, Total,
};
use itertools::Itertools;
use std::collections::HashSet;

pub const STACK_PREFERENCE: &[BucketName] = &[BucketName::Stack, BucketName::Segment];
pub const VIEW_PREFERENCE: &[BucketName] = &[BucketName::View, BucketName::Trend];
pub const MEASURE_PREFERENCE: &[BucketName] = &[
    BucketName::Measures,
    BucketName::SecondaryMeasures,
    BucketName::TertiaryMeasures,
];

pub fn find_bucket(buckets: &[Bucket], name: BucketName) -> Option<&Bucket> {
    buckets.iter().find(|b| b.local_identifier == name)
}

pub fn has_bucket(buckets: &[Bucket], name: BucketName) -> bool {
    find_bucket(buckets, name).is_some()
}

pub fn get_buckets_by_names(buckets: &[Bucket], names: &[BucketName]) -> Vec<Bucket> {
    buckets
        .iter()
        .filter(|b| names.contains(&b.local_identifier))
        .cloned()
        .collect()
}

pub fn get_bucket_items(buckets: &[Bucket], name: BucketName) -> Vec<BucketItem> {
    find_bucket(buckets, name).map_or_else(Vec::new, |b| b.items.clone())
}

pub fn get_items_count(buckets: &[Bucket], name: BucketName) -> usize {
    find_bucket(buckets, name).map_or(0, |b| b.items.len())
}

pub fn get_items_from_buckets(buckets: &[Bucket], names: &[BucketName]) -> Vec<BucketItem> {
    buckets
        .iter()
        .filter(|b| names.contains(&b.local_identifier))
        .flat_map(|b| b.items.clone())
        .collect()
}

pub fn get_bucket_items_by_kind(
    buckets: &[Bucket],
    name: BucketName,
    kinds: &[ItemKind],
) -> Vec<BucketItem> {
    find_bucket(buckets, name).map_or_else(Vec::new, |b| {
        b.items
            .iter()
            .filter(|item| kinds.contains(&item.kind()))
            .cloned()
            .collect()
    })
}

pub fn get_totals_from_bucket(buckets: &[Bucket], name: BucketName) -> Vec<Total> {
    find_bucket(buckets, name).map_or_else(Vec::new, |b| b.totals.clone())
}

pub fn get_all_items(buckets: &[Bucket]) -> Vec<BucketItem> {
    buckets.iter().flat_map(|b| b.items.clone()).collect()
}

pub fn get_all_items_by_kind(buckets: &[Bucket], kinds: &[ItemKind]) -> Vec<BucketItem> {
    buckets
        .iter()
        .flat_map(|b| &b.items)
        .filter(|item| kinds.contains(&item.kind()))
        .cloned()
        .collect()
}

pub fn get_all_measures(buckets: &[Bucket]) -> Vec<MeasureItem> {
    buckets
        .iter()
        .flat_map(|b| &b.items)
        .filter_map(BucketItem::as_measure)
        .cloned()
        .collect()
}

/// First bucket, in bucket order, that is named by the preference list and
/// whose every item matches the accepted kinds. An empty preferred bucket
/// matches and shadows later candidates.
fn get_preferred_bucket<'a>(
    buckets: &'a [Bucket],
    preference: &[BucketName],
    kinds: &[ItemKind],
) -> Option<&'a Bucket> {
    buckets.iter().find(|bucket| {
        preference.contains(&bucket.local_identifier)
            && bucket.items.iter().all(|item| kinds.contains(&item.kind()))
    })
}

pub fn get_preferred_bucket_items(
    buckets: &[Bucket],
    preference: &[BucketName],
    kinds: &[ItemKind],
) -> Vec<BucketItem> {
    get_preferred_bucket(buckets, preference, kinds).map_or_else(Vec::new, |b| b.items.clone())
}

/// Measures from the measure buckets in preference order; when none of those
/// buckets exists, every measure anywhere in the layout.
pub fn get_measure_items(buckets: &[Bucket]) -> Vec<BucketItem> {
    let preferred: Vec<BucketItem> = MEASURE_PREFERENCE
        .iter()
        .flat_map(|name| {
            get_preferred_bucket_items(buckets, &[*name], &[ItemKind::Metric])
        })
        .collect();
    if preferred.is_empty() {
        get_all_items_by_kind(buckets, &[ItemKind::Metric])
    } else {
        preferred
    }
}

pub fn get_stack_items(buckets: &[Bucket], kinds: &[ItemKind]) -> Vec<BucketItem> {
    get_preferred_bucket_items(buckets, STACK_PREFERENCE, kinds)
}

pub fn get_view_items(buckets: &[Bucket], kinds: &[ItemKind]) -> Vec<BucketItem> {
    get_preferred_bucket_items(buckets, VIEW_PREFERENCE, kinds)
}

pub fn get_attribute_items(buckets: &[Bucket]) -> Vec<BucketItem> {
    get_all_items_by_kind(buckets, &[ItemKind::Attribute, ItemKind::Date])
}

/// Attribute and date items minus whatever the stack buckets claim. Which
/// item kinds count as claimed follows the chart's own stack kinds, so a
/// chart that cannot stack dates still sees a stacked date as a view
/// candidate.
pub fn get_attribute_items_without_stacks(
    buckets: &[Bucket],
    stack_kinds: &[ItemKind],
) -> Vec<BucketItem> {
    let stacks: HashSet<String> = get_stack_items(buckets, stack_kinds)
        .iter()
        .map(|item| item.local_identifier().to_string())
        .collect();
    get_attribute_items(buckets)
        .into_iter()
        .filter(|item| !stacks.contains(item.local_identifier()))
        .collect()
}

/// Attribute items with the preferred buckets' contents first, then the
/// remaining buckets' attributes in layout order.
pub fn get_all_attribute_items_with_preference(
    buckets: &[Bucket],
    preference: &[BucketName],
) -> Vec<BucketItem> {
    let mut result: Vec<BucketItem> = preference
        .iter()
        .filter_map(|name| find_bucket(buckets, *name))
        .flat_map(|bucket| {
            bucket
                .items
                .iter()
                .filter(|item| item.is_attribute_or_date())
                .cloned()
                .collect::<Vec<_>>()
        })
        .collect();
    let rest = buckets
        .iter()
        .filter(|bucket| !preference.contains(&bucket.local_identifier))
        .flat_map(|bucket| &bucket.items)
        .filter(|item| item.is_attribute_or_date())
        .cloned();
    result.extend(rest);
    result
}

pub fn get_date_items(buckets: &[Bucket]) -> Vec<BucketItem> {
    get_attribute_items(buckets)
        .into_iter()
        .filter(BucketItem::is_date)
        .collect()
}

/// The date the layout treats as primary: the first date in the preferred
/// view buckets, else the first date anywhere.
pub fn get_main_date_item(buckets: &[Bucket]) -> Option<BucketItem> {
    get_view_items(buckets, &[ItemKind::Date])
        .into_iter()
        .next()
        .or_else(|| get_date_items(buckets).into_iter().next())
}

pub fn get_first_attribute(buckets: &[Bucket]) -> Option<BucketItem> {
    get_attribute_items(buckets).into_iter().next()
}

/// First measure executable as-is. Arithmetic measures with an unselected
/// operand do not qualify.
pub fn get_first_valid_measure(buckets: &[Bucket]) -> Option<BucketItem> {
    buckets
        .iter()
        .flat_map(|b| &b.items)
        .find(|item| {
            item.as_measure()
                .is_some_and(MeasureItem::has_complete_operands)
        })
        .cloned()
}

pub fn get_items_local_identifiers(items: &[BucketItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.local_identifier().to_string())
        .collect()
}

pub fn filter_out_derived_measures(items: &[BucketItem]) -> Vec<BucketItem> {
    items
        .iter()
        .filter(|item| !item.as_measure().is_some_and(MeasureItem::is_derived))
        .cloned()
        .collect()
}

pub fn find_derived_bucket_items(master: &MeasureItem, buckets: &[Bucket]) -> Vec<BucketItem> {
    buckets
        .iter()
        .flat_map(|b| &b.items)
        .filter(|item| {
            item.as_measure()
                .and_then(|m| m.master_local_identifier.as_deref())
                == Some(master.local_identifier.as_str())
        })
        .cloned()
        .collect()
}

pub fn find_master_bucket_item(derived: &MeasureItem, buckets: &[Bucket]) -> Option<BucketItem> {
    let master = derived.master_local_identifier.as_deref()?;
    buckets
        .iter()
        .flat_map(|b| &b.items)
        .find(|item| item.local_identifier() == master)
        .cloned()
}

pub fn has_derived_bucket_items(buckets: &[Bucket]) -> bool {
    buckets
        .iter()
        .flat_map(|b| &b.items)
        .any(|item| item.as_measure().is_some_and(MeasureItem::is_derived))
}

/// Walks the operand tree of an arithmetic measure and collects the distinct
/// comparison types of every derived measure it (transitively) builds on.
pub fn get_derived_types_from_arithmetic_measure(
    measure: &MeasureItem,
    all_measures: &[MeasureItem],
) -> Vec<OverTimeComparisonType> {
    fn walk(
        measure: &MeasureItem,
        all: &[MeasureItem],
        visited: &mut HashSet<String>,
        found: &mut Vec<OverTimeComparisonType>,
    ) {
        let Some(operands) = &measure.operand_local_identifiers else {
            return;
        };
        for operand in operands.iter().flatten() {
            if !visited.insert(operand.clone()) {
                continue;
            }
            let Some(target) = all.iter().find(|m| &m.local_identifier == operand) else {
                continue;
            };
            if let Some(otc) = target.over_time_comparison_type {
                if target.is_derived() && !found.contains(&otc) {
                    found.push(otc);
                }
            }
            walk(target, all, visited, found);
        }
    }

    let mut found = Vec::new();
    let mut visited = HashSet::new();
    walk(measure, all_measures, &mut visited, &mut found);
    found
}

pub fn filter_out_arithmetic_measures_from_derived(
    items: &[BucketItem],
    original_buckets: &[Bucket],
) -> Vec<BucketItem> {
    let all = get_all_measures(original_buckets);
    items
        .iter()
        .filter(|item| {
            item.as_measure().is_none_or(|m| {
                get_derived_types_from_arithmetic_measure(m, &all).is_empty()
            })
        })
        .cloned()
        .collect()
}

/// Strips every derived measure. Returns how many were removed.
pub fn remove_all_derived_measures(buckets: &mut [Bucket]) -> usize {
    let mut removed = 0;
    for bucket in buckets.iter_mut() {
        let before = bucket.items.len();
        bucket.items = filter_out_derived_measures(&bucket.items);
        removed += before - bucket.items.len();
    }
    removed
}

/// Drops derived measures whose master no longer resolves to a measure in
/// any bucket, returning the identifiers removed.
pub fn remove_dangling_derived_measures(buckets: &mut [Bucket]) -> Vec<String> {
    let snapshot = buckets.to_vec();
    let mut removed = Vec::new();
    for bucket in buckets.iter_mut() {
        bucket.items.retain(|item| {
            let Some(measure) = item.as_measure().filter(|m| m.is_derived()) else {
                return true;
            };
            if find_master_bucket_item(measure, &snapshot).is_some_and(|master| master.is_measure())
            {
                true
            } else {
                removed.push(item.local_identifier().to_string());
                false
            }
        });
    }
    removed
}

/// Strips arithmetic measures whose operand tree reaches a derived measure.
/// The lookup runs against the original layout so operands already removed
/// from the working buckets still count.
pub fn remove_all_arithmetic_measures_from_derived(
    buckets: &mut [Bucket],
    original_buckets: &[Bucket],
) -> usize {
    let mut removed = 0;
    for bucket in buckets.iter_mut() {
        let before = bucket.items.len();
        bucket.items = filter_out_arithmetic_measures_from_derived(&bucket.items, original_buckets);
        removed += before - bucket.items.len();
    }
    removed
}

pub fn set_measures_show_on_secondary_axis(buckets: &mut [Bucket], value: Option<bool>) {
    for bucket in buckets.iter_mut() {
        for item in bucket.items.iter_mut() {
            if let Some(measure) = item.as_measure_mut() {
                measure.show_on_secondary_axis = value;
            }
        }
    }
}

pub fn get_all_measures_show_on_secondary_axis(buckets: &[Bucket]) -> Vec<BucketItem> {
    buckets
        .iter()
        .flat_map(|b| &b.items)
        .filter(|item| {
            item.as_measure()
                .is_some_and(|m| m.show_on_secondary_axis == Some(true))
        })
        .cloned()
        .collect()
}

fn measure_dependencies(measure: &MeasureItem, all: &[MeasureItem], out: &mut Vec<String>) {
    if let Some(master) = &measure.master_local_identifier {
        if !out.contains(master) {
            out.push(master.clone());
        }
    }
    if let Some(operands) = &measure.operand_local_identifiers {
        for operand in operands.iter().flatten() {
            if out.contains(operand) {
                continue;
            }
            out.push(operand.clone());
            if let Some(target) = all.iter().find(|m| &m.local_identifier == operand) {
                measure_dependencies(target, all, out);
            }
        }
    }
}

/// The identifiers that must travel together with `measure`: the measure
/// itself, whatever it depends on, and optionally its derived companions.
fn measure_group(
    measure: &MeasureItem,
    all: &[MeasureItem],
    with_derived: bool,
) -> Vec<String> {
    let mut group = Vec::new();
    measure_dependencies(measure, all, &mut group);
    group.push(measure.local_identifier.clone());
    if with_derived {
        for candidate in all {
            if candidate.master_local_identifier.as_deref()
                == Some(measure.local_identifier.as_str())
                && !group.contains(&candidate.local_identifier)
            {
                group.push(candidate.local_identifier.clone());
            }
        }
    }
    group
}

fn select_measures(
    buckets: &[Bucket],
    per_bucket_limit: usize,
    total_limit: usize,
    with_derived: bool,
    all: &[MeasureItem],
    selected: &mut Vec<String>,
) {
    for bucket in buckets {
        let mut taken_here = bucket
            .items
            .iter()
            .filter(|item| selected.contains(&item.local_identifier().to_string()))
            .count();
        for item in &bucket.items {
            let Some(measure) = item.as_measure() else {
                continue;
            };
            if taken_here >= per_bucket_limit {
                break;
            }
            if selected.contains(&measure.local_identifier) {
                continue;
            }
            let group = measure_group(measure, all, with_derived);
            let fresh: Vec<String> = group
                .into_iter()
                .filter(|id| !selected.contains(id))
                .collect();
            // a group only fits as a whole
            if selected.len() + fresh.len() <= total_limit {
                selected.extend(fresh);
                taken_here += 1;
            }
        }
    }
}

fn prune_bucket_measure_items(buckets: &[Bucket], keep: &[String]) -> Vec<Bucket> {
    buckets
        .iter()
        .map(|bucket| {
            let mut pruned = bucket.clone();
            pruned.items.retain(|item| {
                !item.is_measure() || keep.contains(&item.local_identifier().to_string())
            });
            pruned
        })
        .collect()
}

/// Caps the total number of measures across all buckets. Selection first
/// takes one measure per bucket, then fills the remaining capacity in layout
/// order, always keeping a measure together with its dependencies.
pub fn limit_number_of_measures_in_buckets(
    buckets: &[Bucket],
    limit: usize,
    try_select_derived_with_master: bool,
) -> Vec<Bucket> {
    let all = get_all_measures(buckets);
    let mut selected = Vec::new();
    select_measures(
        buckets,
        1,
        limit,
        try_select_derived_with_master,
        &all,
        &mut selected,
    );
    select_measures(
        buckets,
        limit,
        limit,
        try_select_derived_with_master,
        &all,
        &mut selected,
    );
    prune_bucket_measure_items(buckets, &selected)
}

/// Stacked rendering draws one measure sliced by the stack attribute, so a
/// populated stack bucket caps measures at one.
pub fn get_filtered_measures_for_stacked_charts(buckets: &[Bucket], limit: usize) -> Vec<BucketItem> {
    let stacks = get_stack_items(buckets, &[ItemKind::Attribute, ItemKind::Date]);
    let effective_limit = if stacks.is_empty() { limit } else { 1 };
    get_measure_items(&limit_number_of_measures_in_buckets(
        buckets,
        effective_limit,
        false,
    ))
}

/// Target slot of a fixed-arity measure layout (scatter, bubble, headline).
#[derive(Debug, Clone)]
pub struct MeasureBucketSpec {
    pub name: BucketName,
    pub limit: usize,
    pub preferred: Vec<BucketName>,
}

impl MeasureBucketSpec {
    pub fn new(name: BucketName, limit: usize, preferred: &[BucketName]) -> Self {
        Self {
            name,
            limit,
            preferred: preferred.to_vec(),
        }
    }
}

/// Redistributes measures into fixed slots. Each slot first drains its own
/// and its preferred source buckets; a second pass hands leftover measures to
/// slots with free capacity, in slot order. Measures that find no slot drop.
pub fn transform_measure_buckets(specs: &[MeasureBucketSpec], buckets: &[Bucket]) -> Vec<Bucket> {
    let mut assigned: HashSet<String> = HashSet::new();
    let mut slots: Vec<Vec<BucketItem>> = vec![Vec::new(); specs.len()];

    for (slot, spec) in slots.iter_mut().zip(specs) {
        let mut sources = vec![spec.name];
        sources.extend(spec.preferred.iter().copied());
        for source in sources {
            for item in get_bucket_items(buckets, source) {
                if slot.len() >= spec.limit {
                    break;
                }
                if item.is_measure() && assigned.insert(item.local_identifier().to_string()) {
                    slot.push(item);
                }
            }
        }
    }

    let unclaimed: Vec<BucketItem> = buckets
        .iter()
        .flat_map(|b| &b.items)
        .filter(|item| item.is_measure() && !assigned.contains(item.local_identifier()))
        .cloned()
        .collect();
    let mut pool = unclaimed.into_iter();
    for (slot, spec) in slots.iter_mut().zip(specs) {
        while slot.len() < spec.limit {
            match pool.next() {
                Some(item) => slot.push(item),
                None => break,
            }
        }
    }

    specs
        .iter()
        .zip(slots)
        .map(|(spec, items)| Bucket::new(spec.name, items))
        .collect()
}

fn master_measure_count(items: &[BucketItem]) -> usize {
    items
        .iter()
        .filter(|item| item.as_measure().is_some_and(|m| !m.is_derived()))
        .count()
}

/// Enforces the per-bucket item limits of the attached UI configuration.
/// For measure buckets the limit counts master measures only, so derived
/// companions ride along for free.
pub fn apply_ui_config(
    extended: &mut ExtendedReferencePoint,
    warnings: &mut Vec<NormalizationWarning>,
) {
    for bucket in extended.buckets.iter_mut() {
        let Some(config) = extended.ui_config.bucket(bucket.local_identifier) else {
            continue;
        };
        let limit = config.items_limit;
        let over_limit = if bucket.items.iter().all(BucketItem::is_measure) {
            master_measure_count(&bucket.items) > limit
        } else {
            bucket.items.len() > limit
        };
        if over_limit {
            let dropped = bucket.items.len().saturating_sub(limit);
            let warning = if bucket.items.iter().all(BucketItem::is_measure) {
                NormalizationWarning::MeasuresTruncated {
                    bucket: bucket.local_identifier,
                    limit,
                    dropped,
                }
            } else {
                NormalizationWarning::AttributesTruncated {
                    bucket: bucket.local_identifier,
                    limit,
                    dropped,
                }
            };
            warnings.push(warning);
            bucket.items.truncate(limit);
        }
    }
}

/// An item may live in one bucket only; later occurrences lose.
pub fn remove_duplicate_bucket_items(
    buckets: &mut [Bucket],
    warnings: &mut Vec<NormalizationWarning>,
) {
    let mut seen: HashSet<String> = HashSet::new();
    for bucket in buckets.iter_mut() {
        let name = bucket.local_identifier;
        bucket.items.retain(|item| {
            let fresh = seen.insert(item.local_identifier().to_string());
            if !fresh {
                warnings.push(NormalizationWarning::DuplicateItemRemoved {
                    bucket: name,
                    local_identifier: item.local_identifier().to_string(),
                });
            }
            fresh
        });
    }
}

pub fn get_date_filter(filters: &FilterBucket) -> Option<&FilterItem> {
    filters.items.iter().find(|item| item.is_date_filter())
}

pub fn get_comparison_type_from_filters(filters: &FilterBucket) -> Option<OverTimeComparisonType> {
    get_date_filter(filters)
        .and_then(FilterItem::date_filter)
        .and_then(|date| date.over_time_comparison_type)
}

fn filter_item_survives(item: &FilterItem, buckets: &[Bucket]) -> bool {
    let attribute_items = get_attribute_items(buckets);
    let measures = get_all_measures(buckets);
    let attribute_survives = attribute_items
        .iter()
        .filter_map(BucketItem::as_attribute)
        .any(|attr| attr.attribute == item.attribute)
        || (item.is_date_filter() && !get_date_items(buckets).is_empty());
    let measure_survives = |local_identifier: &str| {
        measures
            .iter()
            .any(|m| m.local_identifier == local_identifier)
    };
    match item.filters.first() {
        Some(BucketFilter::MeasureValue(mvf)) => {
            !attribute_items.is_empty() && measure_survives(&mvf.measure_local_identifier)
        }
        Some(BucketFilter::Ranking(ranking)) => {
            !attribute_items.is_empty()
                && measure_survives(&ranking.measure)
                && ranking.attributes.iter().all(|attr| {
                    attribute_items
                        .iter()
                        .filter_map(BucketItem::as_attribute)
                        .any(|a| &a.attribute == attr)
                })
        }
        _ => item.auto_created == Some(false) || attribute_survives,
    }
}

/// Drops filters whose backing items did not survive normalization. Filters
/// the user created explicitly (`auto_created == false`) stay regardless.
pub fn sanitize_unused_filters(
    extended: &mut ExtendedReferencePoint,
    warnings: &mut Vec<NormalizationWarning>,
) {
    let buckets = extended.buckets.clone();
    extended.filters.items.retain(|item| {
        let keep = filter_item_survives(item, &buckets);
        if !keep {
            warnings.push(NormalizationWarning::UnusedFilterRemoved {
                attribute: item.attribute.clone(),
            });
        }
        keep
    });
}

/// The derived items of every master among `items`, interleaved right after
/// their master, preserving the order of the source layout.
pub fn with_derived_after_master(items: &[BucketItem], source_buckets: &[Bucket]) -> Vec<BucketItem> {
    let mut result = Vec::new();
    for item in items {
        result.push(item.clone());
        if let Some(master) = item.as_measure().filter(|m| !m.is_derived()) {
            for derived in find_derived_bucket_items(master, source_buckets) {
                if !items
                    .iter()
                    .any(|i| i.local_identifier() == derived.local_identifier())
                {
                    result.push(derived);
                }
            }
        }
    }
    result.into_iter().unique_by(|item| item.local_identifier().to_string()).collect()
}
