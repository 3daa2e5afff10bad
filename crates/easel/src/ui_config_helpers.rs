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

//! Enrichment of the attached UI config after buckets are classified:
//! titles, add-item eligibility, warning messages and export downgrades.

use crate::bucket_rules::get_master_measures_count;
use crate::model::{Bucket, BucketItem, BucketName, ChartType, ExtendedReferencePoint};
use crate::translations::{bucket_title_key, get_translation, TranslationContext};

pub const STACK_WARNING_KEY: &str = "dashboard.bucket.metric_stack_by_warning";
pub const VIEW_WARNING_KEY: &str = "dashboard.bucket.treemap_view_by_warning";

fn master_item_count(bucket: &Bucket) -> usize {
    if bucket.items.iter().all(BucketItem::is_measure) {
        bucket
            .items
            .iter()
            .filter(|item| item.as_measure().is_some_and(|m| !m.is_derived()))
            .count()
    } else {
        bucket.items.len()
    }
}

pub fn set_bucket_titles(
    extended: &mut ExtendedReferencePoint,
    chart_type: ChartType,
    context: Option<&TranslationContext>,
) {
    let names: Vec<BucketName> = extended.ui_config.buckets.keys().copied().collect();
    for name in names {
        let title = get_translation(&bucket_title_key(name, chart_type), context);
        if let Some(config) = extended.ui_config.bucket_mut(name) {
            config.title = Some(title);
        }
    }
}

/// A bucket takes more items while its master-item count is under the limit.
pub fn recompute_can_add_items(extended: &mut ExtendedReferencePoint) {
    let counts: Vec<(BucketName, usize)> = extended
        .buckets
        .iter()
        .map(|bucket| (bucket.local_identifier, master_item_count(bucket)))
        .collect();
    for (name, config) in extended.ui_config.buckets.iter_mut() {
        let current = counts
            .iter()
            .find(|(n, _)| n == name)
            .map_or(0, |(_, count)| *count);
        config.can_add_items = config.enabled && current < config.items_limit;
    }
}

/// With more than one master measure a stack attribute cannot apply; the
/// stack bucket closes and explains itself.
pub fn disable_stack_for_multiple_measures(
    extended: &mut ExtendedReferencePoint,
    stack_bucket: BucketName,
    context: Option<&TranslationContext>,
) {
    let masters = get_master_measures_count(&extended.buckets, BucketName::Measures);
    let stack_empty = extended
        .buckets
        .iter()
        .find(|b| b.local_identifier == stack_bucket)
        .is_none_or(|b| b.items.is_empty());
    if masters > 1 && stack_empty {
        if let Some(config) = extended.ui_config.bucket_mut(stack_bucket) {
            config.can_add_items = false;
            config.warning_message = Some(get_translation(STACK_WARNING_KEY, context));
        }
    }
}

/// Closed treemap view bucket (multi-measure, no attributes) gets a warning
/// explaining why nothing can be dropped there.
pub fn warn_on_closed_bucket(
    extended: &mut ExtendedReferencePoint,
    bucket: BucketName,
    context: Option<&TranslationContext>,
) {
    if let Some(config) = extended.ui_config.bucket_mut(bucket) {
        if config.items_limit == 0 {
            config.can_add_items = false;
            config.warning_message = Some(get_translation(VIEW_WARNING_KEY, context));
        }
    }
}

/// Dual axis, percent stacking and custom color mappings have no legacy
/// report equivalent.
pub fn downgrade_open_as_report(extended: &mut ExtendedReferencePoint) {
    let controls = &extended.properties.controls;
    let blocked = controls.dual_axis == Some(true)
        || controls.stack_measures_to_percent == Some(true)
        || extended.properties.has_color_mapping();
    if blocked {
        extended.ui_config.open_as_report.supported = false;
    }
}

/// Dual-axis capable charts expose the per-measure axis switch.
pub fn set_secondary_axis_visibility(extended: &mut ExtendedReferencePoint, visible: bool) {
    for name in [BucketName::Measures, BucketName::SecondaryMeasures] {
        if let Some(config) = extended.ui_config.bucket_mut(name) {
            config.is_show_on_secondary_axis_visible = visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeItem, FilterBucket, MeasureItem};
    use crate::properties::VisualizationProperties;
    use crate::ui_config;

    fn metric(id: &str) -> BucketItem {
        BucketItem::Metric(MeasureItem::new(id))
    }

    fn base_extended(buckets: Vec<Bucket>) -> ExtendedReferencePoint {
        ExtendedReferencePoint {
            buckets,
            filters: FilterBucket::default(),
            properties: VisualizationProperties::default(),
            ui_config: ui_config::base_chart_ui_config(),
        }
    }

    #[test]
    fn titles_fall_back_to_keys() {
        let mut ext = base_extended(vec![]);
        set_bucket_titles(&mut ext, ChartType::Column, None);
        assert_eq!(
            ext.ui_config
                .bucket(BucketName::Measures)
                .unwrap()
                .title
                .as_deref(),
            Some("dashboard.bucket.measures_column")
        );
    }

    #[test]
    fn can_add_items_tracks_limits() {
        let mut ext = base_extended(vec![
            Bucket::new(
                BucketName::View,
                vec![BucketItem::Attribute(AttributeItem::new("a1", "attr.a1"))],
            ),
            Bucket::new(BucketName::Measures, vec![metric("m1")]),
        ]);
        recompute_can_add_items(&mut ext);
        // view limit is 1 and holds 1 item
        assert!(!ext.ui_config.bucket(BucketName::View).unwrap().can_add_items);
        assert!(ext.ui_config.bucket(BucketName::Measures).unwrap().can_add_items);
    }

    #[test]
    fn stack_disabled_with_warning_for_two_masters() {
        let mut ext = base_extended(vec![Bucket::new(
            BucketName::Measures,
            vec![metric("m1"), metric("m2")],
        )]);
        disable_stack_for_multiple_measures(&mut ext, BucketName::Stack, None);
        let stack = ext.ui_config.bucket(BucketName::Stack).unwrap();
        assert!(!stack.can_add_items);
        assert_eq!(stack.warning_message.as_deref(), Some(STACK_WARNING_KEY));
    }

    #[test]
    fn open_as_report_blocked_by_dual_axis() {
        let mut ext = base_extended(vec![]);
        ext.properties.controls.dual_axis = Some(true);
        downgrade_open_as_report(&mut ext);
        assert!(!ext.ui_config.open_as_report.supported);
    }
}
