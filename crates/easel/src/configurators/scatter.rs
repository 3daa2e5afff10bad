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
use crate::bucket_helper::{
    get_first_attribute, transform_measure_buckets, MeasureBucketSpec,
};
use crate::error::NormalizationWarning;
use crate::model::{
    Bucket, BucketName, ChartType, ExtendedReferencePoint, ReferencePoint,
};
use crate::translations::TranslationContext;
use crate::ui_config::{self, UiConfig};
use crate::ui_config_helpers::{recompute_can_add_items, set_bucket_titles};

/// Scatter plots exactly one measure per axis; a third measure has no slot
/// and tertiary measures never spill into the free pool.
pub struct ScatterConfigurator;

impl ChartConfigurator for ScatterConfigurator {
    fn chart_type(&self) -> ChartType {
        ChartType::Scatter
    }

    fn default_ui_config(&self, _input_buckets: &[Bucket]) -> UiConfig {
        ui_config::scatter_ui_config()
    }

    fn classify_buckets(
        &self,
        extended: &mut ExtendedReferencePoint,
        _original: &ReferencePoint,
        _warnings: &mut Vec<NormalizationWarning>,
    ) {
        let source: Vec<Bucket> = extended
            .buckets
            .iter()
            .filter(|b| b.local_identifier != BucketName::TertiaryMeasures)
            .cloned()
            .collect();
        let mut buckets = transform_measure_buckets(
            &[
                MeasureBucketSpec::new(BucketName::Measures, 1, &[]),
                MeasureBucketSpec::new(BucketName::SecondaryMeasures, 1, &[]),
            ],
            &source,
        );
        let attributes = get_first_attribute(&source).into_iter().collect();
        buckets.push(Bucket::new(BucketName::Attribute, attributes));
        extended.buckets = buckets;
    }

    fn enrich_ui_config(
        &self,
        extended: &mut ExtendedReferencePoint,
        context: Option<&TranslationContext>,
    ) {
        set_bucket_titles(extended, ChartType::Scatter, context);
        recompute_can_add_items(extended);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket_helper::{get_bucket_items, get_items_local_identifiers};
    use crate::configurators::{extended_reference_point, ConfiguratorState, NormalizationOptions};
    use crate::model::{AttributeItem, BucketItem, FilterBucket, MeasureItem};

    fn metric(id: &str) -> BucketItem {
        BucketItem::Metric(MeasureItem::new(id))
    }

    fn attribute(id: &str) -> BucketItem {
        BucketItem::Attribute(AttributeItem::new(id, &format!("attr.{id}")))
    }

    fn normalize(reference_point: &ReferencePoint) -> ExtendedReferencePoint {
        extended_reference_point(
            ChartType::Scatter,
            reference_point,
            &ConfiguratorState::default(),
            NormalizationOptions::default(),
            None,
        )
        .reference_point
    }

    #[test]
    fn measures_split_across_both_axes() {
        let rp = ReferencePoint {
            buckets: vec![
                Bucket::new(BucketName::Measures, vec![metric("m1"), metric("m2")]),
                Bucket::new(BucketName::Attribute, vec![attribute("a1")]),
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
        assert_eq!(
            get_items_local_identifiers(&get_bucket_items(&result.buckets, BucketName::Attribute)),
            vec!["a1"]
        );
    }

    #[test]
    fn tertiary_measures_are_dropped() {
        let rp = ReferencePoint {
            buckets: vec![
                Bucket::new(BucketName::Measures, vec![metric("m1")]),
                Bucket::new(BucketName::TertiaryMeasures, vec![metric("m3")]),
            ],
            filters: FilterBucket::default(),
            properties: None,
        };
        let result = normalize(&rp);
        assert!(get_bucket_items(&result.buckets, BucketName::SecondaryMeasures).is_empty());
        assert!(!result
            .buckets
            .iter()
            .flat_map(|b| &b.items)
            .any(|item| item.local_identifier() == "m3"));
    }
}
