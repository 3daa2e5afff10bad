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

/// Bubbles encode three measures: x axis, y axis and size.
pub struct BubbleConfigurator;

impl ChartConfigurator for BubbleConfigurator {
    fn chart_type(&self) -> ChartType {
        ChartType::Bubble
    }

    fn default_ui_config(&self, _input_buckets: &[Bucket]) -> UiConfig {
        ui_config::bubble_ui_config()
    }

    fn classify_buckets(
        &self,
        extended: &mut ExtendedReferencePoint,
        _original: &ReferencePoint,
        _warnings: &mut Vec<NormalizationWarning>,
    ) {
        let source = extended.buckets.clone();
        let mut buckets = transform_measure_buckets(
            &[
                MeasureBucketSpec::new(BucketName::Measures, 1, &[]),
                MeasureBucketSpec::new(BucketName::SecondaryMeasures, 1, &[]),
                MeasureBucketSpec::new(BucketName::TertiaryMeasures, 1, &[]),
            ],
            &source,
        );
        let views = get_first_attribute(&source).into_iter().collect();
        buckets.push(Bucket::new(BucketName::View, views));
        extended.buckets = buckets;
    }

    fn enrich_ui_config(
        &self,
        extended: &mut ExtendedReferencePoint,
        context: Option<&TranslationContext>,
    ) {
        set_bucket_titles(extended, ChartType::Bubble, context);
        recompute_can_add_items(extended);
    }
}
