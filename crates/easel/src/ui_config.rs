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

use crate::model::{AxisKind, BucketName, ChartType, ItemKind, OverTimeComparisonType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod limits {
    pub const MAX_METRICS_COUNT: usize = 40;
    pub const MAX_CATEGORIES_COUNT: usize = 1;
    pub const MAX_STACKS_COUNT: usize = 1;
    pub const MAX_VIEW_COUNT: usize = 2;
    pub const MAX_FILTERS_COUNT: usize = 20;
    pub const MAX_TABLE_CATEGORIES_COUNT: usize = 20;
    pub const DEFAULT_TREEMAP_MEASURES_COUNT: usize = 1;
    pub const DEFAULT_HEADLINE_METRICS_COUNT: usize = 1;
}

use limits::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketUiConfig {
    pub accepts: Vec<ItemKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub items_limit: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_limit_by_type: Option<BTreeMap<ItemKind, usize>>,
    pub enabled: bool,
    pub allows_reordering: bool,
    pub allows_swapping: bool,
    pub can_add_items: bool,
    pub is_show_in_percent_enabled: bool,
    pub is_show_in_percent_visible: bool,
    #[serde(default)]
    pub is_show_on_secondary_axis_visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,
}

impl BucketUiConfig {
    fn measures_base() -> Self {
        Self {
            accepts: vec![ItemKind::Metric],
            title: None,
            subtitle: None,
            items_limit: MAX_METRICS_COUNT,
            items_limit_by_type: None,
            enabled: true,
            allows_reordering: true,
            allows_swapping: true,
            can_add_items: true,
            is_show_in_percent_enabled: false,
            is_show_in_percent_visible: true,
            is_show_on_secondary_axis_visible: false,
            warning_message: None,
        }
    }

    fn view_base() -> Self {
        Self {
            accepts: vec![ItemKind::Attribute, ItemKind::Date],
            title: None,
            subtitle: None,
            items_limit: MAX_CATEGORIES_COUNT,
            items_limit_by_type: Some(BTreeMap::from([(ItemKind::Date, 1)])),
            enabled: true,
            allows_reordering: true,
            allows_swapping: true,
            can_add_items: true,
            is_show_in_percent_enabled: false,
            is_show_in_percent_visible: false,
            is_show_on_secondary_axis_visible: false,
            warning_message: None,
        }
    }

    fn stack_base() -> Self {
        Self {
            accepts: vec![ItemKind::Attribute],
            items_limit: MAX_STACKS_COUNT,
            items_limit_by_type: None,
            ..Self::view_base()
        }
    }

    fn with_limit(mut self, limit: usize) -> Self {
        self.items_limit = limit;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recommendations {
    pub comparison_and_trending: bool,
    pub percent: bool,
    pub over_time_comparison: bool,
    pub previous_period: bool,
    pub trendline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalStacking {
    pub supported: bool,
    pub stack_measures: bool,
    #[serde(default)]
    pub can_stack_in_percent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAsReport {
    pub supported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersUiConfig {
    pub accepts: Vec<ItemKind>,
    pub items_limit: usize,
    pub allow_all_time_filter: bool,
}

impl Default for FiltersUiConfig {
    fn default() -> Self {
        Self {
            accepts: vec![ItemKind::Attribute, ItemKind::Date],
            items_limit: MAX_FILTERS_COUNT,
            allow_all_time_filter: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    pub buckets: BTreeMap<BucketName, BucketUiConfig>,
    #[serde(default)]
    pub filters: FiltersUiConfig,
    #[serde(default)]
    pub recommendations: Recommendations,
    #[serde(default)]
    pub supported_over_time_comparison_types: Vec<OverTimeComparisonType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_chart_types: Option<Vec<ChartType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_stacking: Option<OptionalStacking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<AxisKind>,
    pub open_as_report: OpenAsReport,
    pub export_enabled: bool,
    #[serde(default)]
    pub no_metric_accepted: bool,
}

impl UiConfig {
    fn base(buckets: Vec<(BucketName, BucketUiConfig)>) -> Self {
        Self {
            buckets: buckets.into_iter().collect(),
            filters: FiltersUiConfig::default(),
            recommendations: Recommendations::default(),
            supported_over_time_comparison_types: Vec::new(),
            supported_chart_types: None,
            optional_stacking: None,
            axis: None,
            open_as_report: OpenAsReport {
                supported: true,
                warning_message: None,
            },
            export_enabled: true,
            no_metric_accepted: false,
        }
    }

    pub fn bucket(&self, name: BucketName) -> Option<&BucketUiConfig> {
        self.buckets.get(&name)
    }

    pub fn bucket_mut(&mut self, name: BucketName) -> Option<&mut BucketUiConfig> {
        self.buckets.get_mut(&name)
    }

    pub fn items_limit(&self, name: BucketName) -> usize {
        self.buckets.get(&name).map_or(0, |b| b.items_limit)
    }

    pub fn supports_over_time_comparison(&self) -> bool {
        !self.supported_over_time_comparison_types.is_empty()
    }
}

pub fn base_chart_ui_config() -> UiConfig {
    UiConfig::base(vec![
        (BucketName::Measures, BucketUiConfig::measures_base()),
        (BucketName::View, BucketUiConfig::view_base()),
        (BucketName::Stack, BucketUiConfig::stack_base()),
    ])
}

pub fn column_bar_ui_config() -> UiConfig {
    let mut config = base_chart_ui_config();
    if let Some(view) = config.bucket_mut(BucketName::View) {
        view.items_limit = MAX_VIEW_COUNT;
    }
    config.supported_over_time_comparison_types = vec![
        OverTimeComparisonType::SamePeriodPreviousYear,
        OverTimeComparisonType::PreviousPeriod,
    ];
    config.optional_stacking = Some(OptionalStacking {
        supported: true,
        stack_measures: false,
        can_stack_in_percent: true,
    });
    config
}

pub fn line_ui_config() -> UiConfig {
    let mut config = UiConfig::base(vec![
        (BucketName::Measures, BucketUiConfig::measures_base()),
        (BucketName::Trend, BucketUiConfig::view_base()),
        (BucketName::Segment, BucketUiConfig::stack_base()),
    ]);
    config.supported_over_time_comparison_types = vec![
        OverTimeComparisonType::SamePeriodPreviousYear,
        OverTimeComparisonType::PreviousPeriod,
    ];
    config
}

pub fn area_ui_config() -> UiConfig {
    let mut config = UiConfig::base(vec![
        (BucketName::Measures, BucketUiConfig::measures_base()),
        (
            BucketName::View,
            BucketUiConfig::view_base().with_limit(MAX_VIEW_COUNT),
        ),
        (BucketName::Stack, BucketUiConfig::stack_base()),
    ]);
    config.optional_stacking = Some(OptionalStacking {
        supported: true,
        stack_measures: true,
        can_stack_in_percent: true,
    });
    config
}

pub fn combo_ui_config() -> UiConfig {
    let mut config = UiConfig::base(vec![
        (BucketName::Measures, BucketUiConfig::measures_base()),
        (
            BucketName::SecondaryMeasures,
            BucketUiConfig::measures_base(),
        ),
        (BucketName::View, BucketUiConfig::view_base()),
    ]);
    config.supported_over_time_comparison_types = vec![
        OverTimeComparisonType::SamePeriodPreviousYear,
        OverTimeComparisonType::PreviousPeriod,
    ];
    config.supported_chart_types =
        Some(vec![ChartType::Column, ChartType::Line, ChartType::Area]);
    config.optional_stacking = Some(OptionalStacking {
        supported: true,
        stack_measures: false,
        can_stack_in_percent: true,
    });
    config
}

pub fn scatter_ui_config() -> UiConfig {
    UiConfig::base(vec![
        (
            BucketName::Measures,
            BucketUiConfig::measures_base().with_limit(1),
        ),
        (
            BucketName::SecondaryMeasures,
            BucketUiConfig::measures_base().with_limit(1),
        ),
        (BucketName::Attribute, BucketUiConfig::view_base()),
    ])
}

pub fn bubble_ui_config() -> UiConfig {
    UiConfig::base(vec![
        (
            BucketName::Measures,
            BucketUiConfig::measures_base().with_limit(1),
        ),
        (
            BucketName::SecondaryMeasures,
            BucketUiConfig::measures_base().with_limit(1),
        ),
        (
            BucketName::TertiaryMeasures,
            BucketUiConfig::measures_base().with_limit(1),
        ),
        (BucketName::View, BucketUiConfig::view_base()),
    ])
}

pub fn heatmap_ui_config() -> UiConfig {
    let mut stack = BucketUiConfig::stack_base();
    stack.accepts = vec![ItemKind::Attribute, ItemKind::Date];
    UiConfig::base(vec![
        (
            BucketName::Measures,
            BucketUiConfig::measures_base().with_limit(1),
        ),
        (BucketName::View, BucketUiConfig::view_base()),
        (BucketName::Stack, stack),
    ])
}

/// Treemap limits depend on what survived classification: attributes in the
/// view cap measures at one, while a multi-measure treemap without view
/// attributes closes the view bucket entirely.
pub fn treemap_ui_config(has_non_stack_attributes: bool, has_multiple_measures: bool) -> UiConfig {
    let measures_limit = if has_non_stack_attributes {
        DEFAULT_TREEMAP_MEASURES_COUNT
    } else {
        MAX_METRICS_COUNT
    };
    let view_limit = if !has_non_stack_attributes && has_multiple_measures {
        0
    } else {
        MAX_CATEGORIES_COUNT
    };
    let mut view = BucketUiConfig::view_base().with_limit(view_limit);
    view.can_add_items = view_limit > 0;
    UiConfig::base(vec![
        (
            BucketName::Measures,
            BucketUiConfig::measures_base().with_limit(measures_limit),
        ),
        (BucketName::View, view),
        (BucketName::Segment, BucketUiConfig::stack_base()),
    ])
}

pub fn headline_ui_config() -> UiConfig {
    let mut config = UiConfig::base(vec![
        (
            BucketName::Measures,
            BucketUiConfig::measures_base().with_limit(DEFAULT_HEADLINE_METRICS_COUNT),
        ),
        (
            BucketName::SecondaryMeasures,
            BucketUiConfig::measures_base().with_limit(DEFAULT_HEADLINE_METRICS_COUNT),
        ),
    ]);
    config.supported_over_time_comparison_types = vec![
        OverTimeComparisonType::SamePeriodPreviousYear,
        OverTimeComparisonType::PreviousPeriod,
    ];
    config.export_enabled = false;
    config
}

pub fn table_ui_config() -> UiConfig {
    let mut attribute = BucketUiConfig::view_base().with_limit(MAX_TABLE_CATEGORIES_COUNT);
    attribute.items_limit_by_type = None;
    let mut columns = attribute.clone();
    columns.accepts = vec![ItemKind::Attribute, ItemKind::Date];
    let mut config = UiConfig::base(vec![
        (BucketName::Measures, BucketUiConfig::measures_base()),
        (BucketName::Attribute, attribute),
        (BucketName::Columns, columns),
    ]);
    config.supported_over_time_comparison_types = vec![
        OverTimeComparisonType::SamePeriodPreviousYear,
        OverTimeComparisonType::PreviousPeriod,
    ];
    config.no_metric_accepted = true;
    config
}
