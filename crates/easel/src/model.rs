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

use crate::properties::VisualizationProperties;
use crate::ui_config::UiConfig;
use serde::{Deserialize, Serialize};

/// Attribute identifier shared by every date bucket item and date filter.
pub const DATE_DATASET_ATTRIBUTE: &str = "attr.datedataset";
/// Interval name of the unbounded date filter.
pub const ALL_TIME: &str = "all_time";
/// Header identifier marking the measure group inside a dimension.
pub const MEASURE_GROUP: &str = "measureGroup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Column,
    Bar,
    Line,
    Area,
    Combo,
    Scatter,
    Bubble,
    Heatmap,
    Treemap,
    Headline,
    Table,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Column => "column",
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Combo => "combo",
            ChartType::Scatter => "scatter",
            ChartType::Bubble => "bubble",
            ChartType::Heatmap => "heatmap",
            ChartType::Treemap => "treemap",
            ChartType::Headline => "headline",
            ChartType::Table => "table",
        }
    }

    pub fn is_stackable(&self) -> bool {
        matches!(
            self,
            ChartType::Column | ChartType::Bar | ChartType::Area | ChartType::Combo
        )
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChartType {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "column" => Ok(ChartType::Column),
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "area" => Ok(ChartType::Area),
            "combo" => Ok(ChartType::Combo),
            "scatter" => Ok(ChartType::Scatter),
            "bubble" => Ok(ChartType::Bubble),
            "heatmap" => Ok(ChartType::Heatmap),
            "treemap" => Ok(ChartType::Treemap),
            "headline" => Ok(ChartType::Headline),
            "table" => Ok(ChartType::Table),
            other => Err(crate::error::ConfigError::UnknownChartType {
                name: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketName {
    Measures,
    SecondaryMeasures,
    TertiaryMeasures,
    View,
    Stack,
    Segment,
    Trend,
    Attribute,
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Metric,
    Attribute,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateGranularity {
    Date,
    Week,
    Month,
    Quarter,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverTimeComparisonType {
    SamePeriodPreviousYear,
    PreviousPeriod,
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    Primary,
    Secondary,
    Dual,
}

/// A measure placed in a bucket. Derived measures reference their master via
/// `master_local_identifier`; arithmetic measures list their operands, with a
/// `None` entry standing for a still-unselected operand slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureItem {
    pub local_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_local_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over_time_comparison_type: Option<OverTimeComparisonType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operand_local_identifiers: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub show_in_percent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_on_secondary_axis: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<BucketFilter>,
}

impl MeasureItem {
    pub fn new(local_identifier: &str) -> Self {
        Self {
            local_identifier: local_identifier.to_string(),
            master_local_identifier: None,
            over_time_comparison_type: None,
            operand_local_identifiers: None,
            show_in_percent: false,
            show_on_secondary_axis: None,
            aggregation: None,
            filters: Vec::new(),
        }
    }

    pub fn is_derived(&self) -> bool {
        self.master_local_identifier.is_some()
    }

    pub fn is_arithmetic(&self) -> bool {
        self.operand_local_identifiers.is_some()
    }

    /// An arithmetic measure with an unselected operand cannot be executed.
    pub fn has_complete_operands(&self) -> bool {
        match &self.operand_local_identifiers {
            Some(operands) => operands.iter().all(Option::is_some),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeItem {
    pub local_identifier: String,
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<DateGranularity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_dataset_ref: Option<String>,
}

impl AttributeItem {
    pub fn new(local_identifier: &str, attribute: &str) -> Self {
        Self {
            local_identifier: local_identifier.to_string(),
            attribute: attribute.to_string(),
            granularity: None,
            date_dataset_ref: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BucketItem {
    Metric(MeasureItem),
    Attribute(AttributeItem),
    Date(AttributeItem),
}

impl BucketItem {
    pub fn local_identifier(&self) -> &str {
        match self {
            BucketItem::Metric(m) => &m.local_identifier,
            BucketItem::Attribute(a) | BucketItem::Date(a) => &a.local_identifier,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            BucketItem::Metric(_) => ItemKind::Metric,
            BucketItem::Attribute(_) => ItemKind::Attribute,
            BucketItem::Date(_) => ItemKind::Date,
        }
    }

    pub fn is_measure(&self) -> bool {
        matches!(self, BucketItem::Metric(_))
    }

    pub fn is_date(&self) -> bool {
        matches!(self, BucketItem::Date(_))
    }

    pub fn is_attribute_or_date(&self) -> bool {
        !self.is_measure()
    }

    pub fn as_measure(&self) -> Option<&MeasureItem> {
        match self {
            BucketItem::Metric(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_measure_mut(&mut self) -> Option<&mut MeasureItem> {
        match self {
            BucketItem::Metric(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&AttributeItem> {
        match self {
            BucketItem::Attribute(a) | BucketItem::Date(a) => Some(a),
            _ => None,
        }
    }

    pub fn week_granularity(&self) -> bool {
        matches!(
            self,
            BucketItem::Date(a) if a.granularity == Some(DateGranularity::Week)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalType {
    Sum,
    Max,
    Min,
    Avg,
    Med,
    Nat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Total {
    pub measure_identifier: String,
    pub attribute_identifier: String,
    #[serde(rename = "type")]
    pub total_type: TotalType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub local_identifier: BucketName,
    pub items: Vec<BucketItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub totals: Vec<Total>,
    /// Combo sub-chart rendering of the measures in this bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
}

impl Bucket {
    pub fn new(local_identifier: BucketName, items: Vec<BucketItem>) -> Self {
        Self {
            local_identifier,
            items,
            totals: Vec::new(),
            chart_type: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    Absolute,
    Relative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntervalBound {
    Relative(i64),
    Absolute(String),
}

/// Date interval of a global date filter. A bound of `Relative(0)` means the
/// current period and is distinct from an absent bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInterval {
    pub name: String,
    pub granularity: DateGranularity,
    #[serde(rename = "type")]
    pub kind: IntervalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<IntervalBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<IntervalBound>,
}

impl FilterInterval {
    pub fn is_all_time(&self) -> bool {
        self.name == ALL_TIME
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFilter {
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over_time_comparison_type: Option<OverTimeComparisonType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<FilterInterval>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFilter {
    pub attribute: String,
    #[serde(default)]
    pub is_inverted: bool,
    #[serde(default)]
    pub selected_elements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "operator")]
pub enum MeasureValueCondition {
    #[serde(rename_all = "camelCase")]
    Comparison { operator_name: String, value: f64 },
    #[serde(rename_all = "camelCase")]
    Range {
        operator_name: String,
        from: f64,
        to: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureValueFilter {
    pub measure_local_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<MeasureValueCondition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingOperator {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingFilter {
    pub measure: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    pub operator: RankingOperator,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BucketFilter {
    Date(DateFilter),
    Attribute(AttributeFilter),
    MeasureValue(MeasureValueFilter),
    Ranking(RankingFilter),
}

impl BucketFilter {
    pub fn is_date(&self) -> bool {
        matches!(self, BucketFilter::Date(_))
    }

    pub fn as_date(&self) -> Option<&DateFilter> {
        match self {
            BucketFilter::Date(d) => Some(d),
            _ => None,
        }
    }
}

/// One entry of the filter bucket. `attribute` names the filtered display
/// form, or [`DATE_DATASET_ATTRIBUTE`] for global date filters. Auto-created
/// entries were added by normalization rather than the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterItem {
    pub local_identifier: String,
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_created: Option<bool>,
    #[serde(default)]
    pub filters: Vec<BucketFilter>,
}

impl FilterItem {
    pub fn is_date_filter(&self) -> bool {
        self.attribute == DATE_DATASET_ATTRIBUTE
    }

    pub fn date_filter(&self) -> Option<&DateFilter> {
        self.filters.iter().find_map(BucketFilter::as_date)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterBucket {
    #[serde(default)]
    pub items: Vec<FilterItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SortLocator {
    #[serde(rename_all = "camelCase")]
    Attribute {
        attribute_identifier: String,
        element: String,
    },
    #[serde(rename_all = "camelCase")]
    Measure { measure_identifier: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SortItem {
    #[serde(rename_all = "camelCase")]
    Attribute {
        attribute_identifier: String,
        direction: SortDirection,
    },
    #[serde(rename_all = "camelCase")]
    Measure {
        locators: Vec<SortLocator>,
        direction: SortDirection,
    },
}

/// What the host hands to a configurator: the bucket layout as the user last
/// left it, plus filters and any explicit properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePoint {
    pub buckets: Vec<Bucket>,
    #[serde(default)]
    pub filters: FilterBucket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<VisualizationProperties>,
}

/// The canonical result of normalization: buckets reshaped for one chart
/// type, filters sanitized against them, properties reconciled and a full
/// UI configuration attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedReferencePoint {
    pub buckets: Vec<Bucket>,
    pub filters: FilterBucket,
    pub properties: VisualizationProperties,
    pub ui_config: UiConfig,
}

/// One execution dimension, used only by the structural boundary check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub item_identifiers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_and_arithmetic_flags() {
        let mut m = MeasureItem::new("m1");
        assert!(!m.is_derived());
        assert!(!m.is_arithmetic());
        m.master_local_identifier = Some("m0".into());
        assert!(m.is_derived());
        m.operand_local_identifiers = Some(vec![Some("a".into()), None]);
        assert!(m.is_arithmetic());
        assert!(!m.has_complete_operands());
    }

    #[test]
    fn relative_interval_zero_bounds_survive_serialization() {
        let interval = FilterInterval {
            name: "last_month".into(),
            granularity: DateGranularity::Month,
            kind: IntervalKind::Relative,
            from: Some(IntervalBound::Relative(0)),
            to: Some(IntervalBound::Relative(0)),
        };
        let yaml = serde_yaml::to_string(&interval).unwrap();
        let back: FilterInterval = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.from, Some(IntervalBound::Relative(0)));
        assert_eq!(back.to, Some(IntervalBound::Relative(0)));
        assert!(!back.is_all_time());
    }

    #[test]
    fn all_time_is_detected_by_name_not_bounds() {
        let interval = FilterInterval {
            name: ALL_TIME.into(),
            granularity: DateGranularity::Year,
            kind: IntervalKind::Relative,
            from: None,
            to: None,
        };
        assert!(interval.is_all_time());
    }

    #[test]
    fn bucket_item_accessors() {
        let item = BucketItem::Date(AttributeItem {
            local_identifier: "d1".into(),
            attribute: DATE_DATASET_ATTRIBUTE.into(),
            granularity: Some(DateGranularity::Week),
            date_dataset_ref: None,
        });
        assert!(item.is_date());
        assert!(item.is_attribute_or_date());
        assert!(item.week_granularity());
        assert_eq!(item.local_identifier(), "d1");
    }
}
