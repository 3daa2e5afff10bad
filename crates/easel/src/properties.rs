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

use crate::model::{AxisKind, ChartType, SortItem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Secondary axis carries the same axis knobs plus the explicit list of
/// measure local identifiers rendered against it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecondaryAxisProperties {
    #[serde(flatten)]
    pub axis: AxisProperties,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataLabelProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorMappingItem {
    pub id: String,
    pub color: String,
}

/// Every control the engine understands, as a closed record. Unknown keys do
/// not exist here; hosts with bespoke controls extend the enum, not a bag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_labels: Option<DataLabelProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<AxisProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<AxisProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_yaxis: Option<SecondaryAxisProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dual_axis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_measures: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_measures_to_percent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_chart_type: Option<ChartType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_chart_type: Option<ChartType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_mapping: Option<Vec<ColorMappingItem>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualizationProperties {
    pub controls: ControlProperties,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort_items: Vec<SortItem>,
}

impl VisualizationProperties {
    pub fn has_color_mapping(&self) -> bool {
        self.controls
            .color_mapping
            .as_ref()
            .is_some_and(|mapping| !mapping.is_empty())
    }

    pub fn stack_measures_to_percent(&self) -> bool {
        self.controls.stack_measures_to_percent.unwrap_or(false)
    }
}

/// Total enumeration of filterable control paths. Filtering is a match over
/// this enum, so a new control field fails to compile until its path and
/// filter arm exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyPath {
    Grid,
    Legend,
    DataLabels,
    Xaxis,
    Yaxis,
    SecondaryYaxis,
    DualAxis,
    StackMeasures,
    StackMeasuresToPercent,
    PrimaryChartType,
    SecondaryChartType,
    ColorMapping,
}

pub const BASE_SUPPORTED_PROPERTIES: &[PropertyPath] = &[
    PropertyPath::Grid,
    PropertyPath::Legend,
    PropertyPath::DataLabels,
    PropertyPath::Xaxis,
    PropertyPath::Yaxis,
    PropertyPath::ColorMapping,
];

pub const OPTIONAL_STACKING_PROPERTIES: &[PropertyPath] = &[
    PropertyPath::StackMeasures,
    PropertyPath::StackMeasuresToPercent,
];

const DUAL_AXIS_EXTRAS: &[PropertyPath] = &[PropertyPath::SecondaryYaxis, PropertyPath::DualAxis];

const COMBO_TYPE_PROPERTIES: &[PropertyPath] = &[
    PropertyPath::PrimaryChartType,
    PropertyPath::SecondaryChartType,
];

/// Column and bar charts support a per-axis property set.
pub fn column_bar_supported_properties(axis: AxisKind) -> Vec<PropertyPath> {
    let mut paths = BASE_SUPPORTED_PROPERTIES.to_vec();
    match axis {
        AxisKind::Primary => {}
        AxisKind::Secondary | AxisKind::Dual => paths.extend_from_slice(DUAL_AXIS_EXTRAS),
    }
    paths
}

pub fn combo_supported_properties(axis: AxisKind) -> Vec<PropertyPath> {
    let mut paths = column_bar_supported_properties(axis);
    paths.extend_from_slice(COMBO_TYPE_PROPERTIES);
    paths
}

/// Keeps only the controls named by the allow-list; everything else resets to
/// its absent state. Sort items are managed by sort validation, not here.
pub fn filter_supported_properties(
    properties: &VisualizationProperties,
    allow_list: &[PropertyPath],
) -> VisualizationProperties {
    let source = &properties.controls;
    let mut controls = ControlProperties::default();
    for path in allow_list {
        match path {
            PropertyPath::Grid => controls.grid = source.grid.clone(),
            PropertyPath::Legend => controls.legend = source.legend.clone(),
            PropertyPath::DataLabels => controls.data_labels = source.data_labels.clone(),
            PropertyPath::Xaxis => controls.xaxis = source.xaxis.clone(),
            PropertyPath::Yaxis => controls.yaxis = source.yaxis.clone(),
            PropertyPath::SecondaryYaxis => {
                controls.secondary_yaxis = source.secondary_yaxis.clone();
            }
            PropertyPath::DualAxis => controls.dual_axis = source.dual_axis,
            PropertyPath::StackMeasures => controls.stack_measures = source.stack_measures,
            PropertyPath::StackMeasuresToPercent => {
                controls.stack_measures_to_percent = source.stack_measures_to_percent;
            }
            PropertyPath::PrimaryChartType => {
                controls.primary_chart_type = source.primary_chart_type;
            }
            PropertyPath::SecondaryChartType => {
                controls.secondary_chart_type = source.secondary_chart_type;
            }
            PropertyPath::ColorMapping => controls.color_mapping = source.color_mapping.clone(),
        }
    }
    VisualizationProperties {
        controls,
        sort_items: properties.sort_items.clone(),
    }
}

/// Fills per-chart default controls under explicit user choices: a default
/// only lands where the user set nothing.
pub fn merge_default_controls(
    properties: &mut VisualizationProperties,
    defaults: &ControlProperties,
) {
    let controls = &mut properties.controls;
    macro_rules! merge {
        ($($field:ident),* $(,)?) => {
            $(if controls.$field.is_none() {
                controls.$field = defaults.$field.clone();
            })*
        };
    }
    merge!(
        grid,
        legend,
        data_labels,
        xaxis,
        yaxis,
        secondary_yaxis,
        dual_axis,
        stack_measures,
        stack_measures_to_percent,
        primary_chart_type,
        secondary_chart_type,
        color_mapping,
    );
}

/// Records which measures ended up on the secondary axis. An empty list
/// clears the control so serialized properties carry no stale assignment.
pub fn set_secondary_measures(properties: &mut VisualizationProperties, measures: Vec<String>) {
    if measures.is_empty() {
        if let Some(secondary) = properties.controls.secondary_yaxis.as_mut() {
            secondary.measures.clear();
            if *secondary == SecondaryAxisProperties::default() {
                properties.controls.secondary_yaxis = None;
            }
        }
    } else {
        properties
            .controls
            .secondary_yaxis
            .get_or_insert_with(SecondaryAxisProperties::default)
            .measures = measures;
    }
}
