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

//! One strategy per chart type, composed by a single normalization pipeline.
//! Configurators hold no mutable state; whatever must survive between calls
//! travels in [`ConfiguratorState`] and comes back with the outcome.

pub mod area;
pub mod bubble;
pub mod column_bar;
pub mod combo;
pub mod headline;
pub mod heatmap;
pub mod line;
pub mod pivot_table;
pub mod scatter;
pub mod treemap;

use crate::bucket_config::{apply_recommendations, configure_over_time_comparison, configure_percent};
use crate::bucket_helper::{
    apply_ui_config, get_all_measures_show_on_secondary_axis, get_items_local_identifiers,
    remove_dangling_derived_measures, remove_duplicate_bucket_items, sanitize_unused_filters,
    set_measures_show_on_secondary_axis,
};
use crate::error::NormalizationWarning;
use crate::model::{
    AxisKind, Bucket, BucketItem, ChartType, ExtendedReferencePoint, ReferencePoint,
};
use crate::properties::{
    filter_supported_properties, merge_default_controls, set_secondary_measures,
    ControlProperties, PropertyPath, BASE_SUPPORTED_PROPERTIES,
};
use crate::sort::remove_invalid_sort;
use crate::translations::TranslationContext;
use crate::ui_config::UiConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What used to live as hidden instance fields: the last computed axis mode
/// and the property allow-list that matches it. The host keeps the latest
/// value and passes it back on the next call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguratorState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<AxisKind>,
    #[serde(default)]
    pub supported_properties: Vec<PropertyPath>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationOutcome {
    pub reference_point: ExtendedReferencePoint,
    pub state: ConfiguratorState,
    pub warnings: Vec<NormalizationWarning>,
}

/// Tunables the host environment decides per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizationOptions {
    pub week_filters_enabled: bool,
}

pub trait ChartConfigurator {
    fn chart_type(&self) -> ChartType;

    /// Default UI config attached before classification. Input buckets are
    /// available for the few charts whose limits depend on incoming shape.
    fn default_ui_config(&self, input_buckets: &[Bucket]) -> UiConfig;

    /// Reshapes the working buckets into this chart's canonical layout.
    fn classify_buckets(
        &self,
        extended: &mut ExtendedReferencePoint,
        original: &ReferencePoint,
        warnings: &mut Vec<NormalizationWarning>,
    );

    /// Axis mode for dual-axis-capable charts; `None` for the rest.
    fn axis_policy(
        &self,
        _extended: &ExtendedReferencePoint,
        _previous: &ConfiguratorState,
    ) -> Option<AxisKind> {
        None
    }

    fn supported_properties(&self, _axis: Option<AxisKind>) -> Vec<PropertyPath> {
        BASE_SUPPORTED_PROPERTIES.to_vec()
    }

    fn default_control_properties(&self, _extended: &ExtendedReferencePoint) -> ControlProperties {
        ControlProperties::default()
    }

    fn enrich_ui_config(
        &self,
        _extended: &mut ExtendedReferencePoint,
        _context: Option<&TranslationContext>,
    ) {
    }

    fn wants_recommendations(&self) -> bool {
        false
    }
}

pub fn configurator_for(chart_type: ChartType) -> Box<dyn ChartConfigurator> {
    match chart_type {
        ChartType::Column | ChartType::Bar => {
            Box::new(column_bar::ColumnBarConfigurator::new(chart_type))
        }
        ChartType::Line => Box::new(line::LineConfigurator),
        ChartType::Area => Box::new(area::AreaConfigurator),
        ChartType::Combo => Box::new(combo::ComboConfigurator),
        ChartType::Scatter => Box::new(scatter::ScatterConfigurator),
        ChartType::Bubble => Box::new(bubble::BubbleConfigurator),
        ChartType::Heatmap => Box::new(heatmap::HeatmapConfigurator),
        ChartType::Treemap => Box::new(treemap::TreemapConfigurator),
        ChartType::Headline => Box::new(headline::HeadlineConfigurator),
        ChartType::Table => Box::new(pivot_table::PivotTableConfigurator),
    }
}

/// The normalization pipeline every chart type shares. The input is never
/// mutated; filters are sanitized last, against the final bucket layout, so
/// filters valid for the outcome survive intermediate reshaping.
pub fn extended_reference_point(
    chart_type: ChartType,
    reference_point: &ReferencePoint,
    state: &ConfiguratorState,
    options: NormalizationOptions,
    context: Option<&TranslationContext>,
) -> NormalizationOutcome {
    let configurator = configurator_for(chart_type);
    let mut warnings = Vec::new();

    let mut extended = ExtendedReferencePoint {
        buckets: reference_point.buckets.clone(),
        filters: reference_point.filters.clone(),
        properties: reference_point.properties.clone().unwrap_or_default(),
        ui_config: configurator.default_ui_config(&reference_point.buckets),
    };

    remove_duplicate_bucket_items(&mut extended.buckets, &mut warnings);
    configure_over_time_comparison(
        &mut extended,
        &reference_point.buckets,
        options.week_filters_enabled,
        &mut warnings,
    );
    for local_identifier in remove_dangling_derived_measures(&mut extended.buckets) {
        warnings.push(NormalizationWarning::DanglingDerivedRemoved { local_identifier });
    }
    configurator.classify_buckets(&mut extended, reference_point, &mut warnings);
    configure_percent(&mut extended);
    if configurator.wants_recommendations() {
        apply_recommendations(&mut extended, options.week_filters_enabled);
    }

    let axis = configurator.axis_policy(&extended, state);
    extended.ui_config.axis = axis;
    let supported_properties = configurator.supported_properties(axis);
    extended.properties = filter_supported_properties(&extended.properties, &supported_properties);
    let default_controls = configurator.default_control_properties(&extended);
    merge_default_controls(&mut extended.properties, &default_controls);
    if axis.is_some() {
        let secondary = get_items_local_identifiers(&get_all_measures_show_on_secondary_axis(
            &extended.buckets,
        ));
        set_secondary_measures(&mut extended.properties, secondary);
    } else {
        set_measures_show_on_secondary_axis(&mut extended.buckets, None);
        set_secondary_measures(&mut extended.properties, Vec::new());
    }

    apply_ui_config(&mut extended, &mut warnings);
    configurator.enrich_ui_config(&mut extended, context);
    remove_invalid_sort(&mut extended, &mut warnings);
    sanitize_unused_filters(&mut extended, &mut warnings);

    debug!(
        chart = %chart_type,
        buckets = extended.buckets.len(),
        warnings = warnings.len(),
        "normalized reference point"
    );

    NormalizationOutcome {
        reference_point: extended,
        state: ConfiguratorState {
            axis,
            supported_properties,
        },
        warnings,
    }
}

/// Pulls the first date item to the front when none sits inside the visible
/// window, then truncates to the window. A date already within the window
/// keeps its position.
pub(crate) fn select_view_items(mut candidates: Vec<BucketItem>, limit: usize) -> Vec<BucketItem> {
    let window_has_date = candidates.iter().take(limit).any(BucketItem::is_date);
    if !window_has_date {
        if let Some(position) = candidates.iter().position(BucketItem::is_date) {
            let date = candidates.remove(position);
            candidates.insert(0, date);
        }
    }
    candidates.truncate(limit);
    candidates
}
