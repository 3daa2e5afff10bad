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

pub mod bucket_config;
pub mod bucket_helper;
pub mod bucket_rules;
pub mod configurators;
pub mod dimensions;
pub mod error;
pub mod model;
pub mod properties;
pub mod sort;
pub mod translations;
pub mod ui_config;
pub mod ui_config_helpers;

pub use configurators::{
    configurator_for, extended_reference_point, ChartConfigurator, ConfiguratorState,
    NormalizationOptions, NormalizationOutcome,
};
pub use dimensions::{find_measure_group_in_dimensions, MeasureGroupLocation};
pub use error::{
    ConfigError, NormalizationWarning, Result, StructuralError, VisualizationError,
};
pub use model::{
    AxisKind, Bucket, BucketItem, BucketName, ChartType, ExtendedReferencePoint, ReferencePoint,
};
pub use translations::TranslationContext;
pub use ui_config::UiConfig;

/// Stateful entry point for one visualization instance. Holds the chart
/// type and the configurator state carried between consecutive
/// normalizations, so axis and property decisions from the previous run are
/// available to the next.
pub struct PluggableVisualization {
    chart_type: ChartType,
    state: ConfiguratorState,
}

impl PluggableVisualization {
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            state: ConfiguratorState::default(),
        }
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn state(&self) -> &ConfiguratorState {
        &self.state
    }

    /// Normalizes a reference point for this chart type and advances the
    /// held state to the outcome's state.
    pub fn get_extended_reference_point(
        &mut self,
        reference_point: &ReferencePoint,
        options: NormalizationOptions,
        context: Option<&TranslationContext>,
    ) -> NormalizationOutcome {
        let outcome = extended_reference_point(
            self.chart_type,
            reference_point,
            &self.state,
            options,
            context,
        );
        self.state = outcome.state.clone();
        outcome
    }
}
