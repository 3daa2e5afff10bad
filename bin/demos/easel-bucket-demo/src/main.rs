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

use anyhow::{bail, Context, Result};
use easel::{
    ChartType, NormalizationOptions, PluggableVisualization, ReferencePoint,
};
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(chart_arg), Some(path)) = (args.next(), args.next()) else {
        bail!("usage: easel-bucket-demo <chart-type> <reference-point.yml>");
    };

    let chart_type: ChartType = chart_arg
        .parse()
        .with_context(|| format!("unknown chart type '{chart_arg}'"))?;
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read reference point file '{path}'"))?;
    let reference_point: ReferencePoint =
        serde_yaml::from_str(&raw).context("failed to parse reference point")?;

    info!(chart = %chart_type, file = %path, "normalizing reference point");

    let mut visualization = PluggableVisualization::new(chart_type);
    let outcome = visualization.get_extended_reference_point(
        &reference_point,
        NormalizationOptions::default(),
        None,
    );

    println!("{}", serde_yaml::to_string(&outcome.reference_point)?);
    if outcome.warnings.is_empty() {
        info!("no warnings");
    } else {
        for warning in &outcome.warnings {
            info!(%warning, "normalization warning");
        }
    }
    Ok(())
}
