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

use crate::model::{BucketName, ChartType};
use std::collections::HashMap;

/// Message catalog supplied by the host. Lookups degrade to the key itself so
/// non-localized callers still get stable, greppable strings.
#[derive(Debug, Clone, Default)]
pub struct TranslationContext {
    messages: HashMap<String, String>,
}

impl TranslationContext {
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    pub fn message(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }
}

pub fn get_translation(key: &str, context: Option<&TranslationContext>) -> String {
    context
        .and_then(|ctx| ctx.message(key))
        .unwrap_or(key)
        .to_string()
}

pub fn bucket_title_key(bucket: BucketName, chart_type: ChartType) -> String {
    let bucket_key = match bucket {
        BucketName::Measures => "measures",
        BucketName::SecondaryMeasures => "secondary_measures",
        BucketName::TertiaryMeasures => "tertiary_measures",
        BucketName::View => "view",
        BucketName::Stack => "stack",
        BucketName::Segment => "segment",
        BucketName::Trend => "trend",
        BucketName::Attribute => "attribute",
        BucketName::Columns => "columns",
    };
    format!("dashboard.bucket.{bucket_key}_{chart_type}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_context_echoes_key() {
        assert_eq!(get_translation("dashboard.bucket.measures_area", None),
            "dashboard.bucket.measures_area");
    }

    #[test]
    fn context_resolves_known_keys() {
        let ctx = TranslationContext::new(HashMap::from([(
            "dashboard.bucket.measures_area".to_string(),
            "Measures".to_string(),
        )]));
        assert_eq!(
            get_translation("dashboard.bucket.measures_area", Some(&ctx)),
            "Measures"
        );
        assert_eq!(get_translation("unknown.key", Some(&ctx)), "unknown.key");
    }

    #[test]
    fn title_keys_follow_bucket_and_chart() {
        assert_eq!(
            bucket_title_key(BucketName::Stack, ChartType::Area),
            "dashboard.bucket.stack_area"
        );
    }
}
