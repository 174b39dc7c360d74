// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! String property maps applied onto an operator's JSON configuration.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::operator::Operator;
use crate::core::error::{PlanError, Result};

/// Apply `properties` to `operator`.
///
/// Each key is a dot-separated path into the config object. Values that parse
/// as JSON are stored as parsed (`"3"` becomes a number, `"true"` a bool);
/// anything else is stored as a JSON string.
pub fn set_operator_properties(
    operator: &mut dyn Operator,
    properties: &BTreeMap<String, String>,
) -> Result<()> {
    let mut config = match operator.config_json() {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(PlanError::Configuration(format!(
                "{} config is not an object: {}",
                operator.operator_type(),
                other
            )));
        }
    };

    for (name, raw) in properties {
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
        set_path(&mut config, name, value)?;
        tracing::debug!("[PROPERTY] {}.{} = {}", operator.operator_type(), name, raw);
    }

    operator.apply_config_json(&Value::Object(config))
}

fn set_path(config: &mut Map<String, Value>, path: &str, value: Value) -> Result<()> {
    let mut segments = path.split('.').peekable();
    let mut current = config;

    while let Some(segment) = segments.next() {
        if segment.is_empty() {
            return Err(PlanError::Configuration(format!(
                "Invalid property name '{}'",
                path
            )));
        }
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return Ok(());
        }
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match entry {
            Value::Object(map) => map,
            _ => {
                return Err(PlanError::Configuration(format!(
                    "Property '{}' crosses non-object field '{}'",
                    path, segment
                )));
            }
        };
    }

    Err(PlanError::Configuration(format!(
        "Invalid property name '{}'",
        path
    )))
}
