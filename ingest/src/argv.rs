//! Loose command-line coercion: `name a 123 '[1, 2]' key=value` becomes a
//! method name, positional values and keyword values.

use anyhow::{bail, Context};
use atmoscore::convert::{ConversionParams, ParamValue};
use atmoscore::util::flatten;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<Value>,
    pub kwargs: BTreeMap<String, Value>,
}

/// Splits `argv` into method name, positional and keyword arguments.
///
/// An argument containing exactly one `=` is a keyword. Every value is
/// decoded as JSON when possible (`123`, `3.5`, `["r2"]`, `null`) and kept as
/// a plain string otherwise.
pub fn method_info_from_argv(argv: &[String]) -> anyhow::Result<MethodCall> {
    let (method, rest) = argv.split_first().context("no method name given")?;

    let mut args = Vec::new();
    let mut kwargs = BTreeMap::new();
    for raw in rest {
        let (key, value) = match raw.split_once('=') {
            Some((key, value)) if raw.matches('=').count() == 1 => (Some(key), value),
            _ => (None, raw.as_str()),
        };
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        match key {
            Some(key) => {
                kwargs.insert(key.to_string(), value);
            }
            None => args.push(value),
        }
    }

    Ok(MethodCall {
        method: method.clone(),
        args,
        kwargs,
    })
}

impl MethodCall {
    /// Positional arguments flattened into numbers.
    pub fn numeric_args(&self) -> anyhow::Result<Vec<f64>> {
        let mut values = Vec::new();
        for arg in &self.args {
            for leaf in flatten(arg) {
                match leaf.as_f64() {
                    Some(number) => values.push(number),
                    None => bail!("argument {} is not numeric", leaf),
                }
            }
        }
        Ok(values)
    }

    /// Keyword arguments as converter parameters.
    pub fn params(&self) -> anyhow::Result<ConversionParams> {
        self.kwargs
            .iter()
            .map(|(key, value)| -> anyhow::Result<(String, ParamValue)> {
                let param = match value {
                    Value::Number(n) => n
                        .as_f64()
                        .map(ParamValue::Number)
                        .with_context(|| format!("parameter {} out of range", key))?,
                    Value::String(text) => ParamValue::Text(text.clone()),
                    other => bail!("parameter {} has unsupported value {}", key, other),
                };
                Ok((key.clone(), param))
            })
            .collect()
    }
}
