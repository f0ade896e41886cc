use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::convert::conversion::Conversion;
use crate::convert::registry::{resolve, Converter};
use crate::prelude::{CoreError, CoreResult};

/// A single named converter parameter as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(value: NaiveDate) -> Self {
        ParamValue::Date(value)
    }
}

impl From<NaiveDateTime> for ParamValue {
    fn from(value: NaiveDateTime) -> Self {
        ParamValue::DateTime(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// Open set of named parameters handed to [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionParams(BTreeMap<String, ParamValue>);

impl ConversionParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Numeric parameter; numeric text such as `"120.5"` is accepted.
    pub fn number(&self, converter: Conversion, param: &'static str) -> CoreResult<f64> {
        match self.get(param) {
            None => Err(missing(converter, param)),
            Some(ParamValue::Number(value)) => Ok(*value),
            Some(ParamValue::Text(text)) => text.trim().parse().map_err(|_| invalid(param, "number")),
            Some(_) => Err(invalid(param, "number")),
        }
    }

    /// Calendar date parameter; a datetime contributes its date and ISO text is parsed.
    pub fn date(&self, converter: Conversion, param: &'static str) -> CoreResult<NaiveDate> {
        match self.get(param) {
            None => Err(missing(converter, param)),
            Some(ParamValue::Date(date)) => Ok(*date),
            Some(ParamValue::DateTime(dt)) => Ok(dt.date()),
            Some(ParamValue::Text(text)) => parse_date(text).ok_or_else(|| invalid(param, "date")),
            Some(ParamValue::Number(_)) => Err(invalid(param, "date")),
        }
    }
}

impl FromIterator<(String, ParamValue)> for ConversionParams {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y%m%d"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn missing(converter: Conversion, param: &'static str) -> CoreError {
    CoreError::MissingParameter {
        converter: converter.name(),
        param,
    }
}

fn invalid(param: &str, expected: &'static str) -> CoreError {
    CoreError::InvalidParameter {
        param: param.to_string(),
        expected,
    }
}

/// Converter name plus parameters, as declared in per-instrument configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionDescriptor {
    pub converter: String,
    #[serde(default, skip_serializing_if = "ConversionParams::is_empty")]
    pub params: ConversionParams,
}

impl ConversionDescriptor {
    pub fn new(converter: &str) -> Self {
        Self {
            converter: converter.to_string(),
            params: ConversionParams::new(),
        }
    }

    pub fn resolve(&self) -> CoreResult<Converter> {
        resolve(&self.converter, &self.params)
    }
}
