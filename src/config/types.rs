use std::time::Duration;

use serde::Deserialize;

use crate::args::{OutputFormat, parse_duration_arg};
use crate::error::ValidationError;

/// File-backed defaults. Any flag given on the command line wins.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub method: Option<String>,
    pub requests: Option<u64>,
    pub concurrency: Option<usize>,
    pub rps: Option<u64>,
    pub timeout: Option<DurationValue>,
    pub headers: Option<Vec<String>>,
    pub body: Option<String>,
    pub output: Option<OutputFormat>,
    pub verbose: Option<bool>,
}

/// Either whole seconds or a unit-suffixed string such as `"250ms"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
