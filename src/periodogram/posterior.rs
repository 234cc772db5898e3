//! Orbital periods read back from the search engine's posterior artifact.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Prefix of period parameters in a posterior.
pub const PERIOD_PREFIX: &str = "per";

#[derive(Debug, Deserialize)]
struct Posterior {
    params: BTreeMap<String, Parameter>,
}

#[derive(Debug, Deserialize)]
struct Parameter {
    value: f64,
}

/// Period values in a posterior JSON document, ordered by parameter name.
pub fn parse_posterior_periods(content: &str) -> Result<Vec<f64>> {
    let posterior: Posterior = serde_json::from_str(content)?;
    Ok(posterior
        .params
        .into_iter()
        .filter(|(name, _)| name.starts_with(PERIOD_PREFIX))
        .map(|(_, p)| p.value)
        .collect())
}

/// Periods from the posterior at `path`; a missing file yields no periods.
pub fn read_posterior_periods(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no posterior artifact");
            return Ok(Vec::new());
        }
        Err(e) => return Err(PipelineError::io(path, &e)),
    };
    parse_posterior_periods(&content)
}
