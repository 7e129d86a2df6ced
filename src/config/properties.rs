//! `key=value` properties, as given with `-p` on the command line.

use super::source::{Entry, Source};
use crate::value::infer_value;
use crate::{Error, Result};

/// Splits `key=value` at the first `=`.
pub fn parse_key_value(input: &str) -> Result<(String, String)> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| Error::InvalidInput(format!("expected KEY=VALUE, got '{input}'")))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(Error::InvalidInput(format!("empty key in '{input}'")));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Literal `key=value` pairs whose values are typed by inference.
#[derive(Debug, Clone, Default)]
pub struct PropertySource {
    pairs: Vec<String>,
}

impl PropertySource {
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pairs: pairs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, pair: impl Into<String>) {
        self.pairs.push(pair.into());
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Source for PropertySource {
    fn entries(&self) -> Result<Vec<Entry>> {
        self.pairs
            .iter()
            .map(|pair| {
                let (key, value) = parse_key_value(pair)?;
                Ok(Entry::new(key, infer_value(&value)))
            })
            .collect()
    }
}
