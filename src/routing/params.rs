//! Ordered route parameters.

use std::{iter, slice};

use serde::Serialize;

/// A single bound parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

/// Parameters bound by a route match, in URL left-to-right order.
///
/// Handlers receive the values positionally; names are kept for logging
/// and for lookups by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params {
    list: Vec<Param>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.list.push(Param {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the value bound under `name`, if any.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.list
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Values in positional order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &str> {
        self.list.iter().map(|p| p.value.as_str())
    }

    /// `(name, value)` pairs in positional order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.list
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_str()))
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl<N: Into<String>, V: Into<String>> iter::FromIterator<(N, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(pairs: I) -> Self {
        let mut params = Params::new();
        for (name, value) in pairs {
            params.push(name, value);
        }
        params
    }
}
