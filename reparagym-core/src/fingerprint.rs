//! Cache fingerprints.
//!
//! A fingerprint is the stable cache key for a logical read, e.g.
//! "product list for category X". Fingerprints built through
//! [`FingerprintBuilder`] are independent of the order in which parameters
//! were supplied, so two callers describing the same request always land on
//! the same cache entry.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier for a cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already-formed key, e.g. `"cat:cardio"`.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Start a fingerprint for `resource` with sorted query parameters.
    pub fn builder(resource: impl Into<String>) -> FingerprintBuilder {
        FingerprintBuilder {
            resource: resource.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The resource part of the key (everything before `?`).
    pub fn resource(&self) -> &str {
        match self.0.split_once('?') {
            Some((resource, _)) => resource,
            None => &self.0,
        }
    }

    /// Prefix match used for bulk invalidation.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Fingerprint {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Fingerprint {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for Fingerprint {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Builder producing `resource?a=1&b=2` keys with parameters sorted by name.
#[derive(Debug, Clone)]
pub struct FingerprintBuilder {
    resource: String,
    params: BTreeMap<String, String>,
}

impl FingerprintBuilder {
    /// Add (or replace) a parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    /// Add a parameter only when `value` is present.
    pub fn param_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    pub fn build(self) -> Fingerprint {
        if self.params.is_empty() {
            return Fingerprint(self.resource);
        }
        let query = self
            .params
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");
        Fingerprint(format!("{}?{}", self.resource, query))
    }
}
