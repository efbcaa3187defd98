//! Declared parameter values, keyed by name.

use std::collections::HashMap;
use std::collections::hash_map;

/// A declared parameter value: one value, or a list expanded for `IN (...)`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue<V> {
    Scalar(V),
    List(Vec<V>),
}

impl<V> ParamValue<V> {
    /// Check if this value expands to a placeholder list.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Number of bound values this parameter contributes.
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::List(values) => values.len(),
        }
    }

    /// Check if this is an empty list.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All values, a scalar as a one-element slice.
    pub fn values(&self) -> &[V] {
        match self {
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::List(values) => values,
        }
    }
}

impl<V> From<Vec<V>> for ParamValue<V> {
    fn from(values: Vec<V>) -> Self {
        Self::List(values)
    }
}

/// The name → value map a template is rendered against.
///
/// Names are case-sensitive and stored without the sigil.
///
/// # Example
/// ```
/// use parambind::Params;
///
/// let params: Params<&str> = Params::new()
///     .set("status", "active")
///     .set_list("ids", ["a", "b", "c"]);
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Params<V> {
    map: HashMap<String, ParamValue<V>>,
}

impl<V> Default for Params<V> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<V> Params<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Set a scalar parameter (consumes self, returns Self).
    pub fn set(mut self, name: impl Into<String>, value: impl Into<V>) -> Self {
        self.map.insert(name.into(), ParamValue::Scalar(value.into()));
        self
    }

    /// Set a list parameter (consumes self, returns Self).
    pub fn set_list<T: Into<V>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.map.insert(name.into(), ParamValue::List(values));
        self
    }

    /// Insert a value, returning the previous one for that name.
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue<V>) -> Option<ParamValue<V>> {
        self.map.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue<V>> {
        self.map.get(name)
    }

    /// Look up a value together with the stored key.
    pub fn get_key_value(&self, name: &str) -> Option<(&str, &ParamValue<V>)> {
        self.map.get_key_value(name).map(|(k, v)| (k.as_str(), v))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate declared parameters in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, ParamValue<V>> {
        self.map.iter()
    }
}

impl<V, K: Into<String>> FromIterator<(K, ParamValue<V>)> for Params<V> {
    fn from_iter<I: IntoIterator<Item = (K, ParamValue<V>)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<V, K: Into<String>> Extend<(K, ParamValue<V>)> for Params<V> {
    fn extend<I: IntoIterator<Item = (K, ParamValue<V>)>>(&mut self, iter: I) {
        self.map
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}

impl<V> From<HashMap<String, ParamValue<V>>> for Params<V> {
    fn from(map: HashMap<String, ParamValue<V>>) -> Self {
        Self { map }
    }
}

#[cfg(feature = "serde")]
impl Params<serde_json::Value> {
    /// Build a map from a JSON object; JSON arrays become list parameters.
    pub fn from_json_object(object: serde_json::Map<String, serde_json::Value>) -> Self {
        object
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    serde_json::Value::Array(items) => ParamValue::List(items),
                    other => ParamValue::Scalar(other),
                };
                (name, value)
            })
            .collect()
    }

    /// Parse a JSON object string into a map.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        Ok(Self::from_json_object(object))
    }
}
