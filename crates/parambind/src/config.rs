use crate::dialect::Dialect;

/// What to render for a list parameter with no elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EmptyListPolicy {
    /// Render `NULL` and bind nothing, so `IN (:ids)` becomes `IN (NULL)`.
    #[default]
    Null,
    /// Fail the render with [`RenderError::EmptyList`](crate::RenderError::EmptyList).
    Reject,
}

/// Configuration for a [`Renderer`](crate::Renderer).
///
/// The default never fails a render beyond unknown parameters and malformed
/// literals: empty lists render as `NULL` and there is no value limit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderConfig {
    /// Empty list handling.
    pub empty_list: EmptyListPolicy,
    /// Most values a render may bind. `None` means no limit (default).
    pub max_params: Option<usize>,
    /// Truncate SQL in log events (in bytes). `None` means no truncation.
    pub max_log_sql_length: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            empty_list: EmptyListPolicy::Null,
            max_params: None,
            max_log_sql_length: Some(200),
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the empty list policy.
    pub fn with_empty_list_policy(mut self, policy: EmptyListPolicy) -> Self {
        self.empty_list = policy;
        self
    }

    /// Limit the number of bound values.
    ///
    /// Renders binding more fail with
    /// [`RenderError::TooManyParameters`](crate::RenderError::TooManyParameters).
    pub fn with_max_params(mut self, max: usize) -> Self {
        self.max_params = Some(max);
        self
    }

    /// Limit bound values to what `dialect`'s server accepts.
    pub fn with_dialect_limit(mut self, dialect: Dialect) -> Self {
        self.max_params = dialect.default_max_params();
        self
    }

    /// Set maximum SQL length to log.
    pub fn with_max_log_sql_length(mut self, len: usize) -> Self {
        self.max_log_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_log_truncate(mut self) -> Self {
        self.max_log_sql_length = None;
        self
    }
}
