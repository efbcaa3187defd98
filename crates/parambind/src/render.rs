//! Render driver: template + values + dialect → SQL + ordered values.
//!
//! A render scans the template once. Literal segments are copied, each
//! reference is resolved against a fresh [`ParamRegistry`] and written as the
//! dialect's placeholder. For numbered dialects a repeated name reuses its
//! placeholder and is bound once; for `?` dialects every occurrence is its
//! own placeholder and binds its own value.
//!
//! # Example
//!
//! ```
//! use parambind::{Dialect, Params, render};
//!
//! let params: Params<f64> = Params::new().set("floatNumber", 2.4);
//! let out = render(
//!     "SELECT round(temperature, :floatNumber) FROM weather GROUP BY round(temperature, :floatNumber)",
//!     &params,
//!     Dialect::Postgres,
//! )?;
//! assert_eq!(
//!     out.sql(),
//!     "SELECT round(temperature, $1) FROM weather GROUP BY round(temperature, $1)"
//! );
//! assert_eq!(out.values(), &[&2.4]);
//! # Ok::<(), parambind::RenderError>(())
//! ```

use crate::config::{EmptyListPolicy, RenderConfig};
use crate::dialect::{Dialect, DialectSyntax, PlaceholderIdentity};
use crate::error::{RenderError, RenderResult};
use crate::params::{ParamValue, Params};
use crate::registry::{ParamRegistry, Slot};
use crate::scanner::{Scanner, Segment};

#[cfg(test)]
mod tests;

/// Final SQL and the values to bind, aligned with its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<'a, V> {
    pub sql: String,
    pub values: Vec<&'a V>,
    /// Placeholders written into `sql` (repeats included).
    pub placeholders: usize,
}

impl<'a, V> Rendered<'a, V> {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[&'a V] {
        &self.values
    }

    /// Number of values to bind.
    pub fn param_count(&self) -> usize {
        self.values.len()
    }

    pub fn into_parts(self) -> (String, Vec<&'a V>) {
        (self.sql, self.values)
    }
}

/// A reusable, immutable renderer for one dialect.
///
/// Holds no per-render state, so one instance can serve concurrent renders.
#[derive(Debug, Clone, Default)]
pub struct Renderer<D = Dialect> {
    dialect: D,
    config: RenderConfig,
}

/// Render `template` against `params` for `dialect` with the default config.
pub fn render<'a, V, D: DialectSyntax>(
    template: &str,
    params: &'a Params<V>,
    dialect: D,
) -> RenderResult<Rendered<'a, V>> {
    Renderer::new(dialect).render(template, params)
}

impl<D: DialectSyntax> Renderer<D> {
    pub fn new(dialect: D) -> Self {
        Self {
            dialect,
            config: RenderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render one template. Any error aborts the render; no partial SQL is
    /// returned.
    pub fn render<'a, V>(
        &self,
        template: &str,
        params: &'a Params<V>,
    ) -> RenderResult<Rendered<'a, V>> {
        let result = self.run(template, params);
        #[cfg(feature = "tracing")]
        self.trace(&result);
        result
    }

    fn run<'a, V>(&self, template: &str, params: &'a Params<V>) -> RenderResult<Rendered<'a, V>> {
        let scanner = Scanner::new(template, self.dialect.quote_rules(), self.dialect.sigil());
        let mut pass = RenderPass::new(&self.dialect, &self.config, params, template.len());
        for segment in scanner {
            pass.push(segment?)?;
        }
        pass.finish()
    }

    #[cfg(feature = "tracing")]
    fn trace<V>(&self, result: &RenderResult<Rendered<'_, V>>) {
        match result {
            Ok(rendered) => {
                let sql = match self.config.max_log_sql_length {
                    Some(max) if rendered.sql.len() > max => {
                        format!("{}...", truncate_sql_bytes(&rendered.sql, max))
                    }
                    _ => rendered.sql.clone(),
                };
                tracing::debug!(
                    target: "parambind.render",
                    dialect = self.dialect.name(),
                    placeholders = rendered.placeholders,
                    param_count = rendered.values.len(),
                    sql = %sql,
                );
            }
            Err(e) => tracing::warn!(
                target: "parambind.render",
                dialect = self.dialect.name(),
                error = %e,
                "render failed",
            ),
        }
    }
}

#[cfg(feature = "tracing")]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// State of one render while segments are still arriving.
///
/// [`finish`](Self::finish) consumes it, so a pass cannot be resumed.
struct RenderPass<'a, 'r, V, D> {
    dialect: &'r D,
    config: &'r RenderConfig,
    identity: PlaceholderIdentity,
    registry: ParamRegistry<'a, V>,
    sql: String,
    /// Values per occurrence, used by `ByOccurrence` dialects.
    occurrences: Vec<&'a V>,
    placeholders: usize,
}

impl<'a, 'r, V, D: DialectSyntax> RenderPass<'a, 'r, V, D> {
    fn new(dialect: &'r D, config: &'r RenderConfig, params: &'a Params<V>, capacity: usize) -> Self {
        Self {
            dialect,
            config,
            identity: dialect.identity(),
            registry: ParamRegistry::new(params),
            sql: String::with_capacity(capacity + 16),
            occurrences: Vec::new(),
            placeholders: 0,
        }
    }

    fn push(&mut self, segment: Segment<'_>) -> RenderResult<()> {
        match segment {
            Segment::Literal(text) => {
                self.sql.push_str(text);
                Ok(())
            }
            Segment::Param(name) => match self.registry.lookup(name)? {
                ParamValue::Scalar(_) => {
                    let slot = self.registry.resolve(name)?;
                    self.emit(slot);
                    Ok(())
                }
                ParamValue::List(_) => self.push_list(name),
            },
        }
    }

    fn push_list(&mut self, name: &str) -> RenderResult<()> {
        let range = self.registry.resolve_list(name)?;
        if range.is_empty() {
            return match self.config.empty_list {
                EmptyListPolicy::Null => {
                    self.sql.push_str("NULL");
                    Ok(())
                }
                EmptyListPolicy::Reject => Err(RenderError::EmptyList(name.to_string())),
            };
        }
        for (i, slot) in range.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.emit(slot);
        }
        Ok(())
    }

    fn emit(&mut self, slot: Slot) {
        self.dialect.write_placeholder(slot, &mut self.sql);
        self.placeholders += 1;
        if self.identity == PlaceholderIdentity::ByOccurrence {
            self.occurrences.extend(self.registry.value(slot));
        }
    }

    fn finish(self) -> RenderResult<Rendered<'a, V>> {
        let values = match self.identity {
            PlaceholderIdentity::BySlot => self.registry.finalize(),
            PlaceholderIdentity::ByOccurrence => self.occurrences,
        };
        if let Some(limit) = self.config.max_params
            && values.len() > limit
        {
            return Err(RenderError::TooManyParameters {
                limit,
                count: values.len(),
            });
        }
        Ok(Rendered {
            sql: self.sql,
            values,
            placeholders: self.placeholders,
        })
    }
}
