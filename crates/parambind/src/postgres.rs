//! tokio-postgres values for rendered statements.

use std::sync::Arc;
use tokio_postgres::types::ToSql;

use crate::params::Params;
use crate::render::Rendered;

/// A clone-friendly `ToSql` value for [`Params`].
#[derive(Clone)]
pub struct PgParam(Arc<dyn ToSql + Send + Sync>);

impl PgParam {
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        PgParam(Arc::new(value))
    }

    /// The inner value as a `ToSql` trait object.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for PgParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PgParam").field(&"<dyn ToSql>").finish()
    }
}

impl Params<PgParam> {
    /// Set a scalar `ToSql` value.
    pub fn bind<T: ToSql + Send + Sync + 'static>(self, name: impl Into<String>, value: T) -> Self {
        self.set(name, PgParam::new(value))
    }

    /// Set a list of `ToSql` values, one placeholder per element.
    pub fn bind_list<T: ToSql + Send + Sync + 'static>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.set_list(name, values.into_iter().map(PgParam::new))
    }
}

impl Rendered<'_, PgParam> {
    /// Values as references for `client.query(sql, &params)`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|p| p.as_ref()).collect()
    }
}
