//! # parambind
//!
//! Named parameter binding for SQL templates, rendered to each database's
//! native placeholder syntax.
//!
//! ## Features
//!
//! - **One binding per name**: a parameter referenced many times in a template
//!   renders to one numbered placeholder and is bound once
//! - **Dialect aware**: `$1` (Postgres, CockroachDB), `@param1` (Spanner),
//!   `:1` (Oracle), `@1` (SQL Server) and `?` (MySQL, SQLite)
//! - **Literal safe**: references inside quoted strings, quoted identifiers
//!   and comments are left alone
//! - **List expansion**: `IN (:ids)` expands to one placeholder per element
//! - **Stateless renderers**: a [`Renderer`] can be shared across threads
//!
//! ## Quick start
//!
//! ```
//! use parambind::{Dialect, Params, Renderer};
//!
//! let params: Params<i64> = Params::new()
//!     .set("status", 1)
//!     .set_list("ids", [10, 20]);
//!
//! let renderer = Renderer::new(Dialect::SqlServer);
//! let out = renderer.render(
//!     "SELECT * FROM jobs WHERE status = :status AND id IN (:ids) OR parent = :status",
//!     &params,
//! )?;
//!
//! assert_eq!(
//!     out.sql(),
//!     "SELECT * FROM jobs WHERE status = @1 AND id IN (@2, @3) OR parent = @1"
//! );
//! assert_eq!(out.values(), &[&1, &10, &20]);
//! # Ok::<(), parambind::RenderError>(())
//! ```

pub mod config;
pub mod dialect;
pub mod error;
pub mod params;
pub mod registry;
pub mod render;
pub mod scanner;

pub use config::{EmptyListPolicy, RenderConfig};
pub use dialect::{
    Dialect, DialectDescriptor, DialectSyntax, ParseDialectError, PlaceholderIdentity,
    PlaceholderRenderer, PlaceholderStyle, Quote, QuoteEscape, QuoteRules,
};
pub use error::{RenderError, RenderResult};
pub use params::{ParamValue, Params};
pub use registry::{ParamRegistry, Slot, SlotRange};
pub use render::{Rendered, Renderer, render};
pub use scanner::{Scanner, Segment, scan};

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PgParam;
