//! Target dialects: quoting rules, template sigil and placeholder syntax.
//!
//! Dialect differences are confined to three things:
//!
//! - [`QuoteRules`]: which regions of a template are quoted text or comments
//!   and therefore never contain parameter references.
//! - the sigil that introduces a reference in the template (`:` by default).
//! - [`PlaceholderStyle`]: what a bound slot looks like in the output SQL.
//!
//! | Dialect | Slot 1 | Identity |
//! |---|---|---|
//! | Postgres, CockroachDB | `$1` | by slot |
//! | Spanner | `@param1` | by slot |
//! | Oracle | `:1` | by slot |
//! | SQL Server | `@1` | by slot |
//! | MySQL, SQLite | `?` | by occurrence |

use std::fmt::{self, Write};
use std::str::FromStr;

/// How a quoted region escapes its own closing character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteEscape {
    /// No escape: the first closing character ends the region.
    None,
    /// The closing character doubled (`''`, `""`, `]]`).
    Doubled,
    /// A backslash escapes the next byte.
    Backslash,
    /// Either of the above.
    DoubledOrBackslash,
}

impl QuoteEscape {
    #[inline]
    pub(crate) const fn doubled(self) -> bool {
        matches!(self, Self::Doubled | Self::DoubledOrBackslash)
    }

    #[inline]
    pub(crate) const fn backslash(self) -> bool {
        matches!(self, Self::Backslash | Self::DoubledOrBackslash)
    }
}

/// One kind of quoted region (string literal or quoted identifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub open: u8,
    pub close: u8,
    pub escape: QuoteEscape,
}

impl Quote {
    /// A region opened and closed by the same character.
    pub const fn symmetric(ch: u8, escape: QuoteEscape) -> Self {
        Self {
            open: ch,
            close: ch,
            escape,
        }
    }

    /// A region with distinct open/close characters, e.g. `[ident]`.
    pub const fn bracketed(open: u8, close: u8, escape: QuoteEscape) -> Self {
        Self {
            open,
            close,
            escape,
        }
    }
}

/// Lexical rules the scanner follows for one dialect.
///
/// All syntax characters are ASCII, so byte offsets at these characters are
/// always char boundaries in a UTF-8 template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteRules {
    /// String literal and quoted identifier regions.
    pub quotes: &'static [Quote],
    /// `#` starts a line comment (MySQL, Spanner).
    pub hash_comments: bool,
    /// `/* */` comments nest (Postgres family).
    pub nested_block_comments: bool,
    /// `$$ ... $$` and `$tag$ ... $tag$` bodies (Postgres family).
    pub dollar_quoting: bool,
    /// `E'...'` strings with backslash escapes (Postgres family).
    pub escape_strings: bool,
    /// `'''...'''` and `"""..."""` strings that may hold a lone quote (Spanner).
    pub triple_quotes: bool,
    /// `q'[...]'` alternative quoting with a chosen delimiter (Oracle).
    pub q_quotes: bool,
}

const ANSI_QUOTES: &[Quote] = &[
    Quote::symmetric(b'\'', QuoteEscape::Doubled),
    Quote::symmetric(b'"', QuoteEscape::Doubled),
];

const MYSQL_QUOTES: &[Quote] = &[
    Quote::symmetric(b'\'', QuoteEscape::DoubledOrBackslash),
    Quote::symmetric(b'"', QuoteEscape::DoubledOrBackslash),
    Quote::symmetric(b'`', QuoteEscape::Doubled),
];

const SQLITE_QUOTES: &[Quote] = &[
    Quote::symmetric(b'\'', QuoteEscape::Doubled),
    Quote::symmetric(b'"', QuoteEscape::Doubled),
    Quote::symmetric(b'`', QuoteEscape::Doubled),
    Quote::bracketed(b'[', b']', QuoteEscape::None),
];

const SQLSERVER_QUOTES: &[Quote] = &[
    Quote::symmetric(b'\'', QuoteEscape::Doubled),
    Quote::symmetric(b'"', QuoteEscape::Doubled),
    Quote::bracketed(b'[', b']', QuoteEscape::Doubled),
];

const SPANNER_QUOTES: &[Quote] = &[
    Quote::symmetric(b'\'', QuoteEscape::Backslash),
    Quote::symmetric(b'"', QuoteEscape::Backslash),
    Quote::symmetric(b'`', QuoteEscape::Backslash),
];

impl QuoteRules {
    /// Standard SQL: `'...'` strings and `"..."` identifiers, doubled escapes.
    pub const ANSI: Self = Self {
        quotes: ANSI_QUOTES,
        hash_comments: false,
        nested_block_comments: false,
        dollar_quoting: false,
        escape_strings: false,
        triple_quotes: false,
        q_quotes: false,
    };

    pub const POSTGRES: Self = Self {
        quotes: ANSI_QUOTES,
        hash_comments: false,
        nested_block_comments: true,
        dollar_quoting: true,
        escape_strings: true,
        triple_quotes: false,
        q_quotes: false,
    };

    pub const MYSQL: Self = Self {
        quotes: MYSQL_QUOTES,
        hash_comments: true,
        nested_block_comments: false,
        dollar_quoting: false,
        escape_strings: false,
        triple_quotes: false,
        q_quotes: false,
    };

    pub const SQLITE: Self = Self {
        quotes: SQLITE_QUOTES,
        ..Self::ANSI
    };

    pub const SQLSERVER: Self = Self {
        quotes: SQLSERVER_QUOTES,
        ..Self::ANSI
    };

    pub const SPANNER: Self = Self {
        quotes: SPANNER_QUOTES,
        hash_comments: true,
        nested_block_comments: false,
        dollar_quoting: false,
        escape_strings: false,
        triple_quotes: true,
        q_quotes: false,
    };

    /// ANSI plus `q'...'` strings.
    pub const ORACLE: Self = Self {
        q_quotes: true,
        ..Self::ANSI
    };

    /// Find the quote kind opened by `byte`, if any.
    #[inline]
    pub fn quote_opened_by(&self, byte: u8) -> Option<&'static Quote> {
        self.quotes.iter().find(|q| q.open == byte)
    }
}

impl Default for QuoteRules {
    fn default() -> Self {
        Self::ANSI
    }
}

/// Whether repeated references share one placeholder or get one each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderIdentity {
    /// Numbered placeholders: a slot renders to the same text everywhere it
    /// is used and is bound once.
    BySlot,
    /// Anonymous markers: every occurrence is its own placeholder and binds
    /// its own value, in statement order.
    ByOccurrence,
}

/// Placeholder syntax written into the output SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ... (Postgres, CockroachDB)
    Dollar,
    /// `@param1`, `@param2`, ... (Spanner)
    AtParam,
    /// `:1`, `:2`, ... (Oracle)
    ColonNumbered,
    /// `@1`, `@2`, ... (SQL Server)
    AtNumbered,
    /// `?` for every occurrence (MySQL, SQLite)
    QuestionMark,
}

/// Renders bound slots as placeholder text.
pub trait PlaceholderRenderer {
    /// Append the placeholder for a 1-based `slot` to `out`.
    fn write_placeholder(&self, slot: usize, out: &mut String);

    /// How repeated references to one parameter are rendered.
    fn identity(&self) -> PlaceholderIdentity;

    /// Render the placeholder for `slot` into a new string.
    fn placeholder(&self, slot: usize) -> String {
        let mut out = String::with_capacity(8);
        self.write_placeholder(slot, &mut out);
        out
    }
}

impl PlaceholderRenderer for PlaceholderStyle {
    #[inline]
    fn write_placeholder(&self, slot: usize, out: &mut String) {
        // Writing to a String never fails.
        let _ = match self {
            Self::Dollar => write!(out, "${slot}"),
            Self::AtParam => write!(out, "@param{slot}"),
            Self::ColonNumbered => write!(out, ":{slot}"),
            Self::AtNumbered => write!(out, "@{slot}"),
            Self::QuestionMark => {
                out.push('?');
                Ok(())
            }
        };
    }

    #[inline]
    fn identity(&self) -> PlaceholderIdentity {
        match self {
            Self::QuestionMark => PlaceholderIdentity::ByOccurrence,
            _ => PlaceholderIdentity::BySlot,
        }
    }
}

/// Everything the render driver needs to know about a target.
pub trait DialectSyntax: PlaceholderRenderer {
    /// Quoting and comment rules for scanning templates.
    fn quote_rules(&self) -> &QuoteRules;

    /// Byte that introduces a parameter reference in templates.
    fn sigil(&self) -> u8 {
        b':'
    }

    /// Short name used in logs and diagnostics.
    fn name(&self) -> &str;
}

/// A fixed, read-only dialect description.
///
/// Built-in dialects hand out `'static` descriptors; a custom one starts from
/// a built-in via [`Dialect::descriptor`] and overrides what differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectDescriptor {
    pub name: &'static str,
    pub sigil: u8,
    pub style: PlaceholderStyle,
    pub quotes: QuoteRules,
    /// Most values one statement may bind, if the server has a limit.
    pub max_params: Option<usize>,
}

impl DialectDescriptor {
    pub const fn new(name: &'static str, style: PlaceholderStyle, quotes: QuoteRules) -> Self {
        Self {
            name,
            sigil: b':',
            style,
            quotes,
            max_params: None,
        }
    }

    /// Override the template sigil.
    ///
    /// # Panics
    ///
    /// Panics unless `sigil` is ASCII punctuation that no dialect uses to
    /// open a quoted region or comment (`'` `"` `` ` `` `[` `]` `-` `/` `*`
    /// `#` `$` `\` are rejected). In a `const` this is a compile error.
    pub const fn with_sigil(mut self, sigil: u8) -> Self {
        assert!(
            is_valid_sigil(sigil),
            "sigil must be ASCII punctuation outside quote and comment syntax"
        );
        self.sigil = sigil;
        self
    }

    pub const fn with_style(mut self, style: PlaceholderStyle) -> Self {
        self.style = style;
        self
    }

    pub const fn with_quote_rules(mut self, quotes: QuoteRules) -> Self {
        self.quotes = quotes;
        self
    }

    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub const fn with_max_params(mut self, max: usize) -> Self {
        self.max_params = Some(max);
        self
    }
}

/// Whether `byte` can introduce a parameter reference.
pub const fn is_valid_sigil(byte: u8) -> bool {
    byte.is_ascii_punctuation()
        && !matches!(
            byte,
            b'\'' | b'"' | b'`' | b'[' | b']' | b'-' | b'/' | b'*' | b'#' | b'$' | b'\\'
        )
}

impl PlaceholderRenderer for DialectDescriptor {
    #[inline]
    fn write_placeholder(&self, slot: usize, out: &mut String) {
        self.style.write_placeholder(slot, out);
    }

    #[inline]
    fn identity(&self) -> PlaceholderIdentity {
        self.style.identity()
    }
}

impl DialectSyntax for DialectDescriptor {
    fn quote_rules(&self) -> &QuoteRules {
        &self.quotes
    }

    fn sigil(&self) -> u8 {
        self.sigil
    }

    fn name(&self) -> &str {
        self.name
    }
}

const POSTGRES_FAMILY: DialectDescriptor =
    DialectDescriptor::new("postgres", PlaceholderStyle::Dollar, QuoteRules::POSTGRES)
        .with_max_params(65_535);

static POSTGRES: DialectDescriptor = POSTGRES_FAMILY;
static COCKROACHDB: DialectDescriptor = POSTGRES_FAMILY.with_name("cockroachdb");
static SPANNER: DialectDescriptor =
    DialectDescriptor::new("spanner", PlaceholderStyle::AtParam, QuoteRules::SPANNER)
        .with_max_params(950);
static ORACLE: DialectDescriptor =
    DialectDescriptor::new("oracle", PlaceholderStyle::ColonNumbered, QuoteRules::ORACLE)
        .with_max_params(65_535);
static SQLSERVER: DialectDescriptor =
    DialectDescriptor::new("mssql", PlaceholderStyle::AtNumbered, QuoteRules::SQLSERVER)
        .with_max_params(2_100);
static MYSQL: DialectDescriptor =
    DialectDescriptor::new("mysql", PlaceholderStyle::QuestionMark, QuoteRules::MYSQL)
        .with_max_params(65_535);
static SQLITE: DialectDescriptor =
    DialectDescriptor::new("sqlite", PlaceholderStyle::QuestionMark, QuoteRules::SQLITE)
        .with_max_params(32_766);

/// Built-in target dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Dialect {
    #[default]
    Postgres,
    CockroachDb,
    Spanner,
    Oracle,
    SqlServer,
    MySql,
    Sqlite,
}

/// Error returned when a dialect name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect: {0}")]
pub struct ParseDialectError(pub String);

impl Dialect {
    pub const ALL: [Dialect; 7] = [
        Dialect::Postgres,
        Dialect::CockroachDb,
        Dialect::Spanner,
        Dialect::Oracle,
        Dialect::SqlServer,
        Dialect::MySql,
        Dialect::Sqlite,
    ];

    /// The static descriptor for this dialect.
    pub fn descriptor(&self) -> &'static DialectDescriptor {
        match self {
            Dialect::Postgres => &POSTGRES,
            Dialect::CockroachDb => &COCKROACHDB,
            Dialect::Spanner => &SPANNER,
            Dialect::Oracle => &ORACLE,
            Dialect::SqlServer => &SQLSERVER,
            Dialect::MySql => &MYSQL,
            Dialect::Sqlite => &SQLITE,
        }
    }

    /// Server-side limit on bound values per statement.
    pub fn default_max_params(&self) -> Option<usize> {
        self.descriptor().max_params
    }

    /// Parse a dialect from a string (case-insensitive).
    ///
    /// Accepts common aliases: `pg`/`postgresql`, `cockroach`/`crdb`,
    /// `sqlserver`/`sql_server`, `mariadb`, `sqlite3`.
    pub fn parse(s: &str) -> Option<Self> {
        const ALIASES: &[(&str, Dialect)] = &[
            ("postgres", Dialect::Postgres),
            ("postgresql", Dialect::Postgres),
            ("pg", Dialect::Postgres),
            ("cockroachdb", Dialect::CockroachDb),
            ("cockroach", Dialect::CockroachDb),
            ("crdb", Dialect::CockroachDb),
            ("spanner", Dialect::Spanner),
            ("oracle", Dialect::Oracle),
            ("mssql", Dialect::SqlServer),
            ("sqlserver", Dialect::SqlServer),
            ("sql_server", Dialect::SqlServer),
            ("mysql", Dialect::MySql),
            ("mariadb", Dialect::MySql),
            ("sqlite", Dialect::Sqlite),
            ("sqlite3", Dialect::Sqlite),
        ];
        let s = s.trim();
        ALIASES
            .iter()
            .find(|(alias, _)| s.eq_ignore_ascii_case(alias))
            .map(|(_, d)| *d)
    }
}

impl PlaceholderRenderer for Dialect {
    #[inline]
    fn write_placeholder(&self, slot: usize, out: &mut String) {
        self.descriptor().write_placeholder(slot, out);
    }

    #[inline]
    fn identity(&self) -> PlaceholderIdentity {
        self.descriptor().identity()
    }
}

impl DialectSyntax for Dialect {
    fn quote_rules(&self) -> &QuoteRules {
        &self.descriptor().quotes
    }

    fn sigil(&self) -> u8 {
        self.descriptor().sigil
    }

    fn name(&self) -> &str {
        self.descriptor().name
    }
}

impl<T: PlaceholderRenderer + ?Sized> PlaceholderRenderer for &T {
    fn write_placeholder(&self, slot: usize, out: &mut String) {
        (**self).write_placeholder(slot, out);
    }

    fn identity(&self) -> PlaceholderIdentity {
        (**self).identity()
    }
}

impl<T: DialectSyntax + ?Sized> DialectSyntax for &T {
    fn quote_rules(&self) -> &QuoteRules {
        (**self).quote_rules()
    }

    fn sigil(&self) -> u8 {
        (**self).sigil()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(DialectSyntax::name(self))
    }
}

impl FromStr for Dialect {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseDialectError(s.to_string()))
    }
}

impl TryFrom<String> for Dialect {
    type Error = ParseDialectError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Dialect> for String {
    fn from(d: Dialect) -> Self {
        d.to_string()
    }
}
