//! Single-pass template scanner.
//!
//! Splits a template into [`Segment`]s: literal SQL text and named parameter
//! references. Quoted strings, quoted identifiers and comments are copied
//! into literal segments untouched, so a `:name` inside `'...'` is never a
//! reference.
//!
//! Rules enforced here:
//! - A reference is the sigil followed immediately by `[A-Za-z_][A-Za-z0-9_]*`.
//! - A sigil not followed by an identifier start is literal text.
//! - A run of two or more sigils (the Postgres `::` cast) is literal text.
//! - An unterminated quoted region or block comment is a
//!   [`RenderError::MalformedLiteral`] at the byte where it opened.
//!
//! Concatenating every `Literal` yields the template minus its reference
//! tokens.

use crate::dialect::{Quote, QuoteEscape, QuoteRules};
use crate::error::{RenderError, RenderResult};

/// One piece of a scanned template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// SQL text to copy verbatim.
    Literal(&'a str),
    /// A parameter reference, without its sigil.
    Param(&'a str),
}

/// Iterator over the segments of one template.
///
/// Yields at most one error, after which it is exhausted.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    rules: &'a QuoteRules,
    sigil: u8,
    done: bool,
}

/// Scan a whole template into segments.
pub fn scan<'a>(
    template: &'a str,
    rules: &'a QuoteRules,
    sigil: u8,
) -> RenderResult<Vec<Segment<'a>>> {
    Scanner::new(template, rules, sigil).collect()
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

#[inline]
fn is_ident_char(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

impl<'a> Scanner<'a> {
    pub fn new(template: &'a str, rules: &'a QuoteRules, sigil: u8) -> Self {
        Self {
            src: template,
            pos: 0,
            rules,
            sigil,
            done: false,
        }
    }

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    #[inline]
    fn byte_at(&self, i: usize) -> Option<u8> {
        self.bytes().get(i).copied()
    }

    /// If a reference starts at `at`, return the end of its identifier.
    fn reference_end(&self, at: usize) -> Option<usize> {
        let bytes = self.bytes();
        if bytes.get(at) != Some(&self.sigil) {
            return None;
        }
        // `::` casts and longer sigil runs are never references.
        if at > 0 && bytes[at - 1] == self.sigil {
            return None;
        }
        if !bytes.get(at + 1).copied().is_some_and(is_ident_start) {
            return None;
        }
        let mut end = at + 2;
        while bytes.get(end).copied().is_some_and(is_ident_char) {
            end += 1;
        }
        Some(end)
    }

    /// Advance past any non-reference construct starting at `i`.
    ///
    /// Returns the offset just after it, or `i + 1` for an ordinary byte.
    fn skip_non_reference(&self, i: usize) -> RenderResult<usize> {
        let bytes = self.bytes();
        let b = bytes[i];
        let next = self.byte_at(i + 1);

        if b == self.sigil {
            // Consume the whole run so `a::b` stays literal.
            let mut end = i + 1;
            while bytes.get(end) == Some(&self.sigil) {
                end += 1;
            }
            return Ok(end);
        }

        if let Some(quote) = self.rules.quote_opened_by(b) {
            if self.rules.triple_quotes && quote.open == quote.close && self.opens_triple(i) {
                return self.skip_triple_quoted(i, quote);
            }
            return self.skip_quoted(i, quote);
        }

        match b {
            b'-' if next == Some(b'-') => Ok(self.skip_line_comment(i)),
            b'#' if self.rules.hash_comments => Ok(self.skip_line_comment(i)),
            b'/' if next == Some(b'*') => self.skip_block_comment(i),
            b'E' | b'e' if self.rules.escape_strings && next == Some(b'\'') && !self.follows_ident(i) => {
                const ESCAPE_STRING: Quote = Quote::symmetric(b'\'', QuoteEscape::DoubledOrBackslash);
                self.skip_quoted_from(i, i + 1, &ESCAPE_STRING)
            }
            b'$' if self.rules.dollar_quoting && !self.follows_ident(i) => self.skip_dollar_quoted(i),
            b'q' | b'Q' if self.rules.q_quotes && next == Some(b'\'') && self.q_prefix_allowed(i) => {
                self.skip_q_quoted(i)
            }
            _ => Ok(i + 1),
        }
    }

    #[inline]
    fn follows_ident(&self, i: usize) -> bool {
        i > 0 && (is_ident_char(self.bytes()[i - 1]) || self.bytes()[i - 1] == b'$')
    }

    /// `q'` may follow an `n`/`N` national prefix but no other identifier text.
    fn q_prefix_allowed(&self, i: usize) -> bool {
        if !self.follows_ident(i) {
            return true;
        }
        matches!(self.bytes()[i - 1], b'n' | b'N') && !self.follows_ident(i - 1)
    }

    #[inline]
    fn opens_triple(&self, i: usize) -> bool {
        let b = self.bytes()[i];
        self.bytes().get(i..i + 3) == Some(&[b, b, b][..])
    }

    /// `'''...'''`: a lone or doubled quote inside does not close it.
    fn skip_triple_quoted(&self, start: usize, quote: &Quote) -> RenderResult<usize> {
        let bytes = self.bytes();
        let mut i = start + 3;
        while i < bytes.len() {
            if bytes[i] == b'\\' && quote.escape.backslash() {
                i += 2;
                continue;
            }
            if bytes[i] == quote.close && self.opens_triple(i) {
                return Ok(i + 3);
            }
            i += 1;
        }
        Err(RenderError::malformed_literal(start))
    }

    /// `q'<delim>...<close>'`. Brackets pair up; any other delimiter closes
    /// itself.
    fn skip_q_quoted(&self, start: usize) -> RenderResult<usize> {
        let bytes = self.bytes();
        let quote = start + 1;
        let Some(&delim) = bytes.get(quote + 1) else {
            return Err(RenderError::malformed_literal(start));
        };
        if !delim.is_ascii_graphic() || delim == b'\'' {
            return Err(RenderError::malformed_literal(start));
        }
        let close = match delim {
            b'[' => b']',
            b'{' => b'}',
            b'(' => b')',
            b'<' => b'>',
            other => other,
        };
        let mut i = quote + 2;
        while i + 1 < bytes.len() {
            if bytes[i] == close && bytes[i + 1] == b'\'' {
                return Ok(i + 2);
            }
            i += 1;
        }
        Err(RenderError::malformed_literal(start))
    }

    fn skip_quoted(&self, start: usize, quote: &Quote) -> RenderResult<usize> {
        self.skip_quoted_from(start, start, quote)
    }

    /// Skip a quoted region whose opening quote is at `open`; errors report `start`.
    fn skip_quoted_from(&self, start: usize, open: usize, quote: &Quote) -> RenderResult<usize> {
        let bytes = self.bytes();
        let mut i = open + 1;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b'\\' && quote.escape.backslash() {
                i += 2;
                continue;
            }
            if b == quote.close {
                if quote.escape.doubled() && bytes.get(i + 1) == Some(&quote.close) {
                    i += 2;
                    continue;
                }
                return Ok(i + 1);
            }
            i += 1;
        }
        Err(RenderError::malformed_literal(start))
    }

    fn skip_line_comment(&self, start: usize) -> usize {
        match self.src[start..].find('\n') {
            Some(off) => start + off + 1,
            None => self.src.len(),
        }
    }

    fn skip_block_comment(&self, start: usize) -> RenderResult<usize> {
        let bytes = self.bytes();
        let mut depth = 1usize;
        let mut i = start + 2;
        while i < bytes.len() {
            match (bytes[i], bytes.get(i + 1)) {
                (b'*', Some(b'/')) => {
                    depth -= 1;
                    i += 2;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                (b'/', Some(b'*')) if self.rules.nested_block_comments => {
                    depth += 1;
                    i += 2;
                }
                _ => i += 1,
            }
        }
        Err(RenderError::malformed_literal(start))
    }

    /// `$tag$ ... $tag$`. A `$` that does not open a tag (e.g. `$1`) is one
    /// ordinary byte.
    fn skip_dollar_quoted(&self, start: usize) -> RenderResult<usize> {
        let bytes = self.bytes();
        let mut tag_end = start + 1;
        if bytes.get(tag_end).copied().is_some_and(is_ident_start) {
            while bytes.get(tag_end).copied().is_some_and(is_ident_char) {
                tag_end += 1;
            }
        }
        if bytes.get(tag_end) != Some(&b'$') {
            return Ok(start + 1);
        }
        let tag = &self.src[start..=tag_end];
        let body = tag_end + 1;
        match self.src[body..].find(tag) {
            Some(off) => Ok(body + off + tag.len()),
            None => Err(RenderError::malformed_literal(start)),
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = RenderResult<Segment<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = self.pos;
        if let Some(end) = self.reference_end(start) {
            self.pos = end;
            return Some(Ok(Segment::Param(&self.src[start + 1..end])));
        }

        let len = self.src.len();
        let mut i = start;
        while i < len {
            if self.reference_end(i).is_some() {
                break;
            }
            match self.skip_non_reference(i) {
                Ok(next) => i = next.min(len),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        self.pos = i;
        if i == start {
            self.done = true;
            return None;
        }
        Some(Ok(Segment::Literal(&self.src[start..i])))
    }
}
