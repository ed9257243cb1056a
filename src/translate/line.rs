//! The two independent parsers for one translation line.
//!
//! Line shape: `level[-level] = Name words  # optional detail`. Leading and
//! trailing blanks are insignificant. The name is one or more words of
//! printable bytes without `#`; the detail is everything after the first
//! `#` that follows `=`, trimmed, and absent when empty.

use std::fmt;

use nom::bytes::complete::{take_till1, take_while1};
use nom::character::complete::{char, space0, space1};
use nom::combinator::{all_consuming, opt, recognize};
use nom::multi::separated_list1;
use nom::sequence::{pair, preceded, terminated, tuple};
use nom::{Finish, IResult};

use crate::error::LabelError;
use crate::gate;
use crate::label::MlsRange;

/// One admitted line, before indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedLine {
    pub(crate) range: MlsRange,
    pub(crate) name: String,
    pub(crate) detail: Option<String>,
}

impl fmt::Display for ParsedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.range, self.name)?;
        if let Some(detail) = &self.detail {
            write!(f, " # {detail}")?;
        }
        Ok(())
    }
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn is_printable(b: u8) -> bool {
    b >= 0x20 && b != 0x7f
}

fn is_name_byte(b: u8) -> bool {
    is_printable(b) && !is_blank(b) && b != b'#'
}

fn is_detail_byte(b: u8) -> bool {
    is_printable(b) && !is_blank(b)
}

fn text(raw: &[u8], what: &str) -> Result<String, LabelError> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|_| LabelError::malformed(format!("{what} is not valid UTF-8")))
}

// ── Path A ──

fn words<'a>(accept: fn(u8) -> bool) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], &'a [u8]> {
    recognize(separated_list1(space1, take_while1(accept)))
}

fn strip_trailing_blanks(mut raw: &[u8]) -> &[u8] {
    while let [rest @ .., last] = raw {
        if !is_blank(*last) {
            break;
        }
        raw = rest;
    }
    raw
}

/// Combinator grammar for one line.
pub(crate) fn declared(raw: &[u8]) -> Result<ParsedLine, LabelError> {
    let grammar = tuple((
        preceded(space0, take_till1(|b: u8| b == b'=')),
        preceded(pair(char('='), space0), words(is_name_byte)),
        terminated(
            opt(preceded(
                pair(space0, char('#')),
                preceded(space0, opt(words(is_detail_byte))),
            )),
            space0,
        ),
    ));
    let (_, (level, name, detail)) = all_consuming(grammar)(raw)
        .finish()
        .map_err(|e: nom::error::Error<&[u8]>| {
            LabelError::malformed(format!(
                "translation line unparseable at byte {}",
                raw.len().saturating_sub(e.input.len())
            ))
        })?;
    Ok(ParsedLine {
        range: gate::parse_range(strip_trailing_blanks(level))?,
        name: text(name, "marking name")?,
        detail: detail.flatten().map(|d| text(d, "marking detail")).transpose()?,
    })
}

// ── Path B ──

fn trim(raw: &[u8]) -> &[u8] {
    let start = raw.iter().position(|&b| !is_blank(b)).unwrap_or(raw.len());
    let end = raw
        .iter()
        .rposition(|&b| !is_blank(b))
        .map_or(start, |i| i.saturating_add(1));
    &raw[start..end.max(start)]
}

/// Splits at the first `delim`, dropping it.
fn cut(raw: &[u8], delim: u8) -> Option<(&[u8], &[u8])> {
    let mut halves = raw.splitn(2, |&b| b == delim);
    Some((halves.next()?, halves.next()?))
}

fn checked(raw: &[u8], what: &str) -> Result<String, LabelError> {
    if let Some(&bad) = raw.iter().find(|&&b| !is_printable(b) && b != b'\t') {
        return Err(LabelError::malformed(format!(
            "{what} contains control byte {}",
            bad.escape_ascii()
        )));
    }
    text(raw, what)
}

/// Manual splitter for one line.
pub(crate) fn scanned(raw: &[u8]) -> Result<ParsedLine, LabelError> {
    let (lhs, rhs) = cut(raw, b'=')
        .ok_or_else(|| LabelError::malformed("translation line has no '='"))?;

    let (name, detail) = match cut(rhs, b'#') {
        Some((name, detail)) => (trim(name), Some(trim(detail))),
        None => (trim(rhs), None),
    };
    if name.is_empty() {
        return Err(LabelError::malformed("translation line has an empty name"));
    }

    Ok(ParsedLine {
        range: gate::parse_range(trim(lhs))?,
        name: checked(name, "marking name")?,
        detail: match detail {
            Some(d) if !d.is_empty() => Some(checked(d, "marking detail")?),
            _ => None,
        },
    })
}
