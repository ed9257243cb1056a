//! Path A: combinator grammar over raw bytes.
//!
//! ```text
//! context    := ident ':' ident ':' ident ':' range
//! range      := level ( '-' level )?
//! level      := 's' decimal ( ':' categories )?
//! categories := ws token ws ( ',' ws token ws )*
//! token      := 'c' decimal ( '.' 'c' decimal )?
//! decimal    := [0-9]{1,5} without leading zero
//! ws         := [ \t]*
//! ```
//!
//! Domain violations (bad identifier, out-of-range number, overlap) are
//! raised as `nom::Err::Failure` so they survive `opt` and list combinators
//! and reach the caller with their specific error.

use nom::bytes::complete::take_while;
use nom::character::complete::{char, digit1, space0};
use nom::combinator::{all_consuming, map_opt, opt, verify};
use nom::error::{ErrorKind, FromExternalError, ParseError};
use nom::multi::separated_list1;
use nom::sequence::{delimited, preceded, terminated};
use nom::{Finish, IResult};

use crate::error::LabelError;
use crate::gate::MAX_DIGITS;
use crate::label::{
    Category, CategorySet, MlsLevel, MlsRange, SecurityContext, SelinuxRole, SelinuxType,
    SelinuxUser, SensitivityLevel,
};

#[derive(Debug)]
struct GrammarError<'a> {
    input: &'a [u8],
    cause: Option<LabelError>,
}

impl<'a> ParseError<&'a [u8]> for GrammarError<'a> {
    fn from_error_kind(input: &'a [u8], _kind: ErrorKind) -> Self {
        Self { input, cause: None }
    }

    fn append(_input: &'a [u8], _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> FromExternalError<&'a [u8], LabelError> for GrammarError<'a> {
    fn from_external_error(input: &'a [u8], _kind: ErrorKind, e: LabelError) -> Self {
        Self {
            input,
            cause: Some(e),
        }
    }
}

type Res<'a, T> = IResult<&'a [u8], T, GrammarError<'a>>;

fn fail(input: &[u8], cause: LabelError) -> nom::Err<GrammarError<'_>> {
    nom::Err::Failure(GrammarError::from_external_error(
        input,
        ErrorKind::Verify,
        cause,
    ))
}

fn decimal(input: &[u8]) -> Res<'_, u32> {
    map_opt(
        verify(digit1, |digits: &[u8]| {
            digits.len() <= MAX_DIGITS && (digits.len() == 1 || digits[0] != b'0')
        }),
        |digits: &[u8]| std::str::from_utf8(digits).ok()?.parse::<u32>().ok(),
    )(input)
}

fn sensitivity(input: &[u8]) -> Res<'_, SensitivityLevel> {
    let (rest, rank) = preceded(char('s'), decimal)(input)?;
    let level = SensitivityLevel::new(rank).map_err(|e| fail(input, e))?;
    Ok((rest, level))
}

fn category(input: &[u8]) -> Res<'_, Category> {
    let (rest, id) = preceded(char('c'), decimal)(input)?;
    let cat = Category::new(id).map_err(|e| fail(input, e))?;
    Ok((rest, cat))
}

fn category_token(input: &[u8]) -> Res<'_, (Category, Category)> {
    let (rest, first) = category(input)?;
    let (rest, last) = opt(preceded(char('.'), category))(rest)?;
    Ok((rest, (first, last.unwrap_or(first))))
}

fn category_list(input: &[u8]) -> Res<'_, CategorySet> {
    let (rest, tokens) =
        separated_list1(char(','), delimited(space0, category_token, space0))(input)?;
    let mut set = CategorySet::new();
    for (first, last) in tokens {
        set.insert_range(first, last).map_err(|e| fail(input, e))?;
    }
    Ok((rest, set))
}

fn level(input: &[u8]) -> Res<'_, MlsLevel> {
    let (rest, sens) = sensitivity(input)?;
    let (rest, cats) = opt(preceded(char(':'), category_list))(rest)?;
    Ok((rest, MlsLevel::new(sens, cats.unwrap_or_default())))
}

fn range(input: &[u8]) -> Res<'_, MlsRange> {
    let (rest, low) = level(input)?;
    let (rest, high) = opt(preceded(char('-'), level))(rest)?;
    let range = match high {
        Some(high) => MlsRange::new(low, high).map_err(|e| fail(input, e))?,
        None => MlsRange::single(low),
    };
    Ok((rest, range))
}

fn field(input: &[u8]) -> Res<'_, &[u8]> {
    take_while(|b: u8| b != b':')(input)
}

fn context(input: &[u8]) -> Res<'_, SecurityContext> {
    let (rest, user) = terminated(field, char(':'))(input)?;
    let user = SelinuxUser::labeled(user).map_err(|e| fail(input, e))?;
    let (rest, role) = terminated(field, char(':'))(rest)?;
    let role = SelinuxRole::labeled(role).map_err(|e| fail(input, e))?;
    let (rest, kind) = terminated(field, char(':'))(rest)?;
    let kind = SelinuxType::labeled(kind).map_err(|e| fail(input, e))?;
    let (rest, range) = range(rest)?;
    Ok((rest, SecurityContext::with_range(user, role, kind, range)))
}

fn run<'a, T>(
    raw: &'a [u8],
    parser: impl FnMut(&'a [u8]) -> Res<'a, T>,
) -> Result<T, LabelError> {
    match all_consuming(parser)(raw).finish() {
        Ok((_, value)) => Ok(value),
        Err(GrammarError {
            cause: Some(cause), ..
        }) => Err(cause),
        Err(GrammarError { input, .. }) => Err(LabelError::malformed(format!(
            "unexpected input at byte {}",
            raw.len().saturating_sub(input.len())
        ))),
    }
}

/// Full `user:role:type:range` context.
pub(crate) fn parse_context(raw: &[u8]) -> Result<SecurityContext, LabelError> {
    run(raw, context)
}

/// Single level, no range.
pub(crate) fn parse_level(raw: &[u8]) -> Result<MlsLevel, LabelError> {
    run(raw, level)
}

/// Level or `low-high` range.
pub(crate) fn parse_range(raw: &[u8]) -> Result<MlsRange, LabelError> {
    run(raw, range)
}

/// Bare category list.
pub(crate) fn parse_categories(raw: &[u8]) -> Result<CategorySet, LabelError> {
    run(raw, category_list)
}
