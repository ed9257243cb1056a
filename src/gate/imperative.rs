//! Path B: hand-written byte scanner.
//!
//! Shares no code with the combinator grammar beyond the label
//! constructors. Splits on delimiters first, then validates each piece.

use crate::error::LabelError;
use crate::gate::MAX_DIGITS;
use crate::label::{
    Category, CategorySet, MlsLevel, MlsRange, SecurityContext, SelinuxRole, SelinuxType,
    SelinuxUser, SensitivityLevel,
};

fn split_once(input: &[u8], delim: u8) -> Option<(&[u8], &[u8])> {
    let mut halves = input.splitn(2, |&b| b == delim);
    Some((halves.next()?, halves.next()?))
}

fn trim_blanks(mut input: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = input {
        input = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = input {
        input = rest;
    }
    input
}

/// Reads a leading decimal run. Returns the value and the bytes after it.
fn leading_decimal<'a>(
    input: &'a [u8],
    what: &str,
) -> Result<(u32, &'a [u8]), LabelError> {
    let len = input.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return Err(LabelError::malformed(format!("{what} has no digits")));
    }
    if len > MAX_DIGITS {
        return Err(LabelError::malformed(format!(
            "{what} has more than {MAX_DIGITS} digits"
        )));
    }
    if len > 1 && input[0] == b'0' {
        return Err(LabelError::malformed(format!("{what} has a leading zero")));
    }
    let (digits, rest) = input.split_at(len);
    let mut value = 0u32;
    for &digit in digits {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(digit.wrapping_sub(b'0'))))
            .ok_or_else(|| LabelError::malformed(format!("{what} overflows")))?;
    }
    Ok((value, rest))
}

fn category(input: &[u8]) -> Result<(Category, &[u8]), LabelError> {
    let Some((&b'c', digits)) = input.split_first() else {
        return Err(LabelError::malformed("category must start with 'c'"));
    };
    let (id, rest) = leading_decimal(digits, "category")?;
    Ok((Category::new(id)?, rest))
}

fn category_token(token: &[u8]) -> Result<(Category, Category), LabelError> {
    let (first, rest) = category(token)?;
    let last = match rest {
        [] => first,
        [b'.', tail @ ..] => {
            let (last, rest) = category(tail)?;
            if !rest.is_empty() {
                return Err(LabelError::malformed(
                    "trailing bytes after category range",
                ));
            }
            last
        }
        _ => return Err(LabelError::malformed("trailing bytes after category")),
    };
    Ok((first, last))
}

pub(crate) fn parse_categories(raw: &[u8]) -> Result<CategorySet, LabelError> {
    let mut tokens = Vec::new();
    for piece in raw.split(|&b| b == b',') {
        tokens.push(category_token(trim_blanks(piece))?);
    }
    let mut set = CategorySet::new();
    for (first, last) in tokens {
        if last < first {
            return Err(LabelError::InvertedCategoryRange {
                start: first.id(),
                end: last.id(),
            });
        }
        for id in first.id()..=last.id() {
            let cat = Category::new(u32::from(id))?;
            if !set.insert(cat) {
                return Err(LabelError::OverlappingCategories(id));
            }
        }
    }
    Ok(set)
}

fn sensitivity(raw: &[u8]) -> Result<SensitivityLevel, LabelError> {
    let Some((&b's', digits)) = raw.split_first() else {
        return Err(LabelError::malformed("sensitivity must start with 's'"));
    };
    let (rank, rest) = leading_decimal(digits, "sensitivity")?;
    if !rest.is_empty() {
        return Err(LabelError::malformed("trailing bytes after sensitivity"));
    }
    SensitivityLevel::new(rank)
}

pub(crate) fn parse_level(raw: &[u8]) -> Result<MlsLevel, LabelError> {
    match split_once(raw, b':') {
        Some((sens, cats)) => Ok(MlsLevel::new(
            sensitivity(sens)?,
            parse_categories(cats)?,
        )),
        None => Ok(MlsLevel::new(sensitivity(raw)?, CategorySet::new())),
    }
}

pub(crate) fn parse_range(raw: &[u8]) -> Result<MlsRange, LabelError> {
    match split_once(raw, b'-') {
        Some((low, high)) => MlsRange::new(parse_level(low)?, parse_level(high)?),
        None => Ok(MlsRange::single(parse_level(raw)?)),
    }
}

pub(crate) fn parse_context(raw: &[u8]) -> Result<SecurityContext, LabelError> {
    let missing = || LabelError::malformed("expected user:role:type:level");
    let (user, rest) = split_once(raw, b':').ok_or_else(missing)?;
    let (role, rest) = split_once(rest, b':').ok_or_else(missing)?;
    let (kind, range) = split_once(rest, b':').ok_or_else(missing)?;
    Ok(SecurityContext::with_range(
        SelinuxUser::labeled(user)?,
        SelinuxRole::labeled(role)?,
        SelinuxType::labeled(kind)?,
        parse_range(range)?,
    ))
}
