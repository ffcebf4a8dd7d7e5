use std::iter::Peekable;
use std::str::Chars;

use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

const INPUT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Converts `MM/DD/YYYY` into the timestamp form Shortcut accepts, e.g.
/// `01/15/2023` becomes `2023-01-15T00:00:00Z`.
///
/// The trailing `Z` is appended to a naive midnight; integrations already
/// depend on that exact shape.
pub fn to_shortcut_timestamp(input: &str) -> AppResult<String> {
    let date = NaiveDate::parse_from_str(input.trim(), INPUT_DATE_FORMAT).map_err(|err| {
        AppError::InvalidInput(format!("'{input}' is not a MM/DD/YYYY date: {err}"))
    })?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::InvalidInput(format!("'{input}' has no midnight")))?;
    Ok(format!("{}Z", midnight.format("%Y-%m-%dT%H:%M:%S")))
}

/// Parses a bracketed list of quoted strings such as `['bug', "urgent"]`.
/// Set (`{...}`) and tuple (`(...)`) brackets are accepted as well.
pub fn parse_string_list(input: &str) -> AppResult<Vec<String>> {
    let trimmed = input.trim();
    let inner = strip_brackets(trimmed).ok_or_else(|| {
        AppError::InvalidInput(format!("'{input}' is not a bracketed list of strings"))
    })?;

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        skip_whitespace(&mut chars);
        let Some(quote) = chars.next() else {
            break;
        };
        if quote != '\'' && quote != '"' {
            return Err(AppError::InvalidInput(format!(
                "expected a quoted string in '{input}', found '{quote}'"
            )));
        }
        items.push(read_quoted(&mut chars, quote, input)?);

        skip_whitespace(&mut chars);
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(other) => {
                return Err(AppError::InvalidInput(format!(
                    "expected ',' between items in '{input}', found '{other}'"
                )));
            }
        }
    }
    Ok(items)
}

fn strip_brackets(value: &str) -> Option<&str> {
    let first = value.chars().next()?;
    let closing = match first {
        '[' => ']',
        '{' => '}',
        '(' => ')',
        _ => return None,
    };
    if value.len() < 2 || !value.ends_with(closing) {
        return None;
    }
    Some(&value[1..value.len() - 1])
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>, quote: char, input: &str) -> AppResult<String> {
    let mut item = String::new();
    loop {
        match chars.next() {
            Some('\\') => match chars.next() {
                Some('n') => item.push('\n'),
                Some('t') => item.push('\t'),
                Some(escaped) => item.push(escaped),
                None => break,
            },
            Some(c) if c == quote => return Ok(item),
            Some(c) => item.push(c),
            None => break,
        }
    }
    Err(AppError::InvalidInput(format!(
        "unterminated string in '{input}'"
    )))
}
