use crate::runtime::{CallError, Registry};

/// Character position of the first `needle` in `text`, `-1` when absent.
fn index_of(text: &str, needle: &str) -> i32 {
    match text.find(needle) {
        Some(at) => i32::try_from(text[..at].chars().count()).unwrap_or(i32::MAX),
        None => -1,
    }
}

/// `len` characters of `text` starting at character `start`; `None` takes the rest.
fn substring(text: &str, start: i32, len: Option<i32>) -> Result<String, CallError> {
    if text.is_empty() {
        return Ok(String::new());
    }
    let count = text.chars().count();
    let start = usize::try_from(start)
        .ok()
        .filter(|&s| s < count)
        .ok_or_else(|| {
            CallError::failed(format!(
                "start index {start} is out of range for string of length {count}"
            ))
        })?;
    let take = match len {
        None => count - start,
        Some(len) => usize::try_from(len)
            .ok()
            .filter(|&l| start + l <= count)
            .ok_or_else(|| {
                CallError::failed(format!(
                    "length {len} is invalid for string of length {count} starting at {start}"
                ))
            })?,
    };
    Ok(text.chars().skip(start).take(take).collect())
}

fn split(text: &str, sep: &str, drop_empty: bool) -> Result<Vec<String>, CallError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    if sep.is_empty() {
        return Ok(vec![text.to_owned()]);
    }
    Ok(text
        .split(sep)
        .filter(|part| !drop_empty || !part.is_empty())
        .map(str::to_owned)
        .collect())
}

pub(super) fn register(r: &mut Registry) {
    r.register("concat", |a: Option<String>, b: Option<String>| {
        a.unwrap_or_default() + &b.unwrap_or_default()
    })
    .register(
        "concat",
        |a: Option<String>, b: Option<String>, c: Option<String>| {
            a.unwrap_or_default() + &b.unwrap_or_default() + &c.unwrap_or_default()
        },
    )
    .register("length", |s: Option<String>| {
        s.map_or(0, |s| i32::try_from(s.chars().count()).unwrap_or(i32::MAX))
    })
    .register("trim", |s: Option<String>| {
        s.map(|s| s.trim().to_owned()).unwrap_or_default()
    })
    .register("toupper", |s: Option<String>| {
        s.map(|s| s.to_uppercase()).unwrap_or_default()
    })
    .register("tolower", |s: Option<String>| {
        s.map(|s| s.to_lowercase()).unwrap_or_default()
    })
    .register("startswith", |s: Option<String>, p: Option<String>| {
        matches!((s, p), (Some(s), Some(p)) if !s.is_empty() && s.starts_with(&p))
    })
    .register("endswith", |s: Option<String>, p: Option<String>| {
        matches!((s, p), (Some(s), Some(p)) if !s.is_empty() && s.ends_with(&p))
    })
    .register("indexof", |s: Option<String>, p: Option<String>| match (s, p) {
        (Some(s), Some(p)) if !s.is_empty() => index_of(&s, &p),
        _ => -1,
    })
    .register(
        "replace",
        |s: Option<String>, from: Option<String>, to: Option<String>| {
            let s = s.unwrap_or_default();
            if s.is_empty() {
                return Ok(String::new());
            }
            match from {
                Some(from) if !from.is_empty() => Ok(s.replace(&from, &to.unwrap_or_default())),
                _ => Err(CallError::failed("replace: old value cannot be empty")),
            }
        },
    )
    .register("split", |s: Option<String>, sep: String| {
        split(&s.unwrap_or_default(), &sep, false)
    })
    .register("split", |s: Option<String>, sep: String, drop_empty: bool| {
        split(&s.unwrap_or_default(), &sep, drop_empty)
    })
    .register("substring", |s: Option<String>, start: i32| {
        substring(&s.unwrap_or_default(), start, None)
    })
    .register("substring", |s: Option<String>, start: i32, len: i32| {
        substring(&s.unwrap_or_default(), start, Some(len))
    });
}

#[cfg(test)]
#[path = "../../tests/unit/stdlib/string.rs"]
mod tests;
