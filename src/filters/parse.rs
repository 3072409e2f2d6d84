//! Value parsers shared by the filter templates
//!
//! Every parser takes the template key so that its error can be attributed
//! to the filter that rejected the input.

use super::error::FilterError;
use chrono::TimeDelta;

/// Parse a finite floating point number
pub(crate) fn number(key: &str, what: &str, text: &str) -> Result<f64, FilterError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FilterError::validation(key, format!("Invalid {what}: '{}'", text.trim())))
}

/// Split a comma separated list, trimming each element and dropping empty ones
pub(crate) fn list(key: &str, text: &str) -> Result<Vec<String>, FilterError> {
    let items: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        return Err(FilterError::validation(
            key,
            format!("Filter '{key}' needs at least one value"),
        ));
    }
    Ok(items)
}

/// Comma separated list of integer ids
pub(crate) fn id_list(key: &str, text: &str) -> Result<Vec<i32>, FilterError> {
    list(key, text)?
        .iter()
        .map(|item| {
            item.parse::<i32>()
                .map_err(|_| FilterError::validation(key, format!("Invalid id: '{item}'")))
        })
        .collect()
}

/// Parse a track length: plain seconds (`90`, `90.5`) or `m:ss` / `h:mm:ss`
pub(crate) fn length(key: &str, text: &str) -> Result<f64, FilterError> {
    let text = text.trim();
    let invalid = || FilterError::validation(key, format!("Invalid length: '{text}'"));

    if !text.contains(':') {
        let seconds = number(key, "length", text)?;
        if seconds < 0.0 {
            return Err(invalid());
        }
        return Ok(seconds);
    }

    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return Err(invalid());
    }

    let mut seconds = 0.0;
    for (idx, part) in parts.iter().enumerate() {
        let value = part.parse::<u32>().map_err(|_| invalid())?;
        // everything but the leading component is a base-60 digit
        if idx > 0 && value >= 60 {
            return Err(invalid());
        }
        seconds = seconds * 60.0 + f64::from(value);
    }
    Ok(seconds)
}

/// Parse a duration such as `30d`, `1w2d`, `12h` or a bare number of days
pub(crate) fn duration(key: &str, text: &str) -> Result<TimeDelta, FilterError> {
    let text = text.trim().to_lowercase();
    let invalid = || {
        FilterError::validation(
            key,
            format!("Invalid duration: '{text}' (use e.g. 30d, 2w, 12h, 1y)"),
        )
    };

    if let Ok(days) = text.parse::<i64>() {
        return match TimeDelta::try_days(days) {
            Some(delta) if days > 0 => Ok(delta),
            _ => Err(invalid()),
        };
    }

    let mut total = TimeDelta::zero();
    let mut digits = String::new();
    for ch in text.chars().filter(|c| !c.is_whitespace()) {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let amount: i64 = digits.parse().map_err(|_| invalid())?;
        digits.clear();
        let part = match ch {
            's' => TimeDelta::try_seconds(amount),
            'm' => TimeDelta::try_minutes(amount),
            'h' => TimeDelta::try_hours(amount),
            'd' => TimeDelta::try_days(amount),
            'w' => TimeDelta::try_weeks(amount),
            'y' => amount.checked_mul(365).and_then(TimeDelta::try_days),
            _ => None,
        }
        .ok_or_else(invalid)?;
        total = total.checked_add(&part).ok_or_else(invalid)?;
    }

    if !digits.is_empty() || total <= TimeDelta::zero() {
        return Err(invalid());
    }
    Ok(total)
}

/// Map a comma separated list of keywords onto values by prefix matching
///
/// Each element selects every keyword it is a prefix of, so one element can
/// yield several values. Duplicates are removed, first occurrence wins.
pub(crate) fn keywords<T: Copy + PartialEq>(
    key: &str,
    what: &str,
    text: &str,
    table: &[(&str, T)],
) -> Result<Vec<T>, FilterError> {
    let mut values = Vec::new();
    for item in list(key, text)? {
        let item = item.to_lowercase();
        let matched: Vec<T> = table
            .iter()
            .filter(|(keyword, _)| keyword.starts_with(item.as_str()))
            .map(|(_, value)| *value)
            .collect();

        if matched.is_empty() {
            let valid: Vec<&str> = table.iter().map(|(keyword, _)| *keyword).collect();
            return Err(FilterError::validation(
                key,
                format!("Unknown {what} '{item}'. Valid values: {}", valid.join(", ")),
            ));
        }

        for value in matched {
            if !values.contains(&value) {
                values.push(value);
            }
        }
    }
    Ok(values)
}
