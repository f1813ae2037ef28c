// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Text and integer encodings used by the `SQLite` columns.
//!
//! Dates are stored as `YYYY-MM-DD` and timestamps as RFC 3339 in UTC, so
//! both sort correctly as text. Booleans are stored as 0/1 integers.

use num_traits::ToPrimitive;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::error::PersistenceError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Formats a date for storage.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(format!("date {date}: {e}")))
}

/// Parses a stored date.
///
/// # Errors
///
/// Returns an error if the text is not `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Result<Date, PersistenceError> {
    Date::parse(text, DATE_FORMAT)
        .map_err(|e| PersistenceError::CorruptRow(format!("date '{text}': {e}")))
}

/// Formats a timestamp for storage, normalized to UTC.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(format!("timestamp {value}: {e}")))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(text, &Rfc3339)
        .map_err(|e| PersistenceError::CorruptRow(format!("timestamp '{text}': {e}")))
}

/// Formats an optional timestamp.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_optional_timestamp(
    value: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    value.map(format_timestamp).transpose()
}

/// Parses an optional stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_optional_timestamp(
    text: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    text.map(parse_timestamp).transpose()
}

/// Formats an optional date.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_optional_date(value: Option<Date>) -> Result<Option<String>, PersistenceError> {
    value.map(format_date).transpose()
}

/// Parses an optional stored date.
///
/// # Errors
///
/// Returns an error if the text is not `YYYY-MM-DD`.
pub fn parse_optional_date(text: Option<&str>) -> Result<Option<Date>, PersistenceError> {
    text.map(parse_date).transpose()
}

#[must_use]
pub fn bool_to_int(value: bool) -> i32 {
    i32::from(value)
}

#[must_use]
pub const fn int_to_bool(value: i32) -> bool {
    value != 0
}

/// Narrows a stored count to `u32`.
///
/// # Errors
///
/// Returns `CorruptRow` for negative values.
pub fn to_u32(value: i32, column: &str) -> Result<u32, PersistenceError> {
    value
        .to_u32()
        .ok_or_else(|| PersistenceError::CorruptRow(format!("{column} = {value}")))
}

/// Widens a count for storage.
///
/// # Errors
///
/// Returns `Other` if the value does not fit an `i32` column.
pub fn to_i32(value: u32, column: &str) -> Result<i32, PersistenceError> {
    value
        .to_i32()
        .ok_or_else(|| PersistenceError::Other(format!("{column} = {value} is out of range")))
}
