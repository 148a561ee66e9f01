use crate::domain::model::{DestinationRecord, SourceRecord};
use crate::utils::error::{ConvertError, Result};
use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::NaiveDateTime;

/// Timestamp layout of the export's created/modified columns,
/// e.g. `Wed Aug 21 12:55:59 2013`: a weekday name, then [`SOURCE_DATE_TIME_FORMAT`].
pub const SOURCE_WEEKDAY_FORMAT: &str = "%a";
pub const SOURCE_DATE_TIME_FORMAT: &str = "%b %d %H:%M:%S %Y";

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Reformats an export timestamp with `pattern`. The time of day is dropped.
///
/// The weekday must be a weekday name but is not checked against the date.
pub fn convert_timestamp(raw: &str, pattern: &str) -> Result<String> {
    let malformed = |source| ConvertError::MalformedTimestamp {
        row: None,
        value: raw.to_string(),
        source,
    };

    let (weekday, rest) = raw.split_once(' ').unwrap_or((raw, ""));
    parse(
        &mut Parsed::new(),
        weekday,
        StrftimeItems::new(SOURCE_WEEKDAY_FORMAT),
    )
    .map_err(malformed)?;

    let parsed = NaiveDateTime::parse_from_str(rest, SOURCE_DATE_TIME_FORMAT).map_err(malformed)?;

    Ok(parsed.date().format(pattern).to_string())
}

pub fn map_record(source: &SourceRecord) -> Result<DestinationRecord> {
    Ok(DestinationRecord {
        imdb_id: source.imdb_id.clone(),
        title: source.title.clone(),
        year: source.year.clone(),
        directors: source.directors.clone(),
        // 匯出檔沒有觀看日期
        watched_date: String::new(),
        created_date: convert_timestamp(&source.created, DEFAULT_DATE_FORMAT)?,
        rating: source.user_rating.clone(),
    })
}
