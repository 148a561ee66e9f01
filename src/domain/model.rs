use crate::utils::error::{ConvertError, Result};
use csv::StringRecord;
use serde::Serialize;

pub const SOURCE_FIELD_COUNT: usize = 16;

pub const DESTINATION_HEADER: [&str; 7] = [
    "imdbID",
    "Title",
    "Year",
    "Directors",
    "WatchedDate",
    "CreatedDate",
    "Rating10",
];

/// One row of the ratings export, columns in export order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceRecord {
    pub position: String,
    pub imdb_id: String,
    pub created: String,
    pub modified: String,
    pub description: String,
    pub title: String,
    pub title_type: String,
    pub directors: String,
    pub user_rating: String,
    pub imdb_rating: String,
    pub runtime_mins: String,
    pub year: String,
    pub genres: String,
    pub num_votes: String,
    pub release_date: String,
    pub url: String,
}

impl SourceRecord {
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        if fields.len() < SOURCE_FIELD_COUNT {
            return Err(ConvertError::MalformedRecord {
                row: None,
                found: fields.len(),
                expected: SOURCE_FIELD_COUNT,
            });
        }

        let field = |i: usize| fields[i].as_ref().to_string();
        Ok(Self {
            position: field(0),
            imdb_id: field(1),
            created: field(2),
            modified: field(3),
            description: field(4),
            title: field(5),
            title_type: field(6),
            directors: field(7),
            user_rating: field(8),
            imdb_rating: field(9),
            runtime_mins: field(10),
            year: field(11),
            genres: field(12),
            num_votes: field(13),
            release_date: field(14),
            url: field(15),
        })
    }
}

impl TryFrom<&StringRecord> for SourceRecord {
    type Error = ConvertError;

    fn try_from(record: &StringRecord) -> Result<Self> {
        let fields: Vec<&str> = record.iter().collect();
        Self::from_fields(&fields)
    }
}

/// One row of the import file. Field order is the column order written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationRecord {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub directors: String,
    pub watched_date: String,
    pub created_date: String,
    pub rating: String,
}
