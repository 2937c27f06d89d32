use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used for review dates in the CSV file.
pub const REVIEW_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single app-store review, column-compatible with the raw reviews CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_id: String,
    pub user_name: String,
    pub user_image: Option<String>,
    pub content: Option<String>,
    pub score: u8,
    pub thumbs_up_count: u64,
    pub review_created_version: Option<String>,
    #[serde(with = "review_date")]
    pub at: NaiveDateTime,
    pub reply_content: Option<String>,
    #[serde(with = "review_date::optional")]
    pub replied_at: Option<NaiveDateTime>,
    pub app_version: Option<String>,
}

mod review_date {
    use super::REVIEW_DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&at.format(REVIEW_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, REVIEW_DATE_FORMAT).map_err(serde::de::Error::custom)
    }

    pub mod optional {
        use super::REVIEW_DATE_FORMAT;
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            at: &Option<NaiveDateTime>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match at {
                Some(at) => s.serialize_str(&at.format(REVIEW_DATE_FORMAT).to_string()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(s) => NaiveDateTime::parse_from_str(s, REVIEW_DATE_FORMAT)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}
