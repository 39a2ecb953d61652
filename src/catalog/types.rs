//! Catalog data types and tolerant deserialization

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Sort order for review retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewSort {
    /// Most recent reviews first
    Newest,
    /// Highest-rated reviews first
    Rating,
    /// Most helpful reviews first
    Helpfulness,
}

impl ReviewSort {
    /// Convert sort order to API string
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewSort::Newest => "newest",
            ReviewSort::Rating => "rating",
            ReviewSort::Helpfulness => "helpfulness",
        }
    }
}

impl Default for ReviewSort {
    fn default() -> Self {
        ReviewSort::Newest
    }
}

/// A single raw review as returned by the catalog.
///
/// Upstream payloads are loosely typed: optional fields come and go, and
/// timestamps arrive as RFC 3339 strings, bare datetimes, or epoch numbers.
/// All of that variance is absorbed here so the rest of the pipeline sees
/// one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    /// Upstream review identifier
    #[serde(alias = "id")]
    pub review_id: String,
    /// Reviewer display name
    #[serde(default)]
    pub user_name: Option<String>,
    /// Reviewer avatar URL
    #[serde(default)]
    pub user_image: Option<String>,
    /// Review body text
    #[serde(default)]
    pub content: String,
    /// Star rating, 1-5
    #[serde(alias = "starRating")]
    pub score: u8,
    /// Helpful votes
    #[serde(default, alias = "thumbsUp")]
    pub thumbs_up_count: u64,
    /// App version the review was written against
    #[serde(default, alias = "appVersion")]
    pub review_created_version: Option<String>,
    /// When the review was posted
    #[serde(with = "flexible_time", alias = "createdAt")]
    pub at: DateTime<Utc>,
    /// Developer reply text, if any
    #[serde(default)]
    pub reply_content: Option<String>,
    /// When the developer replied
    #[serde(default, with = "flexible_time_opt", alias = "repliedAt")]
    pub reply_at: Option<DateTime<Utc>>,
}

impl RawReview {
    /// Check whether this review has any text worth classifying
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Immutable application snapshot captured at analysis time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    /// Human-readable application name
    pub display_name: String,
    /// Package identifier (e.g. `com.example.app`)
    pub package_id: String,
    /// Developer name
    #[serde(default)]
    pub developer: Option<String>,
    /// Icon URL
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Store rating rendered as text
    #[serde(default)]
    pub rating_text: Option<String>,
}

/// A single hit from a catalog search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCandidate {
    /// Package identifier of the candidate
    pub app_id: String,
    /// Display title
    pub title: String,
    /// Developer name
    #[serde(default)]
    pub developer: Option<String>,
    /// Icon URL
    #[serde(default)]
    pub icon: Option<String>,
}

/// Serde adapter for timestamps that may arrive as RFC 3339 strings, bare
/// datetime strings, or epoch seconds/milliseconds.
pub(crate) mod flexible_time {
    use super::*;
    use serde::{Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum TimeRepr {
        Num(i64),
        Text(String),
    }

    pub(super) fn parse_repr(repr: TimeRepr) -> Option<DateTime<Utc>> {
        match repr {
            // Heuristic threshold: epoch seconds fit well under 1e12
            TimeRepr::Num(n) if n.abs() < 1_000_000_000_000 => Utc.timestamp_opt(n, 0).single(),
            TimeRepr::Num(n) => Utc.timestamp_millis_opt(n).single(),
            TimeRepr::Text(s) => parse_text(&s),
        }
    }

    fn parse_text(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
            if fmt == "%Y-%m-%d" {
                if let Ok(date) = chrono::NaiveDate::parse_from_str(s, fmt) {
                    return date
                        .and_hms_opt(0, 0, 0)
                        .map(|naive| Utc.from_utc_datetime(&naive));
                }
            }
        }
        None
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = TimeRepr::deserialize(deserializer)?;
        parse_repr(repr).ok_or_else(|| serde::de::Error::custom("unrecognized timestamp format"))
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }
}

/// Optional-timestamp variant of [`flexible_time`]
pub(crate) mod flexible_time_opt {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum MaybeTime {
            None,
            Some(super::flexible_time::TimeRepr),
        }

        // Unknown shapes deserialize as None rather than failing the review
        match MaybeTime::deserialize(deserializer) {
            Ok(MaybeTime::Some(repr)) => Ok(super::flexible_time::parse_repr(repr)),
            _ => Ok(None),
        }
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}
