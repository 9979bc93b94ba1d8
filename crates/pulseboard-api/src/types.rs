// Wire types for the pulseboard backend.
//
// Field names match the JSON the backend emits. Timestamps are accepted in
// the three shapes seen in practice (RFC 3339, naive ISO-8601, RFC 2822)
// and normalised to UTC.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Records ─────────────────────────────────────────────────────────

/// Classification of the activity observed in a metric sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    Normal,
    Suspicious,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "Normal",
            Self::Suspicious => "Suspicious",
        })
    }
}

/// One metric sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(deserialize_with = "flexible_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Percentage, 0–100.
    pub uptime: f64,
    pub users_connected: u64,
    pub activity: Activity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    #[serde(deserialize_with = "flexible_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub description: String,
}

// ── Pagination ──────────────────────────────────────────────────────

/// Server-side pagination block. Authoritative for page-info display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
}

/// One page of records plus its pagination block.
///
/// Deserialises from the `{ data, pagination }` envelope. A bare JSON
/// array is also accepted (older backends return the whole collection) and
/// is treated as a single complete page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire<T> {
            Envelope { data: Vec<T>, pagination: Pagination },
            Bare(Vec<T>),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Envelope { data, pagination } => Page { data, pagination },
            Wire::Bare(data) => {
                let total = u64::try_from(data.len()).unwrap_or(u64::MAX);
                Page {
                    data,
                    pagination: Pagination {
                        page: 1,
                        pages: 1,
                        total,
                    },
                }
            }
        })
    }
}

/// Query parameters for the paginated list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub per_page: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub keyword: Option<String>,
}

impl PageQuery {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            start_date: None,
            end_date: None,
            keyword: None,
        }
    }

    /// Render as query parameters. Dates are `YYYY-MM-DD`; a blank keyword
    /// is omitted entirely.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(start) = self.start_date {
            params.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(keyword) = self.keyword.as_deref().map(str::trim) {
            if !keyword.is_empty() {
                params.push(("keyword", keyword.to_owned()));
            }
        }
        params
    }
}

// ── Summary & health ────────────────────────────────────────────────

/// Aggregates over the requested days-back window.
///
/// Backends report `null` averages when the window holds no samples;
/// those decode as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub avg_uptime: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub max_concurrent_users: u64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub avg_users: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub suspicious_activities: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// ── Deserialisation helpers ─────────────────────────────────────────

/// Parse a backend timestamp into UTC.
///
/// Accepts RFC 3339, naive ISO-8601 (assumed UTC, `T` or space separator,
/// optional fraction), and RFC 2822.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn flexible_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp {raw:?}")))
}

fn zero_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn jan1() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn timestamps_in_all_backend_shapes() {
        assert_eq!(parse_timestamp("2024-01-01T00:00:00Z"), Some(jan1()));
        assert_eq!(parse_timestamp("2024-01-01T02:00:00+02:00"), Some(jan1()));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00"), Some(jan1()));
        assert_eq!(parse_timestamp("2024-01-01 00:00:00.000000"), Some(jan1()));
        assert_eq!(parse_timestamp("Mon, 01 Jan 2024 00:00:00 GMT"), Some(jan1()));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn metric_record_from_flask_json() {
        let record: MetricRecord = serde_json::from_value(json!({
            "timestamp": "Mon, 01 Jan 2024 00:00:00 GMT",
            "uptime": 97.5,
            "users_connected": 12,
            "activity": "Suspicious"
        }))
        .unwrap();
        assert_eq!(record.timestamp, jan1());
        assert_eq!(record.activity, Activity::Suspicious);
        assert_eq!(record.users_connected, 12);
    }

    #[test]
    fn unknown_activity_is_rejected() {
        let result = serde_json::from_value::<MetricRecord>(json!({
            "timestamp": "2024-01-01T00:00:00Z",
            "uptime": 99.0,
            "users_connected": 1,
            "activity": "Idle"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn bare_array_becomes_single_page() {
        let page: Page<NotificationRecord> = serde_json::from_value(json!([
            { "timestamp": "2024-01-01T00:00:00", "event_type": "Login", "description": "a" },
            { "timestamp": "2024-01-01T00:00:00", "event_type": "Login", "description": "b" }
        ]))
        .unwrap();
        assert_eq!(
            page.pagination,
            Pagination {
                page: 1,
                pages: 1,
                total: 2
            }
        );
    }

    #[test]
    fn summary_nulls_decode_as_zero() {
        let summary: MetricsSummary = serde_json::from_value(json!({
            "avg_uptime": null,
            "max_concurrent_users": null,
            "avg_users": null,
            "suspicious_activities": 0
        }))
        .unwrap();
        assert_eq!(summary, MetricsSummary::default());
    }

    #[test]
    fn page_query_params() {
        let mut query = PageQuery::new(2, 10);
        query.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        query.keyword = Some("  disk full ".into());
        assert_eq!(
            query.to_params(),
            vec![
                ("page", "2".to_owned()),
                ("per_page", "10".to_owned()),
                ("start_date", "2024-01-01".to_owned()),
                ("keyword", "disk full".to_owned()),
            ]
        );

        query.keyword = Some("   ".into());
        assert!(query.to_params().iter().all(|(k, _)| *k != "keyword"));
    }
}
