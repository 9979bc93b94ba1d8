// ── Chart series ──
//
// Both charts are re-derived from the latest unfiltered chart batch on
// every refresh: stable sort by timestamp, keep the newest points, label
// each with a short month/day.

use chrono::{DateTime, Utc};
use pulseboard_api::MetricRecord;

/// Points kept per chart.
pub const CHART_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SeriesId {
    #[strum(serialize = "Uptime %")]
    Uptime,
    #[strum(serialize = "Connected Users")]
    Users,
}

impl SeriesId {
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn value(self, record: &MetricRecord) -> f64 {
        match self {
            Self::Uptime => record.uptime,
            Self::Users => record.users_connected as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    /// Short month + day, e.g. `"Jan 1"`.
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub id: SeriesId,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn empty(id: SeriesId) -> Self {
        Self {
            id,
            points: Vec::new(),
        }
    }

    /// Project `records` into the newest [`CHART_WINDOW`] points, oldest
    /// first. Records with equal timestamps keep their input order.
    pub fn project(id: SeriesId, records: &[MetricRecord]) -> Self {
        let mut sorted: Vec<&MetricRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.timestamp);
        let skip = sorted.len().saturating_sub(CHART_WINDOW);

        let points = sorted
            .into_iter()
            .skip(skip)
            .map(|r| ChartPoint {
                timestamp: r.timestamp,
                label: r.timestamp.format("%b %-d").to_string(),
                value: id.value(r),
            })
            .collect();

        Self { id, points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(min, max)` of the values, or `None` for an empty series.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.value).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pulseboard_api::Activity;

    use super::*;

    fn record(hours: i64, uptime: f64, users: u64) -> MetricRecord {
        MetricRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hours),
            uptime,
            users_connected: users,
            activity: Activity::Normal,
        }
    }

    #[test]
    fn keeps_newest_thirty() {
        let records: Vec<_> = (0..35).map(|i| record(i, 90.0, 0)).collect();
        let series = ChartSeries::project(SeriesId::Uptime, &records);

        assert_eq!(series.points.len(), CHART_WINDOW);
        let expected: Vec<_> = records[5..].iter().map(|r| r.timestamp).collect();
        let actual: Vec<_> = series.points.iter().map(|p| p.timestamp).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn sorts_out_of_order_input() {
        let records = vec![record(5, 99.0, 3), record(1, 95.0, 1), record(3, 97.0, 2)];
        let series = ChartSeries::project(SeriesId::Users, &records);

        assert!(series.points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        let values: Vec<_> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let records = vec![record(0, 91.0, 0), record(0, 92.0, 0), record(0, 93.0, 0)];
        let series = ChartSeries::project(SeriesId::Uptime, &records);
        let values: Vec<_> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![91.0, 92.0, 93.0]);
    }

    #[test]
    fn labels_are_short_month_day() {
        let series = ChartSeries::project(SeriesId::Uptime, &[record(0, 99.0, 0)]);
        assert_eq!(series.points[0].label, "Jan 1");
        assert_eq!(SeriesId::Users.to_string(), "Connected Users");
    }

    #[test]
    fn bounds_of_empty_series() {
        assert_eq!(ChartSeries::empty(SeriesId::Users).value_bounds(), None);
        let series = ChartSeries::project(SeriesId::Uptime, &[record(0, 93.0, 0), record(1, 99.5, 0)]);
        assert_eq!(series.value_bounds(), Some((93.0, 99.5)));
    }
}
