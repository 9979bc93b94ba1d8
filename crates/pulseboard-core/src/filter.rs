// ── Table filters ──
//
// Date range plus keyword, shared by both tables. Charts never see these.

use chrono::NaiveDate;
use pulseboard_api::PageQuery;

use crate::error::CoreError;

/// Filter criteria applied to both tables.
///
/// Not validated: a reversed date range is passed through and the server
/// simply returns nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub keyword: Option<String>,
}

impl FilterCriteria {
    /// Build from raw form input. Blank fields mean "no bound".
    pub fn from_inputs(start: &str, end: &str, keyword: &str) -> Result<Self, CoreError> {
        let keyword = keyword.trim();
        Ok(Self {
            start_date: parse_date(start)?,
            end_date: parse_date(end)?,
            keyword: (!keyword.is_empty()).then(|| keyword.to_owned()),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.keyword.as_deref().is_none_or(|k| k.trim().is_empty())
    }

    /// Table query for `page`, carrying these filters.
    pub fn query(&self, page: u32, per_page: u32) -> PageQuery {
        PageQuery {
            page,
            per_page,
            start_date: self.start_date,
            end_date: self.end_date,
            keyword: self.keyword.clone(),
        }
    }

    /// One-line description for status displays, e.g.
    /// `2024-01-01 → 2024-01-31 · "disk"`.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "none".into();
        }
        let mut parts = Vec::new();
        if self.start_date.is_some() || self.end_date.is_some() {
            let fmt = |d: Option<NaiveDate>| d.map_or_else(|| "…".into(), |d| d.to_string());
            parts.push(format!("{} → {}", fmt(self.start_date), fmt(self.end_date)));
        }
        if let Some(keyword) = self.keyword.as_deref() {
            parts.push(format!("{keyword:?}"));
        }
        parts.join(" · ")
    }
}

/// Parse a `YYYY-MM-DD` date. Blank input is `Ok(None)`.
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, CoreError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| CoreError::Config {
            message: format!("invalid date {input:?} (expected YYYY-MM-DD): {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_inputs_are_unbounded() {
        let criteria = FilterCriteria::from_inputs("", "  ", " ").unwrap();
        assert!(criteria.is_empty());
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn reversed_range_is_accepted() {
        let criteria = FilterCriteria::from_inputs("2024-02-01", "2024-01-01", "login").unwrap();
        assert!(criteria.start_date > criteria.end_date);
        assert_eq!(criteria.keyword.as_deref(), Some("login"));
    }

    #[test]
    fn bad_date_is_reported() {
        assert!(parse_date("01/02/2024").is_err());
        assert_eq!(
            parse_date("2024-01-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[test]
    fn query_carries_filters() {
        let criteria = FilterCriteria::from_inputs("2024-01-01", "", "disk").unwrap();
        let query = criteria.query(3, 10);
        assert_eq!(query.page, 3);
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(query.end_date, None);
        assert_eq!(query.keyword.as_deref(), Some("disk"));
    }

    #[test]
    fn describe_summarises() {
        let criteria = FilterCriteria::from_inputs("2024-01-01", "", "disk").unwrap();
        assert_eq!(criteria.describe(), "2024-01-01 → … · \"disk\"");
        assert_eq!(FilterCriteria::default().describe(), "none");
    }
}
