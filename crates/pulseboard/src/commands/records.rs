//! Metrics and notifications table handlers.

use pulseboard_core::{CoreError, FilterCriteria, PageQuery};

use crate::cli::PageArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

/// Translate page and filter flags into a backend query.
///
/// Dates go through the same parser the TUI filter form uses, so a bad
/// date fails before any request is sent.
fn build_query(args: &PageArgs, default_per_page: u32) -> Result<PageQuery, CliError> {
    if args.page == 0 {
        return Err(CliError::Validation {
            field: "page".into(),
            reason: "pages start at 1".into(),
        });
    }
    let per_page = args.per_page.unwrap_or(default_per_page);
    if per_page == 0 {
        return Err(CliError::Validation {
            field: "per_page".into(),
            reason: "must be at least 1".into(),
        });
    }

    let criteria = FilterCriteria::from_inputs(
        args.start.as_deref().unwrap_or_default(),
        args.end.as_deref().unwrap_or_default(),
        args.keyword.as_deref().unwrap_or_default(),
    )
    .map_err(|e| match e {
        CoreError::Config { message } => CliError::Validation {
            field: "date".into(),
            reason: message,
        },
        other => other.into(),
    })?;

    Ok(criteria.query(args.page, per_page))
}

pub async fn handle_metrics(ctx: &Context, args: &PageArgs) -> Result<(), CliError> {
    let query = build_query(args, ctx.config.per_page)?;
    tracing::debug!(?query, "listing metrics");

    let page = ctx
        .client
        .list_metrics(&query)
        .await
        .map_err(CoreError::from)?;
    let out = output::render_page(ctx.format, &page, ctx.color);
    output::print_output(&out, ctx.quiet);
    Ok(())
}

pub async fn handle_notifications(ctx: &Context, args: &PageArgs) -> Result<(), CliError> {
    let query = build_query(args, ctx.config.per_page)?;
    tracing::debug!(?query, "listing notifications");

    let page = ctx
        .client
        .list_notifications(&query)
        .await
        .map_err(CoreError::from)?;
    let out = output::render_page(ctx.format, &page, ctx.color);
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn args(page: u32, start: Option<&str>, keyword: Option<&str>) -> PageArgs {
        PageArgs {
            page,
            per_page: None,
            start: start.map(Into::into),
            end: None,
            keyword: keyword.map(Into::into),
        }
    }

    #[test]
    fn query_carries_filters_and_default_page_size() {
        let query = build_query(&args(2, Some("2024-01-05"), Some(" disk ")), 10).unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(query.per_page, 10);
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(query.end_date, None);
        assert_eq!(query.keyword.as_deref(), Some("disk"));
    }

    #[test]
    fn blank_keyword_is_dropped() {
        let query = build_query(&args(1, None, Some("   ")), 10).unwrap();
        assert_eq!(query.keyword, None);
    }

    #[test]
    fn bad_date_is_a_validation_error() {
        let err = build_query(&args(1, Some("01/05/2024"), None), 10).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "date"));
    }

    #[test]
    fn page_zero_is_rejected() {
        assert!(build_query(&args(0, None, None), 10).is_err());
    }
}
