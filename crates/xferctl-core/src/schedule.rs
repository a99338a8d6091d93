//! User transfer schedule: up to five non-overlapping windows.

use crate::api::{ApiClient, ApiError, Span};

pub const MAX_SPANS: usize = 5;

/// Parse `START-END` (integers).
pub fn parse_span(text: &str) -> Result<Span, ApiError> {
    let (start, end) = text
        .trim()
        .split_once('-')
        .ok_or_else(|| ApiError::InvalidSchedule(format!("expected START-END, got {text:?}")))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<i64>()
            .map_err(|_| ApiError::InvalidSchedule(format!("not a number: {s:?}")))
    };
    Ok(Span {
        start: parse(start)?,
        end: parse(end)?,
    })
}

/// At most [`MAX_SPANS`] spans, each with `start < end`, none overlapping (bounds inclusive).
pub fn validate_spans(spans: &[Span]) -> Result<(), ApiError> {
    if spans.len() > MAX_SPANS {
        return Err(ApiError::InvalidSchedule(format!(
            "maximum number of entries is {MAX_SPANS}"
        )));
    }
    if let Some(s) = spans.iter().find(|s| s.start >= s.end) {
        return Err(ApiError::InvalidSchedule(format!(
            "start {} is not before end {}",
            s.start, s.end
        )));
    }
    for (i, a) in spans.iter().enumerate() {
        for b in &spans[i + 1..] {
            if a.start <= b.end && a.end >= b.start {
                return Err(ApiError::InvalidSchedule(format!(
                    "{}-{} overlaps {}-{}",
                    a.start, a.end, b.start, b.end
                )));
            }
        }
    }
    Ok(())
}

/// Validate locally, then replace the schedule on the service.
pub fn apply(client: &ApiClient, spans: &[Span]) -> Result<(), ApiError> {
    client.ensure_credentials()?;
    validate_spans(spans)?;
    client.put_schedule(spans)?;
    tracing::info!(spans = spans.len(), "schedule updated");
    Ok(())
}

/// Keys first, then parse each `START-END` and [`apply`].
pub fn apply_specs<S: AsRef<str>>(client: &ApiClient, specs: &[S]) -> Result<(), ApiError> {
    client.ensure_credentials()?;
    let spans = specs
        .iter()
        .map(|s| parse_span(s.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    apply(client, &spans)
}
