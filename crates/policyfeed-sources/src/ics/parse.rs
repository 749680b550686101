//! ICS/iCalendar parsing.
//!
//! Only VEVENTs are read, and only their `DTSTART`, `SUMMARY`, `URL` and
//! `DESCRIPTION` properties. Events without a `DTSTART` are skipped; there is
//! no fallback to `DTEND` or any other date.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event};
use tracing::{debug, trace};

use policyfeed_core::{FallbackChain, NormalizedItem, date_only_instant};

use crate::error::{SourceError, SourceResult};
use crate::source::SourceKind;

/// Parses ICS content into items labelled with `source_url`.
///
/// # Errors
///
/// Returns an `InvalidResponse` error if the content is not an iCalendar
/// document or cannot be parsed.
pub fn parse_ics_content(ics: &str, source_url: &str) -> SourceResult<Vec<NormalizedItem>> {
    let trimmed = ics.trim_start_matches('\u{feff}').trim_start();
    if !trimmed
        .get(..15)
        .is_some_and(|head| head.eq_ignore_ascii_case("BEGIN:VCALENDAR"))
    {
        return Err(SourceError::invalid_response("not an iCalendar document"));
    }

    let calendar = trimmed.parse::<Calendar>().map_err(|e| {
        SourceError::invalid_response(format!("failed to parse ICS content: {}", e))
    })?;

    let mut skipped = 0usize;
    let items: Vec<_> = calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => {
                let item = event_item(event, source_url);
                if item.is_none() {
                    skipped += 1;
                }
                item
            }
            _ => None,
        })
        .collect();

    debug!(url = source_url, count = items.len(), skipped, "Parsed calendar events");
    Ok(items)
}

/// Converts one VEVENT, or `None` when it has no `DTSTART`.
fn event_item(event: &Event, source_url: &str) -> Option<NormalizedItem> {
    let Some(resolved) = FallbackChain::new()
        .attempt("DTSTART", || event.get_start().map(start_instant))
        .attempt("DTSTART", || {
            event
                .property_value("DTSTART")
                .and_then(bare_date)
                .map(date_only_instant)
        })
        .resolve()
    else {
        trace!(uid = ?event.get_uid(), "Skipping event without DTSTART");
        return None;
    };

    let mut item = NormalizedItem::new(
        SourceKind::Ics.category(),
        source_url,
        event.get_summary(),
        resolved.timestamp,
    );
    if let Some(url) = event.property_value("URL") {
        item = item.with_link(url);
    }
    if let Some(description) = event.get_description() {
        item = item.with_summary(description);
    }
    Some(item)
}

/// Normalizes a `DTSTART` value to a UTC instant.
///
/// Date-only values become 12:00 UTC on that date. Floating times and times
/// with an unknown `TZID` are read as UTC.
pub fn start_instant(start: DatePerhapsTime) -> DateTime<Utc> {
    match start {
        DatePerhapsTime::Date(date) => date_only_instant(date),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => dt,
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => naive.and_utc(),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            zoned_instant(date_time, &tzid)
        }
    }
}

/// A `DTSTART:20240315` written without `VALUE=DATE`.
fn bare_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y%m%d").ok()
}

fn zoned_instant(local: NaiveDateTime, tzid: &str) -> DateTime<Utc> {
    let tzid = tzid.trim().trim_matches('"');
    let Ok(tz) = tzid.parse::<Tz>() else {
        debug!(tzid, "Unknown TZID, reading local time as UTC");
        return local.and_utc();
    };

    // A local time inside a spring-forward gap does not exist; take the
    // instant one hour later, which is what the wall clock would show.
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| local.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceErrorCode;
    use policyfeed_core::{Category, UNTITLED};

    const URL: &str = "https://malegislature.gov/Events/hearings.ics";

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn calendar(events: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//Test//EN\r\n{}END:VCALENDAR\r\n",
            events
        )
    }

    #[test]
    fn parse_basic_event() {
        let ics = calendar(
            "BEGIN:VEVENT\r\n\
             UID:hearing-1@malegislature.gov\r\n\
             DTSTART:20250205T150000Z\r\n\
             DTEND:20250205T170000Z\r\n\
             SUMMARY:Joint Committee on Housing\r\n\
             URL:https://malegislature.gov/Events/Hearings/Detail/5000\r\n\
             DESCRIPTION:Bills introduced this session\r\n\
             END:VEVENT\r\n",
        );

        let items = parse_ics_content(&ics, URL).unwrap();
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.category, Category::Event);
        assert_eq!(item.source_label, URL);
        assert_eq!(item.title, "Joint Committee on Housing");
        assert_eq!(item.link, "https://malegislature.gov/Events/Hearings/Detail/5000");
        assert_eq!(item.timestamp, utc(2025, 2, 5, 15, 0, 0));
        assert_eq!(item.summary.as_deref(), Some("Bills introduced this session"));
    }

    #[test]
    fn date_only_is_noon_utc() {
        let ics = calendar(
            "BEGIN:VEVENT\r\n\
             UID:allday@example.gov\r\n\
             DTSTART;VALUE=DATE:20240315\r\n\
             SUMMARY:Session day\r\n\
             END:VEVENT\r\n",
        );

        let items = parse_ics_content(&ics, URL).unwrap();
        assert_eq!(items[0].timestamp, utc(2024, 3, 15, 12, 0, 0));
    }

    #[test]
    fn date_only_without_value_param() {
        let ics = calendar(
            "BEGIN:VEVENT\r\n\
             UID:zoned@example.gov\r\n\
             DTSTART;TZID=America/New_York:20240315T100000\r\n\
             SUMMARY:Morning hearing\r\n\
             END:VEVENT\r\n\
             BEGIN:VEVENT\r\n\
             UID:bare@example.gov\r\n\
             DTSTART:20240315\r\n\
             DTEND:20240316\r\n\
             SUMMARY:Session day\r\n\
             END:VEVENT\r\n",
        );

        let items = parse_ics_content(&ics, URL).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].timestamp, utc(2024, 3, 15, 14, 0, 0));
        assert_eq!(items[1].title, "Session day");
        assert_eq!(items[1].timestamp, utc(2024, 3, 15, 12, 0, 0));
    }

    #[test]
    fn bare_date_values() {
        assert_eq!(bare_date("20240315"), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(bare_date(" 20240315 "), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(bare_date("20240315T100000"), None);
        assert_eq!(bare_date("20241345"), None);
    }

    #[test]
    fn missing_dtstart_is_skipped() {
        let ics = calendar(
            "BEGIN:VEVENT\r\n\
             UID:nostart@example.gov\r\n\
             DTEND:20250205T170000Z\r\n\
             SUMMARY:No start\r\n\
             END:VEVENT\r\n\
             BEGIN:VEVENT\r\n\
             UID:untitled@example.gov\r\n\
             DTSTART:20250205T150000Z\r\n\
             END:VEVENT\r\n",
        );

        let items = parse_ics_content(&ics, URL).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, UNTITLED);
        assert!(!items[0].has_link());
    }

    #[test]
    fn rejects_non_calendar() {
        let err = parse_ics_content("<html>maintenance</html>", URL).unwrap_err();
        assert_eq!(err.code(), SourceErrorCode::InvalidResponse);

        let err = parse_ics_content("", URL).unwrap_err();
        assert_eq!(err.code(), SourceErrorCode::InvalidResponse);
    }

    #[test]
    fn empty_calendar() {
        let items = parse_ics_content(&calendar(""), URL).unwrap();
        assert!(items.is_empty());
    }

    mod start {
        use super::*;

        fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap()
        }

        fn with_tz(local: NaiveDateTime, tzid: &str) -> DatePerhapsTime {
            DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone {
                date_time: local,
                tzid: tzid.to_string(),
            })
        }

        #[test]
        fn named_zone() {
            assert_eq!(
                start_instant(with_tz(naive(2025, 2, 5, 10, 0), "America/New_York")),
                utc(2025, 2, 5, 15, 0, 0)
            );
            assert_eq!(
                start_instant(with_tz(naive(2025, 7, 5, 10, 0), "America/New_York")),
                utc(2025, 7, 5, 14, 0, 0)
            );
        }

        #[test]
        fn unknown_zone_is_utc() {
            assert_eq!(
                start_instant(with_tz(naive(2025, 2, 5, 10, 0), "Eastern Standard Time")),
                utc(2025, 2, 5, 10, 0, 0)
            );
        }

        #[test]
        fn floating_is_utc() {
            assert_eq!(
                start_instant(DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive(
                    2025, 2, 5, 10, 0
                )))),
                utc(2025, 2, 5, 10, 0, 0)
            );
        }

        #[test]
        fn spring_forward_gap() {
            // 02:30 does not exist in New York on 2025-03-09.
            assert_eq!(
                start_instant(with_tz(naive(2025, 3, 9, 2, 30), "America/New_York")),
                utc(2025, 3, 9, 7, 30, 0)
            );
        }

        #[test]
        fn ambiguous_takes_earliest() {
            // 01:30 happens twice in New York on 2025-11-02; the first is EDT.
            assert_eq!(
                start_instant(with_tz(naive(2025, 11, 2, 1, 30), "America/New_York")),
                utc(2025, 11, 2, 5, 30, 0)
            );
        }
    }
}
