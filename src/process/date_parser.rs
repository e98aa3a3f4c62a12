use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{LoadError, Result};

/// `m/d/yyyy h:mm`, optionally padded with whitespace.
static RE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([0-9]+)/([0-9]+)/([0-9]+)\s+([0-9]+):([0-9]+)\s*$")
        .expect("date regex should compile")
});

/// Zero point for `publish_time`: midnight 1 Jan 1970 on the wall clock.
static EPOCH_REFERENCE: Lazy<NaiveDateTime> = Lazy::new(|| {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("reference date is valid")
});

/// Parse `"m/d/yyyy h:mm"` into a naive wall-clock time.
fn parse_naive(text: &str) -> Result<NaiveDateTime> {
    let malformed = || LoadError::MalformedTimestamp {
        text: text.to_string(),
    };
    let caps = RE_DATE.captures(text).ok_or_else(malformed)?;

    let mut groups = [0u32; 5];
    for (slot, i) in groups.iter_mut().zip(1..=5usize) {
        *slot = caps[i].parse().map_err(|_| malformed())?;
    }
    let [month, day, year, hour, minute] = groups;

    let year = i32::try_from(year).map_err(|_| malformed())?;
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(malformed)
}

fn canonical(dt: &NaiveDateTime) -> String {
    format!(
        "{}/{:02}/{:02} {:02}:{:02}",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute()
    )
}

/// `"m/d/yyyy h:mm"` → `"yyyy/mm/dd hh:mm"`, nothing else.
pub fn reformat_date(text: &str) -> Result<String> {
    parse_naive(text).map(|dt| canonical(&dt))
}

/// Reformat like [`reformat_date`] and also derive `publish_time`: whole
/// seconds from the epoch reference to the given wall-clock time, shifted by
/// `tz_offset_hours`.
pub fn convert_date(text: &str, tz_offset_hours: f64) -> Result<(String, i64)> {
    let dt = parse_naive(text)?;
    let since_reference = (dt - *EPOCH_REFERENCE).num_seconds() as f64;
    let publish_time = (since_reference + 3600.0 * tz_offset_hours).round() as i64;
    Ok((canonical(&dt), publish_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reformat_pads_every_field() {
        assert_eq!(reformat_date("1/2/2020 5:30").unwrap(), "2020/01/02 05:30");
        assert_eq!(
            reformat_date("  12/31/2017 23:59 ").unwrap(),
            "2017/12/31 23:59"
        );
        assert_eq!(reformat_date("07/04/2016\t0:05").unwrap(), "2016/07/04 00:05");
    }

    #[test]
    fn publish_time_counts_seconds_from_1970() {
        let (s, t) = convert_date("1/2/2020 5:30", 0.0).unwrap();
        assert_eq!(s, "2020/01/02 05:30");
        assert_eq!(t, 1_577_943_000);

        let (_, zero) = convert_date("1/1/1970 0:00", 0.0).unwrap();
        assert_eq!(zero, 0);
    }

    #[test]
    fn one_hour_apart_is_3600_seconds() {
        let (_, a) = convert_date("3/11/2018 1:15", 0.0).unwrap();
        let (_, b) = convert_date("3/11/2018 2:15", 0.0).unwrap();
        assert_eq!(b - a, 3600);
    }

    #[test]
    fn tz_offset_shifts_by_whole_hours() {
        let (_, utc) = convert_date("6/15/2017 12:00", 0.0).unwrap();
        let (_, plus_one) = convert_date("6/15/2017 12:00", 1.0).unwrap();
        let (_, minus_half) = convert_date("6/15/2017 12:00", -0.5).unwrap();
        assert_eq!(plus_one - utc, 3600);
        assert_eq!(minus_half - utc, -1800);
    }

    #[test]
    fn full_and_reformat_modes_agree() {
        for s in ["2/28/2016 9:07", "10/10/2010 10:10", "1/1/2000 0:00"] {
            assert_eq!(convert_date(s, 0.0).unwrap().0, reformat_date(s).unwrap());
        }
    }

    #[test]
    fn malformed_strings_are_rejected() {
        for bad in [
            "",
            "1/2/2020 530",
            "1/2/2020",
            "a/2/2020 5:30",
            "1/2/2020 5:30 PM",
            "1/2/2020 5:30:00",
            "1-2-2020 5:30",
            "1/2/20205:30",
            "13/1/2020 5:30",
            "2/30/2020 5:30",
            "1/2/2020 24:00",
            "1/2/99999999999 5:30",
        ] {
            match reformat_date(bad) {
                Err(LoadError::MalformedTimestamp { text }) => assert_eq!(text, bad),
                other => panic!("{bad:?} should be malformed, got {other:?}"),
            }
            assert!(convert_date(bad, 0.0).is_err());
        }
    }
}
