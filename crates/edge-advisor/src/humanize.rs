//! Duration wording for notices and reports.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 365 * DAY;

/// Turns a number of seconds into operator-facing text.
pub trait Humanizer: Send + Sync {
    /// Describe `seconds` as a duration, e.g. "5 mins".
    fn humanize(&self, seconds: u64) -> String;
}

/// Picks the largest unit the duration reaches and rounds to it
/// ("5 mins", "10 mins", "5 days", "1 week", "2 months").
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanTimeDiff;

impl Humanizer for HumanTimeDiff {
    fn humanize(&self, seconds: u64) -> String {
        if seconds == 0 {
            return "0 seconds".to_string();
        }

        let (count, singular, plural) = if seconds < MINUTE {
            (seconds, "second", "seconds")
        } else if seconds < HOUR {
            (round_units(seconds, MINUTE), "min", "mins")
        } else if seconds < DAY {
            (round_units(seconds, HOUR), "hour", "hours")
        } else if seconds < WEEK {
            (round_units(seconds, DAY), "day", "days")
        } else if seconds < MONTH {
            (round_units(seconds, WEEK), "week", "weeks")
        } else if seconds < YEAR {
            (round_units(seconds, MONTH), "month", "months")
        } else {
            (round_units(seconds, YEAR), "year", "years")
        };

        format!("{} {}", count, if count == 1 { singular } else { plural })
    }
}

fn round_units(seconds: u64, unit: u64) -> u64 {
    ((seconds as f64 / unit as f64).round() as u64).max(1)
}

impl<F> Humanizer for F
where
    F: Fn(u64) -> String + Send + Sync,
{
    fn humanize(&self, seconds: u64) -> String {
        self(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(seconds: u64) -> String {
        HumanTimeDiff.humanize(seconds)
    }

    #[test]
    fn test_known_values() {
        assert_eq!(h(300), "5 mins");
        assert_eq!(h(600), "10 mins");
        assert_eq!(h(5 * DAY), "5 days");
        assert_eq!(h(WEEK), "1 week");
    }

    #[test]
    fn test_singular_and_rounding() {
        assert_eq!(h(1), "1 second");
        assert_eq!(h(45), "45 seconds");
        assert_eq!(h(60), "1 min");
        assert_eq!(h(90), "2 mins");
        assert_eq!(h(HOUR), "1 hour");
        assert_eq!(h(3 * DAY), "3 days");
        assert_eq!(h(2 * WEEK), "2 weeks");
        assert_eq!(h(MONTH), "1 month");
        assert_eq!(h(2 * YEAR), "2 years");
    }

    #[test]
    fn test_zero() {
        assert_eq!(h(0), "0 seconds");
    }

    #[test]
    fn test_closure_humanizer() {
        let raw = |s: u64| format!("{}s", s);
        assert_eq!(raw.humanize(42), "42s");
    }
}
