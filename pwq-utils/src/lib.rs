//! Shared utility functions for PWQ crates.

/// Numeric helpers shared by the predictor and the interpolator
pub mod numeric {
    /// Round to `places` decimal places, halves rounding away from zero.
    pub fn round_to(value: f64, places: i32) -> f64 {
        let factor = 10f64.powi(places);
        (value * factor).round() / factor
    }

    /// Round to hundredths, the precision every reported parameter uses.
    pub fn round2(value: f64) -> f64 {
        round_to(value, 2)
    }

    /// Median of a set of values. Even-length inputs average the two middle values.
    ///
    /// Returns `None` for an empty slice.
    pub fn median(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Some(sorted[mid])
        }
    }

    /// Linear blend between `from` (t = 0) and `to` (t = 1).
    pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
        (1.0 - t) * from + t * to
    }

}

/// Month and calendar helpers
pub mod dates {
    use chrono::{Datelike, Months, NaiveDate};

    const MONTH_NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    /// Parse a month given as a number ("6") or an English name ("June", "jun").
    pub fn parse_month(s: &str) -> anyhow::Result<u32> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u32>() {
            if (1..=12).contains(&n) {
                return Ok(n);
            }
            anyhow::bail!("month out of range: {}", n);
        }
        let lowered = trimmed.to_lowercase();
        MONTH_NAMES
            .iter()
            .position(|name| {
                let name = name.to_lowercase();
                name == lowered || (lowered.len() == 3 && name.starts_with(&lowered))
            })
            .map(|idx| idx as u32 + 1)
            .ok_or_else(|| anyhow::anyhow!("unrecognized month: {}", s))
    }

    /// Full English name of a month (1-12).
    pub fn month_name(month: u32) -> Option<&'static str> {
        MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
    }

    /// Three-letter label of a month (1-12), e.g. "Jun".
    pub fn short_month_name(month: u32) -> Option<&'static str> {
        month_name(month).map(|name| &name[..3])
    }

    /// The first day of each of the `months` calendar months ending with the
    /// month containing `end`, oldest first.
    pub fn month_window(end: &NaiveDate, months: u32) -> Vec<NaiveDate> {
        let Some(first) = end.with_day(1) else {
            return Vec::new();
        };
        (0..months)
            .rev()
            .filter_map(|back| first.checked_sub_months(Months::new(back)))
            .collect()
    }

}
