use chrono::{Days, Months, NaiveDate};

use crate::common::CoreError;
use crate::domains::users::Gender;

/// Per-request candidate criteria for discovery. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub min_age: Option<u16>,
    pub max_age: Option<u16>,
    pub gender: Option<Gender>,
    pub radius_km: Option<f64>,
}

impl CandidateFilter {
    /// Reject malformed criteria before any store access.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(min), Some(max)) = (self.min_age, self.max_age) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "min age {min} exceeds max age {max}"
                )));
            }
        }
        if let Some(radius) = self.radius_km {
            if !radius.is_finite() || radius < 0.0 {
                return Err(CoreError::Validation(format!("invalid radius: {radius}")));
            }
        }
        Ok(())
    }

    /// Resolve the age criteria to an inclusive date-of-birth window.
    ///
    /// A one-sided filter is completed with the configured bound: min-only
    /// implies `[min, default_max]`, max-only implies `[default_min, max]`.
    /// No age at all means no window. Returned as `(earliest, latest)` dob,
    /// both inclusive: a user aged exactly `min` or exactly `max` on `today`
    /// falls inside the window.
    pub fn dob_window(
        &self,
        today: NaiveDate,
        default_min_age: u16,
        default_max_age: u16,
    ) -> Option<(NaiveDate, NaiveDate)> {
        let (min_age, max_age) = match (self.min_age, self.max_age) {
            (None, None) => return None,
            (Some(min), None) => (min, default_max_age),
            (None, Some(max)) => (default_min_age, max),
            (Some(min), Some(max)) => (min, max),
        };

        // Youngest allowed: turned `min_age` no later than today.
        let latest = sub_years(today, u32::from(min_age));
        // Oldest allowed: not yet `max_age + 1`, so born after that
        // anniversary; first valid day is one day later. Widened before the
        // add so u16::MAX cannot overflow.
        let earliest = sub_years(today, u32::from(max_age) + 1)
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MIN);

        Some((earliest, latest))
    }

    /// Radius usable for spatial filtering, if one was supplied.
    pub fn positive_radius_km(&self) -> Option<f64> {
        self.radius_km.filter(|r| *r > 0.0)
    }
}

fn sub_years(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}
