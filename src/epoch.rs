//! Decimal year epochs
use hifitime::{Duration, Epoch};

use crate::error::Error;

/// Validates a decimal year epoch against the earliest supported epoch.
pub fn validate(epoch: f64, min_epoch: f64) -> Result<f64, Error> {
    if epoch.is_finite() && epoch >= min_epoch {
        Ok(epoch)
    } else {
        Err(Error::InvalidEpoch(epoch, min_epoch))
    }
}

fn start_of_year(year: i32) -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(year, 1, 1)
}

/// Converts an [Epoch] to a decimal year: year plus the elapsed fraction of that year.
pub fn decimal_year(t: Epoch) -> f64 {
    let (year, _, _, _, _, _, _) = t.to_gregorian_utc();
    let start = start_of_year(year);
    let length = start_of_year(year + 1) - start;
    year as f64 + (t - start).to_seconds() / length.to_seconds()
}

/// Converts a calendar date to a decimal year (taken at midnight UTC).
pub fn decimal_year_from_date(year: i32, month: u8, day: u8) -> Result<f64, Error> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(Error::InvalidDate(year, month, day));
    }
    let t = Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0)
        .map_err(|_| Error::InvalidDate(year, month, day))?;
    Ok(decimal_year(t))
}

/// Converts a decimal year back to an [Epoch].
pub fn to_epoch(decimal_year: f64) -> Epoch {
    let year = decimal_year.floor() as i32;
    let start = start_of_year(year);
    let length = start_of_year(year + 1) - start;
    start + Duration::from_seconds((decimal_year - year as f64) * length.to_seconds())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decimal_years() {
        let t = Epoch::from_gregorian_utc_at_midnight(2010, 1, 1);
        assert_eq!(decimal_year(t), 2010.0);

        // 2020 is a leap year: July 2nd is within half a day of mid year
        let t = Epoch::from_gregorian_utc(2020, 7, 2, 0, 0, 0, 0);
        assert!((decimal_year(t) - 2020.5).abs() < 1.0 / 366.0 / 2.0 + 1.0E-9);

        let dy = decimal_year_from_date(2019, 12, 31).unwrap();
        assert!((dy - (2019.0 + 364.0 / 365.0)).abs() < 1.0E-9);
    }

    #[test]
    fn round_trip() {
        for dy in [1906.0, 1995.731, 2010.0, 2020.25, 2030.999] {
            let t = to_epoch(dy);
            assert!((decimal_year(t) - dy).abs() < 1.0E-9, "failed for {}", dy);
        }
    }

    #[test]
    fn validation() {
        assert_eq!(validate(2010.0, 1906.0), Ok(2010.0));
        assert_eq!(validate(1906.0, 1906.0), Ok(1906.0));
        assert!(validate(1905.9, 1906.0).is_err());
        assert!(validate(f64::NAN, 1906.0).is_err());
    }

    #[test]
    fn invalid_dates() {
        assert_eq!(
            decimal_year_from_date(2019, 13, 1),
            Err(Error::InvalidDate(2019, 13, 1))
        );
        assert_eq!(
            decimal_year_from_date(2019, 2, 30),
            Err(Error::InvalidDate(2019, 2, 30))
        );
        assert_eq!(
            decimal_year_from_date(2019, 0, 0),
            Err(Error::InvalidDate(2019, 0, 0))
        );
        assert_eq!(
            Error::InvalidDate(2019, 2, 30).to_string(),
            "invalid calendar date 2019-02-30"
        );
        assert!(decimal_year_from_date(2020, 2, 29).is_ok());
    }
}
