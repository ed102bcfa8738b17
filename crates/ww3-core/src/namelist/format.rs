//! Literal renderers for the value kinds namelists accept.

use crate::domain::DATE_FORMAT;
use chrono::NaiveDateTime;
use std::fmt::Display;

pub fn fortran_flag(value: bool) -> &'static str {
    if value { "T" } else { "F" }
}

pub fn fortran_flag_lower(value: bool) -> &'static str {
    if value { "t" } else { "f" }
}

/// Shortest round-trip decimal, keeping a `.0` on integral values so the
/// field still reads as REAL.
pub fn format_real(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1.0e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn join_words<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|word| word.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn join_values<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{
        format_real, format_timestamp, fortran_flag, fortran_flag_lower, join_values, join_words,
    };
    use chrono::NaiveDate;

    #[test]
    fn flags_render_in_each_namelist_dialect() {
        assert_eq!(fortran_flag(true), "T");
        assert_eq!(fortran_flag(false), "F");
        assert_eq!(fortran_flag_lower(true), "t");
        assert_eq!(fortran_flag_lower(false), "f");
    }

    #[test]
    fn reals_keep_a_decimal_point() {
        assert_eq!(format_real(480.0), "480.0");
        assert_eq!(format_real(0.0), "0.0");
        assert_eq!(format_real(1.1), "1.1");
        assert_eq!(format_real(0.04118), "0.04118");
        assert_eq!(format_real(-0.1), "-0.1");
    }

    #[test]
    fn timestamps_use_namelist_layout() {
        let stamp = NaiveDate::from_ymd_opt(2010, 1, 1)
            .unwrap()
            .and_hms_opt(2, 0, 0)
            .unwrap();
        assert_eq!(format_timestamp(&stamp), "20100101 020000");
    }

    #[test]
    fn lists_join_with_single_spaces() {
        assert_eq!(join_words(&["HS", "FP", "DIR"]), "HS FP DIR");
        assert_eq!(join_values(&[0, 1, 2, 3]), "0 1 2 3");
        assert_eq!(join_words::<&str>(&[]), "");
    }
}
