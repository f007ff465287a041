//! Human-readable labels for microsecond durations.

/// Format a duration in microseconds for axis ticks and tooltips.
pub fn fmt_duration_us(us: u64) -> String {
    const MS: u64 = 1_000;
    const S: u64 = 1_000_000;

    if us < MS {
        format!("{us}\u{b5}s")
    } else if us < S {
        format!("{:.1}ms", us as f64 / MS as f64)
    } else {
        format!("{:.3}s", us as f64 / S as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_right_unit() {
        assert_eq!(fmt_duration_us(0), "0\u{b5}s");
        assert_eq!(fmt_duration_us(999), "999\u{b5}s");
        assert_eq!(fmt_duration_us(1_000), "1.0ms");
        assert_eq!(fmt_duration_us(45_300), "45.3ms");
        assert_eq!(fmt_duration_us(999_999), "1000.0ms");
        assert_eq!(fmt_duration_us(1_000_000), "1.000s");
        assert_eq!(fmt_duration_us(2_345_678), "2.346s");
    }
}
