const MISSING: &str = "-";

pub fn price(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}"))
}

pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:+.2}%"))
}

/// Abbreviate large magnitudes: 1.25K, 3.40M, 2.95T.
pub fn compact(value: Option<f64>) -> String {
    let Some(value) = value else {
        return MISSING.to_string();
    };

    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    let magnitude = value.abs();
    UNITS
        .iter()
        .find(|(scale, _)| magnitude >= *scale)
        .map(|(scale, unit)| format!("{:.2}{unit}", value / scale))
        .unwrap_or_else(|| format!("{value:.0}"))
}

pub fn text(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_are_stable() {
        assert_eq!(price(Some(189.844)), "189.84");
        assert_eq!(price(None), "-");
        assert_eq!(percent(Some(1.5)), "+1.50%");
        assert_eq!(percent(Some(-0.25)), "-0.25%");
        assert_eq!(compact(Some(2_950_000_000_000.0)), "2.95T");
        assert_eq!(compact(Some(52_000_000.0)), "52.00M");
        assert_eq!(compact(Some(1_250.0)), "1.25K");
        assert_eq!(compact(Some(999.0)), "999");
        assert_eq!(compact(None), "-");
        assert_eq!(text(Some("  ")), "-");
        assert_eq!(text(Some("Energy")), "Energy");
    }
}
