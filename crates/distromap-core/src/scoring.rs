//! Confidence scoring from match cardinality.

/// Confidence of a hand-curated override.
pub const OVERRIDE_CONFIDENCE: f64 = 1.0;

/// Confidence when exactly one eligible category holds the name.
pub const SINGLE_MATCH_CONFIDENCE: f64 = 0.8;

/// Score a match chosen among `candidates` equally plausible categories.
///
/// confidence = 0 (none) | 0.8 (one) | round(1 / n, 3) (n ≥ 2)
pub fn confidence_for(candidates: usize) -> f64 {
    match candidates {
        0 => 0.0,
        1 => SINGLE_MATCH_CONFIDENCE,
        n => round_to(1.0 / n as f64, 3),
    }
}

/// Round the exact binary value of `value` to `places` decimals, ties to even.
///
/// Decimal formatting works on the exact value, so 1/80 (stored slightly
/// above 0.0125) rounds up while 1/16 (exactly 0.0625) rounds to even.
fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_candidates_is_zero() {
        assert_eq!(confidence_for(0), 0.0);
    }

    #[test]
    fn single_candidate() {
        assert_eq!(confidence_for(1), 0.8);
    }

    #[test]
    fn degrades_with_ambiguity() {
        assert_eq!(confidence_for(2), 0.5);
        assert_eq!(confidence_for(3), 0.333);
        assert_eq!(confidence_for(4), 0.25);
        assert_eq!(confidence_for(6), 0.167);
        assert_eq!(confidence_for(7), 0.143);
        assert_eq!(confidence_for(80), 0.013);
        assert_eq!(confidence_for(200), 0.005);
    }

    #[test]
    fn exact_half_rounds_to_even() {
        // 1/16 = 0.0625 exactly
        assert_eq!(confidence_for(16), 0.062);
    }

    #[test]
    fn always_within_unit_interval() {
        for n in 0..200 {
            let c = confidence_for(n);
            assert!((0.0..=1.0).contains(&c), "confidence {c} for {n} candidates");
        }
    }
}
