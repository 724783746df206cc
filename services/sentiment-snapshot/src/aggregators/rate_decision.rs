//! Fed rate-decision heuristic
//!
//! Illustrative cut / hold / hike odds keyed on market sentiment, plus the
//! current target range and the next scheduled FOMC decision.

use chrono::{DateTime, Utc};

use crate::calendar::{next_meeting, MeetingEntry};
use crate::types::{PolicyRate, Probabilities, RateDecision, RateSource};

/// Odds used when sentiment is neutral (45 - 75) or unknown
pub const DEFAULT_PROBABILITIES: Probabilities = Probabilities::new(25, 65, 10);

/// Piecewise table keyed on the fear & greed score
pub fn probabilities_for(sentiment: Option<u8>) -> Probabilities {
    match sentiment {
        Some(s) if s < 25 => Probabilities::new(40, 55, 5),
        Some(s) if s < 45 => Probabilities::new(30, 60, 10),
        Some(s) if s > 75 => Probabilities::new(15, 70, 15),
        _ => DEFAULT_PROBABILITIES,
    }
}

/// Target range from its upper bound (ranges are 25bp wide)
pub fn policy_rate(upper: f64, source: RateSource) -> PolicyRate {
    PolicyRate {
        range: format!("{:.2}-{:.2}%", upper - 0.25, upper),
        midpoint: upper - 0.125,
        source,
    }
}

/// Everything the heuristic needs besides the clock
#[derive(Debug, Clone, Copy)]
pub struct RateInputs<'a> {
    pub sentiment: Option<u8>,
    /// Upper bound read from the rate series, when it was available
    pub series_upper: Option<f64>,
    pub fallback_upper: f64,
    pub meetings: &'a [MeetingEntry],
    pub last_decision: &'a str,
}

/// Assemble the rate-decision record; `None` only when the calendar is empty
pub fn rate_decision(inputs: &RateInputs<'_>, now: DateTime<Utc>) -> Option<RateDecision> {
    let next_meeting = next_meeting(inputs.meetings, now)?;

    let current_rate = match inputs.series_upper {
        Some(upper) => policy_rate(upper, RateSource::Series),
        None => policy_rate(inputs.fallback_upper, RateSource::Fallback),
    };

    Some(RateDecision {
        current_rate,
        next_meeting,
        probabilities: probabilities_for(inputs.sentiment),
        last_decision: inputs.last_decision.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::default_meetings;
    use chrono::TimeZone;

    #[test]
    fn test_probability_boundaries() {
        assert_eq!(probabilities_for(Some(24)), Probabilities::new(40, 55, 5));
        assert_eq!(probabilities_for(Some(25)), Probabilities::new(30, 60, 10));
        assert_eq!(probabilities_for(Some(44)), Probabilities::new(30, 60, 10));
        assert_eq!(probabilities_for(Some(45)), DEFAULT_PROBABILITIES);
        assert_eq!(probabilities_for(Some(75)), DEFAULT_PROBABILITIES);
        assert_eq!(probabilities_for(Some(76)), Probabilities::new(15, 70, 15));
        assert_eq!(probabilities_for(None), DEFAULT_PROBABILITIES);
    }

    #[test]
    fn test_zero_sentiment_is_extreme_fear() {
        assert_eq!(probabilities_for(Some(0)), Probabilities::new(40, 55, 5));
    }

    #[test]
    fn test_probabilities_always_sum_to_100() {
        for score in 0..=100u8 {
            assert_eq!(probabilities_for(Some(score)).total(), 100, "score {}", score);
        }
        assert_eq!(probabilities_for(None).total(), 100);
    }

    #[test]
    fn test_policy_rate_formatting() {
        let rate = policy_rate(4.5, RateSource::Fallback);
        assert_eq!(rate.range, "4.25-4.50%");
        assert_eq!(rate.midpoint, 4.375);

        let rate = policy_rate(4.0, RateSource::Series);
        assert_eq!(rate.range, "3.75-4.00%");
        assert_eq!(rate.midpoint, 3.875);
    }

    #[test]
    fn test_rate_decision_uses_series_when_present() {
        let meetings = default_meetings();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let inputs = RateInputs {
            sentiment: Some(80),
            series_upper: Some(4.0),
            fallback_upper: 4.5,
            meetings: &meetings,
            last_decision: "Cut 25bp",
        };

        let decision = rate_decision(&inputs, now).unwrap();
        assert_eq!(decision.current_rate.source, RateSource::Series);
        assert_eq!(decision.current_rate.range, "3.75-4.00%");
        assert_eq!(decision.probabilities, Probabilities::new(15, 70, 15));
        assert_eq!(decision.next_meeting.label, "3-4 Nov 2026");
        assert_eq!(decision.last_decision, "Cut 25bp");
    }

    #[test]
    fn test_rate_decision_falls_back() {
        let meetings = default_meetings();
        let inputs = RateInputs {
            sentiment: None,
            series_upper: None,
            fallback_upper: 4.5,
            meetings: &meetings,
            last_decision: "Cut 25bp",
        };

        let decision = rate_decision(&inputs, Utc::now()).unwrap();
        assert_eq!(decision.current_rate.source, RateSource::Fallback);
        assert_eq!(decision.current_rate.range, "4.25-4.50%");
        assert_eq!(decision.probabilities, DEFAULT_PROBABILITIES);
    }

    #[test]
    fn test_empty_calendar_has_no_decision() {
        let inputs = RateInputs {
            sentiment: Some(50),
            series_upper: Some(4.5),
            fallback_upper: 4.5,
            meetings: &[],
            last_decision: "Hold",
        };
        assert!(rate_decision(&inputs, Utc::now()).is_none());
    }
}
