//! Scoring engine. Pure functions, no IO.
//!
//! An unknown region code is not an error: it is scored with
//! [`DEFAULT_REGION`](crate::region::DEFAULT_REGION) (1:1 weighting, max 45).

use serde::Serialize;

use crate::region::{self, RegionConfig};
use crate::subject::Scores;

/// A rank bucket: reached when the percentage is at least `min_percent`.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankDefinition {
    pub code: &'static str,
    pub min_percent: u32,
    pub label: &'static str,
}

/// Strictly descending thresholds. The last entry (0%) is the catch-all.
pub static RANKS: [RankDefinition; 5] = [
    RankDefinition { code: "S", min_percent: 90, label: "最上位校も狙える水準" },
    RankDefinition { code: "A", min_percent: 80, label: "上位校が視野に入る水準" },
    RankDefinition { code: "B", min_percent: 65, label: "中堅上位校の目安" },
    RankDefinition { code: "C", min_percent: 50, label: "平均的な水準" },
    RankDefinition { code: "D", min_percent: 0, label: "まずは苦手教科の底上げを" },
];

/// Computed on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultData {
    pub total: u32,
    pub max: u32,
    pub percent: f64,
    pub rank: &'static RankDefinition,
    pub prefecture_code: &'static str,
}

/// Weighted sum for an explicit region config. Grades are clamped first.
pub fn weighted_total(scores: &Scores, config: &RegionConfig) -> u32 {
    let sum: f64 = scores
        .sanitized()
        .iter()
        .map(|(subject, grade)| grade as f64 * config.multiplier(subject.category()))
        .sum();
    sum.round() as u32
}

pub fn total_score(scores: &Scores, region_code: &str) -> u32 {
    weighted_total(scores, region::resolve(region_code))
}

pub fn max_score(region_code: &str) -> u32 {
    region::resolve(region_code).max_score
}

/// `100 × total / max`, clamped into `[0, 100]`. A zero `max` yields 0.
pub fn percent(total: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    (100.0 * total as f64 / max as f64).clamp(0.0, 100.0)
}

/// First rank (highest threshold first) whose minimum the percent reaches.
/// Out-of-range input is clamped; NaN lands in the catch-all.
pub fn rank_for(percent: f64) -> &'static RankDefinition {
    let p = if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    };
    RANKS
        .iter()
        .find(|r| p >= r.min_percent as f64)
        .unwrap_or(&RANKS[RANKS.len() - 1])
}

/// Rank directly above `rank` in threshold order, if any.
pub fn next_rank_above(rank: &RankDefinition) -> Option<&'static RankDefinition> {
    let idx = RANKS.iter().position(|r| r.code == rank.code)?;
    idx.checked_sub(1).map(|i| &RANKS[i])
}

pub fn result_for_config(scores: &Scores, config: &'static RegionConfig) -> ResultData {
    let total = weighted_total(scores, config);
    let max = config.max_score;
    let pct = percent(total, max);
    ResultData {
        total,
        max,
        percent: pct,
        rank: rank_for(pct),
        prefecture_code: config.code,
    }
}

pub fn calculate(scores: &Scores, region_code: &str) -> ResultData {
    result_for_config(scores, region::resolve(region_code))
}

/// "60.0%" style display with one decimal.
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::Subject;

    #[test]
    fn tokyo_all_threes() {
        let s = Scores::uniform(3);
        assert_eq!(total_score(&s, "tokyo"), 39);
        assert_eq!(max_score("tokyo"), 65);
        let r = calculate(&s, "tokyo");
        assert!((r.percent - 60.0).abs() < 1e-9);
        assert_eq!(r.rank.code, "C");
        assert_eq!(r.prefecture_code, "tokyo");
    }

    #[test]
    fn tokyo_all_fives_is_top_rank() {
        let r = calculate(&Scores::uniform(5), "tokyo");
        assert_eq!(r.total, 65);
        assert_eq!(r.max, 65);
        assert!((r.percent - 100.0).abs() < 1e-9);
        assert_eq!(r.rank.code, RANKS[0].code);
    }

    #[test]
    fn unknown_region_uses_default_scheme() {
        let s = Scores::uniform(3);
        assert_eq!(max_score("xx"), 45);
        assert_eq!(total_score(&s, "xx"), 27);
        let r = calculate(&s, "xx");
        assert!((r.percent - 60.0).abs() < 1e-9);
        assert_eq!(r.prefecture_code, "default");
    }

    #[test]
    fn out_of_range_grades_are_clamped_before_summing() {
        let raw = Scores {
            math: 9,
            art: 0,
            ..Scores::uniform(3)
        };
        let clamped = Scores::uniform(3).with(Subject::Math, 5).with(Subject::Art, 1);
        assert_eq!(total_score(&raw, "tokyo"), total_score(&clamped, "tokyo"));
        let overflowing = Scores {
            tech: 200,
            ..Scores::uniform(5)
        };
        assert_eq!(total_score(&overflowing, "tokyo"), 65);
        assert_eq!(total_score(&overflowing, "tokyo"), max_score("tokyo"));
    }

    #[test]
    fn half_step_multiplier_rounds() {
        // hyogo: core ×4, practical ×7.5
        let s = Scores::uniform(5).with(Subject::Music, 4);
        assert_eq!(max_score("hyogo"), 250);
        // 250 - 7.5 = 242.5 → 243
        assert_eq!(total_score(&s, "hyogo"), 243);
    }

    #[test]
    fn percent_guards_zero_max() {
        assert_eq!(percent(10, 0), 0.0);
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(200, 100), 100.0);
    }

    #[test]
    fn rank_boundaries() {
        assert_eq!(rank_for(100.0).code, "S");
        assert_eq!(rank_for(90.0).code, "S");
        assert_eq!(rank_for(89.999).code, "A");
        assert_eq!(rank_for(80.0).code, "A");
        assert_eq!(rank_for(65.0).code, "B");
        assert_eq!(rank_for(50.0).code, "C");
        assert_eq!(rank_for(49.9).code, "D");
        assert_eq!(rank_for(0.0).code, "D");
    }

    #[test]
    fn rank_for_out_of_range_and_nan() {
        assert_eq!(rank_for(-5.0).code, "D");
        assert_eq!(rank_for(250.0).code, "S");
        assert_eq!(rank_for(f64::NAN).code, "D");
    }

    #[test]
    fn ranks_strictly_descending_with_zero_catch_all() {
        for pair in RANKS.windows(2) {
            assert!(pair[0].min_percent > pair[1].min_percent);
        }
        assert_eq!(RANKS[RANKS.len() - 1].min_percent, 0);
    }

    #[test]
    fn next_rank_above_walks_up() {
        assert_eq!(next_rank_above(&RANKS[4]).map(|r| r.code), Some("C"));
        assert_eq!(next_rank_above(&RANKS[1]).map(|r| r.code), Some("S"));
        assert!(next_rank_above(&RANKS[0]).is_none());
    }

    #[test]
    fn result_serializes_camel_case() {
        let r = calculate(&Scores::uniform(3), "tokyo");
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["prefectureCode"], "tokyo");
        assert_eq!(v["rank"]["code"], "C");
        assert_eq!(v["rank"]["minPercent"], 50);
    }

    #[test]
    fn format_percent_one_decimal() {
        assert_eq!(format_percent(60.0), "60.0%");
        assert_eq!(format_percent(66.666), "66.7%");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::region::REGIONS;
    use proptest::prelude::*;

    fn arb_scores() -> impl Strategy<Value = Scores> {
        prop::array::uniform9(1i64..=5).prop_map(Scores::from_grades)
    }

    fn arb_region() -> impl Strategy<Value = &'static RegionConfig> {
        (0..REGIONS.len()).prop_map(|i| &REGIONS[i])
    }

    proptest! {
        #[test]
        fn prop_total_never_exceeds_max(s in arb_scores(), r in arb_region()) {
            prop_assert!(total_score(&s, r.code) <= max_score(r.code));
        }

        #[test]
        fn prop_total_equals_max_iff_perfect(s in arb_scores(), r in arb_region()) {
            let at_max = total_score(&s, r.code) == max_score(r.code);
            prop_assert_eq!(at_max, s.iter().all(|(_, g)| g == crate::subject::MAX_GRADE), "{} {:?}", r.code, s);
        }

        #[test]
        fn prop_percent_monotonic(max in 1u32..500, a in 0u32..500, b in 0u32..500) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(percent(lo, max) <= percent(hi, max));
        }

        #[test]
        fn prop_percent_within_bounds(total in 0u32..1000, max in 0u32..1000) {
            let p = percent(total, max);
            prop_assert!((0.0..=100.0).contains(&p));
        }

        #[test]
        fn prop_rank_for_is_total_and_exclusive(p in 0.0f64..=100.0) {
            let rank = rank_for(p);
            let matching: Vec<_> = RANKS
                .iter()
                .enumerate()
                .filter(|(i, r)| {
                    let upper = if *i == 0 { f64::INFINITY } else { RANKS[i - 1].min_percent as f64 };
                    p >= r.min_percent as f64 && p < upper
                })
                .collect();
            prop_assert_eq!(matching.len(), 1);
            prop_assert_eq!(matching[0].1.code, rank.code);
        }

        #[test]
        fn prop_raising_a_grade_never_lowers_total(
            s in arb_scores(),
            r in arb_region(),
            idx in 0usize..9,
        ) {
            let subject = crate::subject::ALL_SUBJECTS[idx];
            let raised = s.with(subject, s.get(subject) as i64 + 1);
            prop_assert!(total_score(&raised, r.code) >= total_score(&s, r.code));
        }
    }
}
