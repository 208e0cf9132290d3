//! Improvement advice: which subject to raise next, and how far the next
//! rank is. Advisory output only; the input sheet is never modified.

use std::cmp::Ordering;

use serde::Serialize;

use crate::region;
use crate::scoring::{self, RankDefinition};
use crate::subject::{Scores, Subject, MAX_GRADE};

/// Multiplier at or above which a subject counts as heavily weighted.
pub const HIGH_WEIGHT_MULTIPLIER: f64 = 1.5;

/// Ordered so that `High < Medium < Low` sorts the most urgent first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "優先度 高",
            Priority::Medium => "優先度 中",
            Priority::Low => "優先度 低",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementSuggestion {
    pub subject: &'static str,
    pub current_grade: u8,
    pub multiplier: f64,
    pub improvement_room: u8,
    pub potential_gain: f64,
    pub priority: Priority,
    #[serde(skip)]
    pub kind: Subject,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NextRankGap {
    /// `gap` more points reach `rank`.
    Reachable {
        rank: &'static RankDefinition,
        target_total: u32,
        gap: u32,
    },
    /// Already in the top rank.
    AtTop,
}

pub fn priority_for(current_grade: u8, multiplier: f64) -> Priority {
    let heavy = multiplier >= HIGH_WEIGHT_MULTIPLIER;
    if current_grade <= 3 && heavy {
        Priority::High
    } else if current_grade <= 3 || heavy {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn compare_suggestions(a: &ImprovementSuggestion, b: &ImprovementSuggestion) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| b.potential_gain.total_cmp(&a.potential_gain))
        .then_with(|| b.multiplier.total_cmp(&a.multiplier))
        .then_with(|| a.current_grade.cmp(&b.current_grade))
}

/// Subjects with room to improve, most urgent first.
///
/// Order: priority bucket, then potential gain (descending), then higher
/// multiplier, then lower current grade. Remaining ties keep subject order.
pub fn suggest_improvements(scores: &Scores, region_code: &str) -> Vec<ImprovementSuggestion> {
    let config = region::resolve(region_code);
    let mut out: Vec<ImprovementSuggestion> = scores
        .sanitized()
        .iter()
        .filter(|(_, grade)| *grade < MAX_GRADE)
        .map(|(subject, grade)| {
            let multiplier = config.multiplier(subject.category());
            let improvement_room = MAX_GRADE - grade;
            ImprovementSuggestion {
                subject: subject.label(),
                current_grade: grade,
                multiplier,
                improvement_room,
                potential_gain: improvement_room as f64 * multiplier,
                priority: priority_for(grade, multiplier),
                kind: subject,
            }
        })
        .collect();
    out.sort_by(compare_suggestions);
    out
}

/// Points needed to reach the rank above the current one.
pub fn next_rank_gap(scores: &Scores, region_code: &str) -> NextRankGap {
    let result = scoring::calculate(scores, region_code);
    let Some(next) = scoring::next_rank_above(result.rank) else {
        return NextRankGap::AtTop;
    };
    // ceil(threshold × max / 100) in integers.
    let target_total = (next.min_percent * result.max).div_ceil(100);
    NextRankGap::Reachable {
        rank: next,
        target_total,
        gap: target_total.saturating_sub(result.total),
    }
}
