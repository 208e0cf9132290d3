//! Cross-region comparison: the same nine grades scored under every
//! prefecture's weighting.

use serde::Serialize;

use crate::region::REGIONS;
use crate::scoring::{percent, weighted_total};
use crate::subject::Scores;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionComparison {
    pub code: &'static str,
    pub name: &'static str,
    pub total: u32,
    pub max: u32,
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    /// Every registered region once, highest percent first.
    pub rows: Vec<RegionComparison>,
    /// 1-based position of the current region in `rows`, `None` when the
    /// code is not registered.
    pub current_position: Option<usize>,
}

impl ComparisonReport {
    pub fn current_row(&self) -> Option<&RegionComparison> {
        self.current_position.map(|p| &self.rows[p - 1])
    }
}

/// Score `scores` under every region, sorted by descending percent.
/// Ties keep registry order (stable sort).
pub fn compare_all_regions(scores: &Scores, current_code: &str) -> ComparisonReport {
    let mut rows: Vec<RegionComparison> = REGIONS
        .iter()
        .map(|r| {
            let total = weighted_total(scores, r);
            RegionComparison {
                code: r.code,
                name: r.name,
                total,
                max: r.max_score,
                percent: percent(total, r.max_score),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.percent.total_cmp(&a.percent));

    let current_position = rows
        .iter()
        .position(|row| row.code == current_code)
        .map(|i| i + 1);

    ComparisonReport {
        rows,
        current_position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::Subject;

    #[test]
    fn uniform_grades_tie_in_registry_order() {
        let report = compare_all_regions(&Scores::uniform(3), "tokyo");
        assert_eq!(report.rows.len(), REGIONS.len());
        // every region gives 60% for all threes, so the order is the registry order
        for (row, region) in report.rows.iter().zip(REGIONS.iter()) {
            assert_eq!(row.code, region.code);
            assert!((row.percent - 60.0).abs() < 1e-9);
        }
        assert_eq!(report.current_position, Some(13));
        assert_eq!(report.current_row().map(|r| r.code), Some("tokyo"));
    }

    #[test]
    fn practical_heavy_regions_rise_with_strong_practicals() {
        let s = Scores::uniform(2)
            .with(Subject::Music, 5)
            .with(Subject::Art, 5)
            .with(Subject::PhysicalEducation, 5)
            .with(Subject::TechHome, 5);
        let report = compare_all_regions(&s, "tokyo");
        // regions weighting practicals 2:1 tie at the top (200/260 = 50/65);
        // miyagi comes first in registry order
        assert_eq!(report.rows[0].code, "miyagi");
        assert!((report.rows[0].percent - report.current_row().unwrap().percent).abs() < 1e-12);
        let tokyo_pos = report.current_position.unwrap();
        let equal_pos = report.rows.iter().position(|r| r.code == "aomori").unwrap() + 1;
        assert!(tokyo_pos < equal_pos);
    }

    #[test]
    fn unknown_current_region_has_no_position() {
        let report = compare_all_regions(&Scores::default(), "xx");
        assert_eq!(report.current_position, None);
        assert!(report.current_row().is_none());
        assert!(report.rows.iter().all(|r| r.code != "default"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    proptest! {
        #[test]
        fn prop_every_region_once_sorted_desc(
            grades in prop::array::uniform9(1i64..=5),
            idx in 0..REGIONS.len(),
        ) {
            let current = REGIONS[idx].code;
            let report = compare_all_regions(&Scores::from_grades(grades), current);

            let codes: HashSet<_> = report.rows.iter().map(|r| r.code).collect();
            prop_assert_eq!(codes.len(), REGIONS.len());
            prop_assert_eq!(report.rows.len(), REGIONS.len());

            for pair in report.rows.windows(2) {
                prop_assert!(pair[0].percent >= pair[1].percent);
            }

            let pos = report.current_position.unwrap();
            prop_assert_eq!(report.rows[pos - 1].code, current);
        }
    }
}
