//! Shareable links: the sheet packed into `?p=<region>&s=<9 digits>`.
//!
//! Digits follow the fixed subject order (国語, 数学, 英語, 理科, 社会,
//! 音楽, 美術, 保健体育, 技術・家庭). Decoding is lenient so that a
//! hand-edited or truncated link still opens.

use crate::region::{self, DEFAULT_REGION_CODE};
use crate::scoring::{format_percent, ResultData};
use crate::subject::{Scores, ALL_SUBJECTS, DEFAULT_GRADE};

/// A sheet restored from a share link.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedSheet {
    pub region_code: &'static str,
    pub scores: Scores,
}

/// `"333333333"` for all threes.
pub fn encode_scores(scores: &Scores) -> String {
    scores
        .sanitized()
        .iter()
        .map(|(_, g)| char::from(b'0' + g))
        .collect()
}

/// Missing or non-digit positions fall back to 3, out-of-range digits are
/// clamped, anything past the ninth character is ignored.
pub fn decode_scores(digits: &str) -> Scores {
    let mut chars = digits.trim().chars();
    let grades = ALL_SUBJECTS.map(|_| {
        chars
            .next()
            .and_then(|c| c.to_digit(10))
            .map_or(DEFAULT_GRADE as i64, i64::from)
    });
    Scores::from_grades(grades)
}

/// `?p=tokyo&s=333333333`
pub fn share_query(region_code: &str, scores: &Scores) -> String {
    format!("?p={}&s={}", region::resolve_known(region_code), encode_scores(scores))
}

/// Read a `location.search` string. `None` when it carries neither `p` nor
/// `s`; an unknown region falls back to the default one.
pub fn parse_share_query(search: &str) -> Option<SharedSheet> {
    let mut region_param = None;
    let mut scores_param = None;
    for pair in search.trim_start_matches('?').split('&') {
        match pair.split_once('=') {
            Some(("p", v)) => region_param = Some(v),
            Some(("s", v)) => scores_param = Some(v),
            _ => {}
        }
    }
    if region_param.is_none() && scores_param.is_none() {
        return None;
    }
    Some(SharedSheet {
        region_code: region::resolve_known(region_param.unwrap_or(DEFAULT_REGION_CODE)),
        scores: scores_param.map(decode_scores).unwrap_or_default(),
    })
}

/// One-line summary for pasting into a message.
pub fn share_text(result: &ResultData) -> String {
    let name = region::resolve(result.prefecture_code).name;
    format!(
        "【内申点】{name}方式で {} / {} 点（{}）ランク{}：{}",
        result.total,
        result.max,
        format_percent(result.percent),
        result.rank.code,
        result.rank.label
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::calculate;
    use crate::subject::Subject;

    #[test]
    fn encode_follows_subject_order() {
        let s = Scores::uniform(3)
            .with(Subject::Japanese, 5)
            .with(Subject::TechHome, 1);
        assert_eq!(encode_scores(&s), "533333331");
    }

    #[test]
    fn decode_is_lenient() {
        assert_eq!(decode_scores("555555555"), Scores::uniform(5));
        assert_eq!(decode_scores(""), Scores::default());
        assert_eq!(decode_scores("5x"), Scores::default().with(Subject::Japanese, 5));
        assert_eq!(decode_scores("09"), Scores::default().with(Subject::Japanese, 1).with(Subject::Math, 5));
        assert_eq!(decode_scores("4444444449999"), Scores::uniform(4));
    }

    #[test]
    fn decode_inverts_encode() {
        let s = Scores::from_grades([1, 2, 3, 4, 5, 4, 3, 2, 1]);
        assert_eq!(decode_scores(&encode_scores(&s)), s);
    }

    #[test]
    fn query_roundtrip() {
        let s = Scores::uniform(4);
        let q = share_query("osaka", &s);
        assert_eq!(q, "?p=osaka&s=444444444");
        assert_eq!(
            parse_share_query(&q),
            Some(SharedSheet {
                region_code: "osaka",
                scores: s
            })
        );
    }

    #[test]
    fn query_with_unknown_region_falls_back() {
        let sheet = parse_share_query("?s=555555555&p=atlantis&utm=x").unwrap();
        assert_eq!(sheet.region_code, DEFAULT_REGION_CODE);
        assert_eq!(sheet.scores, Scores::uniform(5));
        assert_eq!(share_query("atlantis", &Scores::default()), "?p=tokyo&s=333333333");
    }

    #[test]
    fn query_without_params_is_none() {
        assert_eq!(parse_share_query(""), None);
        assert_eq!(parse_share_query("?utm_source=x"), None);
    }

    #[test]
    fn region_only_query_uses_default_sheet() {
        let sheet = parse_share_query("?p=hokkaido").unwrap();
        assert_eq!(sheet.region_code, "hokkaido");
        assert_eq!(sheet.scores, Scores::default());
    }

    #[test]
    fn text_mentions_total_and_rank() {
        let text = share_text(&calculate(&Scores::uniform(3), "tokyo"));
        assert!(text.contains("東京都方式"), "{text}");
        assert!(text.contains("39 / 65"), "{text}");
        assert!(text.contains("60.0%"), "{text}");
        assert!(text.contains("ランクC"), "{text}");
    }
}
