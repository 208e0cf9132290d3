//! Subjects and the nine-grade score sheet.

use serde::{Deserialize, Serialize};

pub const MIN_GRADE: u8 = 1;
pub const MAX_GRADE: u8 = 5;
/// Grade used for any subject that is missing or not a number.
pub const DEFAULT_GRADE: u8 = 3;

/// How a subject is weighted: by the region's core or practical multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// 5 academic subjects.
    Core,
    /// 4 non-academic subjects (実技教科).
    Practical,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Core => "5教科",
            Category::Practical => "実技4教科",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    Japanese,
    Math,
    English,
    Science,
    Social,
    Music,
    Art,
    PhysicalEducation,
    TechHome,
}

/// All subjects in display order: core first, then practical.
pub const ALL_SUBJECTS: [Subject; 9] = [
    Subject::Japanese,
    Subject::Math,
    Subject::English,
    Subject::Science,
    Subject::Social,
    Subject::Music,
    Subject::Art,
    Subject::PhysicalEducation,
    Subject::TechHome,
];

pub const CORE_SUBJECT_COUNT: u32 = 5;
pub const PRACTICAL_SUBJECT_COUNT: u32 = 4;

impl Subject {
    /// Key used in persisted JSON and share URLs.
    pub fn key(self) -> &'static str {
        match self {
            Subject::Japanese => "japanese",
            Subject::Math => "math",
            Subject::English => "english",
            Subject::Science => "science",
            Subject::Social => "social",
            Subject::Music => "music",
            Subject::Art => "art",
            Subject::PhysicalEducation => "pe",
            Subject::TechHome => "tech",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Subject::Japanese => "国語",
            Subject::Math => "数学",
            Subject::English => "英語",
            Subject::Science => "理科",
            Subject::Social => "社会",
            Subject::Music => "音楽",
            Subject::Art => "美術",
            Subject::PhysicalEducation => "保健体育",
            Subject::TechHome => "技術・家庭",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Subject::Japanese
            | Subject::Math
            | Subject::English
            | Subject::Science
            | Subject::Social => Category::Core,
            Subject::Music | Subject::Art | Subject::PhysicalEducation | Subject::TechHome => {
                Category::Practical
            }
        }
    }

    /// Position in [`ALL_SUBJECTS`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Clamp an integer grade into `[1, 5]`.
pub fn clamp_grade(value: i64) -> u8 {
    value.clamp(MIN_GRADE as i64, MAX_GRADE as i64) as u8
}

/// One grade per subject.
///
/// Fields are public so that deserialized or hand-built sheets can hold
/// anything; every scoring and history entry point calls [`Scores::sanitized`]
/// before using the values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scores {
    pub japanese: u8,
    pub math: u8,
    pub english: u8,
    pub science: u8,
    pub social: u8,
    pub music: u8,
    pub art: u8,
    pub pe: u8,
    pub tech: u8,
}

impl Default for Scores {
    fn default() -> Self {
        Self::uniform(DEFAULT_GRADE as i64)
    }
}

impl Scores {
    /// Every subject at the same (clamped) grade.
    pub fn uniform(grade: i64) -> Self {
        let g = clamp_grade(grade);
        Self {
            japanese: g,
            math: g,
            english: g,
            science: g,
            social: g,
            music: g,
            art: g,
            pe: g,
            tech: g,
        }
    }

    /// Build from grades in [`ALL_SUBJECTS`] order, clamping each one.
    pub fn from_grades(grades: [i64; 9]) -> Self {
        let mut scores = Self::default();
        for (subject, grade) in ALL_SUBJECTS.iter().zip(grades) {
            scores.set(*subject, grade);
        }
        scores
    }

    pub fn get(&self, subject: Subject) -> u8 {
        match subject {
            Subject::Japanese => self.japanese,
            Subject::Math => self.math,
            Subject::English => self.english,
            Subject::Science => self.science,
            Subject::Social => self.social,
            Subject::Music => self.music,
            Subject::Art => self.art,
            Subject::PhysicalEducation => self.pe,
            Subject::TechHome => self.tech,
        }
    }

    /// Set a grade, clamped into `[1, 5]`.
    pub fn set(&mut self, subject: Subject, grade: i64) {
        *self.slot_mut(subject) = clamp_grade(grade);
    }

    pub fn with(mut self, subject: Subject, grade: i64) -> Self {
        self.set(subject, grade);
        self
    }

    /// Copy with every field clamped into `[1, 5]`.
    pub fn sanitized(&self) -> Self {
        let mut out = *self;
        for subject in ALL_SUBJECTS {
            out.set(subject, self.get(subject) as i64);
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subject, u8)> + '_ {
        ALL_SUBJECTS.iter().map(move |s| (*s, self.get(*s)))
    }

    fn slot_mut(&mut self, subject: Subject) -> &mut u8 {
        match subject {
            Subject::Japanese => &mut self.japanese,
            Subject::Math => &mut self.math,
            Subject::English => &mut self.english,
            Subject::Science => &mut self.science,
            Subject::Social => &mut self.social,
            Subject::Music => &mut self.music,
            Subject::Art => &mut self.art,
            Subject::PhysicalEducation => &mut self.pe,
            Subject::TechHome => &mut self.tech,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_threes() {
        let s = Scores::default();
        assert!(s.iter().all(|(_, g)| g == 3));
    }

    #[test]
    fn set_clamps() {
        let mut s = Scores::default();
        s.set(Subject::Math, 9);
        s.set(Subject::Art, -4);
        assert_eq!(s.math, 5);
        assert_eq!(s.art, 1);
    }

    #[test]
    fn sanitized_fixes_raw_fields() {
        let raw = Scores {
            japanese: 0,
            tech: 200,
            ..Scores::default()
        };
        assert_ne!(raw.sanitized(), raw);
        let clean = raw.sanitized();
        assert!(clean.iter().all(|(_, g)| (MIN_GRADE..=MAX_GRADE).contains(&g)));
        assert_eq!(clean.japanese, 1);
        assert_eq!(clean.tech, 5);
        assert_eq!(clean.math, 3);
    }

    #[test]
    fn categories_split_five_and_four() {
        let core = ALL_SUBJECTS
            .iter()
            .filter(|s| s.category() == Category::Core)
            .count();
        let practical = ALL_SUBJECTS
            .iter()
            .filter(|s| s.category() == Category::Practical)
            .count();
        assert_eq!(core as u32, CORE_SUBJECT_COUNT);
        assert_eq!(practical as u32, PRACTICAL_SUBJECT_COUNT);
    }

    #[test]
    fn index_matches_display_order() {
        for (i, s) in ALL_SUBJECTS.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn from_grades_follows_subject_order() {
        let s = Scores::from_grades([1, 2, 3, 4, 5, 6, 0, 3, 3]);
        assert_eq!(s.japanese, 1);
        assert_eq!(s.social, 5);
        assert_eq!(s.music, 5);
        assert_eq!(s.art, 1);
    }
}
