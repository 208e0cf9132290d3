//! 画面状態。描画は読むだけ、変更は `app::App` の dispatch 経由のみ。

use crate::consent::ConsentChoice;
use crate::history::SavedHistoryEntry;
use crate::region::{self, RegionConfig, DEFAULT_REGION_CODE, REGIONS};
use crate::scoring::{self, ResultData};
use crate::subject::{Scores, Subject, ALL_SUBJECTS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Calculator,
    Improvement,
    Compare,
    History,
}

impl Screen {
    pub const ALL: [Screen; 4] = [
        Screen::Calculator,
        Screen::Improvement,
        Screen::Compare,
        Screen::History,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Screen::Calculator => "計算",
            Screen::Improvement => "改善",
            Screen::Compare => "比較",
            Screen::History => "履歴",
        }
    }
}

/// 履歴メモの編集中バッファ。
#[derive(Clone, Debug, PartialEq)]
pub struct MemoEdit {
    pub entry_id: String,
    pub buffer: String,
}

pub struct AppState {
    pub scores: Scores,
    /// `REGIONS` のインデックス。
    pub region_idx: usize,
    pub screen: Screen,
    /// 計算画面で選択中の教科（`ALL_SUBJECTS` のインデックス）。
    pub subject_cursor: usize,
    pub compare_cursor: usize,
    pub history_cursor: usize,
    /// ストアから読んだ履歴のスナップショット（新しい順）。
    pub history: Vec<SavedHistoryEntry>,
    pub memo_edit: Option<MemoEdit>,
    /// 全削除の確認待ち。次の入力が全削除でなければ解除する。
    pub clear_pending: bool,
    /// 画面下に出す一行メッセージ。
    pub status: Option<String>,
    /// `None` は未回答（同意バナーを出す）。
    pub consent: Option<ConsentChoice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            scores: Scores::default(),
            region_idx: region::region_index(DEFAULT_REGION_CODE).unwrap_or(0),
            screen: Screen::Calculator,
            subject_cursor: 0,
            compare_cursor: 0,
            history_cursor: 0,
            history: Vec::new(),
            memo_edit: None,
            clear_pending: false,
            status: None,
            consent: None,
        }
    }

    pub fn region(&self) -> &'static RegionConfig {
        &REGIONS[self.region_idx.min(REGIONS.len() - 1)]
    }

    pub fn region_code(&self) -> &'static str {
        self.region().code
    }

    pub fn set_region(&mut self, code: &str) -> bool {
        match region::region_index(code) {
            Some(idx) => {
                self.region_idx = idx;
                true
            }
            None => false,
        }
    }

    pub fn result(&self) -> ResultData {
        scoring::result_for_config(&self.scores, self.region())
    }

    pub fn selected_subject(&self) -> Subject {
        ALL_SUBJECTS[self.subject_cursor.min(ALL_SUBJECTS.len() - 1)]
    }

    pub fn selected_history(&self) -> Option<&SavedHistoryEntry> {
        self.history.get(self.history_cursor)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// 履歴を入れ替え、カーソルを範囲内に収める。
    pub fn replace_history(&mut self, entries: Vec<SavedHistoryEntry>) {
        self.history = entries;
        if self.history_cursor >= self.history.len() {
            self.history_cursor = self.history.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_tokyo_with_default_sheet() {
        let s = AppState::new();
        assert_eq!(s.region_code(), "tokyo");
        assert_eq!(s.scores, Scores::default());
        assert_eq!(s.result().total, 39);
        assert_eq!(s.selected_subject(), Subject::Japanese);
    }

    #[test]
    fn set_region_rejects_unknown_codes() {
        let mut s = AppState::new();
        assert!(s.set_region("osaka"));
        assert_eq!(s.region_code(), "osaka");
        assert!(!s.set_region("default"));
        assert_eq!(s.region_code(), "osaka");
    }

    #[test]
    fn history_cursor_is_clamped_on_replace() {
        let mut s = AppState::new();
        s.history_cursor = 5;
        s.replace_history(Vec::new());
        assert_eq!(s.history_cursor, 0);
        assert!(s.selected_history().is_none());
    }
}
