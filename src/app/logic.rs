//! 状態遷移（ストレージに触れないもの）。

use crate::history::{sanitize_memo, SavedHistoryEntry};
use crate::region::REGIONS;
use crate::share::SharedSheet;
use crate::subject::{ALL_SUBJECTS, MAX_GRADE, MIN_GRADE};

use super::state::{AppState, MemoEdit, Screen};

pub fn move_subject_cursor(state: &mut AppState, delta: isize) {
    state.subject_cursor = step(state.subject_cursor, delta, ALL_SUBJECTS.len());
}

pub fn move_compare_cursor(state: &mut AppState, delta: isize) {
    state.compare_cursor = step(state.compare_cursor, delta, REGIONS.len());
}

pub fn move_history_cursor(state: &mut AppState, delta: isize) {
    state.history_cursor = step(state.history_cursor, delta, state.history.len());
}

/// 範囲内で止まる（折り返さない）カーソル移動。
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

/// 選択中の教科の評定を `delta` だけ動かす。範囲外なら変えずに false。
pub fn adjust_grade(state: &mut AppState, delta: i64) -> bool {
    let subject = state.selected_subject();
    let next = state.scores.get(subject) as i64 + delta;
    if !(MIN_GRADE as i64..=MAX_GRADE as i64).contains(&next) {
        return false;
    }
    state.scores.set(subject, next);
    true
}

/// 選択中の教科に評定を直接入れ、次の教科へ進む。
pub fn enter_grade(state: &mut AppState, grade: u8) {
    let subject = state.selected_subject();
    state.scores.set(subject, grade as i64);
    move_subject_cursor(state, 1);
}

/// 都道府県を前後に切り替える（端で折り返す）。
pub fn cycle_region(state: &mut AppState, delta: isize) {
    let len = REGIONS.len() as isize;
    state.region_idx = (state.region_idx as isize + delta).rem_euclid(len) as usize;
}

pub fn reset_scores(state: &mut AppState) {
    state.scores = Default::default();
    state.subject_cursor = 0;
}

/// 履歴の1件を計算画面に読み戻す。
pub fn restore_entry(state: &mut AppState, entry: &SavedHistoryEntry) {
    state.scores = entry.scores;
    state.set_region(&entry.mode);
    state.screen = Screen::Calculator;
    state.set_status(format!("{} の履歴を読み込みました", state.region().name));
}

pub fn apply_shared_sheet(state: &mut AppState, sheet: &SharedSheet) {
    state.scores = sheet.scores;
    state.set_region(sheet.region_code);
    state.set_status("共有リンクの内申点を読み込みました");
}

pub fn begin_memo_edit(state: &mut AppState) -> bool {
    let Some(entry) = state.selected_history() else {
        return false;
    };
    state.memo_edit = Some(MemoEdit {
        entry_id: entry.id.clone(),
        buffer: entry.memo.clone().unwrap_or_default(),
    });
    true
}

/// 1文字追加。上限を超える入力は捨てる。
pub fn memo_push(state: &mut AppState, c: char, max_chars: usize) {
    if let Some(edit) = state.memo_edit.as_mut() {
        if edit.buffer.chars().count() < max_chars && !c.is_control() {
            edit.buffer.push(c);
        }
    }
}

pub fn memo_backspace(state: &mut AppState) {
    if let Some(edit) = state.memo_edit.as_mut() {
        edit.buffer.pop();
    }
}

/// 編集を終えて `(id, 正規化済みメモ)` を返す。
pub fn finish_memo_edit(state: &mut AppState, max_chars: usize) -> Option<(String, String)> {
    let edit = state.memo_edit.take()?;
    let memo = sanitize_memo(Some(&edit.buffer), max_chars).unwrap_or_default();
    Some((edit.entry_id, memo))
}
