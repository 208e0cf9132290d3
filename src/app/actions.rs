//! クリック領域の action ID。

// ── タブ ─────────────────────────────────────────────────────
pub const TAB_CALCULATOR: u16 = 1;
pub const TAB_IMPROVEMENT: u16 = 2;
pub const TAB_COMPARE: u16 = 3;
pub const TAB_HISTORY: u16 = 4;

// ── 計算画面 ─────────────────────────────────────────────────
pub const SUBJECT_BASE: u16 = 10; // +index 0..8
pub const GRADE_UP: u16 = 20;
pub const GRADE_DOWN: u16 = 21;
pub const REGION_PREV: u16 = 22;
pub const REGION_NEXT: u16 = 23;
pub const SAVE_HISTORY: u16 = 24;
pub const RESET_SCORES: u16 = 25;
pub const SHARE: u16 = 26;

// ── 改善画面 ─────────────────────────────────────────────────
pub const SUGGESTION_BASE: u16 = 30; // +index 0..8

// ── 比較画面 ─────────────────────────────────────────────────
pub const COMPARE_UP: u16 = 40;
pub const COMPARE_DOWN: u16 = 41;
pub const COMPARE_ROW_BASE: u16 = 100; // +index 0..46

// ── 履歴画面 ─────────────────────────────────────────────────
pub const HISTORY_RESTORE: u16 = 50;
pub const HISTORY_EDIT_MEMO: u16 = 51;
pub const HISTORY_DELETE: u16 = 52;
pub const HISTORY_CLEAR: u16 = 53;
pub const MEMO_SAVE: u16 = 54;
pub const MEMO_CANCEL: u16 = 55;
pub const HISTORY_ROW_BASE: u16 = 200; // +index 0..29

// ── 同意バナー ───────────────────────────────────────────────
pub const CONSENT_ACCEPT: u16 = 60;
pub const CONSENT_REJECT: u16 = 61;
