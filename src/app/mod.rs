//! 内申点計算アプリ本体: 入力の dispatch と永続化の呼び出し。

pub mod actions;
pub mod logic;
pub mod render;
pub mod state;

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::analyzer;
use crate::config::{self, UserSettings};
use crate::consent::{self, ConsentChoice};
use crate::history::{AppendRequest, HistoryStore};
use crate::input::{ClickState, InputEvent};
use crate::share;
use crate::storage::StoragePort;

use actions::*;
use state::{AppState, Screen};

pub struct App {
    pub state: AppState,
    history: HistoryStore<Box<dyn StoragePort>>,
}

impl App {
    /// 設定・履歴・同意状態を読み込んで起動する。
    pub fn new(storage: Box<dyn StoragePort>) -> Self {
        let settings = config::load_settings(&storage);
        let history_config = config::load_history_config(&storage);
        let history = HistoryStore::with_config(storage, history_config);

        let mut state = AppState::new();
        state.set_region(&settings.region_code);
        state.replace_history(history.read());
        state.consent = consent::read_consent();

        Self { state, history }
    }

    /// `location.search` に共有パラメータがあれば反映する。
    pub fn apply_share_query(&mut self, search: &str) -> bool {
        match share::parse_share_query(search) {
            Some(sheet) => {
                logic::apply_shared_sheet(&mut self.state, &sheet);
                true
            }
            None => false,
        }
    }

    pub fn history(&self) -> &HistoryStore<Box<dyn StoragePort>> {
        &self.history
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let confirming_clear = std::mem::take(&mut self.state.clear_pending);
        if self.state.memo_edit.is_some() {
            return self.handle_memo_input(event);
        }
        match *event {
            InputEvent::Click(HISTORY_CLEAR) => self.request_clear(confirming_clear),
            InputEvent::Key('x') if self.state.screen == Screen::History => {
                self.request_clear(confirming_clear)
            }
            InputEvent::Click(id) => self.handle_click(id),
            InputEvent::Key(c) => self.handle_key(c),
            InputEvent::Esc if self.state.screen != Screen::Calculator => {
                self.switch_screen(Screen::Calculator);
                true
            }
            _ => self.handle_navigation(event),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, f, area, click_state);
    }

    fn switch_screen(&mut self, screen: Screen) {
        if screen == Screen::History {
            self.reload_history();
        }
        self.state.screen = screen;
        self.state.status = None;
    }

    fn reload_history(&mut self) {
        self.state.replace_history(self.history.read());
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        match action_id {
            TAB_CALCULATOR => self.switch_screen(Screen::Calculator),
            TAB_IMPROVEMENT => self.switch_screen(Screen::Improvement),
            TAB_COMPARE => self.switch_screen(Screen::Compare),
            TAB_HISTORY => self.switch_screen(Screen::History),
            CONSENT_ACCEPT => self.record_consent(ConsentChoice::Accepted),
            CONSENT_REJECT => self.record_consent(ConsentChoice::Rejected),

            id if (SUBJECT_BASE..SUBJECT_BASE + 9).contains(&id) => {
                self.state.subject_cursor = (id - SUBJECT_BASE) as usize;
            }
            GRADE_UP => {
                logic::adjust_grade(&mut self.state, 1);
            }
            GRADE_DOWN => {
                logic::adjust_grade(&mut self.state, -1);
            }
            REGION_PREV => self.cycle_region(-1),
            REGION_NEXT => self.cycle_region(1),
            SAVE_HISTORY => self.save_to_history(),
            RESET_SCORES => logic::reset_scores(&mut self.state),
            SHARE => self.show_share(),

            id if (SUGGESTION_BASE..SUGGESTION_BASE + 9).contains(&id) => {
                return self.focus_suggestion((id - SUGGESTION_BASE) as usize);
            }

            COMPARE_UP => logic::move_compare_cursor(&mut self.state, -1),
            COMPARE_DOWN => logic::move_compare_cursor(&mut self.state, 1),
            id if (COMPARE_ROW_BASE..COMPARE_ROW_BASE + 47).contains(&id) => {
                self.state.compare_cursor = (id - COMPARE_ROW_BASE) as usize;
                self.select_compared_region();
            }

            id if self.history_row_ids().contains(&id) => {
                let idx = (id - HISTORY_ROW_BASE) as usize;
                if idx >= self.state.history.len() {
                    return false;
                }
                self.state.history_cursor = idx;
            }
            HISTORY_RESTORE => return self.restore_selected(),
            HISTORY_EDIT_MEMO => return logic::begin_memo_edit(&mut self.state),
            HISTORY_DELETE => return self.delete_selected(),
            _ => return false,
        }
        true
    }

    fn handle_key(&mut self, key: char) -> bool {
        let action = match key {
            'c' => Some(TAB_CALCULATOR),
            'a' => Some(TAB_IMPROVEMENT),
            'v' => Some(TAB_COMPARE),
            'h' => Some(TAB_HISTORY),
            'y' if self.state.consent.is_none() => Some(CONSENT_ACCEPT),
            'n' if self.state.consent.is_none() => Some(CONSENT_REJECT),
            _ => None,
        };
        if let Some(id) = action {
            return self.handle_click(id);
        }

        match self.state.screen {
            Screen::Calculator => match key {
                '1'..='5' => {
                    logic::enter_grade(&mut self.state, key as u8 - b'0');
                    true
                }
                '+' | '=' => self.handle_click(GRADE_UP),
                '-' => self.handle_click(GRADE_DOWN),
                '<' | ',' => self.handle_click(REGION_PREV),
                '>' | '.' => self.handle_click(REGION_NEXT),
                's' => self.handle_click(SAVE_HISTORY),
                'x' => self.handle_click(RESET_SCORES),
                'l' => self.handle_click(SHARE),
                _ => false,
            },
            Screen::Improvement => match key.to_digit(10) {
                Some(d @ 1..=9) => self.handle_click(SUGGESTION_BASE + d as u16 - 1),
                _ => false,
            },
            Screen::Compare => false,
            Screen::History => match key {
                'r' => self.handle_click(HISTORY_RESTORE),
                'e' => self.handle_click(HISTORY_EDIT_MEMO),
                'd' => self.handle_click(HISTORY_DELETE),
                _ => false,
            },
        }
    }

    fn handle_navigation(&mut self, event: &InputEvent) -> bool {
        let delta = match event {
            InputEvent::Up => -1,
            InputEvent::Down => 1,
            _ => 0,
        };
        match (self.state.screen, event) {
            (Screen::Calculator, InputEvent::Up | InputEvent::Down) => {
                logic::move_subject_cursor(&mut self.state, delta);
                true
            }
            (Screen::Calculator, InputEvent::Right) => self.handle_click(GRADE_UP),
            (Screen::Calculator, InputEvent::Left) => self.handle_click(GRADE_DOWN),
            (Screen::Calculator, InputEvent::Enter) => self.handle_click(SAVE_HISTORY),
            (Screen::Compare, InputEvent::Up | InputEvent::Down) => {
                logic::move_compare_cursor(&mut self.state, delta);
                true
            }
            (Screen::Compare, InputEvent::Enter) => {
                self.select_compared_region();
                true
            }
            (Screen::History, InputEvent::Up | InputEvent::Down) => {
                logic::move_history_cursor(&mut self.state, delta);
                true
            }
            (Screen::History, InputEvent::Enter) => self.restore_selected(),
            _ => false,
        }
    }

    fn handle_memo_input(&mut self, event: &InputEvent) -> bool {
        let max_chars = self.history.config().memo_max_chars;
        match *event {
            InputEvent::Key(c) => logic::memo_push(&mut self.state, c, max_chars),
            InputEvent::Backspace => logic::memo_backspace(&mut self.state),
            InputEvent::Enter | InputEvent::Click(MEMO_SAVE) => self.commit_memo(),
            InputEvent::Esc | InputEvent::Click(MEMO_CANCEL) => {
                self.state.memo_edit = None;
            }
            _ => return false,
        }
        true
    }

    fn commit_memo(&mut self) {
        let max_chars = self.history.config().memo_max_chars;
        let Some((id, memo)) = logic::finish_memo_edit(&mut self.state, max_chars) else {
            return;
        };
        match self.history.update_memo(&id, &memo) {
            Some(_) => self.state.set_status("メモを保存しました"),
            None => self.state.set_status("メモを保存できませんでした"),
        }
        self.reload_history();
    }

    fn cycle_region(&mut self, delta: isize) {
        logic::cycle_region(&mut self.state, delta);
        let settings = UserSettings {
            region_code: self.state.region_code().to_string(),
        };
        config::save_settings(self.history.storage(), &settings);
    }

    fn select_compared_region(&mut self) {
        let report = crate::compare::compare_all_regions(&self.state.scores, self.state.region_code());
        if let Some(row) = report.rows.get(self.state.compare_cursor) {
            self.state.set_region(row.code);
            let settings = UserSettings {
                region_code: row.code.to_string(),
            };
            config::save_settings(self.history.storage(), &settings);
            self.state.set_status(format!("{} 方式に切り替えました", row.name));
        }
    }

    fn save_to_history(&mut self) {
        let request = AppendRequest::new(self.state.region_code(), self.state.scores);
        match self.history.append(request) {
            Some(_) => self.state.set_status("履歴に保存しました"),
            None => self.state.set_status("履歴を保存できませんでした（ストレージが使えません）"),
        }
        self.reload_history();
    }

    fn show_share(&mut self) {
        let result = self.state.result();
        let text = share::share_text(&result);
        let query = share::share_query(self.state.region_code(), &self.state.scores);
        self.state.set_status(format!("{text} {query}"));
    }

    fn focus_suggestion(&mut self, index: usize) -> bool {
        let suggestions = analyzer::suggest_improvements(&self.state.scores, self.state.region_code());
        let Some(suggestion) = suggestions.get(index) else {
            return false;
        };
        self.state.subject_cursor = suggestion.kind.index();
        self.state.screen = Screen::Calculator;
        self.state.set_status(format!(
            "{} を上げると最大 +{} 点",
            suggestion.subject, suggestion.potential_gain
        ));
        true
    }

    fn restore_selected(&mut self) -> bool {
        let Some(entry) = self.state.selected_history().cloned() else {
            return false;
        };
        logic::restore_entry(&mut self.state, &entry);
        true
    }

    fn delete_selected(&mut self) -> bool {
        let Some(id) = self.state.selected_history().map(|e| e.id.clone()) else {
            return false;
        };
        let removed = self.history.remove(&id);
        if removed {
            self.state.set_status("履歴を1件削除しました");
        }
        self.reload_history();
        removed
    }

    /// 履歴行のクリック ID。件数の上限に合わせる。
    fn history_row_ids(&self) -> Range<u16> {
        let rows = u16::try_from(self.history.config().max_entries).unwrap_or(u16::MAX);
        HISTORY_ROW_BASE..HISTORY_ROW_BASE.saturating_add(rows)
    }

    /// 全削除は2回続けて押したときだけ実行する。
    fn request_clear(&mut self, confirmed: bool) -> bool {
        if self.state.history.is_empty() {
            return false;
        }
        if !confirmed {
            self.state.clear_pending = true;
            self.state.set_status("もう一度押すと履歴をすべて削除します");
            return true;
        }
        self.history.clear();
        self.reload_history();
        self.state.set_status("履歴をすべて削除しました");
        true
    }

    fn record_consent(&mut self, choice: ConsentChoice) {
        if !consent::write_consent(choice) {
            log::info!("naishin: 同意状態はこのセッションのみ保持します");
        }
        self.state.consent = Some(choice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SETTINGS_STORAGE_KEY;
    use crate::storage::MemoryStorage;
    use crate::subject::{Scores, Subject};

    fn app() -> App {
        App::new(Box::new(MemoryStorage::new()))
    }

    fn keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.handle_input(&InputEvent::Key(c));
        }
    }

    #[test]
    fn digit_keys_fill_the_sheet() {
        let mut app = app();
        keys(&mut app, "555555555");
        assert_eq!(app.state.scores, Scores::uniform(5));
        assert_eq!(app.state.result().rank.code, "S");
    }

    #[test]
    fn arrows_move_cursor_and_adjust_grade() {
        let mut app = app();
        app.handle_input(&InputEvent::Down);
        app.handle_input(&InputEvent::Right);
        app.handle_input(&InputEvent::Right);
        app.handle_input(&InputEvent::Right);
        assert_eq!(app.state.scores.get(Subject::Math), 5);
        app.handle_input(&InputEvent::Left);
        assert_eq!(app.state.scores.get(Subject::Math), 4);
    }

    #[test]
    fn clicking_a_subject_row_selects_it() {
        let mut app = app();
        assert!(app.handle_input(&InputEvent::Click(SUBJECT_BASE + 6)));
        assert_eq!(app.state.selected_subject(), Subject::Art);
    }

    #[test]
    fn region_change_is_persisted() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('>'));
        assert_eq!(app.state.region_code(), "kanagawa");
        let stored = app.history().storage().get(SETTINGS_STORAGE_KEY).unwrap();
        assert!(stored.unwrap().contains("kanagawa"));
    }

    #[test]
    fn saved_region_is_restored_on_start() {
        let storage = MemoryStorage::new();
        config::save_settings(
            &storage,
            &UserSettings {
                region_code: "aichi".into(),
            },
        );
        let app = App::new(Box::new(storage));
        assert_eq!(app.state.region_code(), "aichi");
    }

    #[test]
    fn saving_twice_keeps_one_entry() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('s'));
        app.handle_input(&InputEvent::Key('s'));
        assert_eq!(app.history().read().len(), 1);
        assert_eq!(app.state.history.len(), 1);
        assert_eq!(app.state.status.as_deref(), Some("履歴に保存しました"));
    }

    #[test]
    fn history_restore_switches_back_to_calculator() {
        let mut app = app();
        keys(&mut app, "44444");
        app.handle_input(&InputEvent::Key('s'));
        keys(&mut app, "x");
        assert_eq!(app.state.scores, Scores::default());

        keys(&mut app, "h");
        assert_eq!(app.state.screen, Screen::History);
        app.handle_input(&InputEvent::Enter);
        assert_eq!(app.state.screen, Screen::Calculator);
        assert_eq!(app.state.scores.get(Subject::Social), 4);
        assert_eq!(app.state.scores.get(Subject::Music), 3);
    }

    #[test]
    fn memo_edit_flow() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('s'));
        keys(&mut app, "he");
        assert!(app.state.memo_edit.is_some());
        // typing while editing does not trigger screen shortcuts
        keys(&mut app, "hc期末");
        app.handle_input(&InputEvent::Backspace);
        app.handle_input(&InputEvent::Enter);
        assert!(app.state.memo_edit.is_none());
        assert_eq!(app.state.history[0].memo.as_deref(), Some("hc期"));
        assert_eq!(app.state.screen, Screen::History);
    }

    #[test]
    fn memo_edit_cancel_keeps_old_memo() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('s'));
        keys(&mut app, "he");
        keys(&mut app, "abc");
        app.handle_input(&InputEvent::Click(MEMO_CANCEL));
        assert_eq!(app.state.history[0].memo, None);
    }

    #[test]
    fn delete_and_clear_history() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('s'));
        keys(&mut app, "5");
        app.handle_input(&InputEvent::Key('s'));
        keys(&mut app, "h");
        assert_eq!(app.state.history.len(), 2);
        keys(&mut app, "d");
        assert_eq!(app.state.history.len(), 1);
        keys(&mut app, "xx");
        assert!(app.state.history.is_empty());
        assert!(!app.handle_input(&InputEvent::Key('d')));
    }

    #[test]
    fn clear_needs_a_second_press() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('s'));
        keys(&mut app, "h");

        keys(&mut app, "x");
        assert!(app.state.clear_pending);
        assert_eq!(app.history().read().len(), 1);

        // anything else in between cancels the pending clear
        app.handle_input(&InputEvent::Down);
        assert!(!app.state.clear_pending);
        keys(&mut app, "x");
        assert_eq!(app.history().read().len(), 1);

        app.handle_input(&InputEvent::Click(HISTORY_CLEAR));
        assert!(app.history().read().is_empty());
        assert!(!app.state.clear_pending);
    }

    #[test]
    fn x_on_calculator_still_resets_scores() {
        let mut app = app();
        app.handle_input(&InputEvent::Key('s'));
        keys(&mut app, "55x");
        assert_eq!(app.state.scores, Scores::default());
        assert_eq!(app.history().read().len(), 1);
    }

    #[test]
    fn history_rows_follow_configured_cap() {
        let storage = MemoryStorage::new();
        storage
            .set(config::HISTORY_CONFIG_STORAGE_KEY, r#"{ "max_entries": 40 }"#)
            .unwrap();
        let mut app = App::new(Box::new(storage));
        assert_eq!(app.history().config().max_entries, 40);
        for i in 0..35 {
            app.state.scores = Scores::uniform(3 + i % 2);
            app.handle_input(&InputEvent::Key('s'));
        }
        keys(&mut app, "h");
        assert_eq!(app.state.history.len(), 35);
        assert!(app.handle_input(&InputEvent::Click(HISTORY_ROW_BASE + 34)));
        assert_eq!(app.state.history_cursor, 34);
        assert!(!app.handle_input(&InputEvent::Click(HISTORY_ROW_BASE + 39)));
    }

    #[test]
    fn suggestion_focuses_subject() {
        let mut app = app();
        keys(&mut app, "a");
        assert_eq!(app.state.screen, Screen::Improvement);
        // tokyo: the heavily weighted practical subjects lead the list
        keys(&mut app, "1");
        assert_eq!(app.state.screen, Screen::Calculator);
        assert_eq!(app.state.selected_subject(), Subject::Music);
    }

    #[test]
    fn suggestion_out_of_range_is_ignored() {
        let mut app = app();
        keys(&mut app, "555555555a");
        assert!(!app.handle_input(&InputEvent::Key('1')));
    }

    #[test]
    fn compare_row_click_switches_region() {
        let mut app = app();
        keys(&mut app, "v");
        assert!(app.handle_input(&InputEvent::Click(COMPARE_ROW_BASE)));
        // all threes: every region ties, registry order keeps hokkaido first
        assert_eq!(app.state.region_code(), "hokkaido");
    }

    #[test]
    fn esc_returns_to_calculator() {
        let mut app = app();
        keys(&mut app, "v");
        assert!(app.handle_input(&InputEvent::Esc));
        assert_eq!(app.state.screen, Screen::Calculator);
        assert!(!app.handle_input(&InputEvent::Esc));
    }

    #[test]
    fn share_query_is_applied() {
        let mut app = app();
        assert!(app.apply_share_query("?p=osaka&s=555553333"));
        assert_eq!(app.state.region_code(), "osaka");
        assert_eq!(app.state.scores.get(Subject::Social), 5);
        assert_eq!(app.state.scores.get(Subject::Music), 3);
        assert!(!app.apply_share_query(""));
    }

    #[test]
    fn share_status_contains_link() {
        let mut app = app();
        keys(&mut app, "l");
        let status = app.state.status.clone().unwrap();
        assert!(status.contains("?p=tokyo&s=333333333"), "{status}");
    }

    #[test]
    fn consent_answer_hides_banner() {
        let mut app = app();
        assert_eq!(app.state.consent, None);
        keys(&mut app, "y");
        assert_eq!(app.state.consent, Some(ConsentChoice::Accepted));
        // once answered, 'n' is no longer captured by the banner
        assert!(!app.handle_input(&InputEvent::Key('n')));
    }
}
