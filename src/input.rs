//! 入力の正規化: キーボード・マウス・タップを `InputEvent` にまとめ、
//! 画面上のクリック領域を action ID に対応付ける。
//!
//! 画面ごとの dispatch は `app` 側が持つ。ここは画面に依存しない。

use ratzilla::ratatui::layout::Rect;

/// キーボード / タップから正規化した入力。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// 文字キー。
    Key(char),
    /// 登録済みクリック領域のタップ。値は `app::actions` の action ID。
    Click(u16),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Backspace,
    Esc,
}

/// 画面上のクリック領域（端末セル座標）。
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// 描画ループとクリックハンドラで共有する状態。
/// 毎フレーム `begin_frame` してから描画中に登録し直す。
#[derive(Debug, Default)]
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しいフレームの開始。端末サイズを更新し、古い領域を捨てる。
    pub fn begin_frame(&mut self, area: Rect) {
        self.terminal_cols = area.width;
        self.terminal_rows = area.height;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// `area` 内の1行全体を登録する。`row` が `area` の外なら何もしない。
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.targets.push(ClickTarget {
                rect: Rect::new(area.x, row, area.width, 1),
                action_id,
            });
        }
    }

    /// 横並びのタブのクリック領域を、実際のラベル幅から求めて登録する。
    ///
    /// `tab_widths` は `(パディング込みのラベル表示幅, action_id)` の並び。
    /// 各タブの領域は区切り文字の中点まで広げ、先頭は左端から、末尾は右端まで
    /// 伸ばすので隙間はできない。
    pub fn register_tab_targets(
        &mut self,
        tab_widths: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        let n = tab_widths.len();
        if n == 0 || total_width == 0 {
            return;
        }

        let mut starts: Vec<u16> = Vec::with_capacity(n);
        let mut cursor: u16 = 0;
        for (i, &(w, _)) in tab_widths.iter().enumerate() {
            if i > 0 {
                cursor += separator_width;
            }
            starts.push(cursor);
            cursor += w;
        }

        for (i, &(width, action_id)) in tab_widths.iter().enumerate() {
            let left = if i == 0 {
                0
            } else {
                let prev_end = starts[i - 1] + tab_widths[i - 1].0;
                prev_end + (starts[i] - prev_end) / 2
            };
            let right = if i == n - 1 {
                total_width
            } else {
                let cur_end = starts[i] + width;
                cur_end + (starts[i + 1] - cur_end) / 2
            };

            let w = right.saturating_sub(left);
            if w > 0 {
                self.add_click_target(Rect::new(x + left, y, w, height), action_id);
            }
        }
    }

    /// セル座標に当たる action ID。重なっている場合は後から登録したものが勝つ。
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            (col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height)
                .then_some(t.action_id)
        })
    }

    /// グリッド左上からのピクセル座標を hit test する。
    pub fn hit_test_pixels(&self, x: f64, y: f64, grid_width: f64, grid_height: f64) -> Option<u16> {
        let col = pixel_x_to_col(x, grid_width, self.terminal_cols)?;
        let row = pixel_y_to_row(y, grid_height, self.terminal_rows)?;
        self.hit_test(col, row)
    }
}

/// 狭い画面（スマホ縦持ち）向けレイアウトに切り替える幅。
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// グリッド上端からのピクセル Y を行番号に変換する。範囲外なら `None`。
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }
    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;
    (row < terminal_rows).then_some(row)
}

pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let cell_width = grid_width / terminal_cols as f64;
    let col = (click_x / cell_width) as u16;
    (col < terminal_cols).then_some(col)
}
