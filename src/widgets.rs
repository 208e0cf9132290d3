//! 描画とクリック領域の登録を1か所にまとめた部品。
//!
//! - [`TabBar`]: 画面切り替えタブ（計算 / 改善 / 比較 / 履歴）。
//! - [`ClickableList`]: 行ごとに action ID を持てる縦リスト。

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

/// 横一列のタブ。
///
/// クリック領域は実際に描画したラベル幅（全角は2セル）から求める。
///
/// ```ignore
/// TabBar::new(" │ ")
///     .tab("計算", tab_style(Screen::Calculator), TAB_CALCULATOR)
///     .tab("履歴", tab_style(Screen::History), TAB_HISTORY)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<(String, Style, u16)>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push((label.into(), style, action_id));
        self
    }

    /// 枠付きにする。クリック領域の x/幅は `Block::inner` で補正される。
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// `(パディング込みの表示幅, action_id)` と区切り幅。
    fn measure(&self) -> (Vec<(u16, u16)>, u16) {
        let sep_width = Line::from(self.separator).width() as u16;
        let widths = self
            .tabs
            .iter()
            .map(|(label, _, id)| (Line::from(format!(" {label} ")).width() as u16, *id))
            .collect();
        (widths, sep_width)
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let (tab_widths, sep_width) = self.measure();

        let mut spans: Vec<Span> = Vec::new();
        for (i, (label, style, _)) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.separator, Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(format!(" {label} "), *style));
        }

        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };
        let paragraph = match self.block {
            Some(block) => Paragraph::new(Line::from(spans)).block(block),
            None => Paragraph::new(Line::from(spans)),
        };
        f.render_widget(paragraph, area);

        // 縦は枠を含めた全体をタップ可能にする
        cs.register_tab_targets(
            &tab_widths,
            sep_width,
            inner.x,
            area.y,
            inner.width,
            area.height.max(1),
        );
    }
}

/// 行と action ID を組にして積むビルダー。
///
/// 行番号を手で数える代わりに、`push_clickable` した行がどこに描画されても
/// `register_targets` がその行に領域を登録する。
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(行インデックス, action_id)`
    actions: Vec<(u16, u16)>,
}

impl Default for ClickableList<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        let idx = self.lines.len() as u16;
        self.actions.push((idx, action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// クリック可能な行を登録する。
    ///
    /// `top_offset` / `bottom_offset` は枠の行数、`scroll` は表示行単位の
    /// スクロール量。`inner_width` が 0 なら折り返しなし（1行 = 1表示行）。
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
        inner_width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        let mut visual_starts: Vec<u16> = Vec::with_capacity(self.lines.len());
        let mut visual_heights: Vec<u16> = Vec::with_capacity(self.lines.len());
        let mut cumulative: u16 = 0;
        for line in &self.lines {
            visual_starts.push(cumulative);
            let h = match inner_width as usize {
                0 => 1,
                w => line.width().div_ceil(w).max(1) as u16,
            };
            visual_heights.push(h);
            cumulative += h;
        }

        for &(line_idx, action_id) in &self.actions {
            let li = line_idx as usize;
            let (Some(&vstart), Some(&vheight)) = (visual_starts.get(li), visual_heights.get(li))
            else {
                continue;
            };
            for vr in vstart..vstart + vheight {
                if vr < scroll {
                    continue;
                }
                let screen_row = content_y + (vr - scroll);
                if screen_row >= content_end {
                    break;
                }
                cs.add_row_target(area, screen_row, action_id);
            }
        }
    }

    /// `block` で囲んで描画し、クリック領域も登録する。枠は上下1行ずつとみなす。
    pub fn render(self, f: &mut Frame, area: Rect, block: Block<'a>, scroll: u16, cs: &mut ClickState) {
        let inner_width = block.inner(area).width;
        self.register_targets(area, cs, 1, 1, scroll, inner_width);
        let widget = Paragraph::new(self.into_lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        f.render_widget(widget, area);
    }
}
