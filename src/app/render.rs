//! 描画（state は読むだけ）。

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratzilla::ratatui::Frame;

use crate::analyzer::{self, NextRankGap, Priority};
use crate::compare::compare_all_regions;
use crate::history::{self, TrendPoint};
use crate::input::{is_narrow_layout, ClickState};
use crate::region::LAST_VERIFIED;
use crate::scoring::{format_percent, ResultData};
use crate::subject::{ALL_SUBJECTS, MAX_GRADE};
use crate::time;
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::state::{AppState, Screen};

pub fn render(state: &AppState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let banner_height = if state.consent.is_none() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(area);

    let mut cs = click_state.borrow_mut();
    render_tabs(state, f, chunks[0], &mut cs);
    if state.consent.is_none() {
        render_consent_banner(f, chunks[1], &mut cs);
    }
    match state.screen {
        Screen::Calculator => render_calculator(state, f, chunks[2], &mut cs),
        Screen::Improvement => render_improvement(state, f, chunks[2], &mut cs),
        Screen::Compare => render_compare(state, f, chunks[2], &mut cs),
        Screen::History => render_history(state, f, chunks[2], &mut cs),
    }
    render_footer(state, f, chunks[3], &mut cs);
}

fn tab_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn render_tabs(state: &AppState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let ids = [TAB_CALCULATOR, TAB_IMPROVEMENT, TAB_COMPARE, TAB_HISTORY];
    let title = if is_narrow_layout(area.width) {
        " 内申点 "
    } else {
        " 内申点計算 - 都道府県別 "
    };
    let bar = Screen::ALL
        .iter()
        .zip(ids)
        .fold(TabBar::new(" │ "), |bar, (screen, id)| {
            bar.tab(screen.label(), tab_style(*screen == state.screen), id)
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    title,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );
    bar.render(f, area, cs);
}

fn render_consent_banner(f: &mut Frame, area: Rect, cs: &mut ClickState) {
    TabBar::new("  ")
        .tab("[Y] 同意する", Style::default().fg(Color::Green), CONSENT_ACCEPT)
        .tab("[N] 拒否する", Style::default().fg(Color::Red), CONSENT_REJECT)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Cookie の利用に同意しますか？ "),
        )
        .render(f, area, cs);
}

fn rank_color(code: &str) -> Color {
    match code {
        "S" => Color::Magenta,
        "A" => Color::Cyan,
        "B" => Color::Green,
        "C" => Color::Yellow,
        _ => Color::Red,
    }
}

fn grade_dots(grade: u8) -> String {
    let filled = grade.min(MAX_GRADE) as usize;
    "●".repeat(filled) + &"○".repeat(MAX_GRADE as usize - filled)
}

// ── 計算画面 ────────────────────────────────────────────────────

fn render_calculator(state: &AppState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let (sheet_area, result_area) = if is_narrow_layout(area.width) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(15), Constraint::Min(6)])
            .split(area);
        (chunks[0], chunks[1])
    } else {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        (chunks[0], chunks[1])
    };

    render_sheet(state, f, sheet_area, cs);
    render_result(state, f, result_area, cs);
}

fn render_sheet(state: &AppState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let region = state.region();
    let mut cl = ClickableList::new();
    let mut last_category = None;

    for (i, subject) in ALL_SUBJECTS.iter().enumerate() {
        let category = subject.category();
        if last_category != Some(category) {
            cl.push(Line::from(Span::styled(
                format!(" {}  ×{}", category.label(), region.multiplier(category)),
                Style::default().fg(Color::DarkGray),
            )));
            last_category = Some(category);
        }

        let selected = i == state.subject_cursor;
        let grade = state.scores.get(*subject);
        let marker = if selected { "▶" } else { " " };
        let label_style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" {marker} "), label_style),
                Span::styled(grade_dots(grade), Style::default().fg(Color::Green)),
                Span::styled(format!(" {grade}  "), label_style),
                Span::styled(subject.label(), label_style),
            ]),
            SUBJECT_BASE + i as u16,
        );
    }

    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(" [-] 評定を下げる", Style::default().fg(Color::Cyan))),
        GRADE_DOWN,
    );
    cl.push_clickable(
        Line::from(Span::styled(" [+] 評定を上げる", Style::default().fg(Color::Cyan))),
        GRADE_UP,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" 評定（1〜5） ");
    cl.render(f, area, block, 0, cs);
}

fn render_result(state: &AppState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let result = state.result();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let color = rank_color(result.rank.code);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" ランク {} ", result.rank.code)),
        )
        .gauge_style(Style::default().fg(color))
        .ratio((result.percent / 100.0).clamp(0.0, 1.0))
        .label(format!(
            "{} / {} 点（{}）",
            result.total,
            result.max,
            format_percent(result.percent)
        ));
    f.render_widget(gauge, chunks[0]);

    let region = state.region();
    let mut cl = ClickableList::new();
    cl.push_clickable(
        Line::from(Span::styled(" [<] 前の都道府県", Style::default().fg(Color::Cyan))),
        REGION_PREV,
    );
    cl.push(Line::from(vec![
        Span::styled(" 方式: ", Style::default().fg(Color::Gray)),
        Span::styled(
            region.name,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("（{}）", region.target_grades_label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    cl.push_clickable(
        Line::from(Span::styled(" [>] 次の都道府県", Style::default().fg(Color::Cyan))),
        REGION_NEXT,
    );
    cl.push(Line::from(Span::styled(
        format!(" {}", result.rank.label),
        Style::default().fg(color),
    )));
    cl.push(next_rank_line(&result, state));
    cl.push(Line::from(Span::styled(
        format!(" {}", region.note),
        Style::default().fg(Color::Gray),
    )));
    cl.push(Line::from(Span::styled(
        format!(" 出典: {}（{} 確認）", region.source, LAST_VERIFIED),
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" 結果 ");
    cl.render(f, chunks[1], block, 0, cs);
}

fn next_rank_line(result: &ResultData, state: &AppState) -> Line<'static> {
    match analyzer::next_rank_gap(&state.scores, state.region_code()) {
        NextRankGap::AtTop => Line::from(Span::styled(
            " 最上位ランクです",
            Style::default().fg(Color::Magenta),
        )),
        NextRankGap::Reachable {
            rank,
            target_total,
            gap,
        } => Line::from(vec![
            Span::styled(
                format!(" ランク{}まで ", rank.code),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format!("あと {gap} 点"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("（{target_total} / {} 点）", result.max),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    }
}

// ── 改善画面 ────────────────────────────────────────────────────

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Gray,
    }
}

fn render_improvement(state: &AppState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let result = state.result();
    let suggestions = analyzer::suggest_improvements(&state.scores, state.region_code());

    let mut cl = ClickableList::new();
    cl.push(next_rank_line(&result, state));
    cl.push(Line::from(""));

    if suggestions.is_empty() {
        cl.push(Line::from(Span::styled(
            " すべての教科が 5 です。伸びしろはありません。",
            Style::default().fg(Color::Magenta),
        )));
    }

    for (i, s) in suggestions.iter().enumerate() {
        let color = priority_color(s.priority);
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    format!(" [{}] ", i + 1),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(s.subject, Style::default().fg(Color::White)),
                Span::styled(
                    format!("  {}→5  ×{}  最大 +{} 点  ", s.current_grade, s.multiplier, s.potential_gain),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(s.priority.label(), Style::default().fg(color)),
            ]),
            SUGGESTION_BASE + i as u16,
        );
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" 伸ばしたい教科（{}方式） ", state.region().name));
    cl.render(f, area, block, 0, cs);
}

// ── 比較画面 ────────────────────────────────────────────────────

fn render_compare(state: &AppState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let report = compare_all_regions(&state.scores, state.region_code());
    let current = state.region_code();

    let mut cl = ClickableList::new();
    for (i, row) in report.rows.iter().enumerate() {
        let is_current = row.code == current;
        let marker = if i == state.compare_cursor { "▶" } else { " " };
        let style = if is_current {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!("{marker}{:>2}. ", i + 1), style),
                Span::styled(row.name, style),
                Span::styled(
                    format!("  {} / {}  {}", row.total, row.max, format_percent(row.percent)),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            COMPARE_ROW_BASE + i as u16,
        );
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = state
        .compare_cursor
        .saturating_sub(visible.saturating_sub(1)) as u16;

    let title = match report.current_row() {
        Some(row) => format!(
            " 全国比較: {} は {}/{} 位 ",
            row.name,
            report.current_position.unwrap_or_default(),
            report.rows.len()
        ),
        None => " 全国比較 ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(title);
    cl.render(f, area, block, scroll, cs);
}

// ── 履歴画面 ────────────────────────────────────────────────────

fn trend_sparkline(points: &[TrendPoint]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    points
        .iter()
        .map(|p| BARS[((p.percent / 100.0) * 7.0).round().clamp(0.0, 7.0) as usize])
        .collect()
}

fn render_history(state: &AppState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let memo_height = if state.memo_edit.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(memo_height),
            Constraint::Min(3),
        ])
        .split(area);

    let points = history::trend(&state.history);
    let trend = Paragraph::new(Line::from(vec![
        Span::styled(" 推移 ", Style::default().fg(Color::Gray)),
        Span::styled(trend_sparkline(&points), Style::default().fg(Color::Green)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" 保存済み {} 件 ", state.history.len())),
    );
    f.render_widget(trend, chunks[0]);

    if let Some(edit) = &state.memo_edit {
        let input = Paragraph::new(Line::from(vec![
            Span::styled(" メモ: ", Style::default().fg(Color::Gray)),
            Span::styled(edit.buffer.as_str(), Style::default().fg(Color::White)),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" メモを編集（{}文字） ", edit.buffer.chars().count())),
        );
        f.render_widget(input, chunks[1]);
    }

    let now = time::now_utc();
    let mut cl = ClickableList::new();
    if state.history.is_empty() {
        cl.push(Line::from(Span::styled(
            " まだ履歴がありません。計算画面で保存できます。",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, entry) in state.history.iter().enumerate() {
        let selected = i == state.history_cursor;
        let result = crate::scoring::calculate(&entry.scores, &entry.mode);
        let name = crate::region::resolve(&entry.mode).name;
        let style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let mut spans = vec![
            Span::styled(if selected { " ▶ " } else { "   " }, style),
            Span::styled(
                format!("{} ", time::elapsed_label(entry.saved_at, now)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("{name} {}/{} ", result.total, result.max), style),
            Span::styled(result.rank.code, Style::default().fg(rank_color(result.rank.code))),
        ];
        if let Some(memo) = &entry.memo {
            spans.push(Span::styled(format!("  {memo}"), Style::default().fg(Color::Gray)));
        }
        cl.push_clickable(Line::from(spans), HISTORY_ROW_BASE.saturating_add(i as u16));
    }

    let visible = chunks[2].height.saturating_sub(2) as usize;
    let scroll = state
        .history_cursor
        .saturating_sub(visible.saturating_sub(1)) as u16;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" 履歴 ");
    cl.render(f, chunks[2], block, scroll, cs);
}

// ── フッター ────────────────────────────────────────────────────

fn render_footer(state: &AppState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let hint = Style::default().fg(Color::Cyan);
    let bar = TabBar::new(" ");
    let bar = if state.memo_edit.is_some() {
        bar.tab("[Enter]保存", hint, MEMO_SAVE)
            .tab("[Esc]取消", hint, MEMO_CANCEL)
    } else {
        match state.screen {
            Screen::Calculator => bar
                .tab("[S]保存", hint, SAVE_HISTORY)
                .tab("[L]共有", hint, SHARE)
                .tab("[X]リセット", hint, RESET_SCORES),
            Screen::Improvement => bar.tab("[C]計算に戻る", hint, TAB_CALCULATOR),
            Screen::Compare => bar
                .tab("[↑]", hint, COMPARE_UP)
                .tab("[↓]", hint, COMPARE_DOWN)
                .tab("[C]計算に戻る", hint, TAB_CALCULATOR),
            Screen::History => bar
                .tab("[R]復元", hint, HISTORY_RESTORE)
                .tab("[E]メモ", hint, HISTORY_EDIT_MEMO)
                .tab("[D]削除", hint, HISTORY_DELETE)
                .tab(
                    if state.clear_pending { "[X]もう一度で全削除" } else { "[X]全削除" },
                    hint,
                    HISTORY_CLEAR,
                ),
        }
    };

    let title = state.status.as_deref().unwrap_or("");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Yellow),
        ));
    bar.block(block).render(f, area, cs);
}
