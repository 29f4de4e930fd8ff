use crate::editor_api::EditorState;
use crate::shared::{DisplayState, Focus};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use super::{chart, piano_roll};

const KEYS: &str = "F5 Preprocess  F6 Preprocess & Play  F7 Play  F8 Stop  Tab Focus  ^L Reset  Esc Quit";

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(if state.show_alert { 1 } else { 0 }), // alert
            Constraint::Min(10), // panes
            Constraint::Length(1), // key legend
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "Pattern Reactor",
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
    )))
    .centered();
    frame.render_widget(title, sections[0]);

    if state.show_alert {
        let alert = Paragraph::new("Preprocessing complete! (x to dismiss)")
            .style(Style::default().fg(Color::Black).bg(Color::Cyan));
        frame.render_widget(alert, sections[1]);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(sections[2]);

    draw_left(frame, columns[0], state, blink_on);
    draw_right(frame, columns[1], state);

    let legend = Paragraph::new(KEYS).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(legend, sections[3]);
}

fn draw_left(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let controls_height = state.controls.len() as u16 + 5;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6), // template editor
            Constraint::Length(1), // tag hint
            Constraint::Length(controls_height), // controls
        ])
        .split(area);

    draw_template(frame, rows[0], state);
    let hint = Paragraph::new(state.hint.as_str()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, rows[1]);
    draw_controls(frame, rows[2], state, blink_on);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::LightMagenta)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_template(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let focused = state.focus == Focus::Template;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title(" Preprocessor Editor ");

    let (line, col) = cursor_line_col(&state.template, state.cursor);
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = line.saturating_sub(visible.saturating_sub(1));

    let editor = Paragraph::new(state.template.as_str())
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(editor, area);

    if focused {
        if let Some(pos) = cursor_cell(area, line - scroll, col) {
            frame.set_cursor_position(pos);
        }
    }
}

// Screen cell for the cursor inside a bordered pane, None when it falls
// outside the visible text area.
fn cursor_cell(area: Rect, row: usize, col: usize) -> Option<(u16, u16)> {
    let col = u16::try_from(col).ok()?;
    let row = u16::try_from(row).ok()?;
    let x = area.x.checked_add(1)?.checked_add(col)?;
    let y = area.y.checked_add(1)?.checked_add(row)?;
    (x < area.right().saturating_sub(1) && y < area.bottom().saturating_sub(1)).then_some((x, y))
}

/// Zero-based (line, column in chars) of a byte offset.
pub fn cursor_line_col(text: &str, cursor: usize) -> (usize, usize) {
    let before = &text[..cursor.min(text.len())];
    let line = before.matches('\n').count();
    let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count());
    (line, col)
}

fn draw_controls(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let focused = state.focus == Focus::Controls;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title(" Controls ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(state.controls.len() as u16),
            Constraint::Length(1), // tempo bar
            Constraint::Length(1), // status
        ])
        .split(inner);

    let lines: Vec<Line> = state
        .controls
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = i == state.selected_control;
            let marker = if selected && focused { "> " } else { "  " };
            let style = if selected {
                Style::default().fg(Color::LightMagenta)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{marker}{:<12}", row.label), style),
                Span::styled(row.value.clone(), style.add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), rows[0]);

    let (lo, hi) = state.tempo_range;
    let ratio = if hi > lo { ((state.tempo - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.0 };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(format!("Speed {:.2}x", state.tempo));
    frame.render_widget(gauge, rows[1]);

    let status_color = match state.editor_state {
        EditorState::Running => Color::Green,
        EditorState::Ready => Color::Gray,
        EditorState::Uninitialized => Color::DarkGray,
    };
    let dot = if state.playing && blink_on { " ●" } else { "" };
    let status = Line::from(vec![
        Span::raw("REPL Status: "),
        Span::styled(
            format!("{}{}", state.editor_state.label(), dot),
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), rows[2]);
}

fn draw_right(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5), // loaded code
            Constraint::Length(4), // console
            Constraint::Length(8), // piano roll
            Constraint::Length(10), // tempo chart
        ])
        .split(area);

    let code = Paragraph::new(state.loaded_code.as_str())
        .block(Block::default().borders(Borders::ALL).title(" REPL "))
        .wrap(Wrap { trim: false });
    frame.render_widget(code, rows[0]);

    let tail = rows[1].height.saturating_sub(2) as usize;
    let start = state.console.len().saturating_sub(tail);
    let console_lines: Vec<Line> = state.console[start..]
        .iter()
        .map(|l| Line::from(l.as_str()))
        .collect();
    let console = Paragraph::new(console_lines)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(" Console "));
    frame.render_widget(console, rows[1]);

    piano_roll::render(frame, rows[2], state.draw_frame.as_ref());
    chart::render(frame, rows[3], &state.tempo_samples, state.tempo_range);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_position_in_lines_and_chars() {
        assert_eq!(cursor_line_col("", 0), (0, 0));
        assert_eq!(cursor_line_col("ab\ncd", 4), (1, 1));
        assert_eq!(cursor_line_col("ab\n", 3), (1, 0));
        assert_eq!(cursor_line_col("é\né", 5), (1, 1));
    }

    #[test]
    fn cursor_past_the_pane_is_hidden() {
        let area = Rect::new(2, 3, 20, 10);
        assert_eq!(cursor_cell(area, 0, 0), Some((3, 4)));
        assert_eq!(cursor_cell(area, 0, 18), None);
        assert_eq!(cursor_cell(area, 0, 70_000), None);
        assert_eq!(cursor_cell(area, 0, usize::MAX), None);
    }

    #[test]
    fn very_long_line_renders() {
        use ratatui::{backend::TestBackend, Terminal};

        let template = "x".repeat(70_000);
        let state = DisplayState {
            cursor: template.len(),
            template,
            hint: String::new(),
            focus: Focus::Template,
            controls: vec![],
            selected_control: 0,
            show_alert: false,
            editor_state: EditorState::Ready,
            playing: false,
            loaded_code: String::new(),
            tempo: 1.0,
            tempo_range: (0.5, 2.0),
            tempo_samples: vec![],
            draw_frame: None,
            console: vec![],
        };
        let mut term = Terminal::new(TestBackend::new(80, 40)).unwrap();
        term.draw(|f| render(f, f.area(), &state, true)).unwrap();
    }
}
