// Piano roll surface. Draws whatever DrawFrame the engine last reported:
// time runs left to right over a fixed window around the playhead, pitch
// runs bottom to top. Events are drawn as reported, never reinterpreted.

use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line, Rectangle};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::editor_api::{DrawFrame, Hap};

/// Seconds shown before and after the playhead.
pub const DRAW_WINDOW: (f64, f64) = (-2.0, 2.0);

const TITLE: &str = " Piano Roll ";

/// Haps overlapping the window around `frame.time`.
pub fn visible_haps(frame: &DrawFrame) -> impl Iterator<Item = &Hap> {
    let from = frame.time + DRAW_WINDOW.0;
    let to = frame.time + DRAW_WINDOW.1;
    frame.haps.iter().filter(move |h| h.end > from && h.begin < to)
}

/// Note range to show, padded by one semitone each side.
pub fn note_bounds(frame: &DrawFrame) -> [f64; 2] {
    let (lo, hi) = visible_haps(frame).fold((f64::MAX, f64::MIN), |(lo, hi), h| {
        (lo.min(h.note), hi.max(h.note))
    });
    if lo > hi {
        [47.0, 73.0] // nothing visible: two octaves around middle C
    } else {
        [lo - 1.0, hi + 2.0]
    }
}

pub fn render(frame: &mut Frame, area: Rect, draw: Option<&DrawFrame>) {
    let block = Block::default().borders(Borders::ALL).title(TITLE);
    let Some(draw) = draw else {
        frame.render_widget(block, area);
        return;
    };

    let x = [draw.time + DRAW_WINDOW.0, draw.time + DRAW_WINDOW.1];
    let y = note_bounds(draw);
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Block)
        .background_color(Color::Black)
        .x_bounds(x)
        .y_bounds(y)
        .paint(|ctx| {
            for hap in visible_haps(draw) {
                let color = if hap.is_active_at(draw.time) {
                    Color::LightMagenta
                } else {
                    Color::Magenta
                };
                ctx.draw(&Rectangle {
                    x: hap.begin.max(x[0]),
                    y: hap.note,
                    width: hap.end.min(x[1]) - hap.begin.max(x[0]),
                    height: 0.8,
                    color,
                });
            }
            ctx.draw(&Line {
                x1: draw.time,
                y1: y[0],
                x2: draw.time,
                y2: y[1],
                color: Color::White,
            });
        });
    frame.render_widget(canvas, area);
}
