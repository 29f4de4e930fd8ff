// Tempo history line chart. Immediate mode: every call draws the whole chart
// from the samples it is given, so nothing carries over between renders.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};
use ratatui::Frame;

use crate::pipeline::history::TempoSample;

const TITLE: &str = " Tempo History ";

/// Points as (seconds since session start, tempo).
pub fn chart_points(samples: &[TempoSample]) -> Vec<(f64, f64)> {
    samples.iter().map(|s| (s.seconds(), s.tempo)).collect()
}

/// Time domain of the samples. A single sample gets a one-second window so
/// the axis is never zero-width.
pub fn x_bounds(samples: &[TempoSample]) -> Option<[f64; 2]> {
    let first = samples.first()?.seconds();
    let last = samples.last()?.seconds();
    if last > first {
        Some([first, last])
    } else {
        Some([first - 0.5, first + 0.5])
    }
}

/// Draw `samples` into `area`. The vertical domain is the declared tempo
/// range, not the sampled extent, so the scale holds still all session.
pub fn render(frame: &mut Frame, area: Rect, samples: &[TempoSample], tempo_range: (f64, f64)) {
    let block = Block::default().borders(Borders::ALL).title(TITLE);

    let Some([x_min, x_max]) = x_bounds(samples) else {
        frame.render_widget(block, area);
        return;
    };
    let (y_min, y_max) = tempo_range;
    let points = chart_points(samples);

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Blue))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([x_min, x_max])
                .labels(vec![format!("{x_min:.1}s"), format!("{x_max:.1}s")]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([y_min, y_max])
                .labels(vec![
                    format!("{y_min:.2}"),
                    format!("{:.2}", (y_min + y_max) / 2.0),
                    format!("{y_max:.2}"),
                ]),
        );
    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;
    use std::time::Duration;

    fn sample(ms: u64, tempo: f64) -> TempoSample {
        TempoSample { time: Duration::from_millis(ms), tempo }
    }

    fn draw(samples: &[TempoSample]) -> Buffer {
        let mut term = Terminal::new(TestBackend::new(40, 12)).unwrap();
        term.draw(|f| render(f, f.area(), samples, (0.5, 2.0))).unwrap();
        term.backend().buffer().clone()
    }

    #[test]
    fn empty_history_draws_only_the_frame() {
        let buf = draw(&[]);
        let mut expected = Terminal::new(TestBackend::new(40, 12)).unwrap();
        expected
            .draw(|f| f.render_widget(Block::default().borders(Borders::ALL).title(TITLE), f.area()))
            .unwrap();
        assert_eq!(&buf, expected.backend().buffer());
    }

    #[test]
    fn rendering_twice_gives_the_same_picture() {
        let samples = [sample(0, 1.0), sample(500, 1.25), sample(1500, 0.75)];
        let mut term = Terminal::new(TestBackend::new(40, 12)).unwrap();
        term.draw(|f| render(f, f.area(), &samples, (0.5, 2.0))).unwrap();
        let first = term.backend().buffer().clone();
        term.draw(|f| render(f, f.area(), &samples, (0.5, 2.0))).unwrap();
        assert_eq!(&first, term.backend().buffer());
        assert_eq!(first, draw(&samples));
    }

    #[test]
    fn x_domain_spans_the_samples() {
        let samples = [sample(1000, 1.0), sample(3000, 1.5)];
        assert_eq!(x_bounds(&samples), Some([1.0, 3.0]));
        assert_eq!(x_bounds(&[sample(2000, 1.0)]), Some([1.5, 2.5]));
        assert_eq!(x_bounds(&[]), None);
    }

    #[test]
    fn points_keep_order_and_values() {
        let samples = [sample(0, 1.0), sample(250, 1.05)];
        assert_eq!(chart_points(&samples), vec![(0.0, 1.0), (0.25, 1.05)]);
    }
}
