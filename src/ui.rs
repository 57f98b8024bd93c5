pub mod charting;
pub mod field;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, Widget},
};

use flick::engine::{EndScreen, LeaderboardView};

use crate::{ui::field::FieldGeometry, App};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

fn screen_chunks(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Cells that make up the play-field for a frame of size `screen`
pub fn field_area(screen: Rect) -> Rect {
    let (_, body) = screen_chunks(screen);
    Block::default().borders(Borders::ALL).inner(body)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = &self.view;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        if let Some(end) = &view.end {
            render_end_screen(self, end, area, buf);
            return;
        }

        let (hud, body) = screen_chunks(area);

        let hud_text = Paragraph::new(Line::from(vec![
            Span::styled(format!("Score: {}", view.score), bold_style),
            Span::raw("   "),
            Span::styled(format!("Time: {:.2} s", view.seconds_remaining), dim_bold_style),
            Span::raw("   "),
            Span::styled("(esc)ape", italic_style),
        ]));
        hud_text.render(hud, buf);

        let field_block = Block::default().borders(Borders::ALL);
        let inner = field_block.inner(body);
        field_block.render(body, buf);

        if view.is_flashing() {
            Block::default()
                .style(Style::default().bg(Color::Red))
                .render(inner, buf);
        }

        if let Some(n) = view.countdown {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Percentage(50),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .split(inner);
            Paragraph::new(Span::styled(
                n.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .render(rows[1], buf);
            return;
        }

        if let Some((x, y, size)) = view.target {
            let cfg = &self.config;
            let geometry = FieldGeometry::new(inner, cfg.field_width, cfg.field_height);
            Block::default()
                .style(Style::default().bg(Color::Blue))
                .render(geometry.target_rect(x, y, size), buf);
        }
    }
}

fn render_end_screen(app: &App, end: &EndScreen, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),  // headline
            Constraint::Length(1),  // stats
            Constraint::Min(6),     // chart
            Constraint::Length(14), // leaderboard
            Constraint::Length(1),  // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!("Time's up!  Final Score: {}", end.final_score),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let summary = app.engine.summary();
    let avg = end
        .avg_reaction_secs
        .map(|s| format!("{s:.3} s"))
        .unwrap_or_else(|| "-".to_string());
    let best = summary
        .best_reaction_ms
        .map(|ms| format!("{ms} ms"))
        .unwrap_or_else(|| "-".to_string());
    Paragraph::new(Span::styled(
        format!(
            "{:.2}% acc   {} misses   avg {}   best {}",
            end.accuracy * 100.0,
            summary.misses,
            avg,
            best
        ),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let points = app.engine.reaction_series();
    let (last_hit, ceiling) = charting::compute_chart_params(&points);
    let tuples: Vec<(f64, f64)> = points.iter().map(|&p| p.into()).collect();
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Line)
        .data(&tuples)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("hit")
                .bounds([1.0, last_hit])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(charting::format_label(last_hit), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("ms")
                .bounds([0.0, ceiling])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(ceiling), bold_style),
                ]),
        )
        .render(chunks[2], buf);

    let board_block = Block::default().borders(Borders::ALL).title("Ranking");
    match &end.leaderboard {
        LeaderboardView::Ready(entries) => {
            let rows = entries.iter().map(|entry| {
                let style = if entry.is_current {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Blue)
                };
                Row::new(vec![
                    Cell::from(format!("{}", entry.rank)),
                    Cell::from(entry.medal.to_string()),
                    Cell::from(format!("{}", entry.record.score)),
                    Cell::from(format!("{:.2}%", entry.accuracy_percent())),
                    Cell::from(entry.record.date_string()),
                    Cell::from(entry.record.name.clone()),
                ])
                .style(style)
            });
            Table::new(
                rows,
                [
                    Constraint::Length(4),
                    Constraint::Length(3),
                    Constraint::Length(6),
                    Constraint::Length(9),
                    Constraint::Length(17),
                    Constraint::Min(0),
                ],
            )
            .header(
                Row::new(vec!["Rank", "", "Score", "Accuracy", "Date", "Name"]).style(bold_style),
            )
            .block(board_block)
            .render(chunks[3], buf);
        }
        LeaderboardView::Unavailable(reason) => {
            Paragraph::new(Span::styled(
                format!("Leaderboard unavailable: {reason}"),
                Style::default().fg(Color::Red),
            ))
            .block(board_block)
            .render(chunks[3], buf);
        }
    }

    let legend = match &app.view.store_error {
        Some(_) => "(r)epeat / (q)uit   score was not fully saved, see log",
        None => "(r)epeat / (q)uit",
    };
    Paragraph::new(Span::styled(legend, italic_style)).render(chunks[4], buf);
}
