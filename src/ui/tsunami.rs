use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::{grade_color, name_or_unknown, time_display};
use crate::api::TsunamiRecord;
use crate::scale::grade_label;

pub struct TsunamiView {
    pub table_state: TableState,
}

impl TsunamiView {
    pub fn new() -> Self {
        Self {
            table_state: TableState::default(),
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        let prev = self.table_state.selected().map(|i| i.saturating_sub(1));
        self.table_state.select(prev);
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, tsunami: Option<&TsunamiRecord>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Summary
                Constraint::Min(0),    // Areas
            ])
            .split(area);

        let Some(tsunami) = tsunami else {
            let empty = Paragraph::new("No tsunami forecast received yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" TSUNAMI "));
            frame.render_widget(empty, area);
            return;
        };

        self.render_summary(frame, chunks[0], tsunami);
        self.render_areas(frame, chunks[1], tsunami);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, tsunami: &TsunamiRecord) {
        let (status, color) = if tsunami.cancelled {
            ("CANCELLED".to_string(), Color::Green)
        } else {
            (
                grade_label(tsunami.max_grade).to_string(),
                grade_color(tsunami.max_grade),
            )
        };

        let text = vec![
            Line::from(vec![
                Span::styled("STATUS  ", Style::default().fg(Color::Gray)),
                Span::styled(status, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw("  │  "),
                Span::raw(format!("{} AREAS", tsunami.areas.len())),
            ]),
            Line::from(vec![
                Span::styled("ISSUED  ", Style::default().fg(Color::Gray)),
                Span::raw(time_display(&tsunami.time)),
            ]),
        ];

        let paragraph = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" TSUNAMI FORECAST ")
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_areas(&mut self, frame: &mut Frame, area: Rect, tsunami: &TsunamiRecord) {
        let header = Row::new(["Grade", "Area", "Imminent"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let rows: Vec<Row> = tsunami
            .areas
            .iter()
            .map(|a| {
                Row::new(vec![
                    Cell::from(grade_label(a.grade)).style(Style::default().fg(grade_color(a.grade))),
                    Cell::from(name_or_unknown(&a.name).to_string()),
                    Cell::from(if a.immediate { "YES" } else { "" }),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(15), // Grade
            Constraint::Min(20),    // Area
            Constraint::Length(9),  // Imminent
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(" AFFECTED AREAS "))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_stays_within_rows() {
        let mut view = TsunamiView::new();
        view.select_next(2);
        assert_eq!(view.table_state.selected(), Some(0));
        view.select_next(2);
        view.select_next(2);
        assert_eq!(view.table_state.selected(), Some(1));
        view.select_previous();
        view.select_previous();
        assert_eq!(view.table_state.selected(), Some(0));
        view.select_next(0);
        assert_eq!(view.table_state.selected(), None);
    }
}
