use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{intensity_color, name_or_unknown};
use crate::api::EewRecord;
use crate::scale::{intensity_label, magnitude_label};

pub struct EewView;

impl EewView {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, eew: Option<&EewRecord>, now: DateTime<Utc>) {
        let Some(eew) = eew else {
            let idle = Paragraph::new("No active early warning")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" EEW "));
            frame.render_widget(idle, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // Headline
                Constraint::Min(0),    // Areas
            ])
            .split(area);

        let (headline, accent) = if eew.is_warning {
            ("EMERGENCY EARTHQUAKE WARNING", Color::Red)
        } else {
            ("EARTHQUAKE EARLY WARNING (FORECAST)", Color::Yellow)
        };

        let text = vec![
            Line::from(Span::styled(
                headline,
                Style::default()
                    .fg(Color::White)
                    .bg(accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("EPICENTER   ", Style::default().fg(Color::Gray)),
                Span::styled(
                    name_or_unknown(&eew.hypocenter),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("MAGNITUDE   ", Style::default().fg(Color::Gray)),
                Span::raw(magnitude_label(eew.magnitude)),
            ]),
            Line::from(vec![
                Span::styled("FORECAST    ", Style::default().fg(Color::Gray)),
                Span::styled(
                    intensity_label(eew.max_scale),
                    Style::default()
                        .fg(intensity_color(eew.max_scale))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("ORIGIN      ", Style::default().fg(Color::Gray)),
                Span::raw(format!("{}s ago", eew.age_secs(now).max(0))),
            ]),
        ];

        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" EARLY WARNING ")
                    .border_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
            );
        frame.render_widget(paragraph, chunks[0]);

        let areas = if eew.areas.is_empty() {
            "No area forecast".to_string()
        } else {
            eew.areas.join("  ·  ")
        };
        let areas = Paragraph::new(areas)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" STRONG SHAKING EXPECTED "));
        frame.render_widget(areas, chunks[1]);
    }
}
