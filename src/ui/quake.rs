use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{intensity_color, name_or_unknown, time_display};
use crate::api::QuakeRecord;
use crate::scale::{depth_label, intensity_label, magnitude_label, tsunami_comment};

pub struct QuakeView;

impl QuakeView {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, quake: Option<&QuakeRecord>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" LATEST EARTHQUAKE ");

        let Some(quake) = quake else {
            let empty = Paragraph::new("No earthquake report received yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        };

        let scale_color = intensity_color(quake.max_scale);
        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("MAX INTENSITY  ", Style::default().fg(Color::Gray)),
                Span::styled(
                    intensity_label(quake.max_scale),
                    Style::default().fg(scale_color).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("EPICENTER      ", Style::default().fg(Color::Gray)),
                Span::styled(
                    name_or_unknown(&quake.hypocenter),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("MAGNITUDE      ", Style::default().fg(Color::Gray)),
                Span::styled(magnitude_label(quake.magnitude), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(vec![
                Span::styled("DEPTH          ", Style::default().fg(Color::Gray)),
                Span::raw(depth_label(quake.depth)),
            ]),
            Line::from(vec![
                Span::styled("TIME           ", Style::default().fg(Color::Gray)),
                Span::raw(time_display(&quake.time)),
            ]),
            Line::from(vec![
                Span::styled("TSUNAMI        ", Style::default().fg(Color::Gray)),
                Span::raw(tsunami_comment(&quake.domestic_tsunami)),
            ]),
        ];

        let paragraph = Paragraph::new(text).block(block.border_style(Style::default().fg(scale_color)));
        frame.render_widget(paragraph, area);
    }
}
