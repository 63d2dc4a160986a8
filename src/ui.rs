use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::effects::SignalSink;
use crate::session::{Session, Status};
use crate::util::format_time;

const VERTICAL_MARGIN: u16 = 2;

/// One full frame of the breathing timer.
///
/// Rendering is a pure function of session state plus the two pieces of
/// shell state the session does not own (the raw limit field and the sound
/// switch); drawing the same inputs twice paints the same screen.
pub struct SessionScreen<'a, S: SignalSink> {
    pub session: &'a Session<S>,
    pub limit_input: &'a str,
    pub sound: bool,
}

impl<S: SignalSink> Widget for SessionScreen<'_, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let magenta_bold_style = Style::default().patch(bold_style).fg(Color::Magenta);
        let italic_dim_style = Style::default()
            .add_modifier(Modifier::ITALIC)
            .add_modifier(Modifier::DIM);

        let session = self.session;

        let lines: Vec<Line> = match session.status() {
            Status::Running => vec![
                Line::from(Span::styled(
                    format!("Total Time: {}", format_time(session.elapsed_secs())),
                    dim_style,
                )),
                Line::default(),
                Line::from(Span::styled(session.phase().to_string(), bold_style)),
                Line::from(Span::styled(
                    session.countdown().to_string(),
                    magenta_bold_style,
                )),
            ],
            Status::Idle => {
                let limit = if self.limit_input.is_empty() {
                    "none".to_string()
                } else {
                    format!("{} min", self.limit_input)
                };
                vec![
                    Line::from(Span::styled("Paced Breathing", bold_style)),
                    Line::default(),
                    Line::from(format!(
                        "Sound: {}  (m)",
                        if self.sound { "on" } else { "off" }
                    )),
                    Line::from(format!("Time limit: {}  (type minutes)", limit)),
                    Line::from(format!("Inhale: {}s", session.config().inhale_secs)),
                    Line::from(format!(
                        "Exhale: {}s  (Up/Down)",
                        session.config().exhale_secs
                    )),
                    Line::default(),
                    Line::from(Span::styled("Press space to begin", italic_dim_style)),
                    Line::default(),
                    Line::from(Span::styled(
                        "space start/pause · F1/F2/F3 start 2/5/10 min · esc quit",
                        dim_style,
                    )),
                ]
            }
            Status::Complete => vec![
                Line::from(Span::styled("Complete!", green_bold_style)),
                Line::from(Span::styled(
                    format!("Total Time: {}", format_time(session.elapsed_secs())),
                    dim_style,
                )),
                Line::default(),
                Line::from(Span::styled("Press r to go back to start", italic_dim_style)),
            ],
        };

        let content_height = lines.len() as u16;
        let pad = area
            .height
            .saturating_sub(content_height + VERTICAL_MARGIN * 2)
            / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(pad),
                    Constraint::Length(content_height),
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(area);

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }
}
