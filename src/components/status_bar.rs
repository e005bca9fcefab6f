//! Status line, error banner and help bar drawn under the main panes

use crate::model::ui::Focus;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Context needed for rendering the status line
pub struct StatusContext<'a> {
    pub api_base_url: &'a str,
    pub current_table: Option<&'a str>,
    pub loading: bool,
    pub status_message: Option<&'a str>,
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &StatusContext) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", ctx.api_base_url),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    if let Some(table) = ctx.current_table {
        spans.push(Span::styled(
            table.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    if ctx.loading {
        spans.push(Span::styled(
            " Loading... ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(status) = ctx.status_message {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  (x to dismiss)", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Error ")
            .border_style(Style::default().fg(Color::Red)),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn key_span(key: &'static str, color: Color) -> Span<'static> {
    Span::styled(
        key,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

pub fn render_help_bar(frame: &mut Frame, area: Rect, focus: Focus) {
    let mut help_spans = vec![
        key_span(" q ", Color::Yellow),
        Span::raw("Quit "),
        key_span(" Tab ", Color::Cyan),
        Span::raw("Switch pane "),
    ];

    match focus {
        Focus::Tables => {
            help_spans.push(key_span(" Enter ", Color::Green));
            help_spans.push(Span::raw("Select "));
            help_spans.push(key_span(" r ", Color::Green));
            help_spans.push(Span::raw("Reload "));
        }
        Focus::Attributes => {
            help_spans.push(key_span(" Enter ", Color::Green));
            help_spans.push(Span::raw("Edit memo "));
        }
    }

    help_spans.push(key_span(" s ", Color::Cyan));
    help_spans.push(Span::raw("Samples "));
    help_spans.push(key_span(" ? ", Color::White));
    help_spans.push(Span::raw("Help"));

    let paragraph = Paragraph::new(Line::from(help_spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}
