//! Setup wizard component
//!
//! Asks for the backend base URL when none is configured and saves it.

use crate::action::Action;
use crate::component::Component;
use crate::config::Config;
use crate::services::api::parse_base_url;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Welcome,
    ApiUrl,
    Confirm,
}

impl SetupStep {
    fn title(&self) -> &str {
        match self {
            SetupStep::Welcome => "Welcome",
            SetupStep::ApiUrl => "Backend URL",
            SetupStep::Confirm => "Confirm",
        }
    }

    fn step_number(&self) -> usize {
        match self {
            SetupStep::Welcome => 1,
            SetupStep::ApiUrl => 2,
            SetupStep::Confirm => 3,
        }
    }
}

pub struct SetupComponent {
    pub step: SetupStep,
    /// Config being built
    pub config: Config,
    pub input: String,
    pub error: Option<String>,
    pub complete: bool,
    /// Where to save; `None` uses the default config location
    save_path: Option<PathBuf>,
}

impl Default for SetupComponent {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl SetupComponent {
    pub fn new(config: Config) -> Self {
        Self {
            step: SetupStep::Welcome,
            input: config.api_base_url.clone(),
            config,
            error: None,
            complete: false,
            save_path: None,
        }
    }

    pub fn with_save_path(mut self, path: PathBuf) -> Self {
        self.save_path = Some(path);
        self
    }

    fn advance_step(&mut self) {
        self.error = None;
        match self.step {
            SetupStep::Welcome => self.step = SetupStep::ApiUrl,
            SetupStep::ApiUrl => match parse_base_url(&self.input) {
                Ok(_) => {
                    self.config.api_base_url = self.input.trim().to_string();
                    self.step = SetupStep::Confirm;
                }
                Err(e) => self.error = Some(e.to_string()),
            },
            SetupStep::Confirm => self.save_config(),
        }
    }

    fn go_back(&mut self) {
        self.error = None;
        self.step = match self.step {
            SetupStep::Welcome | SetupStep::ApiUrl => SetupStep::Welcome,
            SetupStep::Confirm => {
                self.input = self.config.api_base_url.clone();
                SetupStep::ApiUrl
            }
        };
    }

    fn save_config(&mut self) {
        let result = match &self.save_path {
            Some(path) => self.config.save_to(path),
            None => self.config.save(),
        };
        match result {
            Ok(()) => {
                tracing::info!(api_base_url = %self.config.api_base_url, "config saved");
                self.complete = true;
            }
            Err(e) => {
                self.error = Some(format!("Failed to save config: {}", e));
            }
        }
    }
}

impl Component for SetupComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.step {
            SetupStep::Welcome => match key.code {
                KeyCode::Enter => {
                    self.advance_step();
                    Ok(None)
                }
                KeyCode::Esc => Ok(Some(Action::ForceQuit)),
                _ => Ok(None),
            },
            SetupStep::ApiUrl => match key.code {
                KeyCode::Enter => {
                    self.advance_step();
                    Ok(None)
                }
                KeyCode::Esc => {
                    self.go_back();
                    Ok(None)
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    self.error = None;
                    Ok(None)
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    self.error = None;
                    Ok(None)
                }
                _ => Ok(None),
            },
            SetupStep::Confirm => match key.code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.advance_step();
                    if self.complete {
                        Ok(Some(Action::SetupConfirm))
                    } else {
                        Ok(None)
                    }
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Backspace => {
                    self.go_back();
                    Ok(None)
                }
                _ => Ok(None),
            },
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);

        let margin = 4;
        let content_area = Rect::new(
            area.x + margin,
            area.y + margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(2), // Progress
                Constraint::Min(8),    // Content
                Constraint::Length(3), // Help
            ])
            .split(content_area);

        let title = Paragraph::new(Line::from(Span::styled(
            " table-memo Setup ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let progress = format!(
            "Step {} of 3: {}",
            self.step.step_number(),
            self.step.title()
        );
        frame.render_widget(
            Paragraph::new(Span::styled(progress, Style::default().fg(Color::DarkGray))),
            chunks[1],
        );

        let (lines, title, color) = match self.step {
            SetupStep::Welcome => (self.welcome_lines(), " Welcome ", Color::Green),
            SetupStep::ApiUrl => (self.url_lines(), " Backend URL ", Color::Cyan),
            SetupStep::Confirm => (self.confirm_lines(), " Confirm Configuration ", Color::Green),
        };
        let content = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(content, chunks[2]);

        let help_text = match self.step {
            SetupStep::Welcome => " Enter  Continue   Esc  Quit",
            SetupStep::ApiUrl => " Enter  Continue   Esc  Back   Type to edit",
            SetupStep::Confirm => " Enter/y  Save & Continue   Esc/n  Go Back",
        };
        let help = Paragraph::new(Span::styled(help_text, Style::default().fg(Color::DarkGray)))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);

        Ok(())
    }
}

impl SetupComponent {
    fn welcome_lines(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "No backend is configured yet.",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("table-memo browses table metadata served by an HTTP backend"),
            Line::from("and stores memos for each attribute."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to begin...",
                Style::default().fg(Color::Yellow),
            )),
        ]
    }

    fn url_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(""),
            Line::from("Enter the base URL of the backend:"),
            Line::from("(e.g. http://localhost:3000)"),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}_", self.input),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        self.push_error(&mut lines);
        lines
    }

    fn confirm_lines(&self) -> Vec<Line<'static>> {
        let config_dir = Config::config_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.table-memo".to_string());

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Backend URL: ", Style::default().fg(Color::Cyan)),
                Span::raw(self.config.api_base_url.clone()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Config will be saved to: ", Style::default().fg(Color::DarkGray)),
                Span::raw(format!("{}/config.json", config_dir)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter or 'y' to save and continue...",
                Style::default().fg(Color::Yellow),
            )),
        ];
        self.push_error(&mut lines);
        lines
    }

    fn push_error(&self, lines: &mut Vec<Line<'static>>) {
        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(setup: &mut SetupComponent, code: KeyCode) -> Option<Action> {
        setup
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn type_text(setup: &mut SetupComponent, text: &str) {
        for c in text.chars() {
            press(setup, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut setup = SetupComponent::default();
        press(&mut setup, KeyCode::Enter);
        assert_eq!(setup.step, SetupStep::ApiUrl);

        type_text(&mut setup, "ftp://example.com");
        press(&mut setup, KeyCode::Enter);

        assert_eq!(setup.step, SetupStep::ApiUrl);
        assert!(setup.error.is_some());

        // Typing clears the error
        press(&mut setup, KeyCode::Backspace);
        assert!(setup.error.is_none());
    }

    #[test]
    fn test_saves_config_and_confirms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut setup = SetupComponent::default().with_save_path(path.clone());

        press(&mut setup, KeyCode::Enter);
        type_text(&mut setup, "http://localhost:3000");
        press(&mut setup, KeyCode::Enter);
        assert_eq!(setup.step, SetupStep::Confirm);

        let action = press(&mut setup, KeyCode::Char('y'));

        assert_eq!(action, Some(Action::SetupConfirm));
        assert!(setup.complete);
        let saved = Config::load_from(&path).unwrap().unwrap();
        assert_eq!(saved.api_base_url, "http://localhost:3000");
    }

    #[test]
    fn test_back_from_confirm_restores_input() {
        let mut setup = SetupComponent::new(Config {
            api_base_url: "http://old".to_string(),
            ..Default::default()
        });
        press(&mut setup, KeyCode::Enter);
        assert_eq!(setup.input, "http://old");
        press(&mut setup, KeyCode::Enter);
        assert_eq!(setup.step, SetupStep::Confirm);

        press(&mut setup, KeyCode::Esc);

        assert_eq!(setup.step, SetupStep::ApiUrl);
        assert_eq!(setup.input, "http://old");
    }
}
