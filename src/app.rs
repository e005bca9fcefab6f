//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! Intent actions go to the `Controller`; App only keeps presentation state
//! (focus, overlays, highlighted rows) in step with the `Screen`.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, render_error_banner, render_help_bar, render_status_bar,
    AttributeCards, HelpDialog, MemoEditor, QuitDialog, SampleDialog, SetupComponent,
    StatusContext, TableSelector,
};
use crate::config::Config;
use crate::controller::Controller;
use crate::model::modal::{Modal, ModalStack};
use crate::model::ui::{AppMode, Focus};
use crate::services::{ApiClient, ApiError, TableApi};
use crate::view::{Screen, View};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::sync::Arc;
use std::time::Instant;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Current application mode
    pub mode: AppMode,

    pub config: Config,

    /// Present once a backend URL is configured
    pub controller: Option<Controller>,

    /// What the controller has rendered
    pub screen: Screen,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Pane that receives navigation keys
    pub focus: Focus,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    pub status_message: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub setup: SetupComponent,
    pub table_selector: TableSelector,
    pub attribute_cards: AttributeCards,
    pub sample_dialog: SampleDialog,
    pub memo_editor: MemoEditor,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create the app, starting in setup mode when no usable URL is configured
    pub fn new(config: Config) -> App {
        let mut app = Self::create_app(config);
        if app.config.has_api_url() {
            if let Err(e) = app.connect() {
                tracing::warn!(error = %e, "configured backend URL is unusable");
                app.setup.error = Some(e.to_string());
            }
        }
        app
    }

    /// Create the app around an already built backend
    pub fn with_api(config: Config, api: Arc<dyn TableApi>) -> App {
        let mut app = Self::create_app(config);
        app.start(api);
        app
    }

    fn create_app(config: Config) -> App {
        App {
            mode: AppMode::Setup,
            setup: SetupComponent::new(config.clone()),
            config,
            controller: None,
            screen: Screen::new(),
            modals: ModalStack::new(),
            focus: Focus::default(),
            should_quit: false,
            status_message: None,
            table_selector: TableSelector::new(),
            attribute_cards: AttributeCards::new(),
            sample_dialog: SampleDialog::default(),
            memo_editor: MemoEditor::default(),
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
        }
    }

    fn connect(&mut self) -> Result<(), ApiError> {
        let client = ApiClient::new(&self.config.api_base_url, self.config.request_timeout())?;
        tracing::info!(base_url = %client.base_url(), "connecting to backend");
        self.start(Arc::new(client));
        Ok(())
    }

    /// Switch to running mode and load the table list
    fn start(&mut self, api: Arc<dyn TableApi>) {
        let mut controller =
            Controller::new(api).with_flash_duration(self.config.flash_duration());
        self.screen = Screen::new();
        controller.handle(&Action::RefreshTables, &mut self.screen);

        self.controller = Some(controller);
        self.mode = AppMode::Running;
    }

    fn is_busy(&self) -> bool {
        self.controller.as_ref().is_some_and(Controller::is_busy)
    }

    /// Attribute the open memo editor is bound to
    fn editing(&self) -> Option<&str> {
        match self.modals.top() {
            Some(Modal::MemoEditor { attribute_name }) => Some(attribute_name),
            _ => None,
        }
    }

    /// Bring components in line with the screen after it may have changed
    fn sync_components(&mut self) {
        self.table_selector.sync(&self.screen.table_options);

        if self.attribute_cards.sync(&self.screen.attributes) {
            self.modals.remove_memo_editors();
        }

        let stale_editor = self
            .editing()
            .is_some_and(|name| self.screen.card(name).is_none());
        if stale_editor {
            self.modals.remove_memo_editors();
        }
    }

    fn dispatch_intent(&mut self, action: &Action) {
        let Some(controller) = self.controller.as_mut() else {
            tracing::debug!(%action, "no backend configured, ignoring");
            return;
        };
        controller.handle(action, &mut self.screen);
        self.sync_components();
    }

    fn handle_running_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = self.modals.top() {
            return match modal {
                Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
                Modal::Help => self.help_dialog.handle_key_event(key),
                Modal::MemoEditor { .. } => self.memo_editor.handle_key_event(key),
            };
        }

        if self.screen.samples.is_visible() {
            return self.sample_dialog.handle_key_event(key);
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Tab | KeyCode::BackTab => Some(Action::FocusNext),
            KeyCode::Char('r') => Some(Action::RefreshTables),
            KeyCode::Char('s') => Some(Action::ShowSample),
            KeyCode::Char('x') if self.screen.error.is_some() => Some(Action::DismissError),
            _ => match self.focus {
                Focus::Tables => self.table_selector.handle_key_event(key)?,
                Focus::Attributes => self.attribute_cards.handle_key_event(key)?,
            },
        };
        Ok(action)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        match self.mode {
            AppMode::Setup => self.setup.handle_key_event(key),
            AppMode::Running => self.handle_running_key_event(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                if let Some(controller) = self.controller.as_mut() {
                    if controller.poll(Instant::now(), &mut self.screen) {
                        self.sync_components();
                    }
                }
            }
            Action::Resize(_, _) => {}
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::SetupConfirm => {
                self.config = self.setup.config.clone();
                if let Err(e) = self.connect() {
                    self.setup.error = Some(e.to_string());
                } else {
                    self.status_message = Some("Configuration saved".to_string());
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Intents (delegate to Controller)
            // ─────────────────────────────────────────────────────────────────
            Action::RefreshTables
            | Action::SelectTable(_)
            | Action::ShowSample
            | Action::DismissError => {
                self.status_message = None;
                self.dispatch_intent(&action);
            }
            Action::SaveMemo(_) => {
                self.dispatch_intent(&action);
                if self.editing().is_some() {
                    self.modals.pop();
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Navigation (delegate to the focused pane)
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem | Action::PrevItem | Action::FirstItem | Action::LastItem => {
                match self.focus {
                    Focus::Tables => self.table_selector.update(action)?,
                    Focus::Attributes => self.attribute_cards.update(action)?,
                };
            }
            Action::FocusNext => {
                self.focus = self.focus.toggle();
            }

            // ─────────────────────────────────────────────────────────────────
            // Scrolling (delegate to SampleDialog)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                self.sample_dialog.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.requests_running = self.is_busy();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::OpenMemoEditor(attribute_name) => {
                if self.screen.card(&attribute_name).is_some() {
                    self.memo_editor.open(&attribute_name);
                    self.modals.push(Modal::MemoEditor { attribute_name });
                }
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::CloseSample => {
                self.screen.hide_sample_panel();
                self.sample_dialog.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Memo Editing
            // ─────────────────────────────────────────────────────────────────
            Action::MemoInput(c) => {
                if let Some(name) = self.editing().map(str::to_string) {
                    self.screen.push_memo_char(&name, c);
                }
            }
            Action::MemoBackspace => {
                if let Some(name) = self.editing().map(str::to_string) {
                    self.screen.pop_memo_char(&name);
                }
            }
            Action::MemoClear => {
                if let Some(name) = self.editing().map(str::to_string) {
                    self.screen.clear_memo_input(&name);
                }
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Setup => self.setup.draw(frame, area)?,
            AppMode::Running => {
                self.sync_components();

                let layout = calculate_main_layout(area, self.screen.error.is_some());
                let shown_table = self.screen.attributes.table_name();

                self.table_selector.draw_with_options(
                    frame,
                    layout.tables,
                    &self.screen.table_options,
                    shown_table,
                    self.focus == Focus::Tables,
                );
                self.attribute_cards.draw_with_panel(
                    frame,
                    layout.attributes,
                    &self.screen.attributes,
                    self.focus == Focus::Attributes,
                );

                let ctx = StatusContext {
                    api_base_url: &self.config.api_base_url,
                    current_table: shown_table,
                    loading: self.screen.loading,
                    status_message: self.status_message.as_deref(),
                };
                render_status_bar(frame, layout.status, &ctx);

                if let (Some(error_area), Some(message)) = (layout.error, &self.screen.error) {
                    render_error_banner(frame, error_area, message);
                }
                render_help_bar(frame, layout.help, self.focus);

                if self.screen.samples.is_visible() {
                    self.sample_dialog.draw_with_panel(
                        frame,
                        area,
                        &self.screen.samples,
                        shown_table,
                    )?;
                }

                match self.modals.top() {
                    Some(Modal::QuitConfirm) => self.quit_dialog.draw(frame, area)?,
                    Some(Modal::Help) => self.help_dialog.draw(frame, area)?,
                    Some(Modal::MemoEditor { attribute_name }) => {
                        if let Some(card) = self.screen.card(attribute_name) {
                            self.memo_editor.draw_with_card(frame, area, card);
                        }
                    }
                    None => {}
                }
            }
        }
        Ok(())
    }
}
