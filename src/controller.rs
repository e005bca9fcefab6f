//! Event controller
//!
//! Maps the user's intent actions to backend requests and applies the replies
//! to the application state and the view. Requests run in the background;
//! `poll` must be called regularly (every tick) to apply what came back.

use crate::action::Action;
use crate::model::AppState;
use crate::services::{ApiOutcome, ApiRequest, OperationError, Reply, RequestRunner, TableApi};
use crate::view::{SaveFeedback, View};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long the "saved" indication stays on a card
pub const DEFAULT_FLASH_DURATION: Duration = Duration::from_millis(2000);

/// Per-attribute deadlines for reverting the save indication
///
/// A newer save on the same attribute replaces the older deadline.
#[derive(Debug, Default)]
pub struct FlashTimers {
    deadlines: HashMap<String, Instant>,
}

impl FlashTimers {
    pub fn schedule(&mut self, attribute_name: &str, deadline: Instant) {
        self.deadlines.insert(attribute_name.to_string(), deadline);
    }

    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
    }

    /// Remove and return every attribute whose deadline has passed
    pub fn expired(&mut self, now: Instant) -> Vec<String> {
        let mut expired: Vec<String> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(name, _)| name.clone())
            .collect();
        expired.sort();
        for name in &expired {
            self.deadlines.remove(name);
        }
        expired
    }

    pub fn is_pending(&self, attribute_name: &str) -> bool {
        self.deadlines.contains_key(attribute_name)
    }
}

/// Owns the application state and drives requests for user actions
pub struct Controller {
    state: AppState,
    runner: RequestRunner,
    /// Bumped whenever the selection changes; replies from older
    /// generations are discarded
    generation: u64,
    flash: FlashTimers,
    flash_duration: Duration,
}

impl Controller {
    pub fn new(api: Arc<dyn TableApi>) -> Self {
        Self {
            state: AppState::new(),
            runner: RequestRunner::new(api),
            generation: 0,
            flash: FlashTimers::default(),
            flash_duration: DEFAULT_FLASH_DURATION,
        }
    }

    pub fn with_flash_duration(mut self, flash_duration: Duration) -> Self {
        self.flash_duration = flash_duration;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Whether any request is still waiting for its reply
    pub fn is_busy(&self) -> bool {
        self.runner.in_flight() > 0
    }

    /// Handle an intent action. Returns `false` for actions it does not own.
    pub fn handle(&mut self, action: &Action, view: &mut dyn View) -> bool {
        match action {
            Action::RefreshTables => self.refresh_tables(view),
            Action::SelectTable(table_name) => self.select_table(table_name.as_deref(), view),
            Action::ShowSample => self.show_sample(view),
            Action::SaveMemo(attribute_name) => self.save_memo(attribute_name, view),
            Action::DismissError => view.clear_error(),
            _ => return false,
        }
        true
    }

    /// Apply every reply that has arrived and revert expired save indications
    ///
    /// Returns `true` if anything was applied.
    pub fn poll(&mut self, now: Instant, view: &mut dyn View) -> bool {
        let replies = self.runner.poll();
        let had_replies = !replies.is_empty();
        for reply in replies {
            self.apply(reply, now, view);
        }

        let expired = self.flash.expired(now);
        for attribute_name in &expired {
            view.render_save_feedback(attribute_name, SaveFeedback::Idle);
        }

        had_replies || !expired.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn refresh_tables(&mut self, view: &mut dyn View) {
        self.submit(ApiRequest::ListTables, view);
    }

    fn select_table(&mut self, table_name: Option<&str>, view: &mut dyn View) {
        self.generation += 1;

        // Save timers stay armed until the cards they belong to are replaced
        match table_name.filter(|name| !name.is_empty()) {
            None => {
                self.state.clear();
                self.flash.cancel_all();
                view.hide_attributes_panel();
                view.hide_sample_panel();
            }
            Some(table_name) => {
                self.submit(
                    ApiRequest::TableInfo {
                        table_name: table_name.to_string(),
                    },
                    view,
                );
            }
        }
    }

    fn show_sample(&mut self, view: &mut dyn View) {
        let Some(table_name) = self.state.current_table.clone() else {
            debug!("show sample ignored: no table selected");
            return;
        };
        self.submit(ApiRequest::SampleRows { table_name }, view);
    }

    fn save_memo(&mut self, attribute_name: &str, view: &mut dyn View) {
        let Some(table_name) = self.state.current_table.clone() else {
            debug!(attribute_name, "save memo ignored: no table selected");
            return;
        };
        let description = view
            .memo_input(attribute_name)
            .unwrap_or_default()
            .trim()
            .to_string();

        self.submit(
            ApiRequest::SetMemo {
                table_name,
                attribute_name: attribute_name.to_string(),
                description,
            },
            view,
        );
    }

    fn submit(&mut self, request: ApiRequest, view: &mut dyn View) {
        self.runner.submit(request, self.generation);
        view.render_loading(true);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replies
    // ─────────────────────────────────────────────────────────────────────────

    fn apply(&mut self, reply: Reply, now: Instant, view: &mut dyn View) {
        view.render_loading(self.is_busy());

        let Reply { ticket, result } = reply;
        let current = self.is_current(&ticket.request, ticket.generation);

        match result {
            Err(err) => self.fail(err, current, view),
            Ok(_) if !current => {
                debug!(id = ticket.id, operation = %ticket.request.operation(), "discarding superseded reply");
            }
            Ok(ApiOutcome::Tables(names)) => {
                info!(count = names.len(), "table list loaded");
                view.render_table_options(&names);
            }
            Ok(ApiOutcome::TableInfo(table_info)) => {
                info!(table = %table_info.table_name, attributes = table_info.attributes.len(), "table selected");
                self.state.select(table_info.clone());
                self.flash.cancel_all();
                view.render_attributes_panel(&table_info);
            }
            Ok(ApiOutcome::SampleRows(samples)) => {
                view.render_sample_panel(&samples);
            }
            Ok(ApiOutcome::MemoSaved) => {
                if let ApiRequest::SetMemo {
                    table_name,
                    attribute_name,
                    description,
                } = ticket.request
                {
                    self.memo_saved(&table_name, &attribute_name, &description, now, view);
                }
            }
        }
    }

    fn memo_saved(
        &mut self,
        table_name: &str,
        attribute_name: &str,
        description: &str,
        now: Instant,
        view: &mut dyn View,
    ) {
        info!(table = table_name, attribute = attribute_name, "memo saved");
        if !self.state.is_current(table_name) {
            return;
        }
        if !self.state.update_memo(attribute_name, description) {
            debug!(attribute = attribute_name, "saved memo for an attribute not in the current table");
        }
        view.render_save_feedback(attribute_name, SaveFeedback::Saved);
        self.flash.schedule(attribute_name, now + self.flash_duration);
    }

    fn fail(&mut self, err: OperationError, current: bool, view: &mut dyn View) {
        if !current {
            debug!(error = %err, "superseded request failed");
            return;
        }
        warn!(operation = %err.operation, error = %err.source, "request failed");
        view.render_error(&err.to_string());
    }

    /// Whether a reply still matters for the current selection
    fn is_current(&self, request: &ApiRequest, generation: u64) -> bool {
        match request {
            ApiRequest::ListTables => true,
            // Memo saves are checked against the table name when applied
            ApiRequest::SetMemo { .. } => true,
            ApiRequest::TableInfo { .. } => generation == self.generation,
            ApiRequest::SampleRows { table_name } => {
                generation == self.generation && self.state.is_current(table_name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeInfo, TableInfo};
    use crate::services::Operation;
    use crate::testing::{FakeApi, RecordingView, ViewCall};
    use crate::view::{AttributesPanel, SamplePanel};
    use serde_json::json;
    use std::thread;

    fn orders() -> TableInfo {
        TableInfo {
            table_name: "orders".to_string(),
            attributes: vec![AttributeInfo::new("id", "number")],
        }
    }

    fn users() -> TableInfo {
        TableInfo {
            table_name: "users".to_string(),
            attributes: vec![
                AttributeInfo::new("email", "string").with_description("login"),
                AttributeInfo::new("age", "number"),
            ],
        }
    }

    fn backend() -> Arc<FakeApi> {
        Arc::new(
            FakeApi::new()
                .with_tables(&["users", "orders"])
                .with_table(users())
                .with_table(orders())
                .with_samples("orders", vec![json!({"id": 1}), json!({"id": 2})]),
        )
    }

    /// Poll until every request has replied
    fn settle(controller: &mut Controller, view: &mut RecordingView) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.is_busy() && Instant::now() < deadline {
            controller.poll(Instant::now(), view);
            thread::sleep(Duration::from_millis(2));
        }
        assert!(!controller.is_busy(), "requests did not settle");
    }

    fn select(controller: &mut Controller, view: &mut RecordingView, table: &str) {
        controller.handle(&Action::SelectTable(Some(table.to_string())), view);
        settle(controller, view);
    }

    #[test]
    fn test_refresh_tables_renders_options() {
        let mut controller = Controller::new(backend());
        let mut view = RecordingView::new();

        assert!(controller.handle(&Action::RefreshTables, &mut view));
        settle(&mut controller, &mut view);

        let values: Vec<&str> = view
            .screen
            .table_options
            .iter()
            .map(|o| o.value_str())
            .collect();
        assert_eq!(values, vec!["", "users", "orders"]);
        assert_eq!(view.last_loading(), Some(false));
    }

    #[test]
    fn test_select_orders_renders_single_card() {
        let mut controller = Controller::new(backend());
        let mut view = RecordingView::new();

        select(&mut controller, &mut view, "orders");

        let cards = view.screen.attributes.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].attribute_name, "id");
        assert_eq!(cards[0].memo_input, "");
        assert_eq!(cards[0].type_hint, "number");
        assert_eq!(controller.state().current_table.as_deref(), Some("orders"));
    }

    #[test]
    fn test_selecting_table_hides_sample_panel() {
        let mut controller = Controller::new(backend());
        let mut view = RecordingView::new();

        select(&mut controller, &mut view, "orders");
        controller.handle(&Action::ShowSample, &mut view);
        settle(&mut controller, &mut view);
        assert!(matches!(view.screen.samples, SamplePanel::Blocks(ref b) if b.len() == 2));

        select(&mut controller, &mut view, "users");

        assert_eq!(view.screen.samples, SamplePanel::Hidden);
    }

    #[test]
    fn test_clearing_selection_makes_no_call() {
        let api = backend();
        let mut controller = Controller::new(api.clone());
        let mut view = RecordingView::new();

        select(&mut controller, &mut view, "orders");
        let calls_before = api.calls().len();

        controller.handle(&Action::SelectTable(None), &mut view);

        assert!(!controller.is_busy());
        assert_eq!(api.calls().len(), calls_before);
        assert_eq!(view.screen.attributes, AttributesPanel::Hidden);
        assert_eq!(controller.state().current_table, None);
    }

    #[test]
    fn test_show_sample_without_table_is_noop() {
        let api = backend();
        let mut controller = Controller::new(api.clone());
        let mut view = RecordingView::new();

        controller.handle(&Action::ShowSample, &mut view);

        assert!(!controller.is_busy());
        assert!(api.calls().is_empty());
        assert!(view.calls.is_empty());
    }

    #[test]
    fn test_save_memo_trims_and_updates_state() {
        let api = backend();
        let mut controller = Controller::new(api.clone());
        let mut view = RecordingView::new();
        select(&mut controller, &mut view, "orders");

        view.screen.clear_memo_input("id");
        for c in "  hello  ".chars() {
            view.screen.push_memo_char("id", c);
        }
        controller.handle(&Action::SaveMemo("id".to_string()), &mut view);
        settle(&mut controller, &mut view);

        assert_eq!(
            api.calls().last(),
            Some(&ApiRequest::SetMemo {
                table_name: "orders".to_string(),
                attribute_name: "id".to_string(),
                description: "hello".to_string(),
            })
        );
        assert_eq!(
            controller
                .state()
                .attribute("id")
                .and_then(|a| a.description.as_deref()),
            Some("hello")
        );
        assert_eq!(
            view.screen.card("id").unwrap().feedback,
            SaveFeedback::Saved
        );
    }

    #[test]
    fn test_save_memo_unknown_attribute_calls_backend_without_state_change() {
        let api = backend();
        let mut controller = Controller::new(api.clone());
        let mut view = RecordingView::new();
        select(&mut controller, &mut view, "orders");
        let before = controller.state().clone();

        controller.handle(&Action::SaveMemo("ghost".to_string()), &mut view);
        settle(&mut controller, &mut view);

        assert_eq!(
            api.calls().last(),
            Some(&ApiRequest::SetMemo {
                table_name: "orders".to_string(),
                attribute_name: "ghost".to_string(),
                description: String::new(),
            })
        );
        assert_eq!(controller.state(), &before);
    }

    #[test]
    fn test_save_memo_without_table_is_noop() {
        let api = backend();
        let mut controller = Controller::new(api.clone());
        let mut view = RecordingView::new();

        controller.handle(&Action::SaveMemo("id".to_string()), &mut view);

        assert!(!controller.is_busy());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_saved_feedback_reverts_after_delay() {
        let mut controller =
            Controller::new(backend()).with_flash_duration(Duration::from_secs(2));
        let mut view = RecordingView::new();
        select(&mut controller, &mut view, "orders");

        controller.handle(&Action::SaveMemo("id".to_string()), &mut view);
        settle(&mut controller, &mut view);
        assert_eq!(view.screen.card("id").unwrap().feedback, SaveFeedback::Saved);

        // Poll well before the deadline: still shown
        controller.poll(Instant::now(), &mut view);
        assert_eq!(view.screen.card("id").unwrap().feedback, SaveFeedback::Saved);

        controller.poll(Instant::now() + Duration::from_secs(3), &mut view);
        assert_eq!(view.screen.card("id").unwrap().feedback, SaveFeedback::Idle);
    }

    #[test]
    fn test_saved_feedback_reverts_when_next_table_fails() {
        let mut controller =
            Controller::new(backend()).with_flash_duration(Duration::from_secs(2));
        let mut view = RecordingView::new();
        select(&mut controller, &mut view, "orders");

        controller.handle(&Action::SaveMemo("id".to_string()), &mut view);
        settle(&mut controller, &mut view);
        assert_eq!(view.screen.card("id").unwrap().feedback, SaveFeedback::Saved);

        select(&mut controller, &mut view, "missing");
        assert_eq!(
            view.errors(),
            vec!["Failed to fetch table info: API Error: 404 Not Found"]
        );
        assert_eq!(view.screen.attributes.table_name(), Some("orders"));

        controller.poll(Instant::now() + Duration::from_secs(60), &mut view);
        assert_eq!(view.screen.card("id").unwrap().feedback, SaveFeedback::Idle);
    }

    #[test]
    fn test_newer_save_replaces_flash_deadline() {
        let mut timers = FlashTimers::default();
        let start = Instant::now();

        timers.schedule("id", start + Duration::from_secs(2));
        timers.schedule("id", start + Duration::from_secs(5));

        assert!(timers.expired(start + Duration::from_secs(3)).is_empty());
        assert!(timers.is_pending("id"));
        assert_eq!(timers.expired(start + Duration::from_secs(5)), vec!["id"]);
        assert!(!timers.is_pending("id"));
    }

    #[test]
    fn test_http_500_shows_tagged_error_without_state_change() {
        let api = Arc::new(FakeApi::new().failing_with(500));
        let mut controller = Controller::new(api);
        let mut view = RecordingView::new();

        controller.handle(&Action::SelectTable(Some("orders".to_string())), &mut view);
        settle(&mut controller, &mut view);

        let errors = view.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with(Operation::TableInfo.failure_message()));
        assert!(errors[0].contains("500"));
        assert!(!view.screen.loading);
        assert_eq!(controller.state(), &AppState::default());
    }

    #[test]
    fn test_each_operation_tags_its_error() {
        let api = Arc::new(FakeApi::new().failing_with(500));
        let mut controller = Controller::new(api);
        let mut view = RecordingView::new();

        controller.handle(&Action::RefreshTables, &mut view);
        settle(&mut controller, &mut view);

        assert!(view.errors()[0].starts_with("Failed to fetch table list"));
        assert_eq!(view.screen.table_options.len(), 1);
    }

    #[test]
    fn test_dismiss_error() {
        let mut controller = Controller::new(backend());
        let mut view = RecordingView::new();
        view.screen.error = Some("old".to_string());

        assert!(controller.handle(&Action::DismissError, &mut view));

        assert_eq!(view.calls, vec![ViewCall::ClearError]);
        assert!(view.screen.error.is_none());
    }

    #[test]
    fn test_loading_stays_on_while_requests_overlap() {
        let api = backend();
        let gate = api.gate("users");
        let mut controller = Controller::new(api);
        let mut view = RecordingView::new();

        controller.handle(&Action::SelectTable(Some("users".to_string())), &mut view);
        controller.handle(&Action::RefreshTables, &mut view);

        // Wait for the table list reply while the table info is held
        let deadline = Instant::now() + Duration::from_secs(5);
        while view.screen.table_options.len() == 1 && Instant::now() < deadline {
            controller.poll(Instant::now(), &mut view);
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(view.screen.table_options.len(), 3);
        assert!(view.screen.loading);

        gate.send(()).unwrap();
        settle(&mut controller, &mut view);
        assert!(!view.screen.loading);
    }

    #[test]
    fn test_superseded_table_reply_is_discarded() {
        let api = backend();
        let gate = api.gate("users");
        let mut controller = Controller::new(api);
        let mut view = RecordingView::new();

        // "users" is held back, "orders" answers first
        controller.handle(&Action::SelectTable(Some("users".to_string())), &mut view);
        controller.handle(&Action::SelectTable(Some("orders".to_string())), &mut view);

        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.state().current_table.is_none() && Instant::now() < deadline {
            controller.poll(Instant::now(), &mut view);
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(controller.state().current_table.as_deref(), Some("orders"));

        gate.send(()).unwrap();
        settle(&mut controller, &mut view);

        assert_eq!(controller.state().current_table.as_deref(), Some("orders"));
        assert_eq!(view.screen.attributes.table_name(), Some("orders"));
        assert!(!view
            .calls
            .contains(&ViewCall::AttributesPanel("users".to_string())));
    }

    #[test]
    fn test_sample_for_previous_table_is_discarded() {
        let mut controller = Controller::new(backend());
        let mut view = RecordingView::new();
        select(&mut controller, &mut view, "orders");

        controller.handle(&Action::ShowSample, &mut view);
        controller.handle(&Action::SelectTable(Some("users".to_string())), &mut view);
        settle(&mut controller, &mut view);

        assert_eq!(view.screen.samples, SamplePanel::Hidden);
        assert!(!view.calls.iter().any(|c| matches!(c, ViewCall::SamplePanel(_))));
    }

    #[test]
    fn test_non_intent_actions_are_not_handled() {
        let mut controller = Controller::new(backend());
        let mut view = RecordingView::new();
        assert!(!controller.handle(&Action::Tick, &mut view));
        assert!(!controller.handle(&Action::OpenHelp, &mut view));
    }
}
