//! Test doubles shared by unit tests

use crate::model::{SampleRow, TableInfo};
use crate::services::{ApiError, ApiRequest, TableApi};
use crate::view::{SaveFeedback, Screen, View};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

/// In-memory backend with canned responses
#[derive(Default)]
pub struct FakeApi {
    tables: Vec<String>,
    infos: HashMap<String, TableInfo>,
    samples: HashMap<String, Vec<SampleRow>>,
    fail_status: Option<u16>,
    panic: bool,
    gates: Mutex<HashMap<String, Receiver<()>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(mut self, tables: &[&str]) -> Self {
        self.tables = tables.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_table(mut self, info: TableInfo) -> Self {
        self.infos.insert(info.table_name.clone(), info);
        self
    }

    pub fn with_samples(mut self, table_name: &str, rows: Vec<SampleRow>) -> Self {
        self.samples.insert(table_name.to_string(), rows);
        self
    }

    /// Every call fails with this HTTP status
    pub fn failing_with(mut self, status: u16) -> Self {
        self.fail_status = Some(status);
        self
    }

    /// Every call panics
    pub fn panicking(mut self) -> Self {
        self.panic = true;
        self
    }

    /// Hold the next `table_info` call for `table_name` until the returned
    /// sender fires (or is dropped)
    pub fn gate(&self, table_name: &str) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.gates
            .lock()
            .unwrap()
            .insert(table_name.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(request);
        if self.panic {
            panic!("fake api configured to panic");
        }
        match self.fail_status {
            Some(status) => Err(ApiError::Http {
                status,
                status_text: "Internal Server Error".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Http {
            status: 404,
            status_text: "Not Found".to_string(),
        }
    }
}

impl TableApi for FakeApi {
    fn list_tables(&self) -> Result<Vec<String>, ApiError> {
        self.record(ApiRequest::ListTables)?;
        Ok(self.tables.clone())
    }

    fn table_info(&self, table_name: &str) -> Result<TableInfo, ApiError> {
        let gate = self.gates.lock().unwrap().remove(table_name);
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        self.record(ApiRequest::TableInfo {
            table_name: table_name.to_string(),
        })?;
        self.infos.get(table_name).cloned().ok_or_else(Self::not_found)
    }

    fn sample_rows(&self, table_name: &str) -> Result<Vec<SampleRow>, ApiError> {
        self.record(ApiRequest::SampleRows {
            table_name: table_name.to_string(),
        })?;
        Ok(self.samples.get(table_name).cloned().unwrap_or_default())
    }

    fn set_attribute_memo(
        &self,
        table_name: &str,
        attribute_name: &str,
        description: &str,
    ) -> Result<(), ApiError> {
        self.record(ApiRequest::SetMemo {
            table_name: table_name.to_string(),
            attribute_name: attribute_name.to_string(),
            description: description.to_string(),
        })
    }
}

/// A `View` call, as recorded by `RecordingView`
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    TableOptions(Vec<String>),
    AttributesPanel(String),
    HideAttributes,
    SamplePanel(usize),
    HideSample,
    Error(String),
    ClearError,
    Loading(bool),
    SaveFeedback(String, SaveFeedback),
}

/// A `Screen` that also records every call made to it
#[derive(Default)]
pub struct RecordingView {
    pub screen: Screen,
    pub calls: Vec<ViewCall>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ViewCall::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_loading(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            ViewCall::Loading(loading) => Some(*loading),
            _ => None,
        })
    }
}

impl View for RecordingView {
    fn render_table_options(&mut self, names: &[String]) {
        self.calls.push(ViewCall::TableOptions(names.to_vec()));
        self.screen.render_table_options(names);
    }

    fn render_attributes_panel(&mut self, table_info: &TableInfo) {
        self.calls
            .push(ViewCall::AttributesPanel(table_info.table_name.clone()));
        self.screen.render_attributes_panel(table_info);
    }

    fn hide_attributes_panel(&mut self) {
        self.calls.push(ViewCall::HideAttributes);
        self.screen.hide_attributes_panel();
    }

    fn render_sample_panel(&mut self, samples: &[SampleRow]) {
        self.calls.push(ViewCall::SamplePanel(samples.len()));
        self.screen.render_sample_panel(samples);
    }

    fn hide_sample_panel(&mut self) {
        self.calls.push(ViewCall::HideSample);
        self.screen.hide_sample_panel();
    }

    fn render_error(&mut self, message: &str) {
        self.calls.push(ViewCall::Error(message.to_string()));
        self.screen.render_error(message);
    }

    fn clear_error(&mut self) {
        self.calls.push(ViewCall::ClearError);
        self.screen.clear_error();
    }

    fn render_loading(&mut self, loading: bool) {
        self.calls.push(ViewCall::Loading(loading));
        self.screen.render_loading(loading);
    }

    fn render_save_feedback(&mut self, attribute_name: &str, feedback: SaveFeedback) {
        self.calls
            .push(ViewCall::SaveFeedback(attribute_name.to_string(), feedback));
        self.screen.render_save_feedback(attribute_name, feedback);
    }

    fn memo_input(&self, attribute_name: &str) -> Option<String> {
        self.screen.memo_input(attribute_name)
    }
}
