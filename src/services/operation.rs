//! Backend operations as data
//!
//! An `ApiRequest` names one of the four backend operations together with
//! its arguments, so it can be shipped to a worker thread and executed there.

use super::api::{ApiError, TableApi};
use crate::model::{SampleRow, TableInfo};
use std::fmt;
use thiserror::Error;

/// Category of a backend operation, used to tag failures for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListTables,
    TableInfo,
    SampleData,
    UpdateMemo,
}

impl Operation {
    /// User-facing description of what failed
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::ListTables => "Failed to fetch table list",
            Operation::TableInfo => "Failed to fetch table info",
            Operation::SampleData => "Failed to fetch sample data",
            Operation::UpdateMemo => "Failed to update memo",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ListTables => write!(f, "list_tables"),
            Operation::TableInfo => write!(f, "table_info"),
            Operation::SampleData => write!(f, "sample_data"),
            Operation::UpdateMemo => write!(f, "update_memo"),
        }
    }
}

/// A failed backend operation, keeping the underlying error for diagnostics
#[derive(Debug, Error)]
#[error("{}: {source}", .operation.failure_message())]
pub struct OperationError {
    pub operation: Operation,
    #[source]
    pub source: ApiError,
}

impl OperationError {
    pub fn new(operation: Operation, source: ApiError) -> Self {
        Self { operation, source }
    }
}

/// One backend call with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    ListTables,
    TableInfo {
        table_name: String,
    },
    SampleRows {
        table_name: String,
    },
    SetMemo {
        table_name: String,
        attribute_name: String,
        description: String,
    },
}

/// Successful result of an `ApiRequest`
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    Tables(Vec<String>),
    TableInfo(TableInfo),
    SampleRows(Vec<SampleRow>),
    MemoSaved,
}

impl ApiRequest {
    pub fn operation(&self) -> Operation {
        match self {
            ApiRequest::ListTables => Operation::ListTables,
            ApiRequest::TableInfo { .. } => Operation::TableInfo,
            ApiRequest::SampleRows { .. } => Operation::SampleData,
            ApiRequest::SetMemo { .. } => Operation::UpdateMemo,
        }
    }

    /// Run the request against an API, tagging any failure with its operation
    pub fn execute(&self, api: &dyn TableApi) -> Result<ApiOutcome, OperationError> {
        let result = match self {
            ApiRequest::ListTables => api.list_tables().map(ApiOutcome::Tables),
            ApiRequest::TableInfo { table_name } => {
                api.table_info(table_name).map(ApiOutcome::TableInfo)
            }
            ApiRequest::SampleRows { table_name } => {
                api.sample_rows(table_name).map(ApiOutcome::SampleRows)
            }
            ApiRequest::SetMemo {
                table_name,
                attribute_name,
                description,
            } => api
                .set_attribute_memo(table_name, attribute_name, description)
                .map(|()| ApiOutcome::MemoSaved),
        };
        result.map_err(|source| OperationError::new(self.operation(), source))
    }
}
