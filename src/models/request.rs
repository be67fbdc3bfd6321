//! Worker request model (leave and shift preference).
//!
//! Requests are authored and reviewed outside this crate. Only `Approved`
//! requests influence generation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A worker's dated ask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Unique request identifier.
    pub id: String,
    /// Requesting worker.
    pub worker_id: String,
    /// Requested date.
    pub date: NaiveDate,
    /// Kind of request.
    #[serde(rename = "type")]
    pub request_type: RequestType,
    /// Review status.
    pub status: RequestStatus,
    /// Preferred shift type (shift preferences only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_type_id: Option<String>,
    /// Free-text reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Kind of request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// Day off.
    Leave,
    /// Wish to work a specific shift.
    ShiftPreference,
}

/// Review status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    CoordinationNeeded,
}

impl Request {
    /// Creates a pending leave request.
    pub fn leave(id: impl Into<String>, worker_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            worker_id: worker_id.into(),
            date,
            request_type: RequestType::Leave,
            status: RequestStatus::Pending,
            shift_type_id: None,
            note: None,
        }
    }

    /// Creates a pending shift preference request.
    pub fn preference(
        id: impl Into<String>,
        worker_id: impl Into<String>,
        date: NaiveDate,
        shift_type_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            worker_id: worker_id.into(),
            date,
            request_type: RequestType::ShiftPreference,
            status: RequestStatus::Pending,
            shift_type_id: Some(shift_type_id.into()),
            note: None,
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = status;
        self
    }

    /// Marks the request approved.
    pub fn approved(self) -> Self {
        self.with_status(RequestStatus::Approved)
    }

    /// Sets the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[inline]
    pub fn is_approved(&self) -> bool {
        self.status == RequestStatus::Approved
    }

    /// Whether this is an approved leave request.
    pub fn is_approved_leave(&self) -> bool {
        self.is_approved() && self.request_type == RequestType::Leave
    }

    /// The preferred shift id of an approved shift preference.
    pub fn approved_preference(&self) -> Option<&str> {
        if self.is_approved() && self.request_type == RequestType::ShiftPreference {
            self.shift_type_id.as_deref()
        } else {
            None
        }
    }
}
