//! HR vertical slice: department and employee management panels.
//!
//! Both panels share one interaction pattern, the entity manager panel in
//! [`panel`]: list, open an editor, validate, submit, delete, refetch. The
//! [`host`] module mounts one panel at a time behind tabs.

pub mod departments;
pub mod directory;
pub mod employees;
pub mod host;
pub mod notification;
pub mod panel;

#[cfg(any(test, feature = "test-util"))]
pub mod memory;

use entity::DraftError;
use thiserror::Error;

pub use departments::DepartmentPanel;
pub use directory::{DepartmentDirectory, MISSING_LABEL};
pub use employees::EmployeePanel;
pub use host::{ActivePanel, HostView, Tab};
pub use notification::{NOTIFICATION_TTL, Notification};
pub use panel::{Action, Effect, LoadState, Panel, PanelState, Ticket};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("no editor is open")]
    EditorClosed,
    #[error("no row {0}")]
    NoSuchRow(usize),
    #[error(transparent)]
    Draft(#[from] DraftError),
}
