//! Records managed by the staffdesk console.
//!
//! Each record type pairs a server-side shape (what the API returns) with a
//! draft (what the editor holds while the user types) and a payload (what is
//! submitted). Drafts are validated before they can become a [`Submission`].

pub mod dates;
pub mod departments;
pub mod employees;
pub mod ids;
pub mod validation;

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};

pub use departments::{Department, DepartmentDraft, DepartmentPayload, DepartmentRef};
pub use employees::{Employee, EmployeeDraft, EmployeePayload, Salary};
pub use ids::RecordId;
pub use validation::{DraftError, FieldErrors, FieldSpec, Submission};

/// How an existing record is rewritten by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateKind {
    /// Only the submitted fields change.
    Partial,
    /// The submitted body replaces the record.
    Full,
}

/// A record type that can be listed, created, edited and deleted.
pub trait Record: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    type Draft: Draft<Payload = Self::Payload>;
    type Payload: Serialize + Clone + fmt::Debug + Send + Sync + 'static;

    /// Human label used in notifications ("Department added successfully!").
    const LABEL: &'static str;
    /// Collection path segment under the API base, e.g. `departments`.
    const COLLECTION: &'static str;
    const UPDATE: UpdateKind;

    fn id(&self) -> &RecordId;

    /// Seed an editor draft from this record. The id is carried along.
    fn to_draft(&self) -> Self::Draft;
}

/// In-progress edit of a record.
pub trait Draft: Default + Clone + fmt::Debug + Send + Sync + 'static {
    type Payload;

    /// Editable fields in display order.
    const FIELDS: &'static [FieldSpec];

    /// Identifier of the record being edited; `None` for a new record.
    fn id(&self) -> Option<&RecordId>;

    /// Current raw value of a field, as the editor shows it.
    fn value(&self, field: &str) -> Option<String>;

    fn set(&mut self, field: &str, value: &str) -> Result<(), DraftError>;

    /// Check every required field. Returns an empty map when the draft is valid.
    fn validate(&self) -> FieldErrors;

    /// Validate and convert into the request that should be sent.
    fn into_submission(self) -> Result<Submission<Self::Payload>, FieldErrors>;
}
