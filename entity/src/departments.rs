use serde::{Deserialize, Serialize};

use crate::{
    Draft, DraftError, FieldErrors, FieldSpec, Record, RecordId, Submission, UpdateKind,
    validation::is_blank,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "d_no")]
    pub id: RecordId,
    #[serde(rename = "d_name", default)]
    pub name: String,
    #[serde(rename = "dept_hod", default)]
    pub head_of_department: String,
}

/// Department as embedded in an employee response. Display only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRef {
    #[serde(rename = "d_no", default)]
    pub id: Option<RecordId>,
    #[serde(rename = "d_name", default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepartmentDraft {
    pub id: Option<RecordId>,
    pub name: String,
    pub head_of_department: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepartmentPayload {
    #[serde(rename = "d_no", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "d_name")]
    pub name: String,
    #[serde(rename = "dept_hod")]
    pub head_of_department: String,
}

impl Record for Department {
    type Draft = DepartmentDraft;
    type Payload = DepartmentPayload;

    const LABEL: &'static str = "Department";
    const COLLECTION: &'static str = "departments";
    const UPDATE: UpdateKind = UpdateKind::Partial;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_draft(&self) -> DepartmentDraft {
        DepartmentDraft {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            head_of_department: self.head_of_department.clone(),
        }
    }
}

impl DepartmentDraft {
    pub fn new(name: impl Into<String>, head_of_department: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            head_of_department: head_of_department.into(),
        }
    }
}

impl Draft for DepartmentDraft {
    type Payload = DepartmentPayload;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec {
            key: "name",
            label: "Department Name",
        },
        FieldSpec {
            key: "head_of_department",
            label: "HOD",
        },
    ];

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn value(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "head_of_department" => Some(self.head_of_department.clone()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: &str) -> Result<(), DraftError> {
        match field {
            "name" => self.name = value.to_string(),
            "head_of_department" | "hod" => self.head_of_department = value.to_string(),
            other => return Err(DraftError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if is_blank(&self.name) {
            errors.insert("name", "Department name is required.");
        }
        if is_blank(&self.head_of_department) {
            errors.insert("head_of_department", "HOD name is required.");
        }
        errors
    }

    fn into_submission(self) -> Result<Submission<DepartmentPayload>, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        let payload = DepartmentPayload {
            id: self.id.clone(),
            name: self.name,
            head_of_department: self.head_of_department,
        };
        Ok(match self.id {
            Some(id) => Submission::Update { id, payload },
            None => Submission::Create(payload),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_fields_are_reported_by_key() {
        let draft = DepartmentDraft::new("  ", "");
        let errors = draft.validate();
        assert_eq!(
            errors.keys().collect::<Vec<_>>(),
            vec!["head_of_department", "name"]
        );
        assert_eq!(errors.get("name"), Some("Department name is required."));
        assert_eq!(errors.get("head_of_department"), Some("HOD name is required."));
    }

    #[test]
    fn only_missing_fields_are_reported() {
        let errors = DepartmentDraft::new("Engineering", " ").validate();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["head_of_department"]);
    }

    #[test]
    fn new_draft_becomes_create_without_id() {
        let submission = DepartmentDraft::new("Engineering", "Alice")
            .into_submission()
            .unwrap();
        let Submission::Create(payload) = submission else {
            panic!("expected create");
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"d_name": "Engineering", "dept_hod": "Alice"})
        );
    }

    #[test]
    fn edited_draft_becomes_update_keyed_by_id() {
        let dept = Department {
            id: RecordId::Number(4),
            name: "Ops".into(),
            head_of_department: "Bob".into(),
        };
        let mut draft = dept.to_draft();
        draft.set("name", "Operations").unwrap();
        match draft.into_submission().unwrap() {
            Submission::Update { id, payload } => {
                assert_eq!(id, RecordId::Number(4));
                assert_eq!(
                    serde_json::to_value(&payload).unwrap(),
                    json!({"d_no": 4, "d_name": "Operations", "dept_hod": "Bob"})
                );
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut draft = DepartmentDraft::default();
        assert_eq!(
            draft.set("budget", "1"),
            Err(DraftError::UnknownField("budget".into()))
        );
    }

    #[test]
    fn decodes_api_shape() {
        let dept: Department = serde_json::from_value(json!({
            "d_no": 1,
            "d_name": "Engineering",
            "dept_hod": "Alice",
            "created_at": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(dept.name, "Engineering");
        assert_eq!(dept.head_of_department, "Alice");
    }
}
