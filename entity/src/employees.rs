use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

use crate::{
    DepartmentRef, Draft, DraftError, FieldErrors, FieldSpec, Record, RecordId, Submission,
    UpdateKind, dates, validation::is_blank,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "e_no")]
    pub id: RecordId,
    #[serde(rename = "e_name", default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_salary_lenient")]
    pub salary: Option<Salary>,
    #[serde(rename = "d_no", default)]
    pub department_id: Option<RecordId>,
    #[serde(rename = "mgr_no", default)]
    pub manager_id: Option<RecordId>,
    #[serde(
        rename = "date_of_join",
        default,
        deserialize_with = "dates::deserialize_lenient"
    )]
    pub date_of_joining: Option<NaiveDate>,
    #[serde(default)]
    pub designation: String,
    /// Populated by the API for display. The editable relation is `department_id`.
    #[serde(default)]
    pub department: Option<DepartmentRef>,
}

/// Salary as the API reports it. Accepts JSON numbers and numeric strings.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Salary(pub f64);

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSalary;

impl FromStr for Salary {
    type Err = InvalidSalary;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<f64>().map_err(|_| InvalidSalary)?;
        if value.is_finite() {
            Ok(Salary(value))
        } else {
            Err(InvalidSalary)
        }
    }
}

impl<'de> Deserialize<'de> for Salary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(f64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Number(n) => Ok(Salary(n)),
            Wire::Text(s) => s
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid salary `{s}`"))),
        }
    }
}

/// Rows with an unreadable salary still list; the salary is just left out.
fn deserialize_salary_lenient<'de, D>(deserializer: D) -> Result<Option<Salary>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Wire>::deserialize(deserializer)? {
        Some(Wire::Number(n)) => Some(Salary(n)),
        Some(Wire::Text(s)) => s.parse().ok(),
        Some(Wire::Other(_)) | None => None,
    })
}

/// Employee editor state. Fields hold raw input until submission.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmployeeDraft {
    pub id: Option<RecordId>,
    pub name: String,
    pub salary: String,
    pub department_id: Option<RecordId>,
    pub manager_id: String,
    pub date_of_joining: String,
    pub designation: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmployeePayload {
    #[serde(rename = "e_no", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "e_name")]
    pub name: String,
    pub salary: Salary,
    #[serde(rename = "d_no")]
    pub department_id: RecordId,
    #[serde(rename = "mgr_no")]
    pub manager_id: RecordId,
    /// Always serialized as `YYYY-MM-DD`.
    #[serde(rename = "date_of_join")]
    pub date_of_joining: NaiveDate,
    pub designation: String,
}

impl Record for Employee {
    type Draft = EmployeeDraft;
    type Payload = EmployeePayload;

    const LABEL: &'static str = "Employee";
    const COLLECTION: &'static str = "employees";
    const UPDATE: UpdateKind = UpdateKind::Full;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            salary: self.salary.map(|s| s.to_string()).unwrap_or_default(),
            department_id: self.department_id.clone(),
            manager_id: self
                .manager_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            date_of_joining: self.date_of_joining.map(dates::format).unwrap_or_default(),
            designation: self.designation.clone(),
        }
    }
}

impl Draft for EmployeeDraft {
    type Payload = EmployeePayload;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec {
            key: "name",
            label: "Employee Name",
        },
        FieldSpec {
            key: "salary",
            label: "Salary",
        },
        FieldSpec {
            key: "department_id",
            label: "Department",
        },
        FieldSpec {
            key: "manager_id",
            label: "Manager Number",
        },
        FieldSpec {
            key: "date_of_joining",
            label: "Date of Joining",
        },
        FieldSpec {
            key: "designation",
            label: "Designation",
        },
    ];

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn value(&self, field: &str) -> Option<String> {
        let value = match field {
            "name" => self.name.clone(),
            "salary" => self.salary.clone(),
            "department_id" => self
                .department_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            "manager_id" => self.manager_id.clone(),
            "date_of_joining" => self.date_of_joining.clone(),
            "designation" => self.designation.clone(),
            _ => return None,
        };
        Some(value)
    }

    fn set(&mut self, field: &str, value: &str) -> Result<(), DraftError> {
        match field {
            "name" => self.name = value.to_string(),
            "salary" => self.salary = value.to_string(),
            "department_id" | "department" => self.department_id = RecordId::parse(value),
            "manager_id" | "manager" => self.manager_id = value.to_string(),
            "date_of_joining" | "date" => self.date_of_joining = value.to_string(),
            "designation" => self.designation = value.to_string(),
            other => return Err(DraftError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if is_blank(&self.name) {
            errors.insert("name", "Employee name is required");
        }
        if is_blank(&self.salary) {
            errors.insert("salary", "Salary is required");
        } else if self.salary.parse::<Salary>().is_err() {
            errors.insert("salary", "Salary must be a number");
        }
        if self.department_id.is_none() {
            errors.insert("department_id", "Department is required");
        }
        if is_blank(&self.manager_id) {
            errors.insert("manager_id", "Manager is required");
        }
        if is_blank(&self.date_of_joining) {
            errors.insert("date_of_joining", "Date of joining is required");
        } else if dates::normalize_input(&self.date_of_joining).is_none() {
            errors.insert("date_of_joining", "Date of joining must be a valid date");
        }
        if is_blank(&self.designation) {
            errors.insert("designation", "Designation is required");
        }
        errors
    }

    fn into_submission(self) -> Result<Submission<EmployeePayload>, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        // validate() has checked every conversion below.
        let (Ok(salary), Some(department_id), Some(manager_id), Some(date_of_joining)) = (
            self.salary.parse::<Salary>(),
            self.department_id,
            RecordId::parse(&self.manager_id),
            dates::normalize_input(&self.date_of_joining),
        ) else {
            return Err(self_check_failed());
        };
        let payload = EmployeePayload {
            id: self.id.clone(),
            name: self.name,
            salary,
            department_id,
            manager_id,
            date_of_joining,
            designation: self.designation,
        };
        Ok(match self.id {
            Some(id) => Submission::Update { id, payload },
            None => Submission::Create(payload),
        })
    }
}

fn self_check_failed() -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert("draft", "Employee details could not be read");
    errors
}
