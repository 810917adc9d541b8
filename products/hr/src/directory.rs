use entity::{Department, Employee, RecordId};

/// Shown wherever a department name cannot be resolved.
pub const MISSING_LABEL: &str = "N/A";

/// Read-only copy of the department collection, used by the employee panel
/// for its department picker and for naming an employee's department.
#[derive(Clone, Debug, Default)]
pub struct DepartmentDirectory {
    departments: Vec<Department>,
}

impl DepartmentDirectory {
    pub fn new(departments: Vec<Department>) -> Self {
        Self { departments }
    }

    pub fn replace(&mut self, departments: Vec<Department>) {
        self.departments = departments;
    }

    /// Picker options, in the order the API returned them.
    pub fn options(&self) -> &[Department] {
        &self.departments
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }

    pub fn find(&self, id: &RecordId) -> Option<&Department> {
        self.departments.iter().find(|d| d.id.same_as(id))
    }

    /// Label for a department id; a dangling id is not an error.
    pub fn label_for(&self, id: Option<&RecordId>) -> &str {
        id.and_then(|id| self.find(id))
            .map(|d| d.name.as_str())
            .unwrap_or(MISSING_LABEL)
    }

    /// Department name for an employee row.
    ///
    /// Prefers the department the API embedded in the row, then falls back to
    /// looking up `department_id` here.
    pub fn department_name<'a>(&'a self, employee: &'a Employee) -> &'a str {
        employee
            .department
            .as_ref()
            .and_then(|d| d.name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.label_for(employee.department_id.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use entity::DepartmentRef;

    use super::*;

    fn employee(department_id: Option<i64>, embedded: Option<&str>) -> Employee {
        Employee {
            id: RecordId::Number(1),
            name: "Ada".into(),
            salary: None,
            department_id: department_id.map(RecordId::Number),
            manager_id: None,
            date_of_joining: None,
            designation: "Lead".into(),
            department: embedded.map(|name| DepartmentRef {
                id: department_id.map(RecordId::Number),
                name: Some(name.into()),
            }),
        }
    }

    fn directory() -> DepartmentDirectory {
        DepartmentDirectory::new(vec![Department {
            id: RecordId::Number(1),
            name: "Engineering".into(),
            head_of_department: "Alice".into(),
        }])
    }

    #[test]
    fn embedded_department_wins() {
        let dir = directory();
        let emp = employee(Some(1), Some("Platform"));
        assert_eq!(dir.department_name(&emp), "Platform");
    }

    #[test]
    fn falls_back_to_directory_lookup() {
        let dir = directory();
        let emp = employee(Some(1), None);
        assert_eq!(dir.department_name(&emp), "Engineering");
    }

    #[test]
    fn dangling_department_shows_placeholder() {
        let dir = directory();
        let emp = employee(Some(42), None);
        assert_eq!(dir.department_name(&emp), MISSING_LABEL);
        let emp = employee(None, None);
        assert_eq!(dir.department_name(&emp), MISSING_LABEL);
    }

    #[test]
    fn textual_ids_resolve_numeric_departments() {
        let dir = directory();
        assert_eq!(dir.label_for(Some(&RecordId::Text("1".into()))), "Engineering");
    }
}
