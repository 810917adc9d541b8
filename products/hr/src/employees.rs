use std::sync::Arc;

use entity::{Department, Employee};
use platform_api::{RecordSource, RecordStore};
use tracing::debug;

use crate::{DepartmentDirectory, Panel, PanelError, PanelState};

/// Employee panel: the generic panel plus a read-only view of departments.
pub struct EmployeePanel {
    panel: Panel<Employee>,
    departments: Arc<dyn RecordSource<Department>>,
    directory: DepartmentDirectory,
}

impl EmployeePanel {
    pub fn new(
        store: Arc<dyn RecordStore<Employee>>,
        departments: Arc<dyn RecordSource<Department>>,
    ) -> Self {
        Self {
            panel: Panel::new(store),
            departments,
            directory: DepartmentDirectory::default(),
        }
    }

    /// Load employees and the department directory.
    pub async fn mount(&mut self) {
        self.panel.list().await;
        self.refresh_directory().await;
    }

    pub async fn refresh_directory(&mut self) {
        if !self.panel.state().is_mounted() {
            return;
        }
        match self.departments.list().await {
            Ok(departments) => {
                debug!(count = departments.len(), "department directory loaded");
                self.directory.replace(departments);
            }
            Err(err) => self.panel.surface_error(err.to_string()),
        }
    }

    pub fn panel(&self) -> &Panel<Employee> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel<Employee> {
        &mut self.panel
    }

    pub fn state(&self) -> &PanelState<Employee> {
        self.panel.state()
    }

    pub fn directory(&self) -> &DepartmentDirectory {
        &self.directory
    }

    pub fn department_name<'a>(&'a self, employee: &'a Employee) -> &'a str {
        self.directory.department_name(employee)
    }

    /// Point the open draft at the department listed at `index` in the picker.
    pub fn choose_department(&mut self, index: usize) -> Result<(), PanelError> {
        let id = self
            .directory
            .options()
            .get(index)
            .ok_or(PanelError::NoSuchRow(index))?
            .id
            .to_string();
        self.panel.edit("department_id", &id)
    }

    pub async fn unmount(&mut self) {
        self.panel.unmount().await;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use entity::{EmployeeDraft, RecordId, Salary};

    use super::*;
    use crate::{
        MISSING_LABEL,
        memory::{Call, MemoryStore},
    };

    fn engineering() -> Department {
        Department {
            id: RecordId::Number(1),
            name: "Engineering".into(),
            head_of_department: "Alice".into(),
        }
    }

    async fn mounted(
        employees: Vec<Employee>,
        departments: Vec<Department>,
    ) -> (EmployeePanel, Arc<MemoryStore<Employee>>) {
        let store = Arc::new(MemoryStore::with_records(employees));
        let departments = Arc::new(MemoryStore::with_records(departments));
        let mut panel = EmployeePanel::new(store.clone(), departments);
        panel.mount().await;
        (panel, store)
    }

    fn fill(panel: &mut EmployeePanel, date: &str) {
        let p = panel.panel_mut();
        p.edit("name", "Grace").unwrap();
        p.edit("salary", "72000").unwrap();
        p.edit("manager_id", "3").unwrap();
        p.edit("date_of_joining", date).unwrap();
        p.edit("designation", "Engineer").unwrap();
    }

    #[tokio::test]
    async fn mount_loads_employees_and_departments() {
        let (panel, store) = mounted(Vec::new(), vec![engineering()]).await;
        assert_eq!(store.calls(), vec![Call::List]);
        assert_eq!(panel.directory().options().len(), 1);
    }

    #[tokio::test]
    async fn create_submits_date_only_and_refetches_employees() {
        let (mut panel, store) = mounted(Vec::new(), vec![engineering()]).await;
        panel.panel_mut().open_editor(None).await;
        fill(&mut panel, "2024-03-05T21:10:00.000Z");
        panel.choose_department(0).unwrap();
        panel.panel_mut().submit().await;

        assert_eq!(store.calls(), vec![Call::List, Call::Create, Call::List]);
        let row = &panel.state().items()[0];
        assert_eq!(row.date_of_joining.map(|d| d.to_string()).as_deref(), Some("2024-03-05"));
        assert_eq!(panel.department_name(row), "Engineering");
    }

    #[tokio::test]
    async fn missing_department_blocks_submission() {
        let (mut panel, store) = mounted(Vec::new(), Vec::new()).await;
        assert!(panel.directory().is_empty());
        panel.panel_mut().open_editor(None).await;
        fill(&mut panel, "2024-03-05");
        panel.panel_mut().submit().await;

        assert_eq!(store.calls(), vec![Call::List]);
        assert_eq!(
            panel.state().field_errors().keys().collect::<Vec<_>>(),
            vec!["department_id"]
        );
    }

    #[tokio::test]
    async fn editing_employee_with_dangling_department_shows_placeholder() {
        let orphan = Employee {
            id: RecordId::Number(4),
            name: "Lin".into(),
            salary: None,
            department_id: Some(RecordId::Number(99)),
            manager_id: Some(RecordId::Number(1)),
            date_of_joining: None,
            designation: "Analyst".into(),
            department: None,
        };
        let (mut panel, _) = mounted(vec![orphan], vec![engineering()]).await;
        let row = &panel.state().items()[0];
        assert_eq!(panel.department_name(row), MISSING_LABEL);

        panel.panel_mut().open_row(0).await.unwrap();
        let draft: &EmployeeDraft = panel.state().editor().unwrap();
        assert_eq!(
            panel.directory().label_for(draft.department_id.as_ref()),
            MISSING_LABEL
        );
        assert!(panel.state().banner().is_none());
    }

    #[tokio::test]
    async fn update_goes_to_the_employee_id() {
        let existing = Employee {
            id: RecordId::Number(4),
            name: "Lin".into(),
            salary: Some(Salary(50_000.0)),
            department_id: Some(RecordId::Number(1)),
            manager_id: Some(RecordId::Number(1)),
            date_of_joining: NaiveDate::from_ymd_opt(2021, 6, 1),
            designation: "Analyst".into(),
            department: None,
        };
        let (mut panel, store) = mounted(vec![existing], vec![engineering()]).await;
        panel.panel_mut().open_row(0).await.unwrap();
        panel.panel_mut().edit("designation", "Senior Analyst").unwrap();
        panel.panel_mut().submit().await;
        assert_eq!(
            store.calls(),
            vec![Call::List, Call::Update(RecordId::Number(4)), Call::List]
        );
        assert_eq!(panel.state().items()[0].designation, "Senior Analyst");
    }

    #[tokio::test]
    async fn directory_failure_is_surfaced() {
        let store = Arc::new(MemoryStore::<Employee>::new());
        let departments = Arc::new(MemoryStore::<Department>::new());
        departments.fail_next(platform_api::ApiError::status(500, ""));
        let mut panel = EmployeePanel::new(store, departments);
        panel.mount().await;
        assert_eq!(
            panel.state().banner(),
            Some("request failed with status code 500")
        );
    }
}
