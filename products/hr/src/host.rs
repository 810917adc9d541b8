use std::{fmt, sync::Arc};

use entity::{Department, Employee};
use platform_api::{RecordSource, RecordStore};
use tracing::info;

use crate::{DepartmentPanel, EmployeePanel, Panel};

pub const TITLE: &str = "Department and Employee Management";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Departments,
    Employees,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Departments, Tab::Employees];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Departments => "Departments",
            Tab::Employees => "Employees",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "departments" | "department" | "dept" | "d" => Some(Tab::Departments),
            "employees" | "employee" | "emp" | "e" => Some(Tab::Employees),
            _ => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

pub enum ActivePanel {
    Departments(DepartmentPanel),
    Employees(EmployeePanel),
}

impl ActivePanel {
    pub fn tab(&self) -> Tab {
        match self {
            ActivePanel::Departments(_) => Tab::Departments,
            ActivePanel::Employees(_) => Tab::Employees,
        }
    }

    async fn mount(&mut self) {
        match self {
            ActivePanel::Departments(panel) => panel.list().await,
            ActivePanel::Employees(panel) => panel.mount().await,
        }
    }

    async fn unmount(&mut self) {
        match self {
            ActivePanel::Departments(panel) => panel.unmount().await,
            ActivePanel::Employees(panel) => panel.unmount().await,
        }
    }
}

/// Tabbed container. Only the active tab has a live panel; switching tabs
/// unmounts the old panel and mounts a fresh one.
pub struct HostView {
    departments: Arc<dyn RecordStore<Department>>,
    department_source: Arc<dyn RecordSource<Department>>,
    employees: Arc<dyn RecordStore<Employee>>,
    active: Tab,
    panel: Option<ActivePanel>,
}

impl HostView {
    /// `departments` backs the department tab and is also handed, read-only,
    /// to the employee tab.
    pub fn new<D>(departments: Arc<D>, employees: Arc<dyn RecordStore<Employee>>) -> Self
    where
        D: RecordStore<Department> + 'static,
    {
        Self {
            department_source: departments.clone(),
            departments,
            employees,
            active: Tab::default(),
            panel: None,
        }
    }

    pub fn title(&self) -> &'static str {
        TITLE
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    /// Show `tab`, mounting its panel if it is not already live.
    pub async fn activate(&mut self, tab: Tab) {
        if self.active == tab && self.panel.is_some() {
            return;
        }
        if let Some(mut previous) = self.panel.take() {
            previous.unmount().await;
        }
        info!(tab = %tab, "switching tab");
        self.active = tab;
        let mut panel = match tab {
            Tab::Departments => ActivePanel::Departments(Panel::new(self.departments.clone())),
            Tab::Employees => ActivePanel::Employees(EmployeePanel::new(
                self.employees.clone(),
                self.department_source.clone(),
            )),
        };
        panel.mount().await;
        self.panel = Some(panel);
    }

    pub fn panel(&self) -> Option<&ActivePanel> {
        self.panel.as_ref()
    }

    pub fn panel_mut(&mut self) -> Option<&mut ActivePanel> {
        self.panel.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use entity::RecordId;

    use super::*;
    use crate::memory::{Call, MemoryStore};

    fn host() -> (HostView, Arc<MemoryStore<Department>>, Arc<MemoryStore<Employee>>) {
        let departments = Arc::new(MemoryStore::with_records(vec![Department {
            id: RecordId::Number(1),
            name: "Engineering".into(),
            head_of_department: "Alice".into(),
        }]));
        let employees = Arc::new(MemoryStore::<Employee>::new());
        let view = HostView::new(departments.clone(), employees.clone());
        (view, departments, employees)
    }

    #[test]
    fn tab_names_parse() {
        assert_eq!(Tab::parse("Employees"), Some(Tab::Employees));
        assert_eq!(Tab::parse(" dept "), Some(Tab::Departments));
        assert_eq!(Tab::parse("payroll"), None);
    }

    #[tokio::test]
    async fn panels_mount_lazily() {
        let (mut view, departments, employees) = host();
        assert!(view.panel().is_none());
        view.activate(Tab::Departments).await;
        assert_eq!(departments.calls(), vec![Call::List]);
        assert!(employees.calls().is_empty());
        assert_eq!(view.panel().map(ActivePanel::tab), Some(Tab::Departments));
    }

    #[tokio::test]
    async fn switching_tabs_discards_editor_state() {
        let (mut view, departments, _) = host();
        view.activate(Tab::Departments).await;
        if let Some(ActivePanel::Departments(panel)) = view.panel_mut() {
            panel.open_editor(None).await;
        }
        view.activate(Tab::Employees).await;
        // Employee tab reads departments through the shared source.
        assert_eq!(departments.calls(), vec![Call::List, Call::List]);

        view.activate(Tab::Departments).await;
        match view.panel() {
            Some(ActivePanel::Departments(panel)) => assert!(panel.state().editor().is_none()),
            _ => panic!("department tab should be active"),
        }
    }

    #[tokio::test]
    async fn reactivating_the_same_tab_keeps_the_panel() {
        let (mut view, departments, _) = host();
        view.activate(Tab::Departments).await;
        view.activate(Tab::Departments).await;
        assert_eq!(departments.calls(), vec![Call::List]);
    }
}
