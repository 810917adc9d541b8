use std::sync::Arc;

use entity::Department;
use platform_api::RecordStore;

use crate::Panel;

/// Departments are a leaf record: the generic panel covers them as is.
pub type DepartmentPanel = Panel<Department>;

/// Build a department panel and load its collection.
pub async fn mount(store: Arc<dyn RecordStore<Department>>) -> DepartmentPanel {
    let mut panel = Panel::new(store);
    panel.list().await;
    panel
}
