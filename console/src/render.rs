//! Plain-text rendering of panels and the host view.
//!
//! Everything renders into a `String` so the one-shot commands and the shell
//! print the same output.

use std::{fmt::Write as _, time::Instant};

use entity::{Department, Draft, Employee, FieldErrors, Record};
use owo_colors::OwoColorize;
use products_hr::{
    ActivePanel, DepartmentPanel, EmployeePanel, HostView, LoadState, PanelState, Tab,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn muted(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

const DEPARTMENT_COLUMNS: [&str; 4] = ["#", "ID", "Department Name", "HOD"];
const EMPLOYEE_COLUMNS: [&str; 8] = [
    "#",
    "ID",
    "Name",
    "Salary",
    "Department",
    "Manager",
    "Date of Joining",
    "Designation",
];

pub fn departments(panel: &DepartmentPanel, palette: Palette, now: Instant) -> String {
    let state = panel.state();
    let rows = state
        .items()
        .iter()
        .enumerate()
        .map(|(i, d)| {
            vec![
                (i + 1).to_string(),
                d.id.to_string(),
                d.name.clone(),
                d.head_of_department.clone(),
            ]
        })
        .collect::<Vec<_>>();

    let mut out = String::new();
    status(&mut out, state, palette, now);
    body(
        &mut out,
        state,
        palette,
        &DEPARTMENT_COLUMNS,
        &rows,
        "No departments available.",
    );
    if let Some(draft) = state.editor() {
        editor(
            &mut out,
            Department::LABEL,
            draft,
            state.field_errors(),
            palette,
            |_, raw| raw,
        );
    }
    pending_delete(&mut out, state, palette);
    out
}

pub fn employees(panel: &EmployeePanel, palette: Palette, now: Instant) -> String {
    let state = panel.state();
    let rows = state
        .items()
        .iter()
        .enumerate()
        .map(|(i, e)| {
            vec![
                (i + 1).to_string(),
                e.id.to_string(),
                e.name.clone(),
                e.salary.map(|s| s.to_string()).unwrap_or_default(),
                panel.department_name(e).to_string(),
                e.manager_id.as_ref().map(ToString::to_string).unwrap_or_default(),
                e.date_of_joining.map(|d| d.to_string()).unwrap_or_default(),
                e.designation.clone(),
            ]
        })
        .collect::<Vec<_>>();

    let mut out = String::new();
    status(&mut out, state, palette, now);
    body(
        &mut out,
        state,
        palette,
        &EMPLOYEE_COLUMNS,
        &rows,
        "No employees found",
    );
    if let Some(draft) = state.editor() {
        let directory = panel.directory();
        editor(
            &mut out,
            Employee::LABEL,
            draft,
            state.field_errors(),
            palette,
            |key, raw| {
                if key != "department_id" || raw.is_empty() {
                    return raw;
                }
                format!("{} ({raw})", directory.label_for(draft.department_id.as_ref()))
            },
        );
        let options = directory
            .options()
            .iter()
            .enumerate()
            .map(|(i, d)| format!("[{}] {}", i + 1, d.name))
            .collect::<Vec<_>>();
        if options.is_empty() {
            let _ = writeln!(out, "{}", palette.muted("No departments available"));
        } else {
            let _ = writeln!(
                out,
                "{} {}",
                palette.muted("Departments:"),
                options.join("  ")
            );
        }
    }
    pending_delete(&mut out, state, palette);
    out
}

pub fn host(view: &HostView, palette: Palette, now: Instant) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", palette.heading(view.title()));
    let tabs = Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == view.active_tab() {
                palette.heading(&format!("[{tab}]"))
            } else {
                format!(" {tab} ")
            }
        })
        .collect::<Vec<_>>();
    let _ = writeln!(out, "{}\n", tabs.join(" "));
    match view.panel() {
        Some(ActivePanel::Departments(panel)) => out.push_str(&departments(panel, palette, now)),
        Some(ActivePanel::Employees(panel)) => out.push_str(&employees(panel, palette, now)),
        None => {}
    }
    out
}

fn status<R: Record>(out: &mut String, state: &PanelState<R>, palette: Palette, now: Instant) {
    if let Some(banner) = state.banner() {
        let _ = writeln!(
            out,
            "{} {}",
            palette.error(&format!("Error: {banner}")),
            palette.muted("(dismiss to hide)")
        );
    }
    if let Some(note) = state.notification(now) {
        let _ = writeln!(out, "{}", palette.success(note.message()));
    }
}

fn body<R: Record>(
    out: &mut String,
    state: &PanelState<R>,
    palette: Palette,
    headers: &[&str],
    rows: &[Vec<String>],
    empty: &str,
) {
    if state.load() == &LoadState::Loading {
        let _ = writeln!(out, "{}", palette.muted("Loading..."));
    } else if rows.is_empty() {
        let _ = writeln!(out, "{empty}");
    } else {
        table(out, palette, headers, rows);
    }
}

/// Left-aligned columns sized to their widest cell.
fn table(out: &mut String, palette: Palette, headers: &[&str], rows: &[Vec<String>]) {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", palette.heading(header.trim_end()));
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{rule}");
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

fn editor<D: Draft>(
    out: &mut String,
    label: &str,
    draft: &D,
    errors: &FieldErrors,
    palette: Palette,
    display: impl Fn(&str, String) -> String,
) {
    let _ = writeln!(out);
    let title = match draft.id() {
        Some(id) => format!("Edit {label} #{id}"),
        None => format!("Add {label}"),
    };
    let _ = writeln!(out, "{}", palette.heading(&title));
    let width = D::FIELDS
        .iter()
        .map(|f| f.label.chars().count())
        .max()
        .unwrap_or(0);
    for field in D::FIELDS {
        let raw = draft.value(field.key).unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<width$}  {}  {}",
            field.label,
            palette.muted(&format!("[{}]", field.key)),
            display(field.key, raw)
        );
        if let Some(message) = errors.get(field.key) {
            let _ = writeln!(out, "  {:<width$}  {}", "", palette.error(message));
        }
    }
}

fn pending_delete<R: Record>(out: &mut String, state: &PanelState<R>, palette: Palette) {
    if let Some(id) = state.pending_delete() {
        let _ = writeln!(
            out,
            "\n{}",
            palette.error(&format!(
                "Are you sure you want to delete {} {id}? (yes/no)",
                R::LABEL.to_lowercase()
            ))
        );
    }
}
