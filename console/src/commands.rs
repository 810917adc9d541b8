//! One-shot commands. Each one mounts a panel, drives it through the same
//! transitions the shell uses, prints the result and exits.

use std::{io::Write as _, sync::Arc, time::Instant};

use anyhow::{Result, anyhow, bail};
use clap::{Args, Subcommand};
use entity::{Department, Employee, Record, RecordId};
use platform_api::ApiClient;
use products_hr::{EmployeePanel, Panel, PanelState, departments};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::render::{self, Palette};

#[derive(Subcommand, Debug)]
pub enum DepartmentCommand {
    /// List departments.
    List,
    /// Add a department.
    Add(DepartmentFields),
    /// Update a department.
    Edit {
        id: String,
        #[command(flatten)]
        fields: DepartmentFields,
    },
    /// Delete a department.
    Delete {
        id: String,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct DepartmentFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long, help = "Head of department")]
    hod: Option<String>,
}

impl DepartmentFields {
    fn pairs(self) -> Vec<(&'static str, Option<String>)> {
        vec![("name", self.name), ("head_of_department", self.hod)]
    }
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommand {
    /// List employees.
    List,
    /// Add an employee.
    Add(EmployeeFields),
    /// Update an employee. The whole record is resent.
    Edit {
        id: String,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    /// Delete an employee.
    Delete {
        id: String,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct EmployeeFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    salary: Option<String>,
    #[arg(long, value_name = "DEPARTMENT_ID")]
    department: Option<String>,
    #[arg(long, value_name = "MANAGER_NO")]
    manager: Option<String>,
    #[arg(long, value_name = "DATE", help = "Date of joining, e.g. 2024-03-05")]
    joined: Option<String>,
    #[arg(long)]
    designation: Option<String>,
}

impl EmployeeFields {
    fn pairs(self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", self.name),
            ("salary", self.salary),
            ("department_id", self.department),
            ("manager_id", self.manager),
            ("date_of_joining", self.joined),
            ("designation", self.designation),
        ]
    }
}

pub async fn run_departments(
    client: &ApiClient,
    palette: Palette,
    command: DepartmentCommand,
) -> Result<()> {
    let mut panel = departments::mount(Arc::new(client.resource::<Department>())).await;

    match command {
        DepartmentCommand::List => {}
        DepartmentCommand::Add(fields) => {
            ensure_loaded(panel.state())?;
            panel.open_editor(None).await;
            fill(&mut panel, fields.pairs())?;
            panel.submit().await;
        }
        DepartmentCommand::Edit { id, fields } => {
            let record = find(panel.state(), &id)?;
            panel.open_editor(Some(record)).await;
            fill(&mut panel, fields.pairs())?;
            panel.submit().await;
        }
        DepartmentCommand::Delete { id, yes } => {
            let mut stdin = BufReader::new(tokio::io::stdin());
            if !delete(&mut panel, &id, yes, &mut stdin).await? {
                return Ok(());
            }
        }
    }
    print!("{}", render::departments(&panel, palette, Instant::now()));
    settle(panel.state())
}

pub async fn run_employees(
    client: &ApiClient,
    palette: Palette,
    command: EmployeeCommand,
) -> Result<()> {
    let mut panel = EmployeePanel::new(
        Arc::new(client.resource::<Employee>()),
        Arc::new(client.resource::<Department>()),
    );
    panel.mount().await;

    match command {
        EmployeeCommand::List => {}
        EmployeeCommand::Add(fields) => {
            ensure_loaded(panel.state())?;
            check_department(&panel, fields.department.as_deref())?;
            panel.panel_mut().open_editor(None).await;
            fill(panel.panel_mut(), fields.pairs())?;
            panel.panel_mut().submit().await;
        }
        EmployeeCommand::Edit { id, fields } => {
            let record = find(panel.state(), &id)?;
            check_department(&panel, fields.department.as_deref())?;
            panel.panel_mut().open_editor(Some(record)).await;
            fill(panel.panel_mut(), fields.pairs())?;
            panel.panel_mut().submit().await;
        }
        EmployeeCommand::Delete { id, yes } => {
            let mut stdin = BufReader::new(tokio::io::stdin());
            if !delete(panel.panel_mut(), &id, yes, &mut stdin).await? {
                return Ok(());
            }
        }
    }
    print!("{}", render::employees(&panel, palette, Instant::now()));
    settle(panel.state())
}

/// Copy the given values into the open draft. `None` keeps the current value.
fn fill<R: Record>(panel: &mut Panel<R>, pairs: Vec<(&'static str, Option<String>)>) -> Result<()> {
    for (field, value) in pairs {
        if let Some(value) = value {
            panel.edit(field, &value)?;
        }
    }
    Ok(())
}

fn ensure_loaded<R: Record>(state: &PanelState<R>) -> Result<()> {
    match state.banner() {
        Some(banner) => Err(anyhow!("could not load {}: {banner}", R::COLLECTION)),
        None => Ok(()),
    }
}

fn find<R: Record>(state: &PanelState<R>, raw: &str) -> Result<R> {
    ensure_loaded(state)?;
    let id = RecordId::parse(raw).ok_or_else(|| anyhow!("{} id is required", R::LABEL))?;
    state
        .items()
        .iter()
        .find(|record| record.id().same_as(&id))
        .cloned()
        .ok_or_else(|| anyhow!("{} {id} not found", R::LABEL))
}

/// The editor only offers departments that exist, so the command line does too.
fn check_department(panel: &EmployeePanel, raw: Option<&str>) -> Result<()> {
    let Some(id) = raw.and_then(RecordId::parse) else {
        return Ok(());
    };
    if panel.directory().find(&id).is_none() {
        bail!("department {id} not found");
    }
    Ok(())
}

/// Returns `false` when the user backed out at the prompt. The answer is
/// read from `input` unless `yes` is set.
async fn delete<R: Record>(
    panel: &mut Panel<R>,
    raw: &str,
    yes: bool,
    input: &mut (impl AsyncBufRead + Unpin),
) -> Result<bool> {
    let id = RecordId::parse(raw).ok_or_else(|| anyhow!("{} id is required", R::LABEL))?;
    panel.request_delete(id.clone()).await;
    let confirmed = yes
        || confirm(
            &format!(
                "Are you sure you want to delete {} {id}?",
                R::LABEL.to_lowercase()
            ),
            input,
        )
        .await?;
    if confirmed {
        panel.confirm_delete().await;
    } else {
        panel.cancel_delete().await;
        println!("Delete cancelled.");
    }
    Ok(confirmed)
}

async fn confirm(question: &str, input: &mut (impl AsyncBufRead + Unpin)) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer).await?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Exit status for a finished command: a banner or field errors fail it.
fn settle<R: Record>(state: &PanelState<R>) -> Result<()> {
    if let Some(banner) = state.banner() {
        bail!("{banner}");
    }
    if !state.field_errors().is_empty() {
        bail!("{}", state.field_errors());
    }
    Ok(())
}
