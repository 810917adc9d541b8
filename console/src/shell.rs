//! Interactive host view over stdin.

use std::{io::Write as _, time::Instant};

use anyhow::Result;
use products_hr::{ActivePanel, HostView, PanelError, Tab};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render::{self, Palette};

const HELP: &str = "\
commands:
  tab departments|employees   switch tab
  list                        reload the table
  add                         open an empty editor
  edit <row>                  edit the record in <row>
  set <field> <value>         change a field in the open editor
  pick <n>                    choose department <n> (employee editor)
  save                        submit the editor
  cancel                      close the editor
  delete <row>                ask to delete the record in <row>
  yes | no                    answer the delete prompt
  dismiss                     hide the error banner
  help                        show this text
  quit                        leave";

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Tab(Tab),
    List,
    Add,
    Edit(usize),
    Set { field: String, value: String },
    Pick(usize),
    Save,
    Cancel,
    Delete(usize),
    Yes,
    No,
    Dismiss,
    Help,
    Quit,
    Nothing,
}

impl ShellCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "" => ShellCommand::Nothing,
            "tab" => ShellCommand::Tab(
                Tab::parse(rest).ok_or_else(|| format!("unknown tab `{rest}`"))?,
            ),
            "list" | "ls" => ShellCommand::List,
            "add" | "new" => ShellCommand::Add,
            "edit" => ShellCommand::Edit(row(rest)?),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(f, v)| (f, v.trim()))
                    .unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("usage: set <field> <value>".into());
                }
                ShellCommand::Set {
                    field: field.to_string(),
                    value: value.to_string(),
                }
            }
            "pick" => ShellCommand::Pick(row(rest)?),
            "save" | "submit" => ShellCommand::Save,
            "cancel" => ShellCommand::Cancel,
            "delete" | "rm" => ShellCommand::Delete(row(rest)?),
            "yes" | "y" => ShellCommand::Yes,
            "no" | "n" => ShellCommand::No,
            "dismiss" => ShellCommand::Dismiss,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("unknown command `{other}`; try `help`")),
        };
        Ok(command)
    }
}

/// Rows are shown 1-based; panels index from 0.
fn row(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("expected a row number, got `{raw}`")),
    }
}

/// Run `$body` against whichever panel is live, bound as `$panel`.
macro_rules! on_panel {
    ($view:expr, $panel:ident => $body:expr) => {
        match $view.panel_mut() {
            Some(ActivePanel::Departments($panel)) => $body,
            Some(ActivePanel::Employees(employees)) => {
                let $panel = employees.panel_mut();
                $body
            }
            None => Ok(()),
        }
    };
}

pub async fn run(mut view: HostView, palette: Palette) -> Result<()> {
    view.activate(Tab::default()).await;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let now = Instant::now();
        expire_notifications(&mut view, now).await;
        print!("{}\n> ", render::host(&view, palette, now));
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", palette.error(&message));
                continue;
            }
        };
        debug!(?command, "shell command");
        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => println!("{}", palette.muted(HELP)),
            command => {
                if let Err(err) = execute(&mut view, command).await {
                    println!("{}", palette.error(&err.to_string()));
                }
            }
        }
    }
    Ok(())
}

async fn expire_notifications(view: &mut HostView, now: Instant) {
    let _ = on_panel!(view, panel => {
        panel.tick(now).await;
        Ok::<(), PanelError>(())
    });
}

async fn execute(view: &mut HostView, command: ShellCommand) -> Result<(), PanelError> {
    match command {
        ShellCommand::Tab(tab) => {
            view.activate(tab).await;
            Ok(())
        }
        ShellCommand::List => match view.panel_mut() {
            Some(ActivePanel::Departments(panel)) => {
                panel.list().await;
                Ok(())
            }
            Some(ActivePanel::Employees(panel)) => {
                panel.panel_mut().list().await;
                panel.refresh_directory().await;
                Ok(())
            }
            None => Ok(()),
        },
        ShellCommand::Add => on_panel!(view, panel => {
            panel.open_editor(None).await;
            Ok(())
        }),
        ShellCommand::Edit(index) => on_panel!(view, panel => panel.open_row(index).await),
        ShellCommand::Set { field, value } => {
            on_panel!(view, panel => panel.edit(&field, &value))
        }
        ShellCommand::Pick(index) => match view.panel_mut() {
            Some(ActivePanel::Employees(panel)) => panel.choose_department(index),
            _ => Ok(()),
        },
        ShellCommand::Save => on_panel!(view, panel => {
            panel.submit().await;
            Ok(())
        }),
        ShellCommand::Cancel => on_panel!(view, panel => {
            panel.close_editor().await;
            Ok(())
        }),
        ShellCommand::Delete(index) => {
            on_panel!(view, panel => panel.request_delete_row(index).await)
        }
        ShellCommand::Yes => on_panel!(view, panel => {
            panel.confirm_delete().await;
            Ok(())
        }),
        ShellCommand::No => on_panel!(view, panel => {
            panel.cancel_delete().await;
            Ok(())
        }),
        ShellCommand::Dismiss => on_panel!(view, panel => {
            panel.dismiss_banner().await;
            Ok(())
        }),
        ShellCommand::Help | ShellCommand::Quit | ShellCommand::Nothing => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use entity::{Department, Employee, RecordId};
    use products_hr::memory::{Call, MemoryStore};

    use super::*;

    struct Fixture {
        departments: Arc<MemoryStore<Department>>,
        employees: Arc<MemoryStore<Employee>>,
        view: HostView,
    }

    fn fixture() -> Fixture {
        let departments = Arc::new(MemoryStore::with_records(vec![Department {
            id: RecordId::Number(1),
            name: "Engineering".into(),
            head_of_department: "Alice".into(),
        }]));
        let employees = Arc::new(MemoryStore::<Employee>::new());
        let view = HostView::new(departments.clone(), employees.clone());
        Fixture {
            departments,
            employees,
            view,
        }
    }

    async fn run_all(view: &mut HostView, lines: &[&str]) -> Result<(), PanelError> {
        for line in lines {
            let command = ShellCommand::parse(line).unwrap_or_else(|err| panic!("{line}: {err}"));
            execute(view, command).await?;
        }
        Ok(())
    }

    #[tokio::test]
    async fn delete_waits_for_yes_on_the_active_panel() {
        let Fixture {
            departments,
            mut view,
            ..
        } = fixture();
        run_all(&mut view, &["tab departments", "delete 1", "no"])
            .await
            .unwrap();
        assert_eq!(departments.records().len(), 1);

        run_all(&mut view, &["delete 1", "yes"]).await.unwrap();
        assert!(departments.records().is_empty());
        assert_eq!(
            departments.calls(),
            vec![Call::List, Call::Delete(RecordId::Number(1)), Call::List]
        );
    }

    #[tokio::test]
    async fn employee_editor_takes_a_picked_department() {
        let Fixture {
            departments,
            employees,
            mut view,
        } = fixture();
        run_all(
            &mut view,
            &[
                "tab employees",
                "add",
                "set name Grace Hopper",
                "set salary 72000",
                "pick 1",
                "set manager 3",
                "set date 2024-03-05",
                "set designation Engineer",
                "save",
            ],
        )
        .await
        .unwrap();

        assert_eq!(employees.calls(), vec![Call::List, Call::Create, Call::List]);
        assert_eq!(departments.calls(), vec![Call::List]);
        let Some(ActivePanel::Employees(panel)) = view.panel() else {
            panic!("employee tab should be active");
        };
        let row = &panel.state().items()[0];
        assert_eq!(row.name, "Grace Hopper");
        assert_eq!(panel.department_name(row), "Engineering");
        assert!(panel.state().editor().is_none());
    }

    #[tokio::test]
    async fn list_on_the_employee_tab_reloads_the_directory() {
        let Fixture {
            departments,
            mut view,
            ..
        } = fixture();
        run_all(&mut view, &["tab employees", "list"]).await.unwrap();
        assert_eq!(departments.calls(), vec![Call::List, Call::List]);
    }

    #[tokio::test]
    async fn panel_errors_come_back_to_the_prompt() {
        let Fixture { mut view, .. } = fixture();
        assert_eq!(execute(&mut view, ShellCommand::Add).await, Ok(()));

        view.activate(Tab::Departments).await;
        assert_eq!(
            execute(&mut view, ShellCommand::Edit(4)).await,
            Err(PanelError::NoSuchRow(4))
        );
        assert_eq!(
            execute(
                &mut view,
                ShellCommand::Set {
                    field: "name".into(),
                    value: "Ops".into(),
                }
            )
            .await,
            Err(PanelError::EditorClosed)
        );
        assert_eq!(execute(&mut view, ShellCommand::Pick(0)).await, Ok(()));
    }

    #[test]
    fn parses_commands() {
        assert_eq!(ShellCommand::parse("tab emp"), Ok(ShellCommand::Tab(Tab::Employees)));
        assert_eq!(ShellCommand::parse("  edit 2 "), Ok(ShellCommand::Edit(1)));
        assert_eq!(ShellCommand::parse("DELETE 1"), Ok(ShellCommand::Delete(0)));
        assert_eq!(ShellCommand::parse(""), Ok(ShellCommand::Nothing));
    }

    #[test]
    fn set_keeps_spaces_in_the_value() {
        assert_eq!(
            ShellCommand::parse("set name Research and Development"),
            Ok(ShellCommand::Set {
                field: "name".into(),
                value: "Research and Development".into(),
            })
        );
        assert_eq!(
            ShellCommand::parse("set hod"),
            Ok(ShellCommand::Set {
                field: "hod".into(),
                value: String::new(),
            })
        );
    }

    #[test]
    fn rejects_bad_rows_and_unknown_words() {
        assert!(ShellCommand::parse("edit 0").is_err());
        assert!(ShellCommand::parse("edit x").is_err());
        assert!(ShellCommand::parse("tab payroll").is_err());
        assert!(ShellCommand::parse("frobnicate").is_err());
        assert!(ShellCommand::parse("set").is_err());
    }
}
