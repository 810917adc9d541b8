mod commands;
mod config;
mod render;
mod shell;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use entity::{Department, Employee};
use platform_api::ApiClient;
use platform_obs::{ObsConfig, init_tracing};
use products_hr::HostView;
use tracing::info;
use url::Url;

use crate::{
    commands::{DepartmentCommand, EmployeeCommand},
    config::{ColorChoice, ConsoleConfig, Overrides},
    render::Palette,
};

#[derive(Parser, Debug)]
#[command(
    name = "staffdesk",
    version,
    about = "Department and Employee Management"
)]
struct Cli {
    /// Base URL of the REST API. Overrides STAFFDESK_API_URL.
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<Url>,
    /// Colour output. Overrides STAFFDESK_COLOR.
    #[arg(long, global = true, value_enum)]
    color: Option<ColorChoice>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage departments.
    #[command(subcommand)]
    Departments(DepartmentCommand),
    /// Manage employees.
    #[command(subcommand)]
    Employees(EmployeeCommand),
    /// Interactive view with a tab per collection.
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConsoleConfig::load(Overrides {
        api_url: cli.api_url,
        color: cli.color,
    })?;
    let _guard = init_tracing(ObsConfig::default())?;

    let client = ApiClient::new(&config.client_config())
        .with_context(|| format!("cannot use API at {}", config.api_url))?;
    info!(api = %client.base_url(), "console starting");
    let palette = Palette::new(config.color.enabled());

    match cli.command {
        Command::Departments(cmd) => commands::run_departments(&client, palette, cmd).await,
        Command::Employees(cmd) => commands::run_employees(&client, palette, cmd).await,
        Command::Shell => {
            let view = HostView::new(
                Arc::new(client.resource::<Department>()),
                Arc::new(client.resource::<Employee>()),
            );
            shell::run(view, palette).await
        }
    }
}
