mod commands;
mod domain;
mod services;
#[cfg(test)]
mod test_support;

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use crate::commands::analytics_cmd::{
    forecast_command, progress_command, resource_utilization_command, trend_data_command,
};
use crate::commands::base_commands::{CliArgs, Commands, DailyReportAction};
use crate::commands::command_context::CommandError;
use crate::commands::daily_reports_cmd::{
    ReportChanges, ReportInput, add_report_command, approve_report_command,
    export_reports_command, list_reports_command, update_report_command,
};
use crate::commands::plot_cmd::plot_command;
use crate::commands::weekly_cmd::{
    weekly_export_command, weekly_list_command, weekly_summary_command, weekly_trends_command,
};
use crate::services::app_config::AppConfig;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = CliArgs::parse();

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (action, result): (&str, Result<(), CommandError>) = match args.command {
        Commands::WeeklySummary {
            scope,
            week,
            output,
        } => (
            "summarize week",
            weekly_summary_command(&config, &scope, week.as_deref(), output.as_deref()),
        ),
        Commands::WeeklyTrends {
            scope,
            week,
            output,
            detail,
        } => (
            "compare weeks",
            weekly_trends_command(&config, &scope, week.as_deref(), output.as_deref(), detail),
        ),
        Commands::WeeklyList {
            scope,
            count,
            today,
        } => (
            "list weeks",
            weekly_list_command(&config, &scope, count, today.as_deref()),
        ),
        Commands::WeeklyExport {
            scope,
            week,
            output,
        } => (
            "export weekly report",
            weekly_export_command(&config, &scope, week.as_deref(), output.as_deref()),
        ),
        Commands::TrendData {
            scope,
            days,
            today,
            output,
        } => (
            "generate trend data",
            trend_data_command(&config, &scope, days, today.as_deref(), output.as_deref()),
        ),
        Commands::Progress { scope, output } => (
            "calculate progress",
            progress_command(&config, &scope, output.as_deref()),
        ),
        Commands::ResourceUtilization {
            scope,
            weeks,
            output,
        } => (
            "calculate resource utilization",
            resource_utilization_command(&config, &scope, weeks, output.as_deref()),
        ),
        Commands::Forecast {
            scope,
            metric,
            days,
            periods,
            today,
            output,
        } => (
            "forecast",
            forecast_command(
                &config,
                &scope,
                metric,
                days,
                periods,
                today.as_deref(),
                output.as_deref(),
            ),
        ),
        Commands::Plot {
            scope,
            chart,
            output,
            width,
            height,
            days,
            weeks,
            today,
            forecast,
        } => (
            "plot chart",
            plot_command(
                &config,
                &scope,
                chart,
                &output,
                width,
                height,
                days,
                weeks,
                today.as_deref(),
                forecast,
            ),
        ),
        Commands::DailyReports { action } => match action {
            DailyReportAction::List {
                scope,
                date,
                status,
            } => (
                "list daily reports",
                list_reports_command(&config, &scope, date.as_deref(), status),
            ),
            DailyReportAction::Add {
                scope,
                date,
                project_name,
                workers,
                hours,
                crew_type,
                tasks,
                weather,
                temperature,
                notes,
                created_by,
            } => (
                "add daily report",
                add_report_command(
                    &config,
                    &scope,
                    ReportInput {
                        date,
                        project_name,
                        workers,
                        hours,
                        crew_type,
                        tasks,
                        weather,
                        temperature,
                        notes,
                        created_by,
                    },
                ),
            ),
            DailyReportAction::Update {
                scope,
                id,
                date,
                workers,
                hours,
                tasks,
                weather,
                notes,
                status,
            } => (
                "update daily report",
                update_report_command(
                    &config,
                    &scope,
                    &id,
                    ReportChanges {
                        date,
                        workers,
                        hours,
                        tasks,
                        weather,
                        notes,
                        status,
                    },
                ),
            ),
            DailyReportAction::Approve { scope, id, by } => (
                "approve daily report",
                approve_report_command(&config, &scope, &id, &by),
            ),
            DailyReportAction::ExportCsv { scope, output } => (
                "export daily reports",
                export_reports_command(&config, &scope, output.as_deref()),
            ),
        },
        Commands::Completions { shell } => {
            let mut cmd = CliArgs::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut io::stdout());
            ("generate completions", Ok(()))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to {action}: {e}");
            ExitCode::FAILURE
        }
    }
}
