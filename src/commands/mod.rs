pub mod analytics_cmd;
pub mod base_commands;
pub mod command_context;
pub mod daily_reports_cmd;
pub mod plot_cmd;
pub mod report_format;
pub mod weekly_cmd;
