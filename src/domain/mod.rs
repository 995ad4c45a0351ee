pub mod daily_report;
pub mod project;
pub mod record_id;
pub mod task;
pub mod weekly_summary;
