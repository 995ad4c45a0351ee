pub mod app_config;
pub mod chart_data;
pub mod csv_export;
pub mod daily_report_store;
pub mod drawing_surface;
pub mod plotters_surface;
pub mod simple_chart;
pub mod storage;
pub mod visual_analytics;
pub mod week_calendar;
pub mod weekly_analytics;
