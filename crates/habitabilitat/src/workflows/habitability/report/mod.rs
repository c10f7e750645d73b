mod summary;
pub mod views;

pub use summary::{status_label, truncate, DISCLAIMER, REPORT_SUBTITLE, REPORT_TITLE};
pub use views::CaseReport;
