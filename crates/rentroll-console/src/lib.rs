/*
[INPUT]:  Public API exports for rentroll-console crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod dates;
pub mod expense;
pub mod report;
pub mod session;

// Re-export main types for convenience
pub use config::AppConfig;
pub use dates::DateRange;
pub use expense::{ExpenseWorkspace, Intent, Outcome, Step};
pub use report::{PageSetup, ReportViewer};
pub use session::{Business, Session};
