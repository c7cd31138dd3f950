pub mod export;
pub mod init;

pub use export::{ExportStatus, run_export};
pub use init::run_init;
