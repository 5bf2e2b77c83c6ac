//! CLI commands for marksrank

pub mod calculate;
pub mod difficulty;
pub mod dispatch;
pub mod format;
pub mod init;
pub mod load;
pub mod lookup;
pub mod status;
