use crate::domains::logger::{DomainLogger, FileLogger, LogLevel};
use std::sync::Arc;

/// Initialize the fast_log file logger and return a domain logger that writes through it.
pub fn init_file_logger(path: &str, level: LogLevel) -> Result<Arc<dyn DomainLogger>, String> {
    FileLogger::init(path, level).map_err(|e| format!("Failed to initialize fast_log at {}: {}", path, e))?;
    Ok(Arc::new(FileLogger))
}
