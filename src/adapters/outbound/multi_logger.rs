use crate::domains::logger::{DomainLogger, LogLevel};
use std::sync::Arc;

/// Forwards every message to a primary logger and an optional secondary one.
pub struct MultiLogger {
    primary: Arc<dyn DomainLogger>,
    secondary: Option<Arc<dyn DomainLogger>>,
}

impl MultiLogger {
    pub fn new(primary: Arc<dyn DomainLogger>, secondary: Option<Arc<dyn DomainLogger>>) -> Self {
        Self { primary, secondary }
    }

    fn each(&self, f: impl Fn(&dyn DomainLogger)) {
        f(self.primary.as_ref());
        if let Some(sec) = &self.secondary {
            f(sec.as_ref());
        }
    }
}

impl DomainLogger for MultiLogger {
    fn debug(&self, msg: &str) {
        self.each(|l| l.debug(msg));
    }

    fn info(&self, msg: &str) {
        self.each(|l| l.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.each(|l| l.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.each(|l| l.error(msg));
    }
}

/// Console logger, plus a fast_log file logger when `file` is given.
/// Falls back to console only if the file logger cannot be initialized.
pub fn init_combined_logger(file: Option<&str>, level: LogLevel) -> Arc<dyn DomainLogger> {
    let console = super::init_console_logger(level);
    let Some(path) = file else {
        return console;
    };
    match super::file_logger::init_file_logger(path, level) {
        Ok(file_logger) => Arc::new(MultiLogger::new(file_logger, Some(console))) as Arc<dyn DomainLogger>,
        Err(e) => {
            console.warn(&e);
            console
        }
    }
}
