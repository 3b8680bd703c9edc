/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// One message destined for the user, not the log.
///
/// Recoverable faults (corrupt saved state, a rejected imagery URL, an empty
/// segmentation result) surface here; `tracing` carries the diagnostic twin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self { notices: Vec::new() }
    }

    pub fn emit(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice { level, message: message.into() });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.emit(NoticeLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.emit(NoticeLevel::Warning, message);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Takes every pending notice, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::{NoticeLevel, NoticeLog};

    #[test]
    fn records_notices_in_order() {
        let mut log = NoticeLog::new();
        log.info("loaded");
        log.warn("stale state discarded");
        assert_eq!(log.notices().len(), 2);
        assert_eq!(log.notices()[0].level, NoticeLevel::Info);
        assert_eq!(log.notices()[1].level, NoticeLevel::Warning);
    }

    #[test]
    fn drain_clears_the_log() {
        let mut log = NoticeLog::new();
        log.warn("something");
        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(log.notices().is_empty());
    }
}
