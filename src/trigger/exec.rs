//! Executor that records misc text without running it

use crate::core::error::Result;
use crate::trigger::GenericExecutor;

/// Logs and keeps every text it receives
///
/// Button configs can come from anywhere, so misc text is treated as data.
#[derive(Debug, Default, Clone)]
pub struct LoggedExecutor {
    received: Vec<String>,
}

impl LoggedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> &[String] {
        &self.received
    }

    pub fn clear(&mut self) {
        self.received.clear();
    }
}

impl GenericExecutor for LoggedExecutor {
    fn execute(&mut self, text: &str) -> Result<()> {
        tracing::info!("Misc action: {}", text);
        self.received.push(text.to_string());
        Ok(())
    }
}
