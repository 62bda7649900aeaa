//! Status bar messages

/// Receiver of one-line user facing messages
pub trait StatusSink {
    /// Show a message, replacing the previous one
    fn set_text(&mut self, text: &str);
}

/// Status bar keeping the current message and a short history
#[derive(Debug, Default)]
pub struct StatusBar {
    history: Vec<String>,
}

impl StatusBar {
    const HISTORY_LIMIT: usize = 32;

    /// Create an empty status bar
    pub fn new() -> Self {
        Self::default()
    }

    /// Message currently shown
    pub fn text(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// Messages shown so far, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl StatusSink for StatusBar {
    fn set_text(&mut self, text: &str) {
        log::info!("Status: {text}");
        if self.history.len() == Self::HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(text.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_latest_message() {
        let mut status = StatusBar::new();
        assert_eq!(status.text(), None);

        status.set_text("Nothing to copy!");
        status.set_text("Layer is locked!");
        assert_eq!(status.text(), Some("Layer is locked!"));
        assert_eq!(status.history().len(), 2);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut status = StatusBar::new();
        for i in 0..40 {
            status.set_text(&format!("message {i}"));
        }
        assert_eq!(status.history().len(), StatusBar::HISTORY_LIMIT);
        assert_eq!(status.text(), Some("message 39"));
    }
}
