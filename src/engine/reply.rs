/// The outbound message the engine hands to the chat transport: text plus an
/// optional set of quick-reply button labels. The transport decides how the
/// buttons are rendered; the engine only chooses the labels.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Reply {
    message: String,
    keyboard: Option<Vec<String>>,
}

impl Reply {
    /// A plain text reply.
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            keyboard: None,
        }
    }

    /// A text reply with quick-reply buttons.
    pub fn with_keyboard(message: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            message: message.into(),
            keyboard: Some(labels),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn keyboard(&self) -> Option<&[String]> {
        self.keyboard.as_deref()
    }
}
