use std::error::Error;

use copypasta::{ClipboardContext, ClipboardProvider};
use formscan_core::export::Clipboard;

/// The desktop clipboard.
pub struct SystemClipboard {
    ctx: ClipboardContext,
}

impl SystemClipboard {
    /// `None` when no clipboard is reachable (headless session, no display).
    pub fn open() -> Option<Self> {
        match ClipboardContext::new() {
            Ok(ctx) => Some(Self { ctx }),
            Err(e) => {
                tracing::debug!(error = %e, "clipboard unavailable");
                None
            }
        }
    }
}

impl Clipboard for SystemClipboard {
    type Error = Box<dyn Error + Send + Sync>;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        self.ctx.set_contents(text.to_owned())
    }
}
