//! Print handler for configurable output.
//!
//! The `print` and `println` built-ins write through a [`PrintHandler`]:
//! stdout by default, a buffer when the host (or a test) wants to capture
//! script output.

use std::sync::Arc;

use parking_lot::Mutex;

/// Destination of script output.
pub trait PrintHandler: Send + Sync {
    /// Print without newline.
    fn print(&self, msg: &str);

    /// Print a line (with newline).
    fn println(&self, msg: &str) {
        self.print(msg);
        self.print("\n");
    }
}

/// Default print handler that writes to stdout.
#[derive(Default)]
pub struct StdoutPrintHandler;

impl PrintHandler for StdoutPrintHandler {
    fn print(&self, msg: &str) {
        print!("{msg}");
    }

    fn println(&self, msg: &str) {
        println!("{msg}");
    }
}

/// Print handler that captures output to a buffer.
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured output.
    pub fn output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl PrintHandler for BufferPrintHandler {
    fn print(&self, msg: &str) {
        self.buffer.lock().push_str(msg);
    }
}

/// Shared print handler that can be passed around.
pub type SharedPrintHandler = Arc<dyn PrintHandler>;

/// Create a default stdout print handler.
pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(StdoutPrintHandler)
}

/// Create a buffer print handler, returned concretely so callers can read it back.
pub fn buffer_handler() -> Arc<BufferPrintHandler> {
    Arc::new(BufferPrintHandler::new())
}
