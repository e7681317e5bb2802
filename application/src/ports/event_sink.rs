//! Chat event sink port
//!
//! The output collaborator receives structured notifications; rendering is
//! entirely the sink's concern. The sink is passed explicitly into the
//! registry and the loop; there is no process-wide console object.

/// Structured notification sink for chat events
pub trait ChatEventSink: Send + Sync {
    /// A tool was registered with the registry
    fn tool_registered(&self, name: &str);

    /// A tool call is about to execute
    fn tool_call_started(&self, name: &str, arguments: &str);

    /// A tool call finished, successfully or not
    fn tool_call_finished(&self, name: &str, result: &str, is_error: bool);

    /// A non-fatal condition worth surfacing (e.g., a skipped plugin)
    fn warning(&self, message: &str);

    /// An error surfaced to the user as text
    fn error(&self, message: &str);
}

/// No-op sink for tests and headless use
pub struct NullChatEventSink;

impl ChatEventSink for NullChatEventSink {
    fn tool_registered(&self, _name: &str) {}
    fn tool_call_started(&self, _name: &str, _arguments: &str) {}
    fn tool_call_finished(&self, _name: &str, _result: &str, _is_error: bool) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
