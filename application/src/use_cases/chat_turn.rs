//! Chat turn use case
//!
//! Orchestrates one complete user-input-to-final-response cycle:
//!
//! 1. Append the user message to history.
//! 2. Send the full history (plus tool schemas, when any tools are
//!    registered) to the model.
//! 3. If the model requested tool calls, execute them in order, transcribe
//!    each call and its result into history, and query the model once more.
//! 4. Append and return the final assistant text.
//!
//! The loop performs exactly one tool-resolution round per turn: if the
//! follow-up response requests tools again, those nested requests are not
//! serviced and the response's text (possibly empty) is returned unchanged.
//!
//! Transport failures and malformed tool-call argument payloads never
//! crash a turn: they are formatted into the returned text, and history is
//! left without phantom entries: the user message stays, and no assistant
//! tool-call entry is ever appended without its paired tool result.

use crate::config::GenerationParams;
use crate::ports::event_sink::{ChatEventSink, NullChatEventSink};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use confab_domain::{ConversationHistory, ToolCall, ToolCallRecord, ToolCallRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for running one conversation turn
pub struct ChatTurnUseCase {
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<dyn ToolExecutorPort>,
    schema: Arc<dyn ToolSchemaPort>,
    sink: Arc<dyn ChatEventSink>,
    params: GenerationParams,
    history: ConversationHistory,
}

impl ChatTurnUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<dyn ToolExecutorPort>,
        schema: Arc<dyn ToolSchemaPort>,
        params: GenerationParams,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            tools,
            schema,
            sink: Arc::new(NullChatEventSink),
            params,
            history: ConversationHistory::with_system_prompt(system_prompt),
        }
    }

    /// Set the event sink for tool-call and error notifications
    pub fn with_event_sink(mut self, sink: Arc<dyn ChatEventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Names of the registered tools, in registration order
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.tool_names()
    }

    /// The conversation so far
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Run one turn and return the final assistant text.
    ///
    /// Errors are returned as descriptive text rather than propagated; a
    /// turn always yields something displayable.
    pub async fn run_turn(&mut self, input: &str) -> String {
        self.history.push_user(input);

        let schemas = self.export_schemas();
        debug!(
            model = %self.params.model,
            messages = self.history.len(),
            tools = schemas.as_ref().map_or(0, Vec::len),
            "Sending chat request"
        );

        let response = match self
            .gateway
            .complete(self.history.messages(), schemas.as_deref(), &self.params)
            .await
        {
            Ok(response) => response,
            Err(e) => return self.report_error(format!("Error communicating with the model: {}", e)),
        };

        let final_response = if response.has_tool_calls() {
            // Decode every argument payload before executing anything, so a
            // malformed payload fails the turn without running tools or
            // leaving an unpaired tool-call entry in history.
            let decoded = match decode_tool_calls(&response.tool_calls) {
                Ok(calls) => calls,
                Err(message) => return self.report_error(message),
            };

            info!(count = decoded.len(), "Model requested tool calls");

            for (request, call) in response.tool_calls.iter().zip(decoded) {
                self.sink.tool_call_started(&request.name, &request.arguments);

                let result = self.tools.execute(&call).await;
                let content = result.message_content();
                self.sink
                    .tool_call_finished(&request.name, &content, !result.is_success());

                self.history.push_tool_exchange(
                    ToolCallRecord {
                        id: request.id.clone(),
                        name: request.name.clone(),
                        arguments: request.arguments.clone(),
                    },
                    content,
                );
            }

            // One tool-resolution round only: tool calls in this follow-up
            // response are not serviced.
            match self
                .gateway
                .complete(self.history.messages(), schemas.as_deref(), &self.params)
                .await
            {
                Ok(response) => {
                    if response.has_tool_calls() {
                        warn!("Follow-up response requested further tool calls; not serviced");
                    }
                    response
                }
                Err(e) => {
                    return self
                        .report_error(format!("Error communicating with the model: {}", e));
                }
            }
        } else {
            response
        };

        let final_text = final_response.text_content().to_string();
        self.history.push_assistant(final_text.clone());
        final_text
    }

    /// Tool schemas for the request, or `None` when no tools are registered
    /// (tool-calling must then be omitted from the request entirely).
    fn export_schemas(&self) -> Option<Vec<serde_json::Value>> {
        let definitions = self.tools.definitions();
        if definitions.is_empty() {
            None
        } else {
            Some(self.schema.all_tools_schema(&definitions))
        }
    }

    fn report_error(&self, message: String) -> String {
        warn!("{}", message);
        self.sink.error(&message);
        message
    }
}

/// Decode the raw JSON argument payload of every request, in model order.
///
/// The first malformed payload fails the whole turn with a decoding error,
/// distinct from a tool execution error.
fn decode_tool_calls(requests: &[ToolCallRequest]) -> Result<Vec<ToolCall>, String> {
    requests
        .iter()
        .map(|request| {
            let arguments: HashMap<String, serde_json::Value> =
                serde_json::from_str(&request.arguments).map_err(|e| {
                    format!(
                        "Error decoding arguments for tool '{}': {}",
                        request.name, e
                    )
                })?;
            Ok(ToolCall {
                call_id: Some(request.id.clone()),
                tool_name: request.name.clone(),
                arguments,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use async_trait::async_trait;
    use confab_domain::{
        Message, ModelResponse, ToolDefinition, ToolParameter, ToolResult,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockGateway {
        responses: Mutex<VecDeque<Result<ModelResponse, GatewayError>>>,
        /// Number of tool schemas seen per request; None = field omitted
        seen_tools: Mutex<Vec<Option<usize>>>,
    }

    impl MockGateway {
        fn new(responses: Vec<Result<ModelResponse, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                seen_tools: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(
            &self,
            _messages: &[Message],
            tools: Option<&[serde_json::Value]>,
            _params: &GenerationParams,
        ) -> Result<ModelResponse, GatewayError> {
            self.seen_tools.lock().unwrap().push(tools.map(|t| t.len()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::ConnectionError("no more responses".into())))
        }
    }

    struct MockExecutor {
        definitions: Vec<ToolDefinition>,
        executed: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MockExecutor {
        fn new() -> Self {
            Self {
                definitions: vec![ToolDefinition::new("calculate", "Evaluate an expression")
                    .with_parameter(ToolParameter::new("expression", "Expression", true))],
                executed: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn empty() -> Self {
            Self {
                definitions: Vec::new(),
                executed: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for MockExecutor {
        fn definitions(&self) -> Vec<ToolDefinition> {
            self.definitions.clone()
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            self.executed.lock().unwrap().push(call.tool_name.clone());
            if self.fail {
                ToolResult::failure(
                    &call.tool_name,
                    confab_domain::ToolError::execution_failed("mock failure"),
                )
            } else {
                ToolResult::success(&call.tool_name, "mock output")
            }
        }
    }

    struct MockSchema;

    impl ToolSchemaPort for MockSchema {
        fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
            serde_json::json!({ "name": tool.name })
        }
    }

    fn use_case(
        gateway: MockGateway,
        executor: MockExecutor,
    ) -> (ChatTurnUseCase, Arc<MockGateway>, Arc<MockExecutor>) {
        let gateway = Arc::new(gateway);
        let executor = Arc::new(executor);
        let use_case = ChatTurnUseCase::new(
            gateway.clone(),
            executor.clone(),
            Arc::new(MockSchema),
            GenerationParams::default(),
            "You are a helpful assistant with access to tools.",
        );
        (use_case, gateway, executor)
    }

    fn tool_call_response(id: &str, name: &str, arguments: &str) -> ModelResponse {
        ModelResponse::from_tool_calls(vec![ToolCallRequest {
            id: id.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }])
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_plain_text_turn() {
        let gateway = MockGateway::new(vec![Ok(ModelResponse::from_text("Hello there!"))]);
        let (mut use_case, _, executor) = use_case(gateway, MockExecutor::new());

        let reply = use_case.run_turn("hi").await;

        assert_eq!(reply, "Hello there!");
        assert!(executor.executed.lock().unwrap().is_empty());

        // system, user, assistant
        let messages = use_case.history().messages();
        assert_eq!(messages.len(), 3);
        assert!(matches!(messages[1], Message::User { .. }));
        assert_eq!(messages[2], Message::assistant("Hello there!"));
    }

    #[tokio::test]
    async fn test_tool_call_turn_history_shape() {
        let gateway = MockGateway::new(vec![
            Ok(tool_call_response(
                "call_1",
                "calculate",
                r#"{"expression": "2 + 3 * 4"}"#,
            )),
            Ok(ModelResponse::from_text("The answer is 14.")),
        ]);
        let (mut use_case, _, executor) = use_case(gateway, MockExecutor::new());

        let reply = use_case.run_turn("what is 2 + 3 * 4?").await;

        assert_eq!(reply, "The answer is 14.");
        assert_eq!(*executor.executed.lock().unwrap(), vec!["calculate"]);

        // Exactly four new entries after the system message, in order:
        // user, assistant tool call, tool result, final assistant text.
        let messages = use_case.history().messages();
        assert_eq!(messages.len(), 5);
        assert!(matches!(messages[1], Message::User { .. }));
        let Message::Assistant {
            content,
            tool_calls,
        } = &messages[2]
        else {
            panic!("expected assistant tool call");
        };
        assert!(content.is_none());
        assert_eq!(tool_calls[0].id, "call_1");
        assert_eq!(tool_calls[0].arguments, r#"{"expression": "2 + 3 * 4"}"#);
        let Message::Tool {
            tool_call_id,
            content,
            ..
        } = &messages[3]
        else {
            panic!("expected tool result");
        };
        assert_eq!(tool_call_id, "call_1");
        assert_eq!(content, "mock output");
        assert_eq!(messages[4], Message::assistant("The answer is 14."));
    }

    #[tokio::test]
    async fn test_tool_failure_still_yields_four_entries() {
        let gateway = MockGateway::new(vec![
            Ok(tool_call_response(
                "call_1",
                "calculate",
                r#"{"expression": "1/0"}"#,
            )),
            Ok(ModelResponse::from_text("That division is undefined.")),
        ]);
        let (mut use_case, _, _) = use_case(gateway, MockExecutor::failing());

        let reply = use_case.run_turn("what is 1/0?").await;

        assert_eq!(reply, "That division is undefined.");
        let messages = use_case.history().messages();
        assert_eq!(messages.len(), 5);
        let Message::Tool { content, .. } = &messages[3] else {
            panic!("expected tool result");
        };
        assert!(content.starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_second_round_tool_calls_are_not_serviced() {
        let gateway = MockGateway::new(vec![
            Ok(tool_call_response("call_1", "calculate", r#"{"expression": "1"}"#)),
            // The follow-up response asks for tools again; it must not be
            // serviced, and its (empty) text is the turn's result.
            Ok(tool_call_response("call_2", "calculate", r#"{"expression": "2"}"#)),
        ]);
        let (mut use_case, gateway, executor) = use_case(gateway, MockExecutor::new());

        let reply = use_case.run_turn("loop forever").await;

        assert_eq!(reply, "");
        assert_eq!(*executor.executed.lock().unwrap(), vec!["calculate"]);
        assert_eq!(gateway.seen_tools.lock().unwrap().len(), 2);

        // The empty final text is still appended.
        let messages = use_case.history().messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[4], Message::assistant(""));
    }

    #[tokio::test]
    async fn test_transport_error_keeps_user_message_only() {
        let gateway = MockGateway::new(vec![Err(GatewayError::ConnectionError(
            "connection refused".into(),
        ))]);
        let (mut use_case, _, _) = use_case(gateway, MockExecutor::new());

        let reply = use_case.run_turn("hello?").await;

        assert!(reply.contains("Error communicating with the model"));
        assert!(reply.contains("connection refused"));

        // No phantom assistant entry: system + user only.
        let messages = use_case.history().messages();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[1], Message::User { .. }));
    }

    #[tokio::test]
    async fn test_malformed_arguments_fail_the_turn_before_execution() {
        let gateway = MockGateway::new(vec![Ok(tool_call_response(
            "call_1",
            "calculate",
            "{not json",
        ))]);
        let (mut use_case, _, executor) = use_case(gateway, MockExecutor::new());

        let reply = use_case.run_turn("break me").await;

        assert!(reply.contains("Error decoding arguments for tool 'calculate'"));
        assert!(executor.executed.lock().unwrap().is_empty());

        // No unpaired tool-call entry: system + user only.
        assert_eq!(use_case.history().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_registry_omits_tools_from_request() {
        let gateway = MockGateway::new(vec![Ok(ModelResponse::from_text("ok"))]);
        let (mut use_case, gateway, _) = use_case(gateway, MockExecutor::empty());

        use_case.run_turn("hi").await;

        assert_eq!(*gateway.seen_tools.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn test_registered_tools_are_sent() {
        let gateway = MockGateway::new(vec![Ok(ModelResponse::from_text("ok"))]);
        let (mut use_case, gateway, _) = use_case(gateway, MockExecutor::new());

        use_case.run_turn("hi").await;

        assert_eq!(*gateway.seen_tools.lock().unwrap(), vec![Some(1)]);
    }

    #[tokio::test]
    async fn test_second_request_transport_error_becomes_turn_text() {
        let gateway = MockGateway::new(vec![
            Ok(tool_call_response("call_1", "calculate", r#"{"expression": "1"}"#)),
            Err(GatewayError::Timeout),
        ]);
        let (mut use_case, _, _) = use_case(gateway, MockExecutor::new());

        let reply = use_case.run_turn("calc").await;

        assert!(reply.contains("Error communicating with the model"));
        // The executed tool exchange stays; no final assistant entry.
        let messages = use_case.history().messages();
        assert_eq!(messages.len(), 4);
        assert!(matches!(messages[3], Message::Tool { .. }));
    }
}
