//! The server loop.

use crate::error::LspResult;
use crate::framing::{MessageReader, MessageWriter};
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use tracing::debug;

/// Loop configuration.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    /// Server name reported in the `initialize` result.
    pub server_name: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            server_name: "IStudio Language Server".to_string(),
        }
    }
}

/// A minimal JSON-RPC server.
///
/// Answers `initialize` and `shutdown`; every other request gets a
/// method-not-implemented error. Notifications besides `exit` are
/// ignored.
#[derive(Debug, Default)]
pub struct Server {
    options: ServerOptions,
    shutdown_received: bool,
}

impl Server {
    pub fn new(options: ServerOptions) -> Self {
        Self {
            options,
            shutdown_received: false,
        }
    }

    /// Runs the loop over the given streams until `exit` or end of
    /// stream. Returns the process exit code dictated by the protocol.
    pub fn run(&mut self, input: &mut impl BufRead, output: &mut impl Write) -> LspResult<i32> {
        let mut reader = MessageReader::new();

        while let Some(payload) = reader.read_message(input)? {
            let message: Value = match serde_json::from_str(&payload) {
                Ok(value) => value,
                Err(_) => {
                    self.send_error(output, Value::Null, -32700, "Parse error")?;
                    continue;
                }
            };

            if !is_well_formed(&message) {
                let id = message.get("id").cloned().unwrap_or(Value::Null);
                self.send_error(output, id, -32600, "Invalid Request")?;
                continue;
            }

            // Well-formed, so method is present and a string.
            let method = message["method"].as_str().unwrap_or_default().to_string();
            match message.get("id") {
                Some(id) => self.handle_request(output, id.clone(), &method)?,
                None => {
                    if method == "exit" {
                        let code = if self.shutdown_received { 0 } else { 1 };
                        debug!(code, "exit requested");
                        return Ok(code);
                    }
                    debug!(method = %method, "notification ignored");
                }
            }
        }

        Ok(0)
    }

    fn handle_request(
        &mut self,
        output: &mut impl Write,
        id: Value,
        method: &str,
    ) -> LspResult<()> {
        debug!(method, "request");
        match method {
            "initialize" => {
                let result = self.initialize_result();
                self.send_response(output, id, result)
            }
            "shutdown" => {
                self.shutdown_received = true;
                self.send_response(output, id, Value::Null)
            }
            _ => self.send_error(output, id, -32601, "Method not implemented"),
        }
    }

    fn initialize_result(&self) -> Value {
        json!({
            "capabilities": {
                "textDocumentSync": {
                    "openClose": true,
                    "change": 1,
                    "save": { "includeText": false }
                },
                "hoverProvider": false,
                "definitionProvider": false,
                "referencesProvider": false,
                "documentSymbolProvider": false,
                "completionProvider": {}
            },
            "serverInfo": {
                "name": self.options.server_name,
                "version": istudio_support::version::version()
            }
        })
    }

    fn send_response(&self, output: &mut impl Write, id: Value, result: Value) -> LspResult<()> {
        self.send(
            output,
            json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        )
    }

    fn send_error(
        &self,
        output: &mut impl Write,
        id: Value,
        code: i64,
        message: &str,
    ) -> LspResult<()> {
        self.send(
            output,
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": code, "message": message }
            }),
        )
    }

    fn send(&self, output: &mut impl Write, body: Value) -> LspResult<()> {
        MessageWriter::new().write_message(output, &body.to_string())
    }
}

/// A message is well-formed when it declares `jsonrpc: "2.0"`, names a
/// string `method`, and any `id` is a string or a number.
fn is_well_formed(message: &Value) -> bool {
    if message.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return false;
    }
    if message.get("method").and_then(Value::as_str).is_none() {
        return false;
    }
    match message.get("id") {
        None => true,
        Some(id) => id.is_string() || id.is_number(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame(body: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{body}", body.len())
    }

    fn run_session(bodies: &[&str]) -> (i32, Vec<Value>) {
        let transcript: String = bodies.iter().map(|body| frame(body)).collect();
        let mut input = Cursor::new(transcript);
        let mut output = Vec::new();

        let mut server = Server::default();
        let code = server.run(&mut input, &mut output).unwrap();

        let mut responses = Vec::new();
        let mut reader = MessageReader::new();
        let mut cursor = Cursor::new(output);
        while let Some(payload) = reader.read_message(&mut cursor).unwrap() {
            responses.push(serde_json::from_str(&payload).unwrap());
        }
        (code, responses)
    }

    #[test]
    fn initialize_reports_capabilities_and_server_info() {
        let (_, responses) = run_session(&[
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"processId":1,"rootUri":null}}"#,
        ]);
        assert_eq!(responses.len(), 1);
        let result = &responses[0]["result"];
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(result["capabilities"]["textDocumentSync"]["openClose"], true);
        assert_eq!(result["capabilities"]["textDocumentSync"]["change"], 1);
        assert_eq!(result["capabilities"]["hoverProvider"], false);
        assert_eq!(
            result["serverInfo"]["name"],
            "IStudio Language Server"
        );
        assert_eq!(
            result["serverInfo"]["version"],
            istudio_support::version::version()
        );
    }

    #[test]
    fn graceful_shutdown_exits_zero() {
        let (code, responses) = run_session(&[
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            r#"{"jsonrpc":"2.0","id":2,"method":"shutdown","params":null}"#,
            r#"{"jsonrpc":"2.0","method":"exit"}"#,
        ]);
        assert_eq!(code, 0);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"], Value::Null);
    }

    #[test]
    fn exit_without_shutdown_exits_one() {
        let (code, responses) = run_session(&[r#"{"jsonrpc":"2.0","method":"exit"}"#]);
        assert_eq!(code, 1);
        assert!(responses.is_empty());
    }

    #[test]
    fn unknown_requests_are_not_implemented() {
        let (_, responses) = run_session(&[
            r#"{"jsonrpc":"2.0","id":"req-7","method":"textDocument/hover","params":{}}"#,
        ]);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], "req-7");
        assert_eq!(responses[0]["error"]["code"], -32601);
        assert_eq!(responses[0]["error"]["message"], "Method not implemented");
    }

    #[test]
    fn unknown_notifications_are_ignored() {
        let (code, responses) = run_session(&[
            r#"{"jsonrpc":"2.0","method":"initialized"}"#,
            r#"{"jsonrpc":"2.0","method":"textDocument/didOpen","params":{}}"#,
        ]);
        assert_eq!(code, 0);
        assert!(responses.is_empty());
    }

    #[test]
    fn malformed_json_gets_a_parse_error() {
        let (_, responses) = run_session(&["{not json"]);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[0]["error"]["message"], "Parse error");
    }

    #[test]
    fn wrong_jsonrpc_version_is_invalid() {
        let (_, responses) =
            run_session(&[r#"{"jsonrpc":"1.0","id":3,"method":"initialize"}"#]);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 3);
        assert_eq!(responses[0]["error"]["code"], -32600);
        assert_eq!(responses[0]["error"]["message"], "Invalid Request");
    }

    #[test]
    fn missing_method_is_invalid() {
        let (_, responses) = run_session(&[r#"{"jsonrpc":"2.0","id":4}"#]);
        assert_eq!(responses[0]["error"]["code"], -32600);
    }

    #[test]
    fn clean_eof_exits_zero() {
        let (code, responses) =
            run_session(&[r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#]);
        assert_eq!(code, 0);
        assert_eq!(responses.len(), 1);
    }
}
