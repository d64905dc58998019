//! Oracle backed by an LLM chat completion.

use super::{MoveOracle, OracleError, OracleRequest};
use crate::games::dots::Move;
use crate::llm_client::LlmClient;
use tracing::{debug, instrument};

/// Asks a language model for a move and decodes its JSON reply.
#[derive(Debug, Clone)]
pub struct LlmOracle {
    client: LlmClient,
}

impl LlmOracle {
    /// Wraps an LLM client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// System prompt: the directive plus the schema of the expected reply.
    fn system_prompt(request: &OracleRequest) -> String {
        let schema = serde_json::to_string(&schemars::schema_for!(Move)).unwrap_or_default();
        format!(
            "You are playing Dots and Squares. {}\n\
             Reply with exactly one JSON object and nothing else, matching this schema:\n{}\n\
             \"type\" is \"h\" for a horizontal edge or \"v\" for a vertical edge; \
             \"r\" and \"c\" are its row and column. Choose only from the legal moves you are given.",
            request.directive, schema
        )
    }

    /// User message: the request as JSON plus a picture of the grid.
    fn user_message(request: &OracleRequest) -> String {
        let json = serde_json::to_string(request).unwrap_or_default();
        format!(
            "Board ({} rows x {} columns of squares):\n{}\n\nPosition:\n{}",
            request.rows,
            request.cols,
            request.board,
            json
        )
    }
}

/// Extracts the first `{...}` object from free text and decodes it.
pub(crate) fn parse_reply(text: &str) -> Result<Move, OracleError> {
    let start = text
        .find('{')
        .ok_or_else(|| OracleError::Transport(format!("No JSON object in reply: {}", text)))?;
    let end = text[start..]
        .find('}')
        .map(|offset| start + offset)
        .ok_or_else(|| OracleError::Transport(format!("Unterminated JSON in reply: {}", text)))?;
    serde_json::from_str(&text[start..=end])
        .map_err(|e| OracleError::Transport(format!("Undecodable move {}: {}", &text[start..=end], e)))
}

#[async_trait::async_trait]
impl MoveOracle for LlmOracle {
    #[instrument(skip(self, request), fields(model = %self.client.config().model()))]
    async fn suggest(&self, request: &OracleRequest) -> Result<Move, OracleError> {
        let reply = self
            .client
            .generate(&Self::system_prompt(request), &Self::user_message(request))
            .await
            .map_err(|e| OracleError::Transport(e.message))?;
        debug!(reply = %reply, "Oracle replied");
        parse_reply(&reply)
    }

    fn name(&self) -> &str {
        self.client.config().model()
    }
}
