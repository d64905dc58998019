//! Integration test for the LLM-backed oracle.

use strictly_dots::{
    GameSession, LlmClient, LlmConfig, LlmOracle, LlmProvider, Move, request_advised_move,
};
use tracing::instrument;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Position where the only sensible move is the fourth side of (0, 0).
fn free_square() -> GameSession {
    let mut session = GameSession::new(2, 2).unwrap();
    for mv in [
        Move::horizontal(0, 0),
        Move::vertical(0, 0),
        Move::vertical(0, 1),
    ] {
        session.apply_move(mv).unwrap();
    }
    session
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_anthropic_oracle() {
    init_tracing();
    dotenvy::dotenv().ok();

    let api_key = std::env::var("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY not set");
    let config = LlmConfig::new(
        LlmProvider::Anthropic,
        api_key,
        "claude-3-5-haiku-20241022".to_string(),
        100,
    );
    let oracle = LlmOracle::new(LlmClient::new(config));

    let session = free_square();
    let mv = request_advised_move(&oracle, &session, 1)
        .await
        .expect("Oracle gave no usable move");
    assert!(session.grid().is_open(&mv));
    eprintln!("Anthropic proposed {}", mv);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_openai_oracle() {
    init_tracing();
    dotenvy::dotenv().ok();

    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
    let config = LlmConfig::new(LlmProvider::OpenAI, api_key, "gpt-4o-mini".to_string(), 100);
    let oracle = LlmOracle::new(LlmClient::new(config));

    let session = free_square();
    let mv = request_advised_move(&oracle, &session, 1)
        .await
        .expect("Oracle gave no usable move");
    assert!(session.grid().is_open(&mv));
    eprintln!("OpenAI proposed {}", mv);
}
