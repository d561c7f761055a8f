//! LLM Adapters - 大模型引擎实现

mod fake_llm_client;
mod openai_client;

pub use fake_llm_client::FakeLlmClient;
pub use openai_client::{OpenAiClient, OpenAiClientConfig};
