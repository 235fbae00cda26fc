// Resume analysis: rule-based static checks, LLM skill extraction and matching,
// and LLM-written feedback. All LLM calls go through `llm_client::TextGenerator`.

pub mod feedback;
pub mod handlers;
pub mod matcher;
pub mod prompts;
pub mod skills;
pub mod static_analyzer;
pub mod upload;
