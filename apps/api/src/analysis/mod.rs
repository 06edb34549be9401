// Job description analysis: text extraction, LLM skill extraction,
// related-skill expansion and LinkedIn search strings.
// All LLM calls go through llm_client.

pub mod extractor;
pub mod prompts;
pub mod search;
pub mod skills_map;
pub mod text;
