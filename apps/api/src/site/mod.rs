// Site generation: resume text → model response → three source files → website.zip.
// All LLM calls go through llm_client; document parsing lives in crate::document.

pub mod bundle;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod sections;
