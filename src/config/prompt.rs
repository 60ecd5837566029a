use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use log::info;

const DEFAULT_ANSWER_TEMPLATE: &str = "You are a helpful product assistant. Answer the \
question using only the context documents below. If the context does not contain the \
answer, say you do not know.\n\n{context}\n\n{history}Question: {question}\nAnswer:";

#[derive(Deserialize, Debug, Clone)]
pub struct PromptConfig {
    pub answer_template: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            answer_template: DEFAULT_ANSWER_TEMPLATE.to_string(),
        }
    }
}

/// Loads the prompt template file, falling back to the built-in
/// template when the file does not exist.
pub fn load_prompts(path: &str) -> Result<Arc<PromptConfig>, Box<dyn Error + Send + Sync>> {
    if !Path::new(path).exists() {
        info!("Prompts file '{}' not found, using built-in template", path);
        return Ok(Arc::new(PromptConfig::default()));
    }

    let file_content = fs
        ::read_to_string(path)
        .map_err(|e| format!("Failed to read prompts file '{}': {}", path, e))?;
    let config: PromptConfig = serde_json
        ::from_str(&file_content)
        .map_err(|e| format!("Failed to parse prompts file '{}': {}", path, e))?;

    if !config.answer_template.contains("{question}") {
        return Err(format!("Prompts file '{}' template lacks a {{question}} placeholder", path).into());
    }

    Ok(Arc::new(config))
}

pub fn get_answer_prompt(
    config: &PromptConfig,
    context: &str,
    history: &str,
    question: &str
) -> String {
    config.answer_template
        .replace("{context}", context)
        .replace("{history}", history)
        .replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_builtin_template() {
        let config = load_prompts("/nonexistent/prompts.json").unwrap();
        assert!(config.answer_template.contains("{question}"));
    }

    #[test]
    fn renders_all_placeholders() {
        let config = PromptConfig {
            answer_template: "C={context} H={history}Q={question}".into(),
        };
        let prompt = get_answer_prompt(&config, "ctx", "hist ", "why?");
        assert_eq!(prompt, "C=ctx H=hist Q=why?");
    }

    #[test]
    fn rejects_template_without_question_placeholder() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"answer_template":"no placeholder"}}"#).unwrap();
        assert!(load_prompts(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn loads_template_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"answer_template":"Custom {{context}} {{history}} {{question}}"}}"#).unwrap();
        let config = load_prompts(file.path().to_str().unwrap()).unwrap();
        assert!(config.answer_template.starts_with("Custom"));
    }
}
