//! Question file loading and parsing

use crate::{
    config::question::QuestionSpec,
    constants::QUESTION_FILE_EXTENSIONS,
    error::{Error, Result},
    question::Questions,
    renderer::{MiniJinjaRenderer, TemplateRenderer},
};
use indexmap::IndexMap;
use serde::Deserialize;
use std::{path::Path, sync::Arc};

/// A question file: questions keyed by name, asked in file order
#[derive(Debug, Deserialize)]
pub struct QuestionFile {
    #[serde(default)]
    pub questions: IndexMap<String, QuestionSpec>,
}

impl QuestionFile {
    /// Loads a `.json`, `.yaml` or `.yml` question file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        if !path.is_file() || !QUESTION_FILE_EXTENSIONS.contains(&extension) {
            return Err(Error::ConfigNotFound {
                path: path.display().to_string(),
                extensions: QUESTION_FILE_EXTENSIONS.join(", "),
            });
        }

        log::debug!("Loading questions from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        match extension {
            "json" => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// YAML parsing also accepts JSON documents.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Builds questions whose templates render with the default engine.
    pub fn into_questions(self) -> Questions {
        self.into_questions_with(Arc::new(MiniJinjaRenderer::new()))
    }

    pub fn into_questions_with(self, engine: Arc<dyn TemplateRenderer>) -> Questions {
        self.questions
            .into_iter()
            .map(|(name, spec)| spec.into_question(name, &engine))
            .collect()
    }
}
