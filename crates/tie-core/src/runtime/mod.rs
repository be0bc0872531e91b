//! Language runtimes: prerequisite checking and preprocessing behind one
//! interface per supported source language.
//!
//! Dispatch is a registry lookup keyed by the question's language tag, so
//! adding a language means registering another implementation, not growing
//! a branch chain.

pub mod python;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, TieError};
use crate::prereq::PrereqResult;
use crate::question::Question;

pub use python::PythonRuntime;

/// A learner program rewritten into one executable harness run.
#[derive(Debug, Clone)]
pub struct PreprocessedProgram {
    /// Complete source handed to the code runner.
    pub source: String,
    /// Token the harness prints after every test case, used to slice the
    /// captured stdout back out per case.
    pub separator: String,
    /// Line the harness prints immediately before its JSON results.
    pub results_marker: String,
}

/// Everything the pipeline needs from a source language.
pub trait LanguageRuntime: Send + Sync {
    fn language(&self) -> &'static str;

    /// Static validation of the submission; never executes code.
    fn check_prerequisites(&self, starter_code: &str, submitted_code: &str) -> PrereqResult;

    /// Wrap the submission and the question's auxiliary code into a single
    /// program whose one run produces results for every test category.
    fn preprocess(&self, question: &Question, submitted_code: &str)
        -> Result<PreprocessedProgram>;
}

impl std::fmt::Debug for dyn LanguageRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageRuntime")
            .field("language", &self.language())
            .finish_non_exhaustive()
    }
}

/// Registry of available language runtimes, keyed by language tag.
pub struct RuntimeRegistry {
    runtimes: HashMap<String, Arc<dyn LanguageRuntime>>,
}

impl RuntimeRegistry {
    pub fn empty() -> Self {
        Self {
            runtimes: HashMap::new(),
        }
    }

    pub fn register(&mut self, runtime: Arc<dyn LanguageRuntime>) {
        self.runtimes.insert(runtime.language().to_string(), runtime);
    }

    pub fn get(&self, language: &str) -> Result<Arc<dyn LanguageRuntime>> {
        self.runtimes
            .get(language)
            .cloned()
            .ok_or_else(|| TieError::UnsupportedLanguage {
                language: language.to_string(),
                supported: self.supported_languages().join(", "),
            })
    }

    pub fn supported_languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.runtimes.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}

impl Default for RuntimeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(PythonRuntime::new()));
        registry
    }
}

#[cfg(test)]
mod tests;
