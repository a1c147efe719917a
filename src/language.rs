mod c;
mod cpp;
mod java;
mod javascript;
mod python;

pub use c::CAdapter;
pub use cpp::CppAdapter;
pub use java::JavaAdapter;
pub use javascript::JavaScriptAdapter;
pub use python::PythonAdapter;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{JudgeError, Result};
use crate::sandbox::{CompileUnit, Invocation};

/// Primary entry function looked up by every harness
pub const ENTRY_FUNCTION: &str = "solve";
/// Legacy two-argument entry function, fed a `[arg0, arg1]` input
pub const LEGACY_ENTRY_FUNCTION: &str = "twoSum";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    Cpp,
    C,
    Java,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::JavaScript,
        Language::Python,
        Language::Cpp,
        Language::C,
        Language::Java,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Java => "java",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = JudgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "javascript" | "js" | "node" => Ok(Language::JavaScript),
            "python" | "py" | "python3" => Ok(Language::Python),
            "cpp" | "c++" | "cxx" => Ok(Language::Cpp),
            "c" => Ok(Language::C),
            "java" => Ok(Language::Java),
            _ => Err(JudgeError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// How to execute one test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSpec {
    /// A script handed straight to an interpreter's evaluate-string mode
    Inline(Invocation),
    /// Source to build in a workspace; `stdin` is fed to the built artifact
    Compiled { unit: CompileUnit, stdin: String },
}

/// Per-language strategy for wrapping user code in a harness
pub trait LanguageAdapter: Send + Sync {
    fn language(&self) -> Language;

    /// Produces the executable unit for `code` run against `input`
    ///
    /// On success the unit prints exactly one line: the serialized return
    /// value of the entry function.
    fn prepare(&self, code: &str, input: &str) -> RunSpec;
}

/// Maps each language to the adapter that knows how to run it
pub struct AdapterRegistry {
    adapters: HashMap<Language, Box<dyn LanguageAdapter>>,
}

impl AdapterRegistry {
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Registry with the built-in adapter for every supported language
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(JavaScriptAdapter);
        registry.register(PythonAdapter);
        registry.register(CAdapter);
        registry.register(CppAdapter);
        registry.register(JavaAdapter);
        registry
    }

    /// Adds an adapter, replacing any previous one for the same language
    pub fn register(&mut self, adapter: impl LanguageAdapter + 'static) -> &mut Self {
        self.adapters.insert(adapter.language(), Box::new(adapter));
        self
    }

    pub fn get(&self, language: Language) -> Result<&dyn LanguageAdapter> {
        self.adapters
            .get(&language)
            .map(|a| a.as_ref())
            .ok_or_else(|| JudgeError::UnsupportedLanguage(language.to_string()))
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Renders `value` as a quoted, escaped string literal
///
/// JSON string syntax is accepted verbatim by both JavaScript and Python.
fn string_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
