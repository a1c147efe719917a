use super::{ENTRY_FUNCTION, LEGACY_ENTRY_FUNCTION, Language, LanguageAdapter, RunSpec, string_literal};
use crate::sandbox::Invocation;

const INTERPRETER: &str = "node";

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptAdapter;

impl JavaScriptAdapter {
    pub fn script(code: &str, input: &str) -> String {
        format!(
            r#"const INPUT = {input};
{code}
if (typeof {entry} === 'function') {{
  console.log(JSON.stringify({entry}(...JSON.parse('[' + INPUT + ']'))) ?? 'null');
}} else if (typeof {legacy} === 'function') {{
  const __args = JSON.parse(INPUT);
  console.log(JSON.stringify({legacy}(__args[0], __args[1])) ?? 'null');
}}
"#,
            input = string_literal(input),
            code = code.trim_end(),
            entry = ENTRY_FUNCTION,
            legacy = LEGACY_ENTRY_FUNCTION,
        )
    }
}

impl LanguageAdapter for JavaScriptAdapter {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn prepare(&self, code: &str, input: &str) -> RunSpec {
        RunSpec::Inline(Invocation::new(
            INTERPRETER,
            ["-e".to_string(), Self::script(code, input)],
        ))
    }
}
