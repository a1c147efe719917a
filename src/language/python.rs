use super::{ENTRY_FUNCTION, LEGACY_ENTRY_FUNCTION, Language, LanguageAdapter, RunSpec, string_literal};
use crate::sandbox::Invocation;

const INTERPRETER: &str = "python3";

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonAdapter;

impl PythonAdapter {
    /// Harness with the input baked in as a string constant
    pub fn script(code: &str, input: &str) -> String {
        harness(code, "", &string_literal(input))
    }

    /// Harness that takes its input from stdin, for judges that feed test
    /// cases to a standalone program
    pub fn stdin_script(code: &str) -> String {
        harness(code, "import sys\n", "sys.stdin.read()")
    }
}

fn harness(code: &str, imports: &str, input_expr: &str) -> String {
    format!(
        r#"import json
{imports}INPUT = {input_expr}
{code}
if callable(globals().get('{entry}')):
    print(json.dumps({entry}(*json.loads('[' + INPUT + ']')), separators=(',', ':'), ensure_ascii=False))
elif callable(globals().get('{legacy}')):
    _args = json.loads(INPUT)
    print(json.dumps({legacy}(_args[0], _args[1]), separators=(',', ':'), ensure_ascii=False))
"#,
        code = code.trim_end(),
        entry = ENTRY_FUNCTION,
        legacy = LEGACY_ENTRY_FUNCTION,
    )
}

impl LanguageAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn prepare(&self, code: &str, input: &str) -> RunSpec {
        RunSpec::Inline(Invocation::new(
            INTERPRETER,
            ["-c".to_string(), Self::script(code, input)],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_inline_through_interpreter() {
        let RunSpec::Inline(invocation) = PythonAdapter.prepare("def solve(x): return x*x", "5")
        else {
            panic!("python must not need a build step");
        };
        assert_eq!(invocation.program, "python3");
        assert_eq!(invocation.args[0], "-c");
        assert!(invocation.stdin.is_none());
    }

    #[test]
    fn script_embeds_input_then_code_then_trailer() {
        let script = PythonAdapter::script("def solve(x):\n    return x\n", "\"()\"");
        let input_at = script.find(r#"INPUT = "\"()\"""#).unwrap();
        let code_at = script.find("def solve(x):").unwrap();
        let trailer_at = script.find("callable(globals().get('solve'))").unwrap();
        assert!(input_at < code_at && code_at < trailer_at);
        assert!(script.contains("twoSum(_args[0], _args[1])"));
    }

    #[test]
    fn output_keeps_non_ascii_characters() {
        let script = PythonAdapter::script("def solve(s): return s", "\"h\u{e9}llo\"");
        assert_eq!(script.matches("ensure_ascii=False").count(), 2);
    }

    #[test]
    fn stdin_variant_reads_input_at_runtime() {
        let script = PythonAdapter::stdin_script("def solve(x): return x");
        assert!(script.starts_with("import json\nimport sys\nINPUT = sys.stdin.read()\n"));
    }
}
