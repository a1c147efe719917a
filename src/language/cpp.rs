use super::{Language, LanguageAdapter, RunSpec};
use crate::sandbox::CompileUnit;

const PRELUDE: &str = "#include <bits/stdc++.h>\n";

/// Streams the whole of stdin into `solve(const std::string &)` and prints
/// whatever it returns
const TRAILER: &str = r#"
int main() {
    std::ios::sync_with_stdio(false);
    std::string input((std::istreambuf_iterator<char>(std::cin)), std::istreambuf_iterator<char>());
    std::cout << std::boolalpha << solve(input) << std::endl;
    return 0;
}
"#;

#[derive(Debug, Clone, Copy, Default)]
pub struct CppAdapter;

impl CppAdapter {
    pub fn source(code: &str) -> String {
        format!("{PRELUDE}\n{}\n{TRAILER}", code.trim_end())
    }
}

impl LanguageAdapter for CppAdapter {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn prepare(&self, code: &str, input: &str) -> RunSpec {
        RunSpec::Compiled {
            unit: CompileUnit {
                source_name: "main.cpp",
                artifact_name: "main",
                source: Self::source(code),
                compile_command: [
                    "g++", "-DONLINE_JUDGE", "-O2", "-w", "-fmax-errors=3", "-std=c++17",
                    "%INPUT%", "-lm", "-o", "%OUTPUT%",
                ]
                .map(String::from)
                .to_vec(),
                run_command: vec!["%OUTPUT%".to_string()],
            },
            stdin: input.to_string(),
        }
    }
}
