use super::{Language, LanguageAdapter, RunSpec};
use crate::sandbox::CompileUnit;

/// Reads all of stdin into a heap buffer and hands it to
/// `char *solve(const char *input)`
const TRAILER: &str = r#"
static char *judge_read_input(void) {
    size_t cap = 4096, len = 0;
    char *buf = malloc(cap);
    int ch;
    if (!buf) return NULL;
    while ((ch = getchar()) != EOF) {
        if (len + 1 >= cap) {
            char *grown = realloc(buf, cap *= 2);
            if (!grown) { free(buf); return NULL; }
            buf = grown;
        }
        buf[len++] = (char)ch;
    }
    buf[len] = '\0';
    return buf;
}

int main(void) {
    char *input = judge_read_input();
    const char *result;
    if (!input) return 1;
    result = solve(input);
    if (result) puts(result);
    free(input);
    return 0;
}
"#;

#[derive(Debug, Clone, Copy, Default)]
pub struct CAdapter;

impl CAdapter {
    pub fn source(code: &str) -> String {
        format!(
            "#include <stdio.h>\n#include <stdlib.h>\n#include <string.h>\n\n{}\n{TRAILER}",
            code.trim_end()
        )
    }
}

impl LanguageAdapter for CAdapter {
    fn language(&self) -> Language {
        Language::C
    }

    fn prepare(&self, code: &str, input: &str) -> RunSpec {
        RunSpec::Compiled {
            unit: CompileUnit {
                source_name: "main.c",
                artifact_name: "main",
                source: Self::source(code),
                compile_command: [
                    "gcc", "-DONLINE_JUDGE", "-O2", "-w", "-fmax-errors=3", "-std=c99",
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_goes_to_stdin_not_source() {
        let RunSpec::Compiled { unit, stdin } = CAdapter.prepare("char *solve(const char *s) { return (char *)s; }", "hello")
        else {
            panic!("c must be compiled");
        };
        assert_eq!(stdin, "hello");
        assert_eq!(unit.source_name, "main.c");
        assert!(!unit.source.contains("hello"));
        assert!(unit.source.contains("result = solve(input);"));
    }
}
