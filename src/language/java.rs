use super::{Language, LanguageAdapter, RunSpec};
use crate::sandbox::CompileUnit;

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaAdapter;

impl JavaAdapter {
    /// User code is pasted into the body of `Main`, so it must declare a
    /// `static` method `solve(String input)`
    pub fn source(code: &str) -> String {
        format!(
            r#"import java.io.*;
import java.nio.charset.StandardCharsets;
import java.util.*;

public class Main {{
{code}

    public static void main(String[] args) throws Exception {{
        String input = new String(System.in.readAllBytes(), StandardCharsets.UTF_8);
        System.out.println(solve(input));
    }}
}}
"#,
            code = code.trim_end()
        )
    }
}

impl LanguageAdapter for JavaAdapter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn prepare(&self, code: &str, input: &str) -> RunSpec {
        RunSpec::Compiled {
            unit: CompileUnit {
                source_name: "Main.java",
                artifact_name: "Main.class",
                source: Self::source(code),
                compile_command: ["javac", "-encoding", "UTF-8", "-d", "%DIR%", "%INPUT%"]
                    .map(String::from)
                    .to_vec(),
                run_command: ["java", "-Xss1m", "-XX:+UseSerialGC", "-cp", "%DIR%", "Main"]
                    .map(String::from)
                    .to_vec(),
            },
            stdin: input.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_lands_inside_main_class() {
        let RunSpec::Compiled { unit, .. } =
            JavaAdapter.prepare("    static int solve(String s) { return s.length(); }", "abc")
        else {
            panic!("java must be compiled");
        };
        assert_eq!(unit.source_name, "Main.java");
        let class_at = unit.source.find("public class Main {").unwrap();
        let code_at = unit.source.find("static int solve").unwrap();
        assert!(class_at < code_at);
        assert_eq!(unit.run_command.last().unwrap(), "Main");
    }
}
