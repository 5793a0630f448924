//! Ninja build file writer.
//!
//! Only the subset of the Ninja grammar the generator needs: comments,
//! top-level bindings, rules with indented attributes and build statements
//! with indented overrides.

use std::fmt::Write;

#[derive(Debug, Default)]
pub struct NinjaWriter {
    out: String,
}

impl NinjaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(&mut self, text: &str) -> &mut Self {
        let _ = writeln!(self.out, "# {}", text);
        self
    }

    /// Three-line `###` banner separating large sections.
    pub fn banner(&mut self, text: &str) -> &mut Self {
        let _ = writeln!(self.out, "###\n### {}\n###", text);
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    /// Top-level `key = value` binding. `value` is Ninja text; literal
    /// text goes through [`escape_value`] first.
    pub fn variable(&mut self, key: &str, value: &str) -> &mut Self {
        self.binding(0, key, value)
    }

    pub fn rule(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        let _ = writeln!(self.out, "rule {}", name);
        for (key, value) in attrs {
            self.binding(2, key, value);
        }
        self
    }

    /// `build outputs: rule inputs` followed by indented overrides.
    pub fn build(
        &mut self,
        outputs: &[String],
        rule: &str,
        inputs: &[String],
        overrides: &[(&str, String)],
    ) -> &mut Self {
        let _ = write!(self.out, "build {}: {}", outputs.join(" "), rule);
        for input in inputs {
            let _ = write!(self.out, " {}", input);
        }
        self.out.push('\n');
        for (key, value) in overrides {
            self.binding(2, key, value);
        }
        self
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn binding(&mut self, indent: usize, key: &str, value: &str) -> &mut Self {
        let _ = write!(self.out, "{:indent$}{} =", "", key, indent = indent);
        if !value.is_empty() {
            let _ = write!(self.out, " {}", value);
        }
        self.out.push('\n');
        self
    }
}

/// Escapes literal text for the value side of a binding.
pub fn escape_value(value: &str) -> String {
    value.replace('$', "$$")
}

/// Escapes a literal path for use in a `build` line.
pub fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '$' | ' ' | ':' => {
                out.push('$');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_and_build() {
        let mut w = NinjaWriter::new();
        w.variable("cc", "clang")
            .newline()
            .rule("link", &[("command", "$cxx $ldflags -o $out $in")])
            .build(
                &["app".to_string()],
                "link",
                &["a.o".to_string(), "b.o".to_string()],
                &[("ldflags", "-lm".to_string())],
            );
        assert_eq!(
            w.finish(),
            "cc = clang\n\nrule link\n  command = $cxx $ldflags -o $out $in\nbuild app: link a.o b.o\n  ldflags = -lm\n"
        );
    }

    #[test]
    fn test_empty_value_has_no_trailing_space() {
        let mut w = NinjaWriter::new();
        w.variable("flags", "");
        assert_eq!(w.finish(), "flags =\n");
    }

    #[test]
    fn test_banner() {
        let mut w = NinjaWriter::new();
        w.banner("start");
        assert_eq!(w.finish(), "###\n### start\n###\n");
    }

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value("$HOME/out"), "$$HOME/out");
        assert_eq!(escape_value("my dir"), "my dir");
    }

    #[test]
    fn test_escape_path() {
        assert_eq!(escape_path("my dir/a:b$c.cpp"), "my$ dir/a$:b$$c.cpp");
        assert_eq!(escape_path("lexer.cpp"), "lexer.cpp");
    }
}
