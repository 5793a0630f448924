//! Ordered flag token lists.
//!
//! Flags are kept as discrete tokens and only joined into text when the
//! Ninja file is written, so composing flag sets never has to worry about
//! stray or missing spaces. Literal tokens are shell-quoted and escaped for
//! Ninja on the way out; references to generated Ninja variables are kept
//! verbatim.

use crate::ninja::escape_value;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
enum Token {
    /// Flag text exactly as the compiler should receive it
    Literal(String),
    /// Ninja text built by the generator, e.g. `$debug_baseflags`
    Raw(String),
}

impl Token {
    fn text(&self) -> &str {
        match self {
            Token::Literal(s) | Token::Raw(s) => s,
        }
    }

    fn render(&self) -> String {
        match self {
            Token::Literal(s) => escape_value(&shell_quote(s)),
            Token::Raw(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagList(Vec<Token>);

impl FlagList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a literal flag.
    pub fn push(&mut self, flag: impl Into<String>) {
        let flag = flag.into();
        if !flag.is_empty() {
            self.0.push(Token::Literal(flag));
        }
    }

    /// Appends a reference to a variable of the generated file.
    pub fn push_var(&mut self, var: &str) {
        self.0.push(Token::Raw(format!("${}", var)));
    }

    pub fn extend<I, S>(&mut self, flags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for flag in flags {
            self.push(flag);
        }
    }

    /// Appends every token of `other` after the existing ones.
    pub fn append(&mut self, other: &FlagList) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Splits whitespace-delimited tool output into tokens.
    pub fn from_whitespace(text: &str) -> Self {
        text.split_whitespace().collect()
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.0.iter().any(|f| f.text() == flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Renders the list as the value of a Ninja binding.
    pub fn join(&self) -> String {
        self.0
            .iter()
            .map(Token::render)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<S: Into<String>> FromIterator<S> for FlagList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut flags = FlagList::new();
        flags.extend(iter);
        flags
    }
}

impl std::fmt::Display for FlagList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.join())
    }
}

/// Quotes `arg` for `/bin/sh` unless it only holds characters the shell
/// passes through untouched.
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./,=+:@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_has_single_spaces() {
        let mut flags = FlagList::new();
        flags.push("-g");
        flags.push("");
        flags.extend(["-Wall", "-Werror"]);
        assert_eq!(flags.join(), "-g -Wall -Werror");
        assert_eq!(flags.len(), 3);
    }

    #[test]
    fn test_from_whitespace_drops_newlines() {
        let flags = FlagList::from_whitespace("  -I/usr/include\n-std=c++17  -fno-exceptions\n");
        assert_eq!(flags.join(), "-I/usr/include -std=c++17 -fno-exceptions");
        assert!(flags.contains("-std=c++17"));
    }

    #[test]
    fn test_empty_list_joins_to_empty_string() {
        assert_eq!(FlagList::new().to_string(), "");
        assert!(FlagList::from_whitespace("   \n").is_empty());
    }

    #[test]
    fn test_dollar_in_literal_survives_ninja_and_shell() {
        let mut flags = FlagList::new();
        flags.push("-Wl,-rpath,$ORIGIN/lib");
        flags.push_var("debug_ldflags");
        assert_eq!(flags.join(), "'-Wl,-rpath,$$ORIGIN/lib' $debug_ldflags");
    }

    #[test]
    fn test_whitespace_in_literal_stays_one_word() {
        let mut flags = FlagList::new();
        flags.push("-Wl,-rpath,/my dir");
        flags.push("-DNAME='x'");
        assert_eq!(flags.join(), r"'-Wl,-rpath,/my dir' '-DNAME='\''x'\'''");
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("--builddir"), "--builddir");
        assert_eq!(shell_quote("my out"), "'my out'");
        assert_eq!(shell_quote(""), "''");
    }
}
