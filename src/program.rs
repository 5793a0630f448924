//! Linked artefacts.

use crate::flags::FlagList;
use crate::ninja::escape_path;
use serde::Serialize;

/// A program, test or fuzz target linked from a list of objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    /// Output name relative to the config build dir, e.g. `test/test_lexer`
    pub name: String,
    /// Object base names in source order; repeats are kept as written
    pub objects: Vec<String>,
    /// Program-specific link flags, emitted before the config's own
    pub ldflags: FlagList,
}

impl Program {
    /// Link output inside `builddir`, which may be a variable reference.
    pub fn output(&self, builddir: &str, exe_suffix: &str) -> String {
        format!("{}/{}{}", builddir, escape_path(&self.name), exe_suffix)
    }

    pub fn inputs(&self, builddir: &str) -> Vec<String> {
        self.objects
            .iter()
            .map(|obj| format!("{}/{}.o", builddir, escape_path(obj)))
            .collect()
    }
}
