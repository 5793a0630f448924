//! The build environment the artefact descriptor registers against.
//!
//! [`BuildEnv`] collects programs and their objects once, independent of
//! configuration. [`BuildEnv::write_ninja`] then expands that single model
//! into every requested configuration. Objects and programs are emitted in
//! the order they were first registered, so an unchanged descriptor always
//! produces a byte-identical build file.

use crate::config::{BuildConfig, DEFAULT_BUILD_ROOT};
use crate::error::ConfigError;
use crate::flags::{FlagList, shell_quote};
use crate::host::Host;
use crate::ninja::{NinjaWriter, escape_path, escape_value};
use crate::object::{ObjectFile, SourceLang};
use crate::program::Program;
use crate::toolchain::Toolchain;
use indexmap::IndexMap;
use serde::Serialize;

pub const NINJA_FILE: &str = "build.ninja";

/// How the build file regenerates itself when its inputs change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconfigure {
    /// Command line replayed by the `reconf` rule
    pub command: Vec<String>,
    /// Files whose modification triggers regeneration
    pub inputs: Vec<String>,
    /// The generated build file itself
    pub output: String,
}

impl Default for Reconfigure {
    fn default() -> Self {
        Self {
            command: vec!["./configure".to_string()],
            inputs: vec!["configure".to_string(), "artefacts.toml".to_string()],
            output: NINJA_FILE.to_string(),
        }
    }
}

impl Reconfigure {
    /// The replayed command as the value of the `reconf` rule.
    pub fn command_line(&self) -> String {
        let line = self
            .command
            .iter()
            .map(|arg| shell_quote(arg))
            .collect::<Vec<_>>()
            .join(" ");
        escape_value(&line)
    }
}

#[derive(Debug, Clone)]
pub struct BuildEnv {
    configs: Vec<BuildConfig>,
    host: Host,
    build_root: String,
    reconfigure: Reconfigure,
    // object base name -> object, in first-registration order
    objects: IndexMap<String, ObjectFile>,
    programs: Vec<Program>,
}

impl BuildEnv {
    pub fn new(configs: Vec<BuildConfig>, host: Host) -> Self {
        Self {
            configs,
            host,
            build_root: DEFAULT_BUILD_ROOT.to_string(),
            reconfigure: Reconfigure::default(),
            objects: IndexMap::new(),
            programs: Vec::new(),
        }
    }

    pub fn with_build_root(mut self, root: impl Into<String>) -> Self {
        self.build_root = root.into();
        self
    }

    pub fn with_reconfigure(mut self, reconfigure: Reconfigure) -> Self {
        self.reconfigure = reconfigure;
        self
    }

    pub fn configs(&self) -> &[BuildConfig] {
        &self.configs
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectFile> {
        self.objects.values()
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Registers a linked program built from `sources`.
    ///
    /// Sources sharing a base name with an earlier registration reuse its
    /// object. A C++ object anywhere in the list adds the host's C++ runtime
    /// to the program's link flags. Nothing is recorded if any source is
    /// rejected.
    pub fn program<S: AsRef<str>>(
        &mut self,
        name: &str,
        sources: &[S],
        ldflags: &[&str],
    ) -> Result<&Program, ConfigError> {
        self.register(name.to_string(), sources, ldflags.iter().copied().collect())
    }

    /// Registers `test/<name>`.
    pub fn test<S: AsRef<str>>(
        &mut self,
        name: &str,
        sources: &[S],
    ) -> Result<&Program, ConfigError> {
        self.program(&format!("test/{}", name), sources, &[])
    }

    /// Registers `fuzz/<name>`, linked against the fuzzer runtime.
    pub fn fuzz_target<S: AsRef<str>>(
        &mut self,
        name: &str,
        sources: &[S],
    ) -> Result<&Program, ConfigError> {
        self.program(&format!("fuzz/{}", name), sources, &["-fsanitize=fuzzer"])
    }

    fn register<S: AsRef<str>>(
        &mut self,
        name: String,
        sources: &[S],
        mut ldflags: FlagList,
    ) -> Result<&Program, ConfigError> {
        if name.is_empty() || name.ends_with('/') || sources.is_empty() {
            return Err(ConfigError::EmptyProgram(name));
        }
        if self.programs.iter().any(|p| p.name == name) {
            return Err(ConfigError::DuplicateProgram(name));
        }

        let mut parsed: Vec<ObjectFile> = Vec::with_capacity(sources.len());
        for src in sources {
            let obj = ObjectFile::parse(src.as_ref())?;
            let earlier = self
                .objects
                .get(&obj.name)
                .or_else(|| parsed.iter().find(|p| p.name == obj.name));
            if let Some(existing) = earlier
                && existing.ext != obj.ext
            {
                return Err(ConfigError::ConflictingSource {
                    name: obj.name.clone(),
                    first: existing.source(),
                    second: obj.source(),
                });
            }
            parsed.push(obj);
        }

        if parsed.iter().any(ObjectFile::is_cpp) {
            ldflags.push(self.host.cxx_runtime_flag());
        }

        let objects = parsed.iter().map(|obj| obj.name.clone()).collect();
        for obj in parsed {
            self.objects.entry(obj.name.clone()).or_insert(obj);
        }

        self.programs.push(Program {
            name,
            objects,
            ldflags,
        });
        Ok(&self.programs[self.programs.len() - 1])
    }

    /// Renders the complete build file for every configuration.
    pub fn write_ninja(&self, toolchain: &Toolchain) -> String {
        let mut w = NinjaWriter::new();

        w.comment("auto-generated by configure")
            .variable("cc", &escape_value(&shell_quote(&toolchain.cc)))
            .variable("cxx", &escape_value(&shell_quote(&toolchain.cxx)))
            .newline();

        for lang in [SourceLang::C, SourceLang::Cpp] {
            let rule = lang.compile_rule();
            let command = format!(
                "${} -MMD -MT $out -MF $out.d ${} -c $in -o $out",
                rule,
                lang.flag_var()
            );
            w.rule(
                rule,
                &[
                    ("command", command.as_str()),
                    ("depfile", "$out.d"),
                    ("deps", "gcc"),
                ],
            )
            .newline();
        }

        w.rule(
            "link",
            &[
                ("command", "$cxx $ldflags -o $out $in"),
                ("description", "LINK $out"),
            ],
        )
        .newline();

        let reconf_cmd = self.reconfigure.command_line();
        w.rule("reconf", &[("command", reconf_cmd.as_str()), ("generator", "1")])
            .newline()
            .comment("re-configure if necessary");
        let reconf_inputs: Vec<String> = self
            .reconfigure
            .inputs
            .iter()
            .map(|p| escape_path(p))
            .collect();
        w.build(
            &[escape_path(&self.reconfigure.output)],
            "reconf",
            &reconf_inputs,
            &[],
        )
        .newline();

        for config in &self.configs {
            self.write_config(&mut w, config, toolchain);
        }

        w.finish()
    }

    fn write_config(&self, w: &mut NinjaWriter, config: &BuildConfig, toolchain: &Toolchain) {
        let name = config.name();
        w.banner(&format!("*** start config '{}' ***", name))
            .newline()
            .comment("vars");
        for (key, value) in config.vars(toolchain, &self.build_root) {
            w.variable(&config.var(key), &value);
        }

        let builddir = config.var_ref("builddir");

        w.newline().comment("objects");
        for obj in self.objects.values() {
            w.build(
                &[format!("{}/{}", builddir, escape_path(&obj.object_name()))],
                obj.compile_rule(),
                &[escape_path(&obj.source())],
                &[
                    ("cflags", config.var_ref("cflags")),
                    ("cxxflags", config.var_ref("cxxflags")),
                ],
            );
        }

        w.newline().comment("executables");
        let exe_suffix = self.host.exe_suffix();
        for prog in &self.programs {
            let mut ldflags = prog.ldflags.clone();
            ldflags.push_var(&config.var("ldflags"));
            w.build(
                &[prog.output(&builddir, exe_suffix)],
                "link",
                &prog.inputs(&builddir),
                &[("ldflags", ldflags.join())],
            );
        }

        w.newline();
    }

    /// Serializable view of the registered model.
    pub fn summary(&self) -> Summary<'_> {
        Summary {
            host: self.host,
            build_root: &self.build_root,
            configs: &self.configs,
            objects: self.objects.values().collect(),
            programs: &self.programs,
            reconfigure: &self.reconfigure,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub host: Host,
    pub build_root: &'a str,
    pub configs: &'a [BuildConfig],
    pub objects: Vec<&'a ObjectFile>,
    pub programs: &'a [Program],
    pub reconfigure: &'a Reconfigure,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(host: Host) -> BuildEnv {
        BuildEnv::new(BuildConfig::defaults(), host)
    }

    fn toolchain() -> Toolchain {
        Toolchain::clang(FlagList::new(), FlagList::new())
    }

    #[test]
    fn test_shared_source_is_one_object() {
        let mut env = env(Host::Linux);
        env.program("a", &["common.c", "a.c"], &[]).unwrap();
        env.program("b", &["b.c", "common.c"], &[]).unwrap();
        let names: Vec<&str> = env.objects().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["common", "a", "b"]);

        let ninja = env.write_ninja(&toolchain());
        assert_eq!(
            ninja
                .matches("build $debug_builddir/common.o: cc common.c\n")
                .count(),
            1
        );
    }

    #[test]
    fn test_duplicates_within_program_are_kept() {
        let mut env = env(Host::Linux);
        let prog = env.program("twice", &["x.c", "x.c"], &[]).unwrap();
        assert_eq!(prog.objects, ["x", "x"]);
        assert_eq!(env.objects().count(), 1);
    }

    #[test]
    fn test_cxx_runtime_follows_host() {
        let mut linux = env(Host::Linux);
        let prog = linux.program("toy", &["main.c", "toy.cpp"], &["-lm"]).unwrap();
        assert_eq!(prog.ldflags.join(), "-lm -lstdc++");

        let mut mac = env(Host::MacOs);
        let prog = mac.program("toy", &["toy.cpp"], &[]).unwrap();
        assert_eq!(prog.ldflags.join(), "-lc++");

        let mut c_only = env(Host::Linux);
        let prog = c_only.program("tool", &["tool.c"], &[]).unwrap();
        assert!(prog.ldflags.is_empty());
    }

    #[test]
    fn test_test_and_fuzz_prefixes() {
        let mut env = env(Host::Linux);
        let prog = env.test("test_lexer", &["test/lexer.cpp"]).unwrap();
        assert_eq!(prog.name, "test/test_lexer");
        let prog = env.fuzz_target("lexer", &["fuzz/lexer.cpp"]).unwrap();
        assert_eq!(prog.name, "fuzz/lexer");
        assert_eq!(prog.ldflags.join(), "-fsanitize=fuzzer -lstdc++");
    }

    #[test]
    fn test_conflicting_extension_is_rejected() {
        let mut env = env(Host::Linux);
        env.program("a", &["util.c"], &[]).unwrap();
        let err = env.program("b", &["util.cpp"], &[]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ConflictingSource {
                name: "util".to_string(),
                first: "util.c".to_string(),
                second: "util.cpp".to_string(),
            }
        );

        let err = env.program("c", &["x.c", "x.cpp"], &[]).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingSource { .. }));
    }

    #[test]
    fn test_failed_registration_leaves_env_untouched() {
        let mut env = env(Host::Linux);
        env.program("a", &["a.c"], &[]).unwrap();
        assert!(env.program("b", &["b.c", "b.py"], &[]).is_err());
        assert_eq!(env.objects().count(), 1);
        assert_eq!(env.programs().len(), 1);
    }

    #[test]
    fn test_parent_relative_source_is_rejected() {
        let mut env = env(Host::Linux);
        let err = env.program("a", &["a.c", "../common/util.c"], &[]).unwrap_err();
        assert_eq!(err, ConfigError::MalformedSource("../common/util.c".to_string()));
        assert_eq!(env.objects().count(), 0);
    }

    #[test]
    fn test_program_name_checks() {
        let mut env = env(Host::Linux);
        let empty: [&str; 0] = [];
        assert_eq!(
            env.program("none", &empty, &[]).unwrap_err(),
            ConfigError::EmptyProgram("none".to_string())
        );
        env.program("dup", &["a.c"], &[]).unwrap();
        assert_eq!(
            env.program("dup", &["b.c"], &[]).unwrap_err(),
            ConfigError::DuplicateProgram("dup".to_string())
        );
    }

    #[test]
    fn test_windows_exe_suffix() {
        let mut env = BuildEnv::new(vec![BuildConfig::parse("debug", "").unwrap()], Host::Windows);
        env.program("toy", &["toy.c"], &[]).unwrap();
        let ninja = env.write_ninja(&toolchain());
        assert!(ninja.contains("build $debug_builddir/toy.exe: link $debug_builddir/toy.o\n"));
        assert!(ninja.contains("  ldflags = $debug_ldflags\n"));
    }

    #[test]
    fn test_reconfigure_command_is_quoted() {
        let reconf = Reconfigure {
            command: vec![
                "./configure".to_string(),
                "--descriptor".to_string(),
                "my artefacts.toml".to_string(),
            ],
            ..Reconfigure::default()
        };
        assert_eq!(
            reconf.command_line(),
            "./configure --descriptor 'my artefacts.toml'"
        );
    }

    #[test]
    fn test_reconfigure_command_escapes_dollar() {
        let reconf = Reconfigure {
            command: vec![
                "./configure".to_string(),
                "--builddir".to_string(),
                "$HOME/out".to_string(),
            ],
            ..Reconfigure::default()
        };
        assert_eq!(reconf.command_line(), "./configure --builddir '$$HOME/out'");
    }

    #[test]
    fn test_descriptor_ldflags_are_escaped() {
        let mut env = BuildEnv::new(vec![BuildConfig::parse("debug", "").unwrap()], Host::Linux);
        env.program("toy", &["toy.cpp"], &["-Wl,-rpath,$ORIGIN/lib", "-Wl,-rpath,/my dir"])
            .unwrap();
        let ninja = env.write_ninja(&toolchain());
        assert!(
            ninja.contains(
                "  ldflags = '-Wl,-rpath,$$ORIGIN/lib' '-Wl,-rpath,/my dir' -lstdc++ $debug_ldflags\n"
            ),
            "{ninja}"
        );
    }

    #[test]
    fn test_build_root_with_dollar() {
        let env = BuildEnv::new(vec![BuildConfig::parse("debug", "").unwrap()], Host::Linux)
            .with_build_root("$HOME/out");
        let ninja = env.write_ninja(&toolchain());
        assert!(ninja.contains("debug_builddir = $$HOME/out/debug\n"));
        assert!(ninja.contains("debug_ldflags = '-L$$HOME/out/debug'\n"));
    }

    #[test]
    fn test_header_rules() {
        let env = env(Host::Linux);
        let ninja = env.write_ninja(&toolchain());
        assert!(ninja.starts_with("# auto-generated by configure\ncc = clang\ncxx = clang++\n\nrule cc\n"));
        assert!(ninja.contains(
            "rule cxx\n  command = $cxx -MMD -MT $out -MF $out.d $cxxflags -c $in -o $out\n  depfile = $out.d\n  deps = gcc\n"
        ));
        assert!(ninja.contains("rule reconf\n  command = ./configure\n  generator = 1\n"));
        assert!(ninja.contains("build build.ninja: reconf configure artefacts.toml\n"));
    }
}
