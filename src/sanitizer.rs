//! Sanitizer selection parsing.
//!
//! A selection such as `undefined,address` is reduced to a bitmask. Flags
//! and the short name are always derived by walking [`SanitizerKind::ALL`],
//! so two selections with the same members produce identical output no
//! matter how the user ordered them.

use crate::error::ConfigError;
use crate::flags::FlagList;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizerKind {
    Address,
    Undefined,
    Fuzzer,
}

impl SanitizerKind {
    /// Canonical order used for names and flag concatenation.
    pub const ALL: [SanitizerKind; 3] = [
        SanitizerKind::Address,
        SanitizerKind::Undefined,
        SanitizerKind::Fuzzer,
    ];

    pub fn bit(self) -> u8 {
        match self {
            SanitizerKind::Address => 1,
            SanitizerKind::Undefined => 2,
            SanitizerKind::Fuzzer => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SanitizerKind::Address => "address",
            SanitizerKind::Undefined => "undefined",
            SanitizerKind::Fuzzer => "fuzzer",
        }
    }

    pub fn compile_flag(self) -> String {
        format!("-fsanitize={}", self.name())
    }

    /// The fuzzer runtime is only linked into fuzz targets, so ordinary
    /// programs get the instrumentation hooks without `main`.
    pub fn link_flag(self) -> String {
        match self {
            SanitizerKind::Fuzzer => "-fsanitize=fuzzer-no-link".to_string(),
            _ => self.compile_flag(),
        }
    }

    /// Flags that follow the kind's own token on both compile and link lines.
    fn extra_flags(self) -> &'static [&'static str] {
        match self {
            SanitizerKind::Undefined => &["-fno-sanitize-recover=undefined"],
            _ => &[],
        }
    }
}

impl FromStr for SanitizerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SanitizerKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownSanitizer(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SanitizerSelection {
    mask: u8,
}

impl SanitizerSelection {
    pub fn none() -> Self {
        Self::default()
    }

    /// Parses a comma separated list of sanitizer names. The empty string
    /// selects nothing.
    pub fn parse(selection: &str) -> Result<Self, ConfigError> {
        let mut mask = 0;
        if selection.trim().is_empty() {
            return Ok(Self { mask });
        }
        for name in selection.split(',') {
            let kind: SanitizerKind = name.trim().parse()?;
            mask |= kind.bit();
        }
        Ok(Self { mask })
    }

    pub fn from_kinds(kinds: &[SanitizerKind]) -> Self {
        Self {
            mask: kinds.iter().fold(0, |mask, kind| mask | kind.bit()),
        }
    }

    /// Parses the letters of a short name such as `au`. Every letter must
    /// name a kind and the letters must appear in canonical order.
    pub fn from_short_name(short: &str) -> Option<Self> {
        let mut mask = 0;
        let mut rest = short;
        for kind in SanitizerKind::ALL {
            if let Some(tail) = rest.strip_prefix(kind.name().chars().next()?) {
                mask |= kind.bit();
                rest = tail;
            }
        }
        (rest.is_empty() && mask != 0).then_some(Self { mask })
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            mask: self.mask | other.mask,
        }
    }

    pub fn mask(&self) -> u8 {
        self.mask
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn contains(&self, kind: SanitizerKind) -> bool {
        self.mask & kind.bit() != 0
    }

    /// Selected kinds in canonical order.
    pub fn kinds(&self) -> impl Iterator<Item = SanitizerKind> + '_ {
        SanitizerKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }

    /// First letter of each selected kind, e.g. `au` for address+undefined.
    pub fn short_name(&self) -> String {
        self.kinds()
            .filter_map(|kind| kind.name().chars().next())
            .collect()
    }

    pub fn compile_flags(&self) -> FlagList {
        let mut flags = FlagList::new();
        for kind in self.kinds() {
            flags.push(kind.compile_flag());
            flags.extend(kind.extra_flags().iter().copied());
        }
        flags
    }

    pub fn link_flags(&self) -> FlagList {
        let mut flags = FlagList::new();
        for kind in self.kinds() {
            flags.push(kind.link_flag());
            flags.extend(kind.extra_flags().iter().copied());
        }
        flags
    }
}

impl FromStr for SanitizerSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
