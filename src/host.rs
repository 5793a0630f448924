//! Host platform queries.

use serde::Serialize;

/// Operating system family of the machine running the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Host {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl Host {
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Host::Linux
        } else if cfg!(target_os = "macos") {
            Host::MacOs
        } else if cfg!(target_os = "windows") {
            Host::Windows
        } else {
            Host::Other
        }
    }

    /// Link flag pulling in the C++ standard library.
    pub fn cxx_runtime_flag(self) -> &'static str {
        match self {
            Host::Linux => "-lstdc++",
            _ => "-lc++",
        }
    }

    pub fn exe_suffix(self) -> &'static str {
        match self {
            Host::Windows => ".exe",
            _ => "",
        }
    }
}
