//! Asset include flags carried by package references (`IncludeAssets`, `PrivateAssets`)

use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryIncludeFlags(u16);

impl LibraryIncludeFlags {
    pub const NONE: Self = Self(0);
    pub const RUNTIME: Self = Self(1 << 0);
    pub const COMPILE: Self = Self(1 << 1);
    pub const BUILD: Self = Self(1 << 2);
    pub const CONTENT_FILES: Self = Self(1 << 3);
    pub const NATIVE: Self = Self(1 << 4);
    pub const ANALYZERS: Self = Self(1 << 5);
    pub const BUILD_TRANSITIVE: Self = Self(1 << 6);
    pub const ALL: Self = Self(0x7f);

    /// Assets that do not flow to parent projects unless asked for
    pub const DEFAULT_SUPPRESS_PARENT: Self =
        Self(Self::BUILD.0 | Self::CONTENT_FILES.0 | Self::ANALYZERS.0);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::RUNTIME, "runtime"),
        (Self::COMPILE, "compile"),
        (Self::BUILD, "build"),
        (Self::CONTENT_FILES, "contentfiles"),
        (Self::NATIVE, "native"),
        (Self::ANALYZERS, "analyzers"),
        (Self::BUILD_TRANSITIVE, "buildtransitive"),
    ];

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Project-file form of the flags: `all`, `none` or a `;`-separated list
    pub fn flag_string(self) -> String {
        if self == Self::ALL {
            return "all".to_string();
        }
        if self == Self::NONE {
            return "none".to_string();
        }
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Parse the project-file form; unknown names are ignored
    pub fn parse(value: &str) -> Self {
        value
            .split(';')
            .map(|part| part.trim().to_ascii_lowercase())
            .fold(Self::NONE, |acc, part| match part.as_str() {
                "all" => Self::ALL,
                _ => Self::NAMES
                    .iter()
                    .find(|(_, name)| *name == part)
                    .map(|(flag, _)| acc | *flag)
                    .unwrap_or(acc),
            })
    }
}

impl Default for LibraryIncludeFlags {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for LibraryIncludeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for LibraryIncludeFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
