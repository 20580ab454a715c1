//! Target framework short names (`net8.0`, `netstandard2.0`, `net472`, ...)

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Example: net8.0-windows10.0.19041 => family "net", version "8.0", platform "windows10.0.19041"
static FRAMEWORK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<family>netcoreapp|netstandard|net)(?P<version>\d+(?:\.\d+)*)(?:-(?P<platform>[a-z0-9.]+))?$")
        .expect("Invalid regex for framework short names")
});

/// Framework family, ordered the way framework identifiers sort by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameworkFamily {
    NetCoreApp,
    NetFramework,
    NetStandard,
    /// Anything we cannot parse; the original text is kept verbatim
    Unsupported(String),
}

/// A target framework parsed from its short folder name
///
/// Ordering is by family, then version, then platform, so the "lowest"
/// framework of a project is well defined when reporting installed packages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Framework {
    family: FrameworkFamily,
    version: [u32; 3],
    platform: Option<String>,
}

impl Framework {
    /// Parse a short folder name. Unknown names become `FrameworkFamily::Unsupported`.
    pub fn parse(short_name: &str) -> Self {
        let trimmed = short_name.trim();
        let Some(caps) = FRAMEWORK_REGEX.captures(trimmed) else {
            return Self::unsupported(trimmed);
        };

        let family = caps["family"].to_ascii_lowercase();
        let raw_version = &caps["version"];
        let platform = caps
            .name("platform")
            .map(|m| m.as_str().to_ascii_lowercase());

        let Some(version) = parse_version(raw_version) else {
            return Self::unsupported(trimmed);
        };

        let family = match family.as_str() {
            "netcoreapp" => FrameworkFamily::NetCoreApp,
            "netstandard" => FrameworkFamily::NetStandard,
            // net5.0 and later are .NET Core; dotless names (net472) are .NET Framework
            _ if raw_version.contains('.') && version[0] >= 5 => FrameworkFamily::NetCoreApp,
            _ => FrameworkFamily::NetFramework,
        };

        if platform.is_some() && !matches!(family, FrameworkFamily::NetCoreApp) {
            return Self::unsupported(trimmed);
        }

        Self {
            family,
            version,
            platform,
        }
    }

    fn unsupported(raw: &str) -> Self {
        Self {
            family: FrameworkFamily::Unsupported(raw.to_string()),
            version: [0; 3],
            platform: None,
        }
    }

    pub fn family(&self) -> &FrameworkFamily {
        &self.family
    }

    pub fn version(&self) -> [u32; 3] {
        self.version
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self.family, FrameworkFamily::Unsupported(_))
    }

    /// The canonical short folder name, e.g. `net8.0`, `netcoreapp3.1`, `net472`
    pub fn short_folder_name(&self) -> String {
        let [major, minor, patch] = self.version;
        let base = match &self.family {
            FrameworkFamily::NetCoreApp if major >= 5 => format!("net{}.{}", major, minor),
            FrameworkFamily::NetCoreApp => format!("netcoreapp{}.{}", major, minor),
            FrameworkFamily::NetStandard => format!("netstandard{}.{}", major, minor),
            FrameworkFamily::NetFramework if patch > 0 => {
                format!("net{}{}{}", major, minor, patch)
            }
            FrameworkFamily::NetFramework => format!("net{}{}", major, minor),
            FrameworkFamily::Unsupported(raw) => return raw.clone(),
        };

        match &self.platform {
            Some(platform) => format!("{}-{}", base, platform),
            None => base,
        }
    }
}

fn parse_version(raw: &str) -> Option<[u32; 3]> {
    let parts: Vec<u32> = if raw.contains('.') {
        raw.split('.')
            .map(|p| p.parse().ok())
            .collect::<Option<Vec<_>>>()?
    } else {
        // Dotless versions use one digit per component: 472 => 4.7.2
        raw.chars()
            .map(|c| c.to_digit(10))
            .collect::<Option<Vec<_>>>()?
    };

    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut version = [0; 3];
    version[..parts.len()].copy_from_slice(&parts);
    Some(version)
}

impl FromStr for Framework {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Framework {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Framework> for String {
    fn from(value: Framework) -> Self {
        value.short_folder_name()
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_folder_name())
    }
}
