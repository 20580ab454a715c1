//! Installed package listing from a project's graph node

use restoremill_foundation::{
    DependencyTarget, Framework, LibraryIncludeFlags, PackageSpec, VersionRange,
};
use std::collections::HashMap;
use std::fmt;

/// A package id with the version range it is referenced at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdentity {
    pub id: String,
    pub version_range: VersionRange,
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version_range)
    }
}

/// One installed package, attributed to a single target framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    pub identity: PackageIdentity,
    pub target_framework: Framework,
    pub include_type: LibraryIncludeFlags,
    pub suppress_parent: LibraryIncludeFlags,
    pub auto_referenced: bool,
}

/// Package dependencies of `spec` across frameworks, one entry per identity
///
/// Ids compare case-insensitively. When an identity appears under several
/// frameworks it is reported for the lowest-sorting one. Entries keep the
/// order in which identities were first seen.
pub fn get_package_references(spec: &PackageSpec) -> Vec<PackageReference> {
    let mut references: Vec<PackageReference> = Vec::new();
    let mut index: HashMap<(String, VersionRange), usize> = HashMap::new();

    for framework in &spec.target_frameworks {
        for dependency in framework
            .dependencies
            .iter()
            .filter(|d| d.target == DependencyTarget::Package)
        {
            let key = (
                dependency.name.to_lowercase(),
                dependency.version_range.clone(),
            );

            match index.get(&key) {
                Some(&position) => {
                    let existing = &mut references[position];
                    if framework.framework < existing.target_framework {
                        existing.target_framework = framework.framework.clone();
                    }
                }
                None => {
                    index.insert(key, references.len());
                    references.push(PackageReference {
                        identity: PackageIdentity {
                            id: dependency.name.clone(),
                            version_range: dependency.version_range.clone(),
                        },
                        target_framework: framework.framework.clone(),
                        include_type: dependency.include_type,
                        suppress_parent: dependency.suppress_parent,
                        auto_referenced: dependency.auto_referenced,
                    });
                }
            }
        }
    }

    references
}
