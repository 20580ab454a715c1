//! Settings overlay for cached package specs
//!
//! Project evaluation stores specs with the values the project file declared,
//! including markers such as `CLEAR` that only make sense relative to live
//! settings. The overlay resolves those against `Settings` on a clone; the
//! cached spec stays untouched so the next overlay sees the same declarations.

use restoremill_config::Settings;
use restoremill_foundation::{PackageSource, PackageSpec};
use std::path::Path;
use tracing::trace;

/// Declared-list marker: ignore settings defaults entirely
pub const CLEAR_MARKER: &str = "CLEAR";

/// Declared-list marker: entries after it are appended to the primary list
pub const ADDITIONAL_MARKER: &str = "$(Additional)";

/// Project file extensions the restore engine can process as project references
pub const SUPPORTED_PROJECT_EXTENSIONS: &[&str] =
    &["csproj", "vbproj", "fsproj", "msbuildproj", "nuproj", "vcxproj"];

pub fn is_supported_project_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_PROJECT_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Clone `original` and recompute its settings-dependent restore metadata
///
/// `original` must be the cached spec, not a previously corrected clone:
/// source resolution depends on the declared order of entries and markers.
pub fn apply_settings(original: &PackageSpec, settings: &dyn Settings) -> PackageSpec {
    let mut project = original.clone();

    project.restore_metadata.packages_path = resolve_packages_path(settings, original);
    project.restore_metadata.sources = resolve_sources(settings, original);
    project.restore_metadata.fallback_folders = resolve_fallback_folders(settings, original);
    project.restore_metadata.config_file_paths = settings.config_file_paths();
    ignore_unsupported_project_references(&mut project);

    project
}

/// Declared packages path (relative to the project directory), else the settings' global folder
pub fn resolve_packages_path(settings: &dyn Settings, original: &PackageSpec) -> Option<String> {
    let declared = original
        .restore_metadata
        .packages_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    match declared {
        Some(declared) => Some(resolve_local(original.project_directory(), declared)),
        None => settings
            .global_packages_folder()
            .map(|folder| folder.to_string_lossy().into_owned()),
    }
}

pub fn resolve_sources(settings: &dyn Settings, original: &PackageSpec) -> Vec<PackageSource> {
    let project_dir = original.project_directory();
    let declared: Vec<PackageSource> = original
        .restore_metadata
        .sources
        .iter()
        .map(|source| {
            if is_marker(&source.source) || source.is_http() || source.source.contains("://") {
                return source.clone();
            }
            let resolved = resolve_local(project_dir, source.source.trim());
            let mut source = source.clone();
            if source.name == source.source || source.name.is_empty() {
                source.name = resolved.clone();
            }
            source.source = resolved;
            source
        })
        .collect();

    blend(&declared, || settings.enabled_sources(), |s| s.source.as_str())
}

pub fn resolve_fallback_folders(settings: &dyn Settings, original: &PackageSpec) -> Vec<String> {
    let project_dir = original.project_directory();
    let declared: Vec<String> = original
        .restore_metadata
        .fallback_folders
        .iter()
        .map(|folder| {
            if is_marker(folder) {
                folder.clone()
            } else {
                resolve_local(project_dir, folder.trim())
            }
        })
        .collect();

    blend(&declared, || settings.fallback_folders(), |f| f.as_str())
}

/// Drop project references the restore engine cannot process
pub fn ignore_unsupported_project_references(project: &mut PackageSpec) {
    for framework in &mut project.restore_metadata.target_frameworks {
        framework.project_references.retain(|reference| {
            let supported = is_supported_project_extension(&reference.project_path);
            if !supported {
                trace!(
                    reference = %reference.project_path.display(),
                    framework = %framework.framework,
                    "Ignoring unsupported project reference"
                );
            }
            supported
        });
    }
}

fn is_marker(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case(CLEAR_MARKER) || value == ADDITIONAL_MARKER
}

fn resolve_local(project_dir: &Path, value: &str) -> String {
    let path = Path::new(value);
    if path.is_absolute() || project_dir.as_os_str().is_empty() {
        value.to_string()
    } else {
        project_dir.join(path).to_string_lossy().into_owned()
    }
}

/// Combine declared entries with settings defaults, honoring the markers
fn blend<T, D, K>(declared: &[T], defaults: D, key: K) -> Vec<T>
where
    T: Clone,
    D: FnOnce() -> Vec<T>,
    K: Fn(&T) -> &str,
{
    let has_clear = declared
        .iter()
        .any(|e| key(e).trim().eq_ignore_ascii_case(CLEAR_MARKER));
    let additional_at = declared
        .iter()
        .position(|e| key(e).trim() == ADDITIONAL_MARKER);
    let entries = |slice: &[T]| -> Vec<T> {
        slice
            .iter()
            .filter(|e| !is_marker(key(*e)))
            .cloned()
            .collect()
    };

    let blended = if has_clear {
        entries(declared)
    } else if let Some(index) = additional_at {
        let mut primary = entries(&declared[..index]);
        if primary.is_empty() {
            primary = defaults();
        }
        primary.extend(entries(&declared[index + 1..]));
        primary
    } else if declared.is_empty() {
        defaults()
    } else {
        declared.to_vec()
    };

    let mut seen: Vec<String> = Vec::with_capacity(blended.len());
    blended
        .into_iter()
        .filter(|e| {
            let normalized = key(e).trim().to_lowercase();
            if seen.contains(&normalized) {
                false
            } else {
                seen.push(normalized);
                true
            }
        })
        .collect()
}
