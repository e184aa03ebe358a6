//! Library catalog scanner.
//!
//! Walks the top level of the library root. Each subdirectory holding a
//! video becomes one folder asset; each video directly in the root becomes a
//! bare asset paired with a same-stem subtitle when one exists. Nothing is
//! cached: every call reflects the disk as it is now.

use std::path::Path;

use mq_core::catalog::display_title;
use mq_core::config::LibraryConfig;
use mq_core::{AssetDescriptor, Error, GroupKey, Result};
use walkdir::{DirEntry, WalkDir};

use crate::paths::is_servable_segment;

/// Entries directly inside `dir`, sorted by file name, symlinks followed.
///
/// Names the asset routes would refuse (hidden files and folders, names with
/// separators) are skipped.
fn children(dir: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || e.file_name().to_str().is_some_and(is_servable_segment)
        })
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Scan the library root and return its assets sorted by title.
///
/// A missing root yields an empty catalog. Failure to list the root itself
/// is an error; unreadable subfolders are skipped with a warning.
pub fn scan_library(library: &LibraryConfig) -> Result<Vec<AssetDescriptor>> {
    let root = &library.root;
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "Library root missing; empty catalog");
        return Ok(Vec::new());
    }

    let mut assets = Vec::new();

    for entry in children(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(Error::from(std::io::Error::from(e)));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable library entry");
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_dir() {
            if let Some(asset) = scan_folder(library, path) {
                assets.push(asset);
            }
        } else if entry.file_type().is_file() && library.is_video(path) {
            if let Some(asset) = bare_asset(library, root, path) {
                assets.push(asset);
            }
        }
    }

    assets.sort_by(|a, b| a.display_title.cmp(&b.display_title));

    tracing::debug!(root = %root.display(), assets = assets.len(), "Library scan complete");
    Ok(assets)
}

/// A folder asset: the last video and last subtitle (by name) inside `dir`.
fn scan_folder(library: &LibraryConfig, dir: &Path) -> Option<AssetDescriptor> {
    let folder = file_name(dir)?;
    let mut video = None;
    let mut subtitle = None;

    for entry in children(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(folder = %folder, error = %e, "Skipping unreadable folder entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if library.is_video(path) {
            video = file_name(path);
        } else if library.is_subtitle(path) {
            subtitle = file_name(path);
        }
    }

    Some(AssetDescriptor {
        display_title: display_title(&folder),
        group_key: GroupKey::Folder(folder),
        video_relative_path: video?,
        subtitle_relative_path: subtitle,
    })
}

/// A bare asset for a video sitting directly in the root.
fn bare_asset(library: &LibraryConfig, root: &Path, video: &Path) -> Option<AssetDescriptor> {
    let stem = video.file_stem()?.to_string_lossy().into_owned();

    let subtitle = library
        .subtitle_extensions
        .iter()
        .map(|ext| format!("{stem}.{ext}"))
        .find(|candidate| root.join(candidate).is_file());

    Some(AssetDescriptor {
        group_key: GroupKey::Bare,
        display_title: display_title(&stem),
        video_relative_path: file_name(video)?,
        subtitle_relative_path: subtitle,
    })
}
