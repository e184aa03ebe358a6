//! Mapping of `/{group}/{filename}` URL segments onto the library root.

use std::path::{Path, PathBuf};

use mq_core::{Error, GroupKey, Result};

/// Whether `segment` may appear as a group or file name in an asset URL.
///
/// Hidden names and anything that could step outside the library root are
/// refused. The scanner applies the same rule so every catalog URL resolves.
pub fn is_servable_segment(segment: &str) -> bool {
    !(segment.is_empty()
        || segment.contains('/')
        || segment.contains('\\')
        || segment.contains('\0')
        || segment.starts_with('.'))
}

fn validate_segment(segment: &str) -> Result<()> {
    if !is_servable_segment(segment) {
        return Err(Error::Validation(format!("Invalid path segment: {segment:?}")));
    }
    Ok(())
}

/// Build the on-disk path for `filename` within `group`.
///
/// `entity` names what is being looked up ("video", "subtitle") for the
/// not-found message. The file must exist at the time of the call; later
/// disappearance is handled by the readers themselves.
pub fn resolve_asset_path(
    root: &Path,
    group: &GroupKey,
    filename: &str,
    entity: &str,
) -> Result<PathBuf> {
    validate_segment(filename)?;

    let path = match group {
        GroupKey::Bare => root.join(filename),
        GroupKey::Folder(folder) => {
            validate_segment(folder)?;
            root.join(folder).join(filename)
        }
    };

    if !path.exists() {
        return Err(Error::not_found(entity, path.display()));
    }
    Ok(path)
}
