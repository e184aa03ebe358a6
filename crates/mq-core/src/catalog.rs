//! Catalog data types shared by the scanner and the HTTP layer.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved group segment for videos living directly in the library root.
pub const BARE_GROUP: &str = "__bare__";

/// Where an asset lives relative to the library root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// The asset sits in its own subfolder with this name.
    Folder(String),
    /// The asset is a bare file in the library root.
    Bare,
}

impl GroupKey {
    /// Interpret a URL path segment.
    pub fn from_segment(segment: &str) -> Self {
        if segment == BARE_GROUP {
            GroupKey::Bare
        } else {
            GroupKey::Folder(segment.to_string())
        }
    }

    pub fn as_segment(&self) -> &str {
        match self {
            GroupKey::Folder(name) => name,
            GroupKey::Bare => BARE_GROUP,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_segment())
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_segment())
    }
}

impl<'de> Deserialize<'de> for GroupKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(GroupKey::from_segment(&s))
    }
}

/// One playable entry of the catalog.
///
/// Serialized with the field names the web UI expects (`folder`, `title`,
/// `video`, `subtitle`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    #[serde(rename = "folder")]
    pub group_key: GroupKey,
    #[serde(rename = "title")]
    pub display_title: String,
    /// File name of the video inside its group.
    #[serde(rename = "video")]
    pub video_relative_path: String,
    /// File name of the paired subtitle inside its group, if any.
    #[serde(rename = "subtitle")]
    pub subtitle_relative_path: Option<String>,
}

impl AssetDescriptor {
    /// URL path of the video stream for this asset.
    pub fn video_url(&self) -> String {
        format!("/video/{}/{}", self.group_key, self.video_relative_path)
    }

    /// URL path of the subtitle track for this asset, if one was paired.
    pub fn subtitle_url(&self) -> Option<String> {
        self.subtitle_relative_path
            .as_ref()
            .map(|s| format!("/subtitle/{}/{}", self.group_key, s))
    }
}

/// Turn a folder name or file stem into a human title.
pub fn display_title(raw: &str) -> String {
    raw.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_key_sentinel_round_trips() {
        assert_eq!(GroupKey::from_segment("__bare__"), GroupKey::Bare);
        assert_eq!(GroupKey::Bare.as_segment(), BARE_GROUP);
        assert_eq!(
            GroupKey::from_segment("Blade_Runner"),
            GroupKey::Folder("Blade_Runner".into())
        );
    }

    #[test]
    fn asset_serializes_with_ui_field_names() {
        let asset = AssetDescriptor {
            group_key: GroupKey::Bare,
            display_title: "Night of the Comet".into(),
            video_relative_path: "Night_of_the_Comet.mp4".into(),
            subtitle_relative_path: None,
        };
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["folder"], "__bare__");
        assert_eq!(json["title"], "Night of the Comet");
        assert_eq!(json["video"], "Night_of_the_Comet.mp4");
        assert!(json["subtitle"].is_null());
    }

    #[test]
    fn urls_use_group_segment() {
        let asset = AssetDescriptor {
            group_key: GroupKey::Folder("Alien".into()),
            display_title: "Alien".into(),
            video_relative_path: "alien.mkv".into(),
            subtitle_relative_path: Some("alien.srt".into()),
        };
        assert_eq!(asset.video_url(), "/video/Alien/alien.mkv");
        assert_eq!(asset.subtitle_url().as_deref(), Some("/subtitle/Alien/alien.srt"));
    }

    #[test]
    fn display_title_replaces_underscores() {
        assert_eq!(display_title("The_Third_Man"), "The Third Man");
    }
}
