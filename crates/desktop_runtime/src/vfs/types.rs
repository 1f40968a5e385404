use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Note,
    Text,
    #[serde(alias = "html")]
    Page,
    Folder,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Text => "text",
            Self::Page => "page",
            Self::Folder => "folder",
        }
    }

    /// Parses a type filter as typed by a user (`ls page`, `ls html`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "note" => Some(Self::Note),
            "text" => Some(Self::Text),
            "page" | "html" => Some(Self::Page),
            "folder" => Some(Self::Folder),
            _ => None,
        }
    }

    /// Whether the Notes editor can open records of this kind.
    pub fn is_editable_text(self) -> bool {
        matches!(self, Self::Note | Self::Text)
    }
}

/// One file in the virtual store. Serialized with the camelCase field names used in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default, alias = "updatedAt")]
    pub modified_at: u64,
}

impl FileRecord {
    pub fn content_str(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Title shown in listings; falls back to the file name when blank.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.name
        } else {
            &self.title
        }
    }
}

/// Partial update applied by [`VirtualFileStore::upsert`](super::VirtualFileStore::upsert).
///
/// `None` fields keep the existing value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePatch {
    pub kind: Option<FileKind>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl FilePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: FileKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// A deleted record waiting in the trash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashedFile {
    #[serde(flatten)]
    pub record: FileRecord,
    pub trashed_at: u64,
}

/// Mutation delivered to subscribers after it has been applied and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Upserted(String),
    Trashed(String),
    Restored(String),
    Purged(String),
    TrashEmptied,
}
