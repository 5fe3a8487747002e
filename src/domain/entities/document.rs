use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned surrogate key of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

impl DocumentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for DocumentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted document.
///
/// `id` is `None` until the first successful save. Beyond `title`, the
/// document's fields live in the free-form `metadata` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Option<DocumentId>,
    pub title: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        let now = now();
        Self {
            id: None,
            title: title.into(),
            metadata: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}

/// Field changes applied by an update. `None` leaves the field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentChanges {
    pub title: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl DocumentChanges {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.metadata.is_none()
    }

    /// Applies the changes in place, returning whether anything was set.
    pub fn apply(self, doc: &mut Document) -> bool {
        let changed = !self.is_empty();
        if let Some(title) = self.title {
            doc.title = title;
        }
        if let Some(metadata) = self.metadata {
            doc.metadata = metadata;
        }
        changed
    }
}

// Relational timestamps keep microseconds; truncating here keeps a saved
// document equal to the one read back.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
