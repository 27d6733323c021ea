//! Memory records: the persisted scrapbook documents.
//!
//! The wire shape (camelCase field names, lowercase enum values, optional
//! mood fields omitted when absent) matches the original document schema,
//! while construction goes through explicit validated drafts so a
//! well-typed [`Memory`] exists before anything touches the network or the
//! store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What kind of scrapbook page a record is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Drawing,
    Photo,
    Story,
    Mood,
}

/// Which way a gallery card leans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tilt {
    #[default]
    Left,
    Right,
}

/// A persisted scrapbook record. `id` and the timestamps are
/// server-assigned; everything else arrives through a [`MemoryDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: String,
    pub title: String,
    /// Display string, e.g. "Friday, Aug 1, 2025". Not parsed.
    pub date: String,
    /// Data URI of an exported drawing, an external URL, or empty.
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub story: String,
    #[serde(rename = "type")]
    pub kind: MemoryType,
    #[serde(default)]
    pub tilt: Tilt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_intake: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gratitude: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-settable fields of a record, validated at create time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryDraft {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub story: String,
    #[serde(rename = "type")]
    pub kind: MemoryType,
    #[serde(default)]
    pub tilt: Tilt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_intake: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gratitude: Option<String>,
}

/// Daily wellness numbers from the mood check-in form.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoodMetrics {
    /// Glasses of water.
    pub water_intake: u32,
    /// Hours bucket, 0-5.
    pub sleep: u32,
    /// Percent, 0-100.
    pub energy: u32,
}

impl MemoryDraft {
    /// A journal page from the art room: the uploaded photo wins over the
    /// canvas export, and a blank title falls back to a friendly default.
    pub fn journal_page(
        title: &str,
        date: impl Into<String>,
        story: impl Into<String>,
        drawing_uri: String,
        uploaded_photo: Option<String>,
        tilt: Tilt,
    ) -> MemoryDraft {
        let title = if title.trim().is_empty() {
            "My Masterpiece".to_string()
        } else {
            title.to_string()
        };
        let (kind, image_url) = match uploaded_photo {
            Some(photo) => (MemoryType::Photo, photo),
            None => (MemoryType::Drawing, drawing_uri),
        };
        MemoryDraft {
            title,
            date: date.into(),
            image_url,
            story: story.into(),
            kind,
            tilt,
            mood: None,
            water_intake: None,
            sleep: None,
            energy: None,
            gratitude: None,
        }
    }

    /// A mood check-in. Fails validation when no mood was selected.
    pub fn mood_check_in(
        mood: &str,
        date: impl Into<String>,
        metrics: MoodMetrics,
        gratitude: impl Into<String>,
        notes: impl Into<String>,
        tilt: Tilt,
    ) -> Result<MemoryDraft> {
        if mood.trim().is_empty() {
            return Err(Error::Validation("Please select a mood first".into()));
        }
        Ok(MemoryDraft {
            title: format!("Mood Check-in: {mood}"),
            date: date.into(),
            image_url: String::new(),
            story: notes.into(),
            kind: MemoryType::Mood,
            tilt,
            mood: Some(mood.to_string()),
            water_intake: Some(metrics.water_intake),
            sleep: Some(metrics.sleep),
            energy: Some(metrics.energy),
            gratitude: Some(gratitude.into()),
        })
    }

    /// Schema validation applied before any record is created or updated.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("title is required".into()));
        }
        if self.date.trim().is_empty() {
            return Err(Error::Validation("date is required".into()));
        }
        Ok(())
    }

    /// Promote into a full record with a server-assigned id and timestamps.
    /// `title` is stored trimmed.
    pub(crate) fn into_memory(self, id: String, now: DateTime<Utc>) -> Memory {
        Memory {
            id,
            title: self.title.trim().to_string(),
            date: self.date,
            image_url: self.image_url,
            story: self.story,
            kind: self.kind,
            tilt: self.tilt,
            mood: self.mood,
            water_intake: self.water_intake,
            sleep: self.sleep,
            energy: self.energy,
            gratitude: self.gratitude,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial update. Absent fields leave the record untouched; the merged
/// result is re-validated before it replaces the stored record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MemoryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tilt: Option<Tilt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_intake: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gratitude: Option<String>,
}

impl MemoryPatch {
    /// Merge into `memory`, validate the result, and refresh `updatedAt`.
    /// On a validation failure the record is left unchanged.
    pub(crate) fn apply(&self, memory: &mut Memory, now: DateTime<Utc>) -> Result<()> {
        let mut next = memory.clone();
        if let Some(title) = &self.title {
            next.title = title.trim().to_string();
        }
        if let Some(date) = &self.date {
            next.date = date.clone();
        }
        if let Some(image_url) = &self.image_url {
            next.image_url = image_url.clone();
        }
        if let Some(story) = &self.story {
            next.story = story.clone();
        }
        if let Some(kind) = self.kind {
            next.kind = kind;
        }
        if let Some(tilt) = self.tilt {
            next.tilt = tilt;
        }
        if let Some(mood) = &self.mood {
            next.mood = Some(mood.clone());
        }
        if let Some(water_intake) = self.water_intake {
            next.water_intake = Some(water_intake);
        }
        if let Some(sleep) = self.sleep {
            next.sleep = Some(sleep);
        }
        if let Some(energy) = self.energy {
            next.energy = Some(energy);
        }
        if let Some(gratitude) = &self.gratitude {
            next.gratitude = Some(gratitude.clone());
        }

        if next.title.trim().is_empty() {
            return Err(Error::Validation("title is required".into()));
        }
        if next.date.trim().is_empty() {
            return Err(Error::Validation("date is required".into()));
        }

        next.updated_at = now;
        *memory = next;
        Ok(())
    }
}
