//! Progress photo records per habit
//!
//! Only metadata is stored. The image stays wherever `path` points.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{month_key, Clock};
use crate::store::{Repository, StoreKey};

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("Photo path cannot be empty")]
    EmptyPath,

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Photo not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPhoto {
    pub id: String,
    pub habit_id: String,
    pub path: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: NaiveDate,
    pub timestamp: i64,
    /// Bytes, when known
    #[serde(default)]
    pub size: Option<u64>,
    pub media_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoStats {
    pub total_photos: usize,
    pub habits_with_photos: usize,
    pub total_bytes: u64,
    pub oldest: Option<NaiveDate>,
    pub newest: Option<NaiveDate>,
}

/// Month key (`YYYY-MM`) and that month's photos, newest first
pub type PhotoTimeline = Vec<(String, Vec<ProgressPhoto>)>;

type PhotoMap = BTreeMap<String, ProgressPhoto>;

/// MIME type from the file extension
pub fn media_type(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

fn newest_first(photos: &mut [ProgressPhoto]) {
    photos.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[derive(Clone)]
pub struct PhotoBook {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

impl PhotoBook {
    pub fn new(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    fn photos(&self) -> PhotoMap {
        self.repo.load(StoreKey::ProgressPhotos)
    }

    pub fn add(
        &self,
        habit_id: &str,
        path: &str,
        caption: &str,
        tags: &[String],
        size: Option<u64>,
    ) -> Result<ProgressPhoto, PhotoError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(PhotoError::EmptyPath);
        }
        let media_type =
            media_type(path).ok_or_else(|| PhotoError::UnsupportedFormat(path.to_string()))?;

        let timestamp = self.clock.timestamp_ms();
        let photo = ProgressPhoto {
            id: format!("photo-{}-{}", habit_id, timestamp),
            habit_id: habit_id.to_string(),
            path: path.to_string(),
            caption: caption.trim().to_string(),
            tags: normalize_tags(tags),
            date: self.clock.today(),
            timestamp,
            size,
            media_type: media_type.to_string(),
        };
        self.repo
            .update(StoreKey::ProgressPhotos, |photos: &mut PhotoMap| {
                photos.insert(photo.id.clone(), photo.clone())
            })?;
        tracing::debug!("Recorded progress photo {} for {}", photo.id, habit_id);
        Ok(photo)
    }

    pub fn delete(&self, id: &str) -> Result<ProgressPhoto, PhotoError> {
        self.repo
            .update(StoreKey::ProgressPhotos, |photos: &mut PhotoMap| photos.remove(id))?
            .ok_or_else(|| PhotoError::NotFound(id.to_string()))
    }

    pub fn update_caption(&self, id: &str, caption: &str) -> Result<ProgressPhoto, PhotoError> {
        self.repo
            .update(StoreKey::ProgressPhotos, |photos: &mut PhotoMap| {
                let photo = photos.get_mut(id)?;
                photo.caption = caption.trim().to_string();
                Some(photo.clone())
            })?
            .ok_or_else(|| PhotoError::NotFound(id.to_string()))
    }

    pub fn update_tags(&self, id: &str, tags: &[String]) -> Result<ProgressPhoto, PhotoError> {
        let tags = normalize_tags(tags);
        self.repo
            .update(StoreKey::ProgressPhotos, |photos: &mut PhotoMap| {
                let photo = photos.get_mut(id)?;
                photo.tags = tags;
                Some(photo.clone())
            })?
            .ok_or_else(|| PhotoError::NotFound(id.to_string()))
    }

    /// Newest first, at most `limit` when given
    pub fn for_habit(&self, habit_id: &str, limit: Option<usize>) -> Vec<ProgressPhoto> {
        let mut photos: Vec<ProgressPhoto> = self
            .photos()
            .into_values()
            .filter(|p| p.habit_id == habit_id)
            .collect();
        newest_first(&mut photos);
        if let Some(limit) = limit {
            photos.truncate(limit);
        }
        photos
    }

    /// Newest first
    pub fn all(&self) -> Vec<ProgressPhoto> {
        let mut photos: Vec<ProgressPhoto> = self.photos().into_values().collect();
        newest_first(&mut photos);
        photos
    }

    /// Grouped by month, newest month first
    pub fn timeline(&self, habit_id: Option<&str>) -> PhotoTimeline {
        let mut months: BTreeMap<String, Vec<ProgressPhoto>> = BTreeMap::new();
        for photo in self
            .all()
            .into_iter()
            .filter(|p| habit_id.map_or(true, |id| p.habit_id == id))
        {
            months.entry(month_key(photo.date)).or_default().push(photo);
        }
        months.into_iter().rev().collect()
    }

    pub fn stats(&self) -> PhotoStats {
        let photos = self.photos();
        let habits: BTreeSet<&str> = photos.values().map(|p| p.habit_id.as_str()).collect();
        PhotoStats {
            total_photos: photos.len(),
            habits_with_photos: habits.len(),
            total_bytes: photos.values().filter_map(|p| p.size).sum(),
            oldest: photos.values().map(|p| p.date).min(),
            newest: photos.values().map(|p| p.date).max(),
        }
    }

    /// Drop every photo record for a deleted habit
    pub fn remove_for_habit(&self, habit_id: &str) -> Result<usize> {
        self.repo
            .update(StoreKey::ProgressPhotos, |photos: &mut PhotoMap| {
                let before = photos.len();
                photos.retain(|_, p| p.habit_id != habit_id);
                before - photos.len()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book_on(repo: &Repository, day: NaiveDate) -> PhotoBook {
        PhotoBook::new(repo.clone(), Arc::new(FixedClock::on(day)))
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_add_validates_path() {
        let book = book_on(&Repository::in_memory(), date(2024, 2, 1));
        assert!(matches!(book.add("h", "  ", "", &[], None), Err(PhotoError::EmptyPath)));
        assert!(matches!(
            book.add("h", "notes.txt", "", &[], None),
            Err(PhotoError::UnsupportedFormat(_))
        ));

        let photo = book
            .add("h", "/tmp/Day1.JPG", " first day ", &tags(&["Run", "run ", ""]), Some(2048))
            .unwrap();
        assert_eq!(photo.media_type, "image/jpeg");
        assert_eq!(photo.caption, "first day");
        assert_eq!(photo.tags, vec!["run"]);
        assert_eq!(photo.date, date(2024, 2, 1));
    }

    #[test]
    fn test_edit_and_delete() {
        let book = book_on(&Repository::in_memory(), date(2024, 2, 1));
        let photo = book.add("h", "a.png", "", &[], None).unwrap();

        let edited = book.update_caption(&photo.id, "after week one").unwrap();
        assert_eq!(edited.caption, "after week one");
        let edited = book.update_tags(&photo.id, &tags(&["Progress"])).unwrap();
        assert_eq!(edited.tags, vec!["progress"]);

        book.delete(&photo.id).unwrap();
        assert!(matches!(book.delete(&photo.id), Err(PhotoError::NotFound(_))));
        assert!(matches!(
            book.update_caption(&photo.id, "x"),
            Err(PhotoError::NotFound(_))
        ));
    }

    #[test]
    fn test_timeline_stats_and_cascade() {
        let repo = Repository::in_memory();
        book_on(&repo, date(2024, 1, 20))
            .add("run", "jan.jpg", "", &[], Some(100))
            .unwrap();
        book_on(&repo, date(2024, 2, 3))
            .add("run", "feb.jpg", "", &[], Some(300))
            .unwrap();
        let book = book_on(&repo, date(2024, 2, 10));
        book.add("read", "shelf.webp", "", &[], None).unwrap();

        let run = book.for_habit("run", None);
        assert_eq!(run.len(), 2);
        assert_eq!(run[0].path, "feb.jpg");
        assert_eq!(book.for_habit("run", Some(1)).len(), 1);

        let timeline = book.timeline(None);
        let months: Vec<&str> = timeline.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(months, vec!["2024-02", "2024-01"]);
        assert_eq!(timeline[0].1.len(), 2);
        assert_eq!(book.timeline(Some("read")).len(), 1);

        let stats = book.stats();
        assert_eq!(stats.total_photos, 3);
        assert_eq!(stats.habits_with_photos, 2);
        assert_eq!(stats.total_bytes, 400);
        assert_eq!(stats.oldest, Some(date(2024, 1, 20)));

        assert_eq!(book.remove_for_habit("run").unwrap(), 2);
        assert_eq!(book.all().len(), 1);
    }
}
