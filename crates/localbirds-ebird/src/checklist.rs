//! Per-species lookups on a fetched checklist.
//!
//! A checklist may list the same species once, or not at all when the
//! observation came from a different submission revision. Lookups use the
//! first entry whose species code matches.

use crate::types::{ChecklistDetail, ChecklistEntry, PHOTO_MEDIA_KEY};

/// Photo state of one species on a checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoStatus {
    /// The species does not appear on the checklist.
    NotListed,
    /// Listed, but without any photo media.
    NoPhoto,
    /// Listed with at least one photo.
    HasPhoto,
}

fn find_entry<'a>(detail: &'a ChecklistDetail, species_code: &str) -> Option<&'a ChecklistEntry> {
    detail
        .obs
        .iter()
        .find(|entry| entry.species_code.as_deref() == Some(species_code))
}

/// Comment text the observer attached to `species_code`, if any.
///
/// Returns `None` both when the species is listed without a comment and when
/// it is not listed at all. Blank comments are treated as absent.
#[must_use]
pub fn extract_comment<'a>(detail: &'a ChecklistDetail, species_code: &str) -> Option<&'a str> {
    find_entry(detail, species_code)?
        .comments
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
}

#[must_use]
pub fn photo_status(detail: &ChecklistDetail, species_code: &str) -> PhotoStatus {
    let Some(entry) = find_entry(detail, species_code) else {
        return PhotoStatus::NotListed;
    };
    let photos = entry
        .media_counts
        .as_ref()
        .and_then(|counts| counts.get(PHOTO_MEDIA_KEY))
        .copied()
        .unwrap_or(0);
    if photos > 0 {
        PhotoStatus::HasPhoto
    } else {
        PhotoStatus::NoPhoto
    }
}

/// `true` only when the species is listed with a non-zero photo count.
#[must_use]
pub fn has_photo(detail: &ChecklistDetail, species_code: &str) -> bool {
    photo_status(detail, species_code) == PhotoStatus::HasPhoto
}
