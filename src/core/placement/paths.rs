//! Pure target-directory rules.
//!
//! Album folders are flat and never subdivided by date, regardless of the
//! configured date division. Primary copies go under ALL_PHOTOS, bucketed
//! by capture date, with a dedicated folder for undated items.

use super::context::{DateDivision, MovingContext};
use super::Placement;
use chrono::{Datelike, NaiveDateTime};
use std::path::PathBuf;

/// The date-organized canonical location for every item's primary copy
pub const ALL_PHOTOS_DIR: &str = "ALL_PHOTOS";

/// Bucket for items whose capture date could not be extracted
pub const UNKNOWN_DATE_DIR: &str = "date-unknown";

/// Map a placement to its target directory.
pub fn target_directory(
    placement: &Placement,
    date: Option<NaiveDateTime>,
    context: &MovingContext,
) -> PathBuf {
    match placement {
        Placement::AlbumCopy(name) => context.output_root.join(sanitize_folder_name(name)),
        Placement::Manifest => context.output_root.clone(),
        Placement::Primary => {
            let base = context.output_root.join(ALL_PHOTOS_DIR);
            match date {
                None => base.join(UNKNOWN_DATE_DIR),
                Some(date) => match context.date_division {
                    DateDivision::None => base,
                    DateDivision::Year => base.join(format!("{:04}", date.year())),
                    DateDivision::Month => base
                        .join(format!("{:04}", date.year()))
                        .join(format!("{:02}", date.month())),
                    DateDivision::Day => base
                        .join(format!("{:04}", date.year()))
                        .join(format!("{:02}", date.month()))
                        .join(format!("{:02}", date.day())),
                },
            }
        }
    }
}

/// Windows-reserved device names; a folder with one of these stems is
/// inaccessible there
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Make an album name safe to use as a folder name on every platform.
///
/// Filesystem-illegal characters and control characters become `_`,
/// trailing dots and spaces are trimmed, and Windows reserved device
/// names get a leading `_`.
pub fn sanitize_folder_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if (c as u32) < 0x20 => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_end_matches([' ', '.']);
    if trimmed.is_empty() {
        return "_".to_string();
    }

    let stem = trimmed.split('.').next().unwrap_or(trimmed);
    if RESERVED_NAMES.contains(&stem.to_ascii_uppercase().as_str()) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn context(division: DateDivision) -> MovingContext {
        MovingContext::new("/out").date_division(division)
    }

    #[test]
    fn album_placement_is_flat() {
        let ctx = context(DateDivision::Day);
        let dir = target_directory(
            &Placement::AlbumCopy("Vacation".to_string()),
            Some(date(2023, 6, 15)),
            &ctx,
        );
        // Never subdivided by date, even under day division
        assert_eq!(dir, PathBuf::from("/out/Vacation"));
    }

    #[test]
    fn primary_buckets_follow_date_division() {
        let d = Some(date(2023, 6, 15));

        assert_eq!(
            target_directory(&Placement::Primary, d, &context(DateDivision::None)),
            PathBuf::from("/out/ALL_PHOTOS")
        );
        assert_eq!(
            target_directory(&Placement::Primary, d, &context(DateDivision::Year)),
            PathBuf::from("/out/ALL_PHOTOS/2023")
        );
        assert_eq!(
            target_directory(&Placement::Primary, d, &context(DateDivision::Month)),
            PathBuf::from("/out/ALL_PHOTOS/2023/06")
        );
        assert_eq!(
            target_directory(&Placement::Primary, d, &context(DateDivision::Day)),
            PathBuf::from("/out/ALL_PHOTOS/2023/06/15")
        );
    }

    #[test]
    fn manifest_placement_targets_the_output_root() {
        let dir = target_directory(
            &Placement::Manifest,
            Some(date(2023, 6, 15)),
            &context(DateDivision::Day),
        );
        assert_eq!(dir, PathBuf::from("/out"));
    }

    #[test]
    fn undated_primary_goes_to_unknown_bucket() {
        let dir = target_directory(&Placement::Primary, None, &context(DateDivision::Year));
        assert_eq!(dir, PathBuf::from("/out/ALL_PHOTOS/date-unknown"));
    }

    #[test]
    fn sanitize_replaces_illegal_characters() {
        assert_eq!(sanitize_folder_name("My/Album"), "My_Album");
        assert_eq!(sanitize_folder_name("a<b>c:d\"e"), "a_b_c_d_e");
        assert_eq!(sanitize_folder_name("what?*|"), "what___");
        assert_eq!(sanitize_folder_name("tab\there"), "tab_here");
    }

    #[test]
    fn sanitize_trims_trailing_dots_and_spaces() {
        assert_eq!(sanitize_folder_name("Album. "), "Album");
        assert_eq!(sanitize_folder_name("Album..."), "Album");
    }

    #[test]
    fn sanitize_handles_reserved_device_names() {
        assert_eq!(sanitize_folder_name("CON"), "_CON");
        assert_eq!(sanitize_folder_name("con"), "_con");
        assert_eq!(sanitize_folder_name("COM1.album"), "_COM1.album");
        // Not reserved: the name merely starts with one
        assert_eq!(sanitize_folder_name("CONCERT"), "CONCERT");
    }

    #[test]
    fn sanitize_never_returns_empty() {
        assert_eq!(sanitize_folder_name(""), "_");
        assert_eq!(sanitize_folder_name("  "), "_");
        assert_eq!(sanitize_folder_name("..."), "_");
    }

    #[test]
    fn sanitized_album_name_is_used_in_target() {
        let ctx = context(DateDivision::Year);
        let dir = target_directory(
            &Placement::AlbumCopy("Trip: Italy/2023".to_string()),
            None,
            &ctx,
        );
        assert_eq!(dir, PathBuf::from("/out/Trip_ Italy_2023"));
    }
}
