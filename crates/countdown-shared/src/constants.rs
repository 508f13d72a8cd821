//! Application-wide constants

pub const DEFAULT_ARCHIVE_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

pub const MIN_DURATION_MINUTES: i32 = 1;
pub const MAX_DURATION_MINUTES: i32 = 60;
pub const MAX_PARTICIPANT_NAME_LENGTH: u64 = 255;

pub const MAX_SETTINGS_TEXT_LENGTH: u64 = 255;
pub const MAX_LOGO_LENGTH: u64 = 500;

pub const DEFAULT_APP_TITLE: &str = "PKKMB UNCP 2025";
pub const DEFAULT_UNIVERSITY_NAME: &str = "Universitas Nusa Cendana Kupang";

/// Remaining seconds at or below which a running countdown is flagged.
pub const WARNING_THRESHOLD_SECONDS: i64 = 60;
