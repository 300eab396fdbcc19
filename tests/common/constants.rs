//! Shared constants for end-to-end tests
//!
//! When test data changes (user credentials, sample payloads, etc.),
//! update only this file.

// ============================================================================
// Test User Credentials
// ============================================================================

/// Regular test user handle
pub const TEST_USER: &str = "testuser";

/// Regular test user password
pub const TEST_PASS: &str = "testpass123";

/// Regular test user full name
pub const TEST_FULLNAME: &str = "Test User";

/// Second user, used as collaborator or as an outsider
pub const OTHER_USER: &str = "otheruser";

/// Second user password
pub const OTHER_PASS: &str = "otherpass123";

// ============================================================================
// Sample Catalog Data
// ============================================================================

pub const ALBUM_NAME: &str = "Viva la Vida";

pub const ALBUM_YEAR: i64 = 2008;

pub const SONG_TITLE: &str = "Life in Technicolor";

pub const SONG_PERFORMER: &str = "Coldplay";

pub const SONG_GENRE: &str = "Indie";

pub const PLAYLIST_NAME: &str = "Lagu Indie Hits Indonesia";

pub const EXPORT_EMAIL: &str = "listener@example.com";

/// Smallest valid PNG (1x1 transparent pixel)
pub const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Largest cover the test server accepts (bytes)
pub const TEST_MAX_COVER_BYTES: usize = 4096;

/// Likes cache TTL used by the test server (seconds)
pub const TEST_CACHE_TTL_SECS: u64 = 60;
