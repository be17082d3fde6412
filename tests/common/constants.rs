//! Shared constants for end-to-end tests
//!
//! When test data changes (user credentials, catalog songs, stub videos),
//! update only this file.
#![allow(dead_code)]

// ============================================================================
// Test User Credentials
// ============================================================================

/// Regular test user handle
pub const TEST_USER: &str = "testuser";
pub const TEST_EMAIL: &str = "testuser@example.com";
pub const TEST_PASS: &str = "testpass123";

/// A second user, for checking that users can't touch each other's data
pub const OTHER_USER: &str = "otheruser";
pub const OTHER_EMAIL: &str = "otheruser@example.com";
pub const OTHER_PASS: &str = "otherpass123";

// ============================================================================
// Test Catalog
// ============================================================================

/// Songs are inserted in this order, so ids follow it.
pub const SONG_1_ID: usize = 1;
pub const SONG_2_ID: usize = 2;
pub const SONG_3_ID: usize = 3;
pub const SONG_4_ID: usize = 4;
pub const SONG_5_ID: usize = 5;

pub const SONG_1_TITLE: &str = "Sunny Day";
pub const SONG_2_TITLE: &str = "Dance All Night";
pub const SONG_3_TITLE: &str = "Rainy Window";
pub const SONG_4_TITLE: &str = "Moonlight Promise";
pub const SONG_5_TITLE: &str = "Slow Breeze";

pub const ARTIST_1_NAME: &str = "The Test Band";
pub const ARTIST_2_NAME: &str = "Quiet Trio";
pub const ARTIST_3_NAME: &str = "Lofi Collective";

pub const CATALOG_SONGS_COUNT: usize = 5;

/// A song id that is not in the catalog
pub const MISSING_SONG_ID: usize = 999;

// ============================================================================
// Stub Video Service
// ============================================================================

/// Looks up as an upbeat Kannada remix
pub const VIDEO_ENERGETIC_ID: &str = "danceVideo1";
pub const VIDEO_ENERGETIC_RAW_TITLE: &str =
    "Don't Worry Baby Chinnamma Dance Remix [Official Video]";
pub const VIDEO_ENERGETIC_CLEAN_TITLE: &str = "Don't Worry Baby Chinnamma Dance Remix";
pub const VIDEO_ENERGETIC_CHANNEL: &str = "Anand Audio";

/// Looks up as a sad ballad
pub const VIDEO_SAD_ID: &str = "sadVideo001";
pub const VIDEO_SAD_CHANNEL: &str = "Blue Hearts";

/// Already in the test catalog as song 1
pub const VIDEO_IN_CATALOG_ID: &str = "fixtureVid1";

/// The stub service fails on this one
pub const VIDEO_BROKEN_ID: &str = "brokenVid01";

/// Well-formed id the stub service does not know
pub const VIDEO_MISSING_ID: &str = "missingVid1";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
