//! Tests for coordinate import, results export and round trips through
//! the filesystem.

mod csv_tests;
mod roundtrip_tests;
