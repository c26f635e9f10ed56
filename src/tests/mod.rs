//! # Scenario Tests for Weather EPD
//!
//! End-to-end checks that cross module boundaries: the outlook chart built
//! from a realistic series, the two drawing backends agreeing pixel for
//! pixel, and whole dashboards rendered from real and degenerate snapshots.

mod backend_tests;
