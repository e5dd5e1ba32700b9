//! Integration test suite for gizmo.
//!
//! These tests drive the public API the way the TUI and CLI do: key events
//! through `update`, side effects through `execute_command`, and blobs
//! through a `Store` rooted in a temp directory.
//!
//! # Test Categories
//!
//! - `calculator_flows`: Calculator behavior through keys, keypad and scripts
//! - `shell_navigation`: Menu, widget switching and render snapshots
//! - `persistence`: Widget blobs surviving a restart

mod fixtures;

mod calculator_flows;
mod persistence;
mod shell_navigation;
