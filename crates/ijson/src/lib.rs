// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure functions for applying path-addressed edits to JSON documents and
//! compacting command streams.

pub mod budget;
pub mod command;
pub mod compact;
pub mod deep_eq;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod path;

pub use budget::Budget;
pub use command::{apply_command, apply_commands, Command};
pub use compact::compact_ijson;
pub use deep_eq::deep_eq;
pub use engine::{get_path, set_path, Combine, SetOptions};
pub use error::IJsonError;
pub use normalize::normalize_numbers;
pub use path::{format_path, parse, parse_command_path, parse_opt, Path, PathSegment};
