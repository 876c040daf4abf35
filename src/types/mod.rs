// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Data model shared by every relcache component.
//!
//! - Queries and their enumerated options
//! - Time ranges with raw (relative or absolute) boundaries
//! - Columnar data frames
//! - Requests and responses exchanged with the fetch layer

pub mod frame;
pub mod query;
pub mod request;
pub mod time_range;

// Note: Public types are re-exported from lib.rs, not here
