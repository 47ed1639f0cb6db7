// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the caption node

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "blip-captioning",
    "caption-translation",
    "text-to-speech",
    "caption-history",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("caption-node v{} ({})", VERSION_NUMBER, FEATURES.join(", "))
}
