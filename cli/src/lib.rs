// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! FieldOps CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Command handlers and service wiring for the `fieldops` binary

pub mod commands;
pub mod services;

#[cfg(test)]
mod tests {
    #[test]
    fn test_source_headers_name_package_authors() {
        let header = format!("// Copyright (c) 2026 {}\n", env!("CARGO_PKG_AUTHORS"));

        for source in [
            include_str!("main.rs"),
            include_str!("lib.rs"),
            include_str!("services.rs"),
            include_str!("../../console/core/src/lib.rs"),
        ] {
            assert!(source.starts_with(&header));
        }
    }
}
