// ABOUTME: Field validation collecting one message per offending field
// ABOUTME: Converts into a VALIDATION_FAILED AppError carrying the field map
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use widget_store_core::errors::{AppError, AppResult};

/// Accumulates validation failures
#[derive(Debug, Default, Clone)]
pub struct Validator {
    errors: BTreeMap<String, String>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless `ok`; the first message per field wins
    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors
                .entry(field.to_owned())
                .or_insert_with(|| message.to_owned());
        }
        self
    }

    /// True when no check failed
    #[must_use]
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failures recorded so far
    #[must_use]
    pub const fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// `Ok(())` when valid, otherwise a validation error with every field message
    ///
    /// # Errors
    ///
    /// Returns `VALIDATION_FAILED` if any check failed
    pub fn finish(self) -> AppResult<()> {
        if self.valid() {
            Ok(())
        } else {
            Err(AppError::validation(self.errors))
        }
    }
}
