// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::services::PhoneValidator;

/// North American number check used when no phone widget reports validity.
///
/// Formatting characters are ignored; what remains must be ten digits, or
/// eleven with a leading country code `1`. An empty field is not valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitCountPhoneValidator;

impl PhoneValidator for DigitCountPhoneValidator {
    fn is_valid(&self, phone: &str) -> bool {
        if phone
            .chars()
            .any(|c| !(c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')' | '+')))
        {
            return false;
        }

        let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.len() {
            10 => true,
            11 => digits[0] == '1',
            _ => false,
        }
    }
}
