//! Passphrase prompts.
//!
//! Input is hidden. Encryption asks twice so a typo cannot lock the user out
//! of their own file; decryption asks once.

use anyhow::{Result, ensure};
use inquire::{Password, PasswordDisplayMode};

use crate::secret::Secret;

pub struct Prompt {
    password_min_length: usize,
}

impl Prompt {
    #[must_use]
    pub const fn new(password_min_length: usize) -> Self {
        Self { password_min_length }
    }

    pub fn prompt_encryption_password(&self) -> Result<Secret> {
        let password = Password::new("Enter passphrase:")
            .with_display_mode(PasswordDisplayMode::Hidden)
            .with_custom_confirmation_message("Confirm passphrase:")
            .with_custom_confirmation_error_message("The passphrases do not match.")
            .prompt()?;

        self.validate(password)
    }

    pub fn prompt_decryption_password(&self) -> Result<Secret> {
        let password = Password::new("Enter passphrase:").with_display_mode(PasswordDisplayMode::Hidden).without_confirmation().prompt()?;

        self.validate(password)
    }

    /// Rejects blank passphrases and ones shorter than the configured minimum.
    pub fn validate(&self, password: String) -> Result<Secret> {
        ensure!(!password.trim().is_empty(), "passphrase cannot be empty");
        ensure!(password.chars().count() >= self.password_min_length, "passphrase must be at least {} characters", self.password_min_length);
        Ok(Secret::from_string(password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let prompt = Prompt::new(4);
        assert_eq!(prompt.validate("hunter2".to_owned()).unwrap().expose_secret(), "hunter2");
        assert!(prompt.validate("abc".to_owned()).is_err());
        assert!(prompt.validate("    ".to_owned()).is_err());
        assert!(Prompt::new(1).validate(String::new()).is_err());
    }
}
