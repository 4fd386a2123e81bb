//! Secret values held in memory.

use std::{convert::Infallible, fmt, str::FromStr};

use zeroize::Zeroize;

/// A credential that never appears in logs and is wiped when dropped.
#[derive(Clone)]
pub struct Secret {
    value: String,
}

impl Secret {
    #[must_use]
    pub fn new(value: String) -> Self {
        Self { value }
    }

    /// Borrow the raw value. Only call this at the point of use.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl FromStr for Secret {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(value.to_string()))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(**redacted**)")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let secret = Secret::new("sk_test_123".to_string());

        assert_eq!(format!("{secret:?}"), "Secret(**redacted**)");
        assert_eq!(secret.expose(), "sk_test_123");
    }
}
