//! Shared-secret authorization for uploads

use brankas_core::AppError;
use subtle::ConstantTimeEq;

/// Process-wide upload secret, read once at startup and injected into state.
#[derive(Clone, Default)]
pub struct SharedSecret {
    value: String,
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl SharedSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.value.is_empty()
    }

    /// Raw value, for the token route only.
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Check a caller-supplied credential. An unset secret admits nobody.
    pub fn verify(&self, candidate: &str) -> Result<(), AppError> {
        if !self.is_configured() {
            return Err(AppError::Unauthorized(
                "upload secret is not configured".to_string(),
            ));
        }

        if secure_compare(candidate, &self.value) {
            Ok(())
        } else {
            Err(AppError::Unauthorized("credential mismatch".to_string()))
        }
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
