use crate::uniforms::ValueKind;
use thiserror::Error;

/// Errors raised by the uniform store and everything that writes through it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UniformError {
    #[error("unknown uniform `{0}`")]
    InvalidKey(String),
    #[error("uniform `{key}` holds {expected:?}, got {found:?}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("uniform `{0}` declared twice")]
    DuplicateKey(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplerConfigError {
    #[error("bin count must be non-zero")]
    NoBins,
    #[error("normalizer must be finite and positive, got {0}")]
    BadNormalizer(f32),
    #[error("amplitude range [{min}, {max}] is empty or not finite")]
    BadRange { min: f32, max: f32 },
    #[error("quantum must be finite and positive, got {0}")]
    BadQuantum(f32),
}
