/// Convenience result type used across isovox.
pub type IsovoxResult<T> = Result<T, IsovoxError>;

/// Top-level error taxonomy used by pipeline stages.
#[derive(thiserror::Error, Debug)]
pub enum IsovoxError {
    /// Invalid user-provided options or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Broken scene-graph references or violated scene invariants.
    #[error("scene error: {0}")]
    Scene(String),

    /// Failures while emitting or writing meshes.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// External renderer could not be started or exited with failure.
    #[error("render error: {0}")]
    Render(String),

    /// Crop detection or color-bleed repair failures.
    #[error("repair error: {0}")]
    Repair(String),

    /// Errors when serializing or deserializing records.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IsovoxError {
    /// Build a [`IsovoxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`IsovoxError::Scene`] value.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Build a [`IsovoxError::Mesh`] value.
    pub fn mesh(msg: impl Into<String>) -> Self {
        Self::Mesh(msg.into())
    }

    /// Build a [`IsovoxError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`IsovoxError::Repair`] value.
    pub fn repair(msg: impl Into<String>) -> Self {
        Self::Repair(msg.into())
    }

    /// Build a [`IsovoxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
