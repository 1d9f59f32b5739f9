use thiserror::Error;

/// Errors raised while building or rendering a scene.
///
/// Geometric dead ends (a ray missing everything, total internal reflection,
/// running out of recursion depth) are not errors; they simply contribute no
/// light. Only construction-time contract violations and I/O end up here.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("transform matrix is not invertible")]
    SingularTransform,

    #[error("canvas must be at least 1x1 pixels (got {0}x{1})")]
    EmptyCanvas(usize, usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not start render threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid scene: {0}")]
    InvalidScene(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
