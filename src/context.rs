//! Per-star logging context.

use tracing::Span;

/// Logging scope for one star's analysis.
///
/// Stages enter the span so their events carry the star's designation;
/// separate stars never share a context.
#[derive(Debug, Clone)]
pub struct StarContext {
    designation: String,
    span: Span,
}

impl StarContext {
    pub fn new(designation: impl Into<String>) -> Self {
        let designation = designation.into();
        let span = tracing::info_span!("star", designation = %designation);
        Self { designation, span }
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Run `f` inside this star's span.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        self.span.in_scope(f)
    }
}
