//! Fill options and configuration.

/// Options for filling a template.
#[derive(Debug, Clone)]
pub struct FillOptions {
    /// How placeholders without a value are treated
    pub error_mode: ErrorMode,

    /// Whether to run the literal residual pass after positional rewriting
    pub residual_pass: bool,
}

impl FillOptions {
    /// Create new fill options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail before filling when any placeholder has no value.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable or disable the residual pass.
    pub fn with_residual_pass(mut self, enabled: bool) -> Self {
        self.residual_pass = enabled;
        self
    }

    /// Disable the residual pass.
    pub fn without_residual_pass(mut self) -> Self {
        self.residual_pass = false;
        self
    }
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            residual_pass: true,
        }
    }
}

/// Handling of placeholders that have no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Leave them verbatim in the output
    #[default]
    Lenient,
    /// Refuse to fill the document
    Strict,
}
