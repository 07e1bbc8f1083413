//! Color parsing error types

/// Errors produced when a text does not describe an `r g b` triple.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    /// The text did not split into exactly three components.
    #[error("expected 3 color components, got {found} in '{input}'")]
    Arity { input: String, found: usize },

    /// A component was not an integer.
    #[error("invalid color component '{component}' in '{input}'")]
    Component { input: String, component: String },
}

impl ColorError {
    /// Creates a new arity error.
    pub fn arity(input: impl Into<String>, found: usize) -> Self {
        Self::Arity {
            input: input.into(),
            found,
        }
    }

    /// Creates a new component error.
    pub fn component(input: impl Into<String>, component: impl Into<String>) -> Self {
        Self::Component {
            input: input.into(),
            component: component.into(),
        }
    }
}
