//! Method references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder text for a method whose metadata could not be resolved.
pub const UNRESOLVED_METHOD: &str = "<unresolved method>";

/// Identifies a method independently of runtime-internal handles.
///
/// Immutable once constructed. Displays as
/// `<class_signature>#<name> : <signature>`, the form used in every
/// record a [`MethodRef`] appears in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    /// JVM signature of the declaring class, e.g. `Ljava/lang/Thread;`.
    pub class_signature: String,
    /// Method name.
    pub name: String,
    /// Method type signature, e.g. `()J`.
    pub signature: String,
}

impl MethodRef {
    /// Create a new method reference.
    pub fn new(
        class_signature: impl Into<String>,
        name: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            class_signature: class_signature.into(),
            name: name.into(),
            signature: signature.into(),
        }
    }

    /// The fixed placeholder used when frame or catch-site metadata
    /// cannot be resolved. Rendering continues with this in place of the
    /// real reference.
    pub fn unresolved() -> Self {
        Self {
            class_signature: String::new(),
            name: String::new(),
            signature: String::new(),
        }
    }

    /// Whether this is the unresolved placeholder.
    pub fn is_unresolved(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unresolved() {
            f.write_str(UNRESOLVED_METHOD)
        } else {
            write!(f, "{}#{} : {}", self.class_signature, self.name, self.signature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let m = MethodRef::new("Lcom/example/Foo;", "bar", "(I)V");
        assert_eq!(m.to_string(), "Lcom/example/Foo;#bar : (I)V");
    }

    #[test]
    fn test_unresolved_placeholder() {
        let m = MethodRef::unresolved();
        assert!(m.is_unresolved());
        assert_eq!(m.to_string(), UNRESOLVED_METHOD);
    }

    #[test]
    fn test_resolved_is_not_placeholder() {
        assert!(!MethodRef::new("LFoo;", "run", "()V").is_unresolved());
    }
}
