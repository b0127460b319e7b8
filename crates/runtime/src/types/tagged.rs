use crate::{LString, LValue};

/// A named wrapper around a value, the sum-constructor type used in Lute programs
///
/// `@Ok(5)` produces a tagged value with tag `Ok` wrapping `5`, and `@Done` wraps null.
/// Tagged values compare by tag name and then by their contents.
#[derive(Clone)]
pub struct LTagged {
    /// The tag name, without the leading `@`
    pub tag: LString,
    /// The wrapped value, often null
    pub contents: LValue,
}

impl LTagged {
    /// Creates a tagged value wrapping the given contents
    pub fn new(tag: impl Into<LString>, contents: LValue) -> Self {
        Self {
            tag: tag.into(),
            contents,
        }
    }

    /// Creates a tagged value wrapping null
    pub fn unit(tag: impl Into<LString>) -> Self {
        Self::new(tag, LValue::Null)
    }
}
