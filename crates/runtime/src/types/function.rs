use crate::{LList, Module, Ptr};

/// A Lute function
///
/// Functions are thin descriptors: the instructions live in a [Module], and the function
/// points at the offset where its body starts. Captured values are shared through a list
/// so that recursive functions can refer to themselves after creation.
///
/// See also:
/// * [LNativeFunction](crate::LNativeFunction)
/// * [LValue::Function](crate::LValue::Function)
#[derive(Clone)]
pub struct LFunction {
    /// The module in which the function can be found
    pub module: Ptr<Module>,
    /// The instruction offset where the function's body starts
    pub offset: u32,
    /// The expected number of arguments for the function
    pub arg_count: u8,
    /// The values captured by the function when it was created
    pub captures: LList,
}

impl LFunction {
    /// Creates a function value pointing into the given module
    pub fn new(module: Ptr<Module>, offset: u32, arg_count: u8, captures: LList) -> Self {
        Self {
            module,
            offset,
            arg_count,
            captures,
        }
    }
}

impl PartialEq for LFunction {
    fn eq(&self, other: &Self) -> bool {
        Ptr::ptr_eq(&self.module, &other.module) && self.offset == other.offset
    }
}
