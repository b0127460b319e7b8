use crate::{Borrow, BorrowMut, DisplayContext, LValue, Ptr, PtrMut};
use lute_memory::{Address, WeakPtrMut};

/// The tuple type used by the Lute runtime
///
/// A tuple's length is fixed at construction, but its element slots can be reassigned by
/// index, so the slots live in a shared mutable cell like a list's do.
#[derive(Clone, Default)]
pub struct LTuple(PtrMut<Box<[LValue]>>);

impl LTuple {
    /// Returns the number of elements in the tuple
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns true if the tuple has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the tuple's elements
    pub fn data(&self) -> Borrow<'_, Box<[LValue]>> {
        self.0.borrow()
    }

    /// Returns a mutable reference to the tuple's elements
    ///
    /// Slots can be reassigned through the result, the length can't change.
    pub fn data_mut(&self) -> BorrowMut<'_, Box<[LValue]>> {
        self.0.borrow_mut()
    }

    /// Returns true if the provided tuple shares this tuple's element storage
    pub fn is_same_instance(&self, other: &Self) -> bool {
        PtrMut::ptr_eq(&self.0, &other.0)
    }

    /// Returns the address of the tuple's element storage
    pub fn data_address(&self) -> Address {
        Ptr::address(&self.0)
    }

    pub(crate) fn downgrade(&self) -> WeakPtrMut<Box<[LValue]>> {
        Ptr::downgrade(&self.0)
    }

    /// Renders the tuple into the provided display context
    pub fn display(&self, ctx: &mut DisplayContext) {
        let id = self.data_address();
        ctx.append('(');

        if ctx.is_in_parents(id) {
            ctx.append("...");
        } else {
            ctx.push_container(id);

            for (i, value) in self.data().iter().enumerate() {
                if i > 0 {
                    ctx.append(", ");
                }
                value.display(ctx);
            }

            ctx.pop_container();
        }

        ctx.append(')');
    }
}

impl From<Vec<LValue>> for LTuple {
    fn from(data: Vec<LValue>) -> Self {
        Self(data.into_boxed_slice().into())
    }
}

impl From<&[LValue]> for LTuple {
    fn from(data: &[LValue]) -> Self {
        Self::from(data.to_vec())
    }
}

impl<const N: usize> From<&[LValue; N]> for LTuple {
    fn from(data: &[LValue; N]) -> Self {
        Self::from(data.as_slice())
    }
}
