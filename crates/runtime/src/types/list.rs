use crate::{Borrow, BorrowMut, DisplayContext, LValue, Ptr, PtrMut};
use lute_memory::{Address, WeakPtrMut};

/// The underlying Vec type used by [LList]
pub type ValueVec = smallvec::SmallVec<[LValue; 4]>;

/// The list type used by the Lute runtime
#[derive(Clone, Default)]
pub struct LList(PtrMut<ValueVec>);

impl LList {
    /// Creates an empty list with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(ValueVec::with_capacity(capacity).into())
    }

    /// Creates a list containing the provided data
    pub fn with_data(data: ValueVec) -> Self {
        Self(data.into())
    }

    /// Creates a list containing the provided slice of [LValue]s
    pub fn from_slice(data: &[LValue]) -> Self {
        Self(data.iter().cloned().collect::<ValueVec>().into())
    }

    /// Returns the number of entries in the list
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns true if there are no entries in the list
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the list's entries
    pub fn data(&self) -> Borrow<'_, ValueVec> {
        self.0.borrow()
    }

    /// Returns a mutable reference to the list's entries
    pub fn data_mut(&self) -> BorrowMut<'_, ValueVec> {
        self.0.borrow_mut()
    }

    /// Returns true if the provided list shares this list's entry storage
    pub fn is_same_instance(&self, other: &Self) -> bool {
        PtrMut::ptr_eq(&self.0, &other.0)
    }

    /// Returns the address of the list's entry storage
    pub fn data_address(&self) -> Address {
        Ptr::address(&self.0)
    }

    pub(crate) fn downgrade(&self) -> WeakPtrMut<ValueVec> {
        Ptr::downgrade(&self.0)
    }

    /// Renders the list into the provided display context
    pub fn display(&self, ctx: &mut DisplayContext) {
        ctx.append('[');

        let id = self.data_address();
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

        ctx.append(']');
    }
}

impl From<Vec<LValue>> for LList {
    fn from(data: Vec<LValue>) -> Self {
        Self(data.into_iter().collect::<ValueVec>().into())
    }
}
