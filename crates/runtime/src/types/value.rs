//! The core value type used in the Lute runtime

use crate::{
    DisplayContext, LFunction, LIterator, LList, LMap, LNativeFunction, LRange, LString, LTagged,
    LTuple, LuteHasher, Ptr,
};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// The core value type for Lute
#[derive(Clone, Default)]
pub enum LValue {
    /// The default type representing the absence of a value
    #[default]
    Null,

    /// A boolean, can be either true or false
    Bool(bool),

    /// A 64 bit signed integer
    Int(i64),

    /// A 64 bit float, the `num` type in Lute programs
    Float(f64),

    /// The string type used in Lute
    Str(LString),

    /// A half-open stepped integer range
    Range(LRange),

    /// The tuple type used in Lute
    Tuple(LTuple),

    /// The list type used in Lute
    List(LList),

    /// The map type used in Lute
    Map(LMap),

    /// An error value, wrapping the error's payload
    Error(Ptr<LValue>),

    /// A Lute function
    Function(LFunction),

    /// A function that's implemented outside of the Lute runtime
    NativeFunction(LNativeFunction),

    /// A named wrapper around a value, produced by `@name(...)` expressions
    Tagged(Ptr<LTagged>),

    /// The iterator type used to drive loops
    ///
    /// This is a pseudo type: iterators are created and consumed by the dispatcher, and
    /// can't appear in constant pools, as map keys, or inside other values that the
    /// language can observe.
    Iterator(LIterator),
}

impl LValue {
    /// The canonical null value
    pub const NULL: Self = Self::Null;

    /// The canonical true value
    pub const TRUE: Self = Self::Bool(true);

    /// The canonical false value
    pub const FALSE: Self = Self::Bool(false);

    /// Creates an error value wrapping the given payload
    pub fn error(payload: LValue) -> Self {
        Self::Error(payload.into())
    }

    /// Creates a tagged value with the given tag name and contents
    pub fn tagged(tag: impl Into<LString>, contents: LValue) -> Self {
        Self::Tagged(LTagged::new(tag, contents).into())
    }

    /// Returns true if the value has function-like callable behaviour
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::NativeFunction(_))
    }

    /// Returns true if an iterator can be made from the value
    pub fn is_iterable(&self) -> bool {
        matches!(
            self,
            Self::Range(_) | Self::Str(_) | Self::Tuple(_) | Self::List(_) | Self::Map(_)
        )
    }

    /// Returns true if the value supports `[]` indexing operations
    pub fn is_indexable(&self) -> bool {
        matches!(
            self,
            Self::Str(_) | Self::Tuple(_) | Self::List(_) | Self::Map(_)
        )
    }

    /// Returns true if the value is a pseudo type that can't be observed by programs
    pub fn is_pseudo(&self) -> bool {
        matches!(self, Self::Iterator(_))
    }

    /// Returns the value's type as an [LString]
    pub fn type_as_string(&self) -> LString {
        use LValue::*;
        match &self {
            Null => TYPE_NULL.with(|x| x.clone()),
            Bool(_) => TYPE_BOOL.with(|x| x.clone()),
            Int(_) => TYPE_INT.with(|x| x.clone()),
            Float(_) => TYPE_NUM.with(|x| x.clone()),
            Str(_) => TYPE_STR.with(|x| x.clone()),
            Range { .. } => TYPE_RANGE.with(|x| x.clone()),
            Tuple(_) => TYPE_TUPLE.with(|x| x.clone()),
            List(_) => TYPE_LIST.with(|x| x.clone()),
            Map(_) => TYPE_MAP.with(|x| x.clone()),
            Error(_) => TYPE_ERROR.with(|x| x.clone()),
            Function(_) => TYPE_FN.with(|x| x.clone()),
            NativeFunction(_) => TYPE_NATIVE_FN.with(|x| x.clone()),
            Tagged(_) => TYPE_TAGGED.with(|x| x.clone()),
            Iterator(_) => TYPE_ITERATOR.with(|x| x.clone()),
        }
    }

    /// Returns true if the two values are equal
    ///
    /// Equality is structural and recurses through tuples, lists, error payloads, and
    /// tagged contents. Ints and floats compare equal when their numeric values match
    /// after int-to-float conversion. Maps compare as identities. Functions and native
    /// functions compare as identities and are never equal to each other.
    ///
    /// Iterators are internal values and reaching one here is a bug in the caller.
    pub fn value_eq(&self, other: &LValue) -> bool {
        use LValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(a), Float(b)) | (Float(b), Int(a)) => *a as f64 == *b,
            (Str(a), Str(b)) => a == b,
            (Range(a), Range(b)) => a == b,
            (Tuple(a), Tuple(b)) => {
                if a.is_same_instance(b) {
                    return true;
                }
                let (a, b) = (a.data(), b.data());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.value_eq(y))
            }
            (List(a), List(b)) => {
                if a.is_same_instance(b) {
                    return true;
                }
                let (a, b) = (a.data(), b.data());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.value_eq(y))
            }
            (Map(a), Map(b)) => a.is_same_instance(b),
            (Error(a), Error(b)) => a.value_eq(b),
            (Tagged(a), Tagged(b)) => a.tag == b.tag && a.contents.value_eq(&b.contents),
            (Function(a), Function(b)) => a == b,
            (NativeFunction(a), NativeFunction(b)) => a == b,
            (Iterator(_), _) | (_, Iterator(_)) => {
                unreachable!("iterators can't be compared")
            }
            _ => false,
        }
    }

    /// Returns a 32 bit hash of the value
    ///
    /// Equal values always produce equal hashes, see [LValue::value_eq] for the equality
    /// rules. Iterators are internal values and reaching one here is a bug in the caller.
    pub fn value_hash(&self) -> u32 {
        let mut hasher = LuteHasher::default();
        hash_value_into(self, &mut hasher);
        hasher.finish() as u32
    }

    /// Renders the value into the provided display context
    ///
    /// Iterators are internal values and reaching one here is a bug in the caller.
    pub fn display(&self, ctx: &mut DisplayContext) {
        use LValue::*;
        match self {
            Null => ctx.append("null"),
            Bool(b) => ctx.append(b.to_string()),
            Int(n) => ctx.append(n.to_string()),
            Float(n) => ctx.append(n.to_string()),
            Str(s) => append_quoted(ctx, s),
            Range(r) => ctx.append(r.to_string()),
            Tuple(t) => {
                if ctx.depth_exhausted() {
                    ctx.append("(...)");
                } else {
                    ctx.descend();
                    t.display(ctx);
                    ctx.ascend();
                }
            }
            List(l) => {
                if ctx.depth_exhausted() {
                    ctx.append("[...]");
                } else {
                    ctx.descend();
                    l.display(ctx);
                    ctx.ascend();
                }
            }
            Map(m) => {
                if ctx.depth_exhausted() {
                    ctx.append("{...}");
                } else {
                    ctx.descend();
                    m.display(ctx);
                    ctx.ascend();
                }
            }
            Error(payload) => {
                if ctx.depth_exhausted() {
                    ctx.append("error(...)");
                } else {
                    ctx.append("error(");
                    ctx.descend();
                    payload.display(ctx);
                    ctx.ascend();
                    ctx.append(')');
                }
            }
            Tagged(t) => {
                if ctx.depth_exhausted() {
                    ctx.append(format!("@{}(...)", t.tag));
                } else {
                    ctx.append(format!("@{}(", t.tag));
                    ctx.descend();
                    t.contents.display(ctx);
                    ctx.ascend();
                    ctx.append(')');
                }
            }
            Function(f) => ctx.append(format!(
                "fn({})@0x{:x}[{}]",
                f.arg_count,
                f.offset,
                f.captures.len()
            )),
            NativeFunction(f) => ctx.append(format!(
                "native({})@{}",
                f.arg_count,
                Ptr::address(&f.function)
            )),
            Iterator(_) => unreachable!("iterators can't be displayed"),
        }
    }

    /// Renders the value as a string
    ///
    /// When a depth is provided, compound values below that depth are abbreviated.
    pub fn display_string(&self, depth: Option<usize>) -> String {
        let mut ctx = match depth {
            Some(depth) => DisplayContext::with_depth(depth),
            None => DisplayContext::default(),
        };
        self.display(&mut ctx);
        ctx.result()
    }
}

/// Feeds the value's hash projection into the given hasher
///
/// The projection starts with a tag byte, with ints and floats sharing a tag so that
/// numbers that compare equal across the int/float pair also hash equally. Tuples, lists,
/// and maps hash their length rather than their contents, which keeps hashing cheap and
/// keeps it from recursing through self-referential containers; maps additionally mix in
/// their identity, which is safe because maps also compare as identities.
pub(crate) fn hash_value_into<H: Hasher>(value: &LValue, state: &mut H) {
    use LValue::*;
    match value {
        Null => state.write_u8(0),
        Bool(b) => {
            state.write_u8(1);
            b.hash(state);
        }
        Int(n) => {
            state.write_u8(2);
            hash_number(*n as f64, state);
        }
        Float(n) => {
            state.write_u8(2);
            hash_number(*n, state);
        }
        Str(s) => {
            state.write_u8(3);
            state.write(s.as_bytes());
        }
        Range(r) => {
            state.write_u8(4);
            r.hash(state);
        }
        Tuple(t) => {
            state.write_u8(5);
            state.write_usize(t.len());
        }
        List(l) => {
            state.write_u8(6);
            state.write_usize(l.len());
        }
        Map(m) => {
            state.write_u8(7);
            state.write_usize(m.len());
            m.data_address().hash(state);
        }
        Error(payload) => {
            state.write_u8(8);
            hash_value_into(payload, state);
        }
        Tagged(t) => {
            state.write_u8(9);
            state.write(t.tag.as_bytes());
            hash_value_into(&t.contents, state);
        }
        Function(f) => {
            state.write_u8(10);
            Ptr::address(&f.module).hash(state);
            state.write_u32(f.offset);
        }
        NativeFunction(f) => {
            state.write_u8(11);
            f.hash(state);
        }
        Iterator(_) => unreachable!("iterators can't be hashed"),
    }
}

// The int/float pair hashes through the float projection, with negative zero normalized
// so that 0 and -0.0 agree
fn hash_number<H: Hasher>(n: f64, state: &mut H) {
    let n = if n == 0.0 { 0.0 } else { n };
    state.write_u64(n.to_bits());
}

fn append_quoted(ctx: &mut DisplayContext, s: &LString) {
    ctx.append('"');
    for c in s.chars() {
        match c {
            '\n' => ctx.append("\\n"),
            '\t' => ctx.append("\\t"),
            '\r' => ctx.append("\\r"),
            '\'' => ctx.append("\\'"),
            '"' => ctx.append("\\\""),
            c if (c as u32) < 0x20 || c == '\x7f' => {
                ctx.append(format!("\\x{:02x}", c as u32));
            }
            c => ctx.append(c),
        }
    }
    ctx.append('"');
}

thread_local! {
    static TYPE_NULL: LString = "null".into();
    static TYPE_BOOL: LString = "bool".into();
    static TYPE_INT: LString = "int".into();
    static TYPE_NUM: LString = "num".into();
    static TYPE_STR: LString = "str".into();
    static TYPE_RANGE: LString = "range".into();
    static TYPE_TUPLE: LString = "tuple".into();
    static TYPE_LIST: LString = "list".into();
    static TYPE_MAP: LString = "map".into();
    static TYPE_ERROR: LString = "error".into();
    static TYPE_FN: LString = "fn".into();
    static TYPE_NATIVE_FN: LString = "native fn".into();
    static TYPE_TAGGED: LString = "tagged".into();
    static TYPE_ITERATOR: LString = "iterator".into();
}

impl fmt::Debug for LValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_as_string())
    }
}

impl fmt::Display for LValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string(None))
    }
}

impl From<()> for LValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for LValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($type:ty),+ $(,)?) => {
        $(
            impl From<$type> for LValue {
                fn from(value: $type) -> Self {
                    Self::Int(value as i64)
                }
            }
        )+
    };
}

macro_rules! impl_from_float {
    ($($type:ty),+ $(,)?) => {
        $(
            impl From<$type> for LValue {
                fn from(value: $type) -> Self {
                    Self::Float(value as f64)
                }
            }
        )+
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);
impl_from_float!(f32, f64);

impl From<&str> for LValue {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for LValue {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl From<LString> for LValue {
    fn from(value: LString) -> Self {
        Self::Str(value)
    }
}

impl From<LRange> for LValue {
    fn from(value: LRange) -> Self {
        Self::Range(value)
    }
}

impl From<LTuple> for LValue {
    fn from(value: LTuple) -> Self {
        Self::Tuple(value)
    }
}

impl From<LList> for LValue {
    fn from(value: LList) -> Self {
        Self::List(value)
    }
}

impl From<LMap> for LValue {
    fn from(value: LMap) -> Self {
        Self::Map(value)
    }
}

impl From<LFunction> for LValue {
    fn from(value: LFunction) -> Self {
        Self::Function(value)
    }
}

impl From<LNativeFunction> for LValue {
    fn from(value: LNativeFunction) -> Self {
        Self::NativeFunction(value)
    }
}

impl From<LTagged> for LValue {
    fn from(value: LTagged) -> Self {
        Self::Tagged(value.into())
    }
}

impl From<LIterator> for LValue {
    fn from(value: LIterator) -> Self {
        Self::Iterator(value)
    }
}

impl<T> From<Option<T>> for LValue
where
    T: Into<LValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => LValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_mem_size() {
        // Ranges are stored inline, which puts LValue at 32 bytes
        assert!(size_of::<LString>() <= 24);
        assert!(size_of::<LList>() <= 16);
        assert!(size_of::<LMap>() <= 16);
        assert!(size_of::<LValue>() <= 32);
    }

    #[test]
    fn cross_variant_number_equality() {
        assert!(LValue::Int(5).value_eq(&LValue::Float(5.0)));
        assert!(LValue::Float(5.0).value_eq(&LValue::Int(5)));
        assert!(!LValue::Int(5).value_eq(&LValue::Float(5.5)));
    }

    #[test]
    fn equal_values_hash_equally() {
        assert_eq!(
            LValue::Int(5).value_hash(),
            LValue::Float(5.0).value_hash()
        );
        assert_eq!(LValue::Int(0).value_hash(), LValue::Float(-0.0).value_hash());

        let a = LList::from_slice(&[LValue::from(1), LValue::from("x")]);
        let b = LList::from_slice(&[LValue::from(1), LValue::from("x")]);
        assert!(LValue::List(a.clone()).value_eq(&LValue::List(b.clone())));
        assert_eq!(
            LValue::List(a).value_hash(),
            LValue::List(b).value_hash()
        );
    }

    #[test]
    fn functions_never_equal_natives() {
        let module = Ptr::from(crate::Module::new("test"));
        let f = LValue::Function(LFunction::new(module, 0, 0, LList::default()));
        let n = LValue::NativeFunction(LNativeFunction::new(0, |_| Ok(LValue::Null)));
        assert!(!f.value_eq(&n));
        assert!(!n.value_eq(&f));
    }
}
