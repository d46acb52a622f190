use serde::Serialize;

use crate::Tag;

/// Value is a complete decoded NBT payload. It owns its data. Compounds and
/// Lists contain their children in the order they appeared in the input.
///
/// ```
/// # use nbtree::{Tag, Value};
/// # use nbtree::error::Result;
/// #
/// # fn main() -> Result<()> {
/// #   let buf = [10, 0, 0, 3, 0, 11, 68, 97, 116, 97, 86, 101, 114, 115, 105, 111, 110, 0, 0, 0, 7, 0];
///     let root = nbtree::from_bytes(&buf)?;
///     match root.value.get("DataVersion") {
///         Some(Value::Int(ver)) => println!("Version: {}", ver),
///         _ => {}
///     }
///     assert_eq!(root.value.tag(), Tag::Compound);
/// #   Ok(())
/// # }
/// ```
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Value {
    /// Placeholder element of a list whose element tag is End.
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    /// Element tag and elements. The tag is kept so empty lists still know
    /// what they would contain.
    List(Tag, Vec<Value>),
    Compound(Vec<NamedTag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// A value along with its name. Children of a compound and the root of a file
/// are named, elements of a list are not.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(any(test, feature = "arbitrary1"), derive(arbitrary::Arbitrary))]
pub struct NamedTag {
    pub name: String,
    pub value: Value,
}

impl NamedTag {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Value {
    /// The NBT tag this value would be written with.
    pub fn tag(&self) -> Tag {
        match self {
            Value::End => Tag::End,
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::String(_) => Tag::String,
            Value::List(_, _) => Tag::List,
            Value::Compound(_) => Tag::Compound,
            Value::IntArray(_) => Tag::IntArray,
            Value::LongArray(_) => Tag::LongArray,
        }
    }

    /// Look up the first child with the given name, if this is a compound.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_compound()?
            .iter()
            .find(|child| child.name == name)
            .map(|child| &child.value)
    }

    pub fn as_compound(&self) -> Option<&[NamedTag]> {
        match self {
            Value::Compound(children) => Some(children),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(_, elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            Value::Float(v) => Some(v as i64),
            Value::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
}

// Dropping a tree recursively would overflow the stack on inputs the decoder
// handles fine, so children are moved out onto a heap stack and dropped one at
// a time.
impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_children(self, &mut pending);

        while let Some(mut value) = pending.pop() {
            take_children(&mut value, &mut pending);
        }
    }
}

fn take_children(value: &mut Value, pending: &mut Vec<Value>) {
    match value {
        Value::List(_, elements) => pending.append(elements),
        Value::Compound(children) => {
            pending.extend(std::mem::take(children).into_iter().map(|c| c.value))
        }
        _ => {}
    }
}

#[cfg(any(test, feature = "arbitrary1"))]
fn het_list<'a, T, F>(u: &mut arbitrary::Unstructured<'a>, f: F) -> arbitrary::Result<Vec<Value>>
where
    F: FnMut(T) -> Value,
    T: arbitrary::Arbitrary<'a>,
{
    Ok(u.arbitrary_iter::<T>()?
        .collect::<arbitrary::Result<Vec<_>>>()?
        .into_iter()
        .map(f)
        .collect())
}

#[cfg(any(test, feature = "arbitrary1"))]
fn arb_list(u: &mut arbitrary::Unstructured) -> arbitrary::Result<Value> {
    use Value::*;

    let tag = u.arbitrary::<Tag>()?;
    let elements = match tag {
        Tag::End => vec![End; u.arbitrary_len::<u8>()?],
        Tag::Byte => het_list(u, Byte)?,
        Tag::Short => het_list(u, Short)?,
        Tag::Int => het_list(u, Int)?,
        Tag::Long => het_list(u, Long)?,
        Tag::Float => het_list(u, Float)?,
        Tag::Double => het_list(u, Double)?,
        Tag::ByteArray => het_list(u, ByteArray)?,
        Tag::String => het_list(u, String)?,
        Tag::List => {
            // make a list of lists
            let len = u.arbitrary_len::<Value>()?;
            let mut v = vec![];
            for _ in 0..len {
                v.push(arb_list(u)?);
            }
            v
        }
        Tag::Compound => het_list(u, Compound)?,
        Tag::IntArray => het_list(u, IntArray)?,
        Tag::LongArray => het_list(u, LongArray)?,
    };

    Ok(List(tag, elements))
}

#[cfg(any(test, feature = "arbitrary1"))]
impl<'a> arbitrary::Arbitrary<'a> for Value {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        use Value::*;

        Ok(match u.arbitrary::<Tag>()? {
            // End only exists as a list element, make an empty compound instead.
            Tag::End => Compound(Vec::new()),
            Tag::Byte => Byte(u.arbitrary()?),
            Tag::Short => Short(u.arbitrary()?),
            Tag::Int => Int(u.arbitrary()?),
            Tag::Long => Long(u.arbitrary()?),
            Tag::Float => Float(u.arbitrary()?),
            Tag::Double => Double(u.arbitrary()?),
            Tag::ByteArray => ByteArray(u.arbitrary()?),
            Tag::String => String(u.arbitrary()?),
            Tag::Compound => Compound(u.arbitrary()?),
            Tag::IntArray => IntArray(u.arbitrary()?),
            Tag::LongArray => LongArray(u.arbitrary()?),

            // Lists need to all be the same type.
            Tag::List => arb_list(u)?,
        })
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(u8, Byte, as i8);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(Vec<NamedTag>, Compound);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str().map_or(false, |s| s == other)
    }
}

impl<'a> PartialEq<&'a str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str().map_or(false, |s| s == *other)
    }
}

macro_rules! partialeq_integral {
    ($($ty:ty)*) => {
        $(
            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    match self {
                        Value::Float(_) | Value::Double(_) => false,
                        _ => self.as_i64().map_or(false, |i| i == *other as i64),
                    }
                }
            }
        )*
    }
}

partialeq_integral! { i8 i16 i32 i64 }
