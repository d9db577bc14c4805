/// Uniform variables: typed values bound to GPU program parameters.
///
/// A `UniformVariable` is a tagged union over every scalar, vector,
/// matrix and array type a program parameter can take. Equality compares
/// the tag first, then the value (exact, no epsilon), which is what the
/// renderer's uniform cache diffs against.

use std::borrow::Cow;
use std::fmt;
use glam::{IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};

/// Payload types storable in a `UniformVariable`
///
/// Implemented for every payload type of the union. Used by
/// `UniformVariable::get` to check the tag before handing out a reference.
pub trait UniformValue: Sized {
    /// Tag matching this payload type
    const TYPE: UniformType;

    /// Borrow the payload if `variable` carries this type
    fn extract(variable: &UniformVariable) -> Option<&Self>;
}

macro_rules! define_uniform_variable {
    ($( $(#[$doc:meta])* $variant:ident($ty:ty) ),* $(,)?) => {
        /// Tagged uniform value
        #[derive(Debug, Clone, PartialEq, Default)]
        pub enum UniformVariable {
            /// No value (default-constructed)
            #[default]
            Invalid,
            $( $(#[$doc])* $variant($ty), )*
        }

        /// Tag of a `UniformVariable`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum UniformType {
            Invalid,
            $( $variant, )*
        }

        impl UniformVariable {
            /// Tag of the stored value
            pub fn uniform_type(&self) -> UniformType {
                match self {
                    UniformVariable::Invalid => UniformType::Invalid,
                    $( UniformVariable::$variant(_) => UniformType::$variant, )*
                }
            }
        }

        $(
            impl From<$ty> for UniformVariable {
                fn from(value: $ty) -> Self {
                    UniformVariable::$variant(value)
                }
            }

            impl UniformValue for $ty {
                const TYPE: UniformType = UniformType::$variant;

                fn extract(variable: &UniformVariable) -> Option<&Self> {
                    match variable {
                        UniformVariable::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

define_uniform_variable! {
    Float(f32),
    Int(i32),
    UInt(u32),
    Bool(bool),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    IVec2(IVec2),
    IVec3(IVec3),
    IVec4(IVec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
    /// `float name[N]`
    FloatArray(Vec<f32>),
    /// `int name[N]`
    IntArray(Vec<i32>),
    Vec2Array(Vec<Vec2>),
    Vec3Array(Vec<Vec3>),
    Vec4Array(Vec<Vec4>),
    /// `mat4 name[N]` (skinning palettes)
    Mat4Array(Vec<Mat4>),
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl UniformVariable {
    /// Borrow the stored value as `T`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUniformType` if the variable holds another type.
    pub fn get<T: UniformValue>(&self) -> Result<&T> {
        T::extract(self).ok_or(Error::InvalidUniformType {
            expected: T::TYPE,
            found: self.uniform_type(),
        })
    }

    /// Check whether the variable stores a value of type `T`
    pub fn is_of_type<T: UniformValue>(&self) -> bool {
        T::extract(self).is_some()
    }

    /// True for `Invalid` and for empty arrays
    pub fn is_empty(&self) -> bool {
        match self {
            UniformVariable::Invalid => true,
            UniformVariable::FloatArray(v) => v.is_empty(),
            UniformVariable::IntArray(v) => v.is_empty(),
            UniformVariable::Vec2Array(v) => v.is_empty(),
            UniformVariable::Vec3Array(v) => v.is_empty(),
            UniformVariable::Vec4Array(v) => v.is_empty(),
            UniformVariable::Mat4Array(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Tightly packed bytes of the value, ready for upload
    ///
    /// Booleans are widened to a 32-bit integer (GLSL `bool` layout).
    /// `Invalid` yields an empty slice.
    pub fn as_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            UniformVariable::Invalid => Cow::Borrowed(&[]),
            UniformVariable::Float(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::Int(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::UInt(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::Bool(v) => Cow::Owned(u32::from(*v).to_ne_bytes().to_vec()),
            UniformVariable::Vec2(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::Vec3(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::Vec4(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::IVec2(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::IVec3(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::IVec4(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::Mat2(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::Mat3(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::Mat4(v) => Cow::Borrowed(bytemuck::bytes_of(v)),
            UniformVariable::FloatArray(v) => Cow::Borrowed(bytemuck::cast_slice(v)),
            UniformVariable::IntArray(v) => Cow::Borrowed(bytemuck::cast_slice(v)),
            UniformVariable::Vec2Array(v) => Cow::Borrowed(bytemuck::cast_slice(v)),
            UniformVariable::Vec3Array(v) => Cow::Borrowed(bytemuck::cast_slice(v)),
            UniformVariable::Vec4Array(v) => Cow::Borrowed(bytemuck::cast_slice(v)),
            UniformVariable::Mat4Array(v) => Cow::Borrowed(bytemuck::cast_slice(v)),
        }
    }
}

fn write_array<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    write!(f, "]")
}

impl fmt::Display for UniformVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ", self.uniform_type())?;
        match self {
            UniformVariable::Invalid => write!(f, "<invalid>"),
            UniformVariable::Float(v) => write!(f, "{}", v),
            UniformVariable::Int(v) => write!(f, "{}", v),
            UniformVariable::UInt(v) => write!(f, "{}", v),
            UniformVariable::Bool(v) => write!(f, "{}", v),
            UniformVariable::Vec2(v) => write!(f, "{}", v),
            UniformVariable::Vec3(v) => write!(f, "{}", v),
            UniformVariable::Vec4(v) => write!(f, "{}", v),
            UniformVariable::IVec2(v) => write!(f, "{}", v),
            UniformVariable::IVec3(v) => write!(f, "{}", v),
            UniformVariable::IVec4(v) => write!(f, "{}", v),
            UniformVariable::Mat2(v) => write!(f, "{}", v),
            UniformVariable::Mat3(v) => write!(f, "{}", v),
            UniformVariable::Mat4(v) => write!(f, "{}", v),
            UniformVariable::FloatArray(v) => write_array(f, v),
            UniformVariable::IntArray(v) => write_array(f, v),
            UniformVariable::Vec2Array(v) => write_array(f, v),
            UniformVariable::Vec3Array(v) => write_array(f, v),
            UniformVariable::Vec4Array(v) => write_array(f, v),
            UniformVariable::Mat4Array(v) => write_array(f, v),
        }
    }
}

// ===== UNIFORM STRUCTS =====

/// A struct mirroring a `struct` declared in a GPU program
///
/// The struct is flattened into one uniform per member, named
/// `name.Member` for a scalar struct or `name[i].Member` for an element
/// of a struct array.
pub trait UniformStruct {
    /// `(member name, value)` pairs in declaration order
    fn uniform_members(&self) -> Vec<(&'static str, UniformVariable)>;

    /// Flatten into `map` under `name` (and `index` for struct arrays)
    fn to_uniform_map(
        &self,
        name: &str,
        index: Option<usize>,
        map: &mut FxHashMap<String, UniformVariable>,
    ) {
        for (member, value) in self.uniform_members() {
            let key = match index {
                Some(i) => format!("{}[{}].{}", name, i, member),
                None => format!("{}.{}", name, member),
            };
            map.insert(key, value);
        }
    }
}

#[cfg(test)]
#[path = "uniform_variable_tests.rs"]
mod tests;
