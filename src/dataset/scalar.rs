//! Scalar types a dataset can store.

use std::fmt;

/// Element type of a [`Dataset`](super::Dataset).
///
/// Values are held as `f64` but pass through this type on every write, so a
/// `U32` column truncates `2.7` to `2` exactly like the typed array it mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Boolean, stored as 0 or 1.
    Bool,
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 64-bit integer.
    U64,
    /// Single-precision float.
    F32,
    /// Double-precision float.
    F64,
}

impl ScalarType {
    /// Convert `value` to this type and back.
    ///
    /// Integer conversions truncate toward zero and saturate at the type's
    /// bounds; NaN becomes 0.
    #[inline]
    pub fn coerce(self, value: f64) -> f64 {
        match self {
            ScalarType::Bool => {
                if value != 0.0 && !value.is_nan() {
                    1.0
                } else {
                    0.0
                }
            }
            ScalarType::I8 => value as i8 as f64,
            ScalarType::U8 => value as u8 as f64,
            ScalarType::I16 => value as i16 as f64,
            ScalarType::U16 => value as u16 as f64,
            ScalarType::I32 => value as i32 as f64,
            ScalarType::U32 => value as u32 as f64,
            ScalarType::I64 => value as i64 as f64,
            ScalarType::U64 => value as u64 as f64,
            ScalarType::F32 => value as f32 as f64,
            ScalarType::F64 => value,
        }
    }

    /// Map a legacy VTK data type name (`unsigned_int`, `double`, ...).
    ///
    /// Returns `None` for types that cannot be held as numbers, such as
    /// `string`.
    pub fn from_vtk_name(name: &str) -> Option<ScalarType> {
        match name.to_ascii_lowercase().as_str() {
            "bit" => Some(ScalarType::Bool),
            "char" | "signed_char" => Some(ScalarType::I8),
            "unsigned_char" => Some(ScalarType::U8),
            "short" => Some(ScalarType::I16),
            "unsigned_short" => Some(ScalarType::U16),
            "int" => Some(ScalarType::I32),
            "unsigned_int" => Some(ScalarType::U32),
            "long" | "vtktypeint64" | "vtkidtype" => Some(ScalarType::I64),
            "unsigned_long" | "vtktypeuint64" => Some(ScalarType::U64),
            "float" => Some(ScalarType::F32),
            "double" => Some(ScalarType::F64),
            _ => None,
        }
    }

    /// Short lowercase name, as shown by `carpmesh info`.
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::I8 => "i8",
            ScalarType::U8 => "u8",
            ScalarType::I16 => "i16",
            ScalarType::U16 => "u16",
            ScalarType::I32 => "i32",
            ScalarType::U32 => "u32",
            ScalarType::I64 => "i64",
            ScalarType::U64 => "u64",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
