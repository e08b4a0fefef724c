//! Typed accessors
//!
//! Fixed-width little-endian wrappers over the byte API. Getters return the
//! caller's default on any failure, including a stored length that does not
//! match the type width.

use crate::error::Result;
use crate::session::Preferences;

macro_rules! number_accessors {
    ($($ty:ty => $put:ident, $get:ident;)*) => {
        impl Preferences {
            $(
                #[doc = concat!("Store a `", stringify!($ty), "`")]
                pub fn $put(&self, key: &str, value: $ty) -> Result<usize> {
                    self.put_bytes(key, &value.to_le_bytes())
                }

                #[doc = concat!("Read a `", stringify!($ty), "`, or `default`")]
                pub fn $get(&self, key: &str, default: $ty) -> $ty {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    match self.get_bytes(key, &mut buf) {
                        Ok(n) if n == buf.len() => <$ty>::from_le_bytes(buf),
                        _ => default,
                    }
                }
            )*
        }
    };
}

number_accessors! {
    i8 => put_i8, get_i8;
    u8 => put_u8, get_u8;
    i16 => put_i16, get_i16;
    u16 => put_u16, get_u16;
    i32 => put_i32, get_i32;
    u32 => put_u32, get_u32;
    i64 => put_i64, get_i64;
    u64 => put_u64, get_u64;
    f32 => put_f32, get_f32;
    f64 => put_f64, get_f64;
}

impl Preferences {
    /// Store a `bool` as one byte
    pub fn put_bool(&self, key: &str, value: bool) -> Result<usize> {
        self.put_u8(key, u8::from(value))
    }

    /// Read a `bool`, or `default`
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_u8(key, u8::from(default)) == 1
    }

    /// Store the UTF-8 bytes of `value` (no terminator)
    pub fn put_string(&self, key: &str, value: &str) -> Result<usize> {
        self.put_bytes(key, value.as_bytes())
    }

    /// Read a string, or `default` if missing or not UTF-8
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get_bytes_vec(key)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_else(|| default.to_string())
    }
}
