use std::any;

use super::{Row, Value};
use crate::Error;

/// Types that can be decoded from a single column value.
pub trait FromValue: Sized {
    /// Decodes `value`, or hands it back if it has the wrong kind or range.
    fn from_value(value: Value) -> Result<Self, Value>;
}

/// Types that can be decoded from a whole row.
///
/// Implemented for the [`FromValue`] scalars, which expect rows of exactly one
/// column, for tuples of up to 8 [`FromValue`] fields, which expect exactly as many
/// columns in the same order, and for [`Row`] itself.
pub trait FromRow: Sized {
    /// Decodes `row` into a record.
    fn from_row(row: Row) -> Result<Self, Error>;
}

pub(crate) fn decode<T: FromValue>(value: Value, column: usize) -> Result<T, Error> {
    T::from_value(value).map_err(|value| Error::Decode {
        column,
        expected: any::type_name::<T>(),
        found: value.kind(),
    })
}

fn columns<const N: usize>(row: Row) -> Result<[Value; N], Error> {
    <[Value; N]>::try_from(row).map_err(|row| Error::Shape {
        expected: N,
        found: row.len(),
    })
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            value => Err(value),
        }
    }
}

macro_rules! int_from_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::Int(n) => <$ty>::try_from(n).map_err(|_| value),
                        value => Err(value),
                    }
                }
            }
        )*
    };
}

int_from_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(n) => Ok(n as f64),
            value => Err(value),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, Value> {
        f64::from_value(value).map(|x| x as f32)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Text(s) => Ok(s),
            value => Err(value),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Blob(bytes) => Ok(bytes),
            Value::Text(s) => Ok(s.into_bytes()),
            value => Err(value),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl FromRow for Row {
    fn from_row(row: Row) -> Result<Self, Error> {
        Ok(row)
    }
}

macro_rules! scalar_from_row {
    ($($ty:ty),*) => {
        $(
            impl FromRow for $ty {
                fn from_row(row: Row) -> Result<Self, Error> {
                    let [value] = columns(row)?;
                    decode(value, 0)
                }
            }
        )*
    };
}

scalar_from_row!(
    Value, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, Vec<u8>
);

impl<T: FromValue> FromRow for Option<T> {
    fn from_row(row: Row) -> Result<Self, Error> {
        let [value] = columns(row)?;
        decode(value, 0)
    }
}

macro_rules! tuple_from_row {
    ($len:literal => $($ty:ident $var:ident $idx:literal),+) => {
        impl<$($ty: FromValue),+> FromRow for ($($ty,)+) {
            fn from_row(row: Row) -> Result<Self, Error> {
                let [$($var),+] = columns::<$len>(row)?;
                Ok(($(decode::<$ty>($var, $idx)?,)+))
            }
        }
    };
}

tuple_from_row!(1 => A a 0);
tuple_from_row!(2 => A a 0, B b 1);
tuple_from_row!(3 => A a 0, B b 1, C c 2);
tuple_from_row!(4 => A a 0, B b 1, C c 2, D d 3);
tuple_from_row!(5 => A a 0, B b 1, C c 2, D d 3, E e 4);
tuple_from_row!(6 => A a 0, B b 1, C c 2, D d 3, E e 4, F f 5);
tuple_from_row!(7 => A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6);
tuple_from_row!(8 => A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6, H h 7);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(u8::from_value(Value::Int(255)), Ok(255));
        assert_eq!(u8::from_value(Value::Int(256)), Err(Value::Int(256)));
        assert_eq!(u64::from_value(Value::Int(-1)), Err(Value::Int(-1)));
        assert_eq!(i64::from_value(Value::Float(1.0)), Err(Value::Float(1.0)));
    }

    #[test]
    fn widening_conversions() {
        assert_eq!(f64::from_value(Value::Int(2)), Ok(2.0));
        assert_eq!(
            Vec::<u8>::from_value(Value::Text("hi".into())),
            Ok(b"hi".to_vec())
        );
        assert_eq!(Option::<i32>::from_value(Value::Null), Ok(None));
        assert_eq!(Option::<i32>::from_value(Value::Int(7)), Ok(Some(7)));
    }

    #[test]
    fn scalar_rows_need_one_column() {
        assert_eq!(i32::from_row(vec![Value::Int(3)]).unwrap(), 3);
        assert!(matches!(
            i32::from_row(vec![Value::Int(3), Value::Int(4)]),
            Err(Error::Shape { expected: 1, found: 2 })
        ));
        assert!(matches!(
            String::from_row(vec![]),
            Err(Error::Shape { expected: 1, found: 0 })
        ));
    }

    #[test]
    fn tuple_rows() {
        let row = vec![Value::Int(1), Value::Text("x".into()), Value::Null];
        let (id, name, score) = <(u32, String, Option<f64>)>::from_row(row).unwrap();
        assert_eq!((id, name.as_str(), score), (1, "x", None));

        let err = <(u32, bool)>::from_row(vec![Value::Int(1), Value::Int(0)]).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode { column: 1, expected: "bool", found: "integer" }
        ));
        assert_eq!(
            err.to_string(),
            "decoding column 1: expected bool, found integer"
        );
    }
}
