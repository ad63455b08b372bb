use crate::error::DiceError;

/// A value that may be read as an integer.
///
/// Numeric types convert when they fit in an `i64` (floats are truncated
/// toward zero), strings convert when they hold an optionally signed run of
/// decimal digits, and JSON values convert according to what they contain
/// (`null` reads as zero). Everything else is rejected.
pub trait IntegerLike: std::fmt::Debug {
    fn to_integer(&self) -> Option<i64>;
}

macro_rules! impl_integer_like {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntegerLike for $ty {
                fn to_integer(&self) -> Option<i64> {
                    i64::try_from(*self).ok()
                }
            }
        )*
    };
}

impl_integer_like!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl IntegerLike for f64 {
    fn to_integer(&self) -> Option<i64> {
        if self.is_finite() && *self >= i64::MIN as f64 && *self <= i64::MAX as f64 {
            Some(self.trunc() as i64)
        } else {
            None
        }
    }
}

impl IntegerLike for f32 {
    fn to_integer(&self) -> Option<i64> {
        f64::from(*self).to_integer()
    }
}

impl IntegerLike for str {
    fn to_integer(&self) -> Option<i64> {
        self.trim().parse::<i64>().ok()
    }
}

impl IntegerLike for String {
    fn to_integer(&self) -> Option<i64> {
        self.as_str().to_integer()
    }
}

impl<T: IntegerLike + ?Sized> IntegerLike for &T {
    fn to_integer(&self) -> Option<i64> {
        (**self).to_integer()
    }
}

impl IntegerLike for serde_json::Value {
    fn to_integer(&self) -> Option<i64> {
        match self {
            serde_json::Value::Null => Some(0),
            serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64()?.to_integer()),
            serde_json::Value::String(s) => s.to_integer(),
            _ => None,
        }
    }
}

pub fn parse_integer_like<T: IntegerLike + ?Sized>(
    what: &'static str,
    value: &T,
) -> Result<i64, DiceError> {
    value.to_integer().ok_or_else(|| DiceError::NotAnInteger {
        what,
        value: format!("{value:?}"),
    })
}

pub fn parse_i32<T: IntegerLike + ?Sized>(what: &'static str, value: &T) -> Result<i32, DiceError> {
    let n = parse_integer_like(what, value)?;
    i32::try_from(n).map_err(|_| DiceError::OutOfRange { what, value: n })
}

pub fn parse_positive<T: IntegerLike + ?Sized>(
    what: &'static str,
    value: &T,
) -> Result<u32, DiceError> {
    let n = parse_integer_like(what, value)?;
    if n <= 0 {
        return Err(DiceError::NotPositive { what, value: n });
    }
    u32::try_from(n).map_err(|_| DiceError::OutOfRange { what, value: n })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_integers_and_numeric_strings() {
        assert_eq!(parse_integer_like("bonus", &5i32), Ok(5));
        assert_eq!(parse_integer_like("bonus", &7u64), Ok(7));
        assert_eq!(parse_integer_like("bonus", "-3"), Ok(-3));
        assert_eq!(parse_integer_like("bonus", &" 12 ".to_string()), Ok(12));
        assert_eq!(parse_integer_like("bonus", &2.9f64), Ok(2));
        assert_eq!(parse_integer_like("bonus", &serde_json::json!(null)), Ok(0));
        assert_eq!(parse_integer_like("bonus", &serde_json::json!("4")), Ok(4));
    }

    #[test]
    fn test_rejects_non_integers() {
        let err = parse_integer_like("bonus", "flump").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(parse_integer_like("bonus", &f64::NAN).is_err());
        assert!(parse_integer_like("bonus", &serde_json::json!(true)).is_err());
        assert!(parse_integer_like("bonus", &serde_json::json!([1])).is_err());
    }

    #[test]
    fn test_positive() {
        assert_eq!(parse_positive("size", "3"), Ok(3));
        assert_eq!(
            parse_positive("size", &0),
            Err(DiceError::NotPositive {
                what: "size",
                value: 0
            })
        );
        assert!(parse_positive("size", &-6).is_err());
        assert!(parse_positive("size", "eleventy-billion").is_err());
        assert!(matches!(
            parse_i32("bonus", &i64::MAX),
            Err(DiceError::OutOfRange { .. })
        ));
    }
}
