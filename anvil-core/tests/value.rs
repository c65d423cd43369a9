#[cfg(test)]
mod tests {
    use anvil_core::{AsValue, Value};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use time::macros::date;
    use uuid::Uuid;

    #[test]
    fn value_none() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert!(Value::Varchar(None).is_null());
        assert_eq!(Value::Int32(None), Value::Int32(None));
        assert_ne!(Value::Int32(None), Value::Int64(None));
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Boolean(None));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert!(bool::try_from_value(val).unwrap());
        assert!(bool::try_from_value(Value::Int8(Some(1))).is_err());
    }

    #[test]
    fn value_integers() {
        let val: Value = 127_i8.into();
        assert_eq!(val, Value::Int8(Some(127)));
        assert_eq!(i64::try_from_value(val).unwrap(), 127);
        assert_eq!(i8::try_from_value(Value::UInt8(Some(99))).unwrap(), 99);
        assert!(i8::try_from_value(Value::Int32(Some(300))).is_err());
        assert!(u32::try_from_value(Value::Int64(Some(-1))).is_err());
        assert_eq!(
            i64::try_from_value(Value::Decimal(Some(Decimal::from(42)))).unwrap(),
            42
        );
        assert!(
            i64::try_from_value(Value::Decimal(Some(Decimal::from_str("4.2").unwrap()))).is_err()
        );
        assert_eq!(i32::try_from_value(Value::Varchar(Some(" 7 ".into()))).unwrap(), 7);
        assert!(i32::try_from_value(Value::Float64(Some(0.1))).is_err());
    }

    #[test]
    fn value_options() {
        let val: Value = Option::<i32>::None.into();
        assert_eq!(val, Value::Int32(None));
        let val: Value = Some("text").into();
        assert_eq!(val, Value::Varchar(Some("text".into())));
        assert_eq!(Option::<i64>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::try_from_value(Value::Varchar(Some("a".into()))).unwrap(),
            Some("a".to_string())
        );
    }

    #[test]
    fn value_lists() {
        let val: Value = vec![1_u16, 2, 3].into();
        assert_eq!(
            val.as_list(),
            Some(
                [
                    Value::UInt16(Some(1)),
                    Value::UInt16(Some(2)),
                    Value::UInt16(Some(3))
                ]
                .as_slice()
            )
        );
        assert_eq!(Vec::<u16>::try_from_value(val).unwrap(), [1, 2, 3]);
        assert_eq!(Value::List(None).as_list(), None);
        assert!(Value::List(None).is_null());
    }

    #[test]
    fn value_others() {
        let day = date!(2025 - 01 - 31);
        assert_eq!(Value::from(day), Value::Date(Some(day)));
        let id = Uuid::nil();
        assert_eq!(Uuid::try_from_value(id.into()).unwrap(), id);
        assert!(String::try_from_value(Value::Int32(Some(1))).is_err());
        assert!(<&str>::try_from_value(Value::Varchar(Some("a".into()))).is_err());
    }
}
