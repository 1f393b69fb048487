// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Fixed-width big endian integers

use crate::{Deserializer, SerializeError, Serializer};
use nom::bytes::complete::take;
use nom::error::{context, ContextError, ErrorKind, ParseError};
use nom::IResult;
use std::ops::{Bound, RangeBounds};

macro_rules! gen_fixed_int {
    ($($type:ident, $serializer:ident, $deserializer:ident, $len:expr);*) => {
        $(
            #[doc = concat!("Serializer for `", stringify!($type), "` as ", stringify!($len), " big endian bytes")]
            #[derive(Clone, Copy, Debug, Default)]
            pub struct $serializer;

            impl $serializer {
                #[doc = concat!("Creates a new `", stringify!($serializer), "`")]
                pub const fn new() -> Self {
                    Self
                }
            }

            impl Serializer<$type> for $serializer {
                fn serialize(&self, value: &$type, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
                    buffer.extend_from_slice(&value.to_be_bytes());
                    Ok(())
                }
            }

            #[doc = concat!("Deserializer for big endian `", stringify!($type), "` checking that the value lies within bounds")]
            #[derive(Clone, Copy, Debug)]
            pub struct $deserializer {
                range: (Bound<$type>, Bound<$type>),
            }

            impl $deserializer {
                #[doc = concat!("Creates a new `", stringify!($deserializer), "`")]
                ///
                /// # Arguments
                /// * `min`: lower bound of the accepted values
                /// * `max`: upper bound of the accepted values
                pub const fn new(min: Bound<$type>, max: Bound<$type>) -> Self {
                    Self { range: (min, max) }
                }
            }

            impl Default for $deserializer {
                fn default() -> Self {
                    Self::new(Bound::Unbounded, Bound::Unbounded)
                }
            }

            impl Deserializer<$type> for $deserializer {
                fn deserialize<'a, E: ParseError<&'a [u8]> + ContextError<&'a [u8]>>(
                    &self,
                    buffer: &'a [u8],
                ) -> IResult<&'a [u8], $type, E> {
                    context(
                        concat!("Failed ", stringify!($type), " deserialization"),
                        |input: &'a [u8]| {
                            let (rest, raw) = take::<usize, &'a [u8], E>($len)(input)?;
                            let mut bytes = [0u8; $len];
                            bytes.copy_from_slice(raw);
                            let value = <$type>::from_be_bytes(bytes);
                            if !self.range.contains(&value) {
                                return Err(nom::Err::Error(E::from_error_kind(
                                    input,
                                    ErrorKind::Verify,
                                )));
                            }
                            Ok((rest, value))
                        },
                    )(buffer)
                }
            }
        )*
    };
}

gen_fixed_int!(
    u8, U8Serializer, U8Deserializer, 1;
    u16, U16Serializer, U16Deserializer, 2;
    u32, U32Serializer, U32Deserializer, 4;
    u64, U64Serializer, U64Deserializer, 8;
    i64, I64Serializer, I64Deserializer, 8
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeserializeError;
    use paste::paste;
    use serial_test::serial;
    use std::ops::Bound::{Excluded, Included};

    macro_rules! gen_bound_tests {
        ($($type:ident, $name:ident);*) => {
            $(
                paste! {
                    #[test]
                    #[serial]
                    fn [<$name _max_value>]() {
                        let mut buffer = Vec::new();
                        [<$name:upper Serializer>]::new().serialize(&$type::MAX, &mut buffer).unwrap();
                        assert_eq!(buffer.len(), std::mem::size_of::<$type>());
                        let (rest, value) = [<$name:upper Deserializer>]::default()
                            .deserialize::<DeserializeError>(&buffer)
                            .unwrap();
                        assert!(rest.is_empty());
                        assert_eq!(value, $type::MAX);
                    }

                    #[test]
                    #[serial]
                    fn [<$name _truncated>]() {
                        let mut buffer = Vec::new();
                        [<$name:upper Serializer>]::new().serialize(&$type::MAX, &mut buffer).unwrap();
                        buffer.pop();
                        [<$name:upper Deserializer>]::default()
                            .deserialize::<DeserializeError>(&buffer)
                            .expect_err("truncated buffer must be rejected");
                    }
                }
            )*
        };
    }

    gen_bound_tests!(u8, u8; u16, u16; u32, u32; u64, u64; i64, i64);

    #[test]
    #[serial]
    fn u64_is_big_endian() {
        let mut buffer = Vec::new();
        U64Serializer::new().serialize(&0x0102_0304_0506_0708, &mut buffer).unwrap();
        assert_eq!(buffer, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    #[serial]
    fn out_of_bounds_values_are_rejected() {
        let mut buffer = Vec::new();
        U16Serializer::new().serialize(&10, &mut buffer).unwrap();
        U16Deserializer::new(Included(0), Excluded(10))
            .deserialize::<DeserializeError>(&buffer)
            .expect_err("10 is excluded");
        let (_, value) = U16Deserializer::new(Included(0), Included(10))
            .deserialize::<DeserializeError>(&buffer)
            .unwrap();
        assert_eq!(value, 10);
    }

    #[test]
    #[serial]
    fn negative_i64() {
        let mut buffer = Vec::new();
        I64Serializer::new().serialize(&-1, &mut buffer).unwrap();
        assert_eq!(buffer, vec![0xff; 8]);
        let (_, value) = I64Deserializer::default()
            .deserialize::<DeserializeError>(&buffer)
            .unwrap();
        assert_eq!(value, -1);
    }
}
