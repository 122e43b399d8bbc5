// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::fmt;
use std::marker::PhantomData;

use crate::arraytraits::ARRAY_FORMAT_VERSION;
use crate::Array;

/// Verifies that the version of the deserialized array matches the current
/// `ARRAY_FORMAT_VERSION`.
fn verify_version<E>(v: u8) -> Result<(), E>
where E: de::Error {
    if v != ARRAY_FORMAT_VERSION {
        let err_msg = format!("unknown array version: {}", v);
        Err(de::Error::custom(err_msg))
    } else {
        Ok(())
    }
}

/// **Requires crate feature `"serde"`**
///
/// The elements are written in column-major logical order, whatever the
/// layout of the array.
impl<A> Serialize for Array<A>
where A: Serialize
{
    fn serialize<Se>(&self, serializer: Se) -> Result<Se::Ok, Se::Error>
    where Se: Serializer {
        let mut state = serializer.serialize_struct("Array", 3)?;
        state.serialize_field("v", &ARRAY_FORMAT_VERSION)?;
        state.serialize_field("shape", self.shape())?;
        state.serialize_field("data", &Sequence(self))?;
        state.end()
    }
}

// private wrapper serializing the elements
struct Sequence<'a, A>(&'a Array<A>);

impl<A> Serialize for Sequence<'_, A>
where A: Serialize
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        let array = self.0;
        let data = array.data();
        let mut seq = serializer.serialize_seq(Some(array.size()))?;
        for p in array.positions() {
            seq.serialize_element(&data[p])?;
        }
        seq.end()
    }
}

struct ArrayVisitor<A> {
    _marker: PhantomData<A>,
}

enum ArrayField {
    Version,
    Shape,
    Data,
}

impl<A> ArrayVisitor<A> {
    pub fn new() -> Self {
        ArrayVisitor { _marker: PhantomData }
    }
}

static ARRAY_FIELDS: &[&str] = &["v", "shape", "data"];

/// **Requires crate feature `"serde"`**
///
/// Always produces a root array.
impl<'de, A> Deserialize<'de> for Array<A>
where A: Deserialize<'de>
{
    fn deserialize<D>(deserializer: D) -> Result<Array<A>, D::Error>
    where D: Deserializer<'de> {
        deserializer.deserialize_struct("Array", ARRAY_FIELDS, ArrayVisitor::new())
    }
}

impl<'de> Deserialize<'de> for ArrayField {
    fn deserialize<D>(deserializer: D) -> Result<ArrayField, D::Error>
    where D: Deserializer<'de> {
        struct ArrayFieldVisitor;

        impl Visitor<'_> for ArrayFieldVisitor {
            type Value = ArrayField;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(r#""v", "shape", or "data""#)
            }

            fn visit_str<E>(self, value: &str) -> Result<ArrayField, E>
            where E: de::Error {
                match value {
                    "v" => Ok(ArrayField::Version),
                    "shape" => Ok(ArrayField::Shape),
                    "data" => Ok(ArrayField::Data),
                    other => Err(de::Error::unknown_field(other, ARRAY_FIELDS)),
                }
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<ArrayField, E>
            where E: de::Error {
                match value {
                    b"v" => Ok(ArrayField::Version),
                    b"shape" => Ok(ArrayField::Shape),
                    b"data" => Ok(ArrayField::Data),
                    other => Err(de::Error::unknown_field(&String::from_utf8_lossy(other), ARRAY_FIELDS)),
                }
            }
        }

        deserializer.deserialize_identifier(ArrayFieldVisitor)
    }
}

fn build<A, E>(shape: Vec<usize>, data: Vec<A>) -> Result<Array<A>, E>
where E: de::Error {
    Array::from_shape_vec(&shape, data).map_err(|_| de::Error::custom("data and shape must match in size"))
}

impl<'de, A> Visitor<'de> for ArrayVisitor<A>
where A: Deserialize<'de>
{
    type Value = Array<A>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("ndbackend representation")
    }

    fn visit_seq<V>(self, mut visitor: V) -> Result<Array<A>, V::Error>
    where V: SeqAccess<'de> {
        let v: u8 = match visitor.next_element()? {
            Some(value) => value,
            None => {
                return Err(de::Error::invalid_length(0, &self));
            }
        };

        verify_version::<V::Error>(v)?;

        let shape: Vec<usize> = match visitor.next_element()? {
            Some(value) => value,
            None => {
                return Err(de::Error::invalid_length(1, &self));
            }
        };

        let data: Vec<A> = match visitor.next_element()? {
            Some(value) => value,
            None => {
                return Err(de::Error::invalid_length(2, &self));
            }
        };

        build(shape, data)
    }

    fn visit_map<V>(self, mut visitor: V) -> Result<Array<A>, V::Error>
    where V: MapAccess<'de> {
        let mut v: Option<u8> = None;
        let mut data: Option<Vec<A>> = None;
        let mut shape: Option<Vec<usize>> = None;

        while let Some(key) = visitor.next_key()? {
            match key {
                ArrayField::Version => {
                    let val = visitor.next_value()?;
                    verify_version::<V::Error>(val)?;
                    v = Some(val);
                }
                ArrayField::Data => {
                    data = Some(visitor.next_value()?);
                }
                ArrayField::Shape => {
                    shape = Some(visitor.next_value()?);
                }
            }
        }

        if v.is_none() {
            return Err(de::Error::missing_field("v"));
        }
        let data = data.ok_or_else(|| <V::Error as de::Error>::missing_field("data"))?;
        let shape = shape.ok_or_else(|| <V::Error as de::Error>::missing_field("shape"))?;

        build(shape, data)
    }
}

#[cfg(test)]
mod tests {
    use crate::{DoubleArray, IntArray};

    #[test]
    fn view_serializes_logical_order() {
        let a = DoubleArray::from_rows(&[[1., 2.], [3., 4.]]).unwrap();
        let json = serde_json::to_string(&a.transpose()).unwrap();
        assert_eq!(json, r#"{"v":1,"shape":[2,2],"data":[1.0,2.0,3.0,4.0]}"#);
    }

    #[test]
    fn deserialize_root() {
        let a: IntArray = serde_json::from_str(r#"{"v":1,"shape":[3,1],"data":[1,2,3]}"#).unwrap();
        assert_eq!(a.shape(), &[3, 1]);
        assert!(!a.is_view());
        assert_eq!(a.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn deserialize_errors() {
        let bad_size = serde_json::from_str::<IntArray>(r#"{"v":1,"shape":[2],"data":[1,2,3]}"#);
        assert!(bad_size.is_err());
        let bad_version = serde_json::from_str::<IntArray>(r#"{"v":2,"shape":[1],"data":[1]}"#);
        assert!(bad_version.is_err());
        let missing = serde_json::from_str::<IntArray>(r#"{"shape":[1],"data":[1]}"#);
        assert!(missing.is_err());
    }
}
