//! Discriminator-driven decoding of polymorphic results.
//!
//! Each polymorphic concept (authorization state, option value, ...) is a
//! closed enum whose variants are selected by the `@type` found in the
//! generic view of a message; the raw bytes are then strictly decoded into
//! the variant's shape. Tags outside the enum are an error, never a default.
//!
//! Categories are declared with [`polymorphic!`](crate::polymorphic):
//!
//! ```rust,ignore
//! polymorphic! {
//!     /// Value of an option.
//!     pub enum OptionValue: "OptionValue" {
//!         "optionValueBoolean" => Boolean(OptionValueBoolean),
//!         "optionValueEmpty" => Empty(OptionValueEmpty),
//!     }
//! }
//! ```

use crate::error::{Result, TdError};
use crate::message::{Message, TYPE_FIELD};
use serde_json::Value;

/// A closed set of shapes selected by discriminator.
pub trait Polymorphic: Sized {
    /// Name of the category, used in error messages.
    const CATEGORY: &'static str;

    /// Every discriminator this category accepts.
    const VARIANTS: &'static [&'static str];

    /// Decode `raw` into the shape registered for `kind`.
    fn decode_tagged(kind: &str, raw: &[u8]) -> Result<Self>;

    /// Decode a generic JSON value into the shape registered for `kind`.
    fn decode_tagged_value(kind: &str, value: Value) -> Result<Self>;

    /// The discriminator of this value.
    fn kind(&self) -> &'static str;

    /// Decode a received message.
    ///
    /// A remote `error` reply becomes [`TdError::Remote`] rather than an
    /// unknown-variant error.
    fn from_message(message: &Message) -> Result<Self> {
        if let Some(err) = message.remote_error() {
            return Err(err);
        }
        let kind = message
            .kind()
            .ok_or(TdError::MissingDiscriminator {
                category: Self::CATEGORY,
            })?;
        Self::decode_tagged(kind, message.raw())
    }

    /// Parse raw bytes and decode them.
    fn from_bytes(raw: impl Into<bytes::Bytes>) -> Result<Self> {
        Self::from_message(&Message::parse(raw)?)
    }

    /// Decode a JSON value that carries its own `@type`.
    fn from_value(value: Value) -> Result<Self> {
        let kind = value
            .get(TYPE_FIELD)
            .and_then(Value::as_str)
            .ok_or(TdError::MissingDiscriminator {
                category: Self::CATEGORY,
            })?
            .to_string();
        Self::decode_tagged_value(&kind, value)
    }

    /// Whether `kind` belongs to this category.
    fn accepts(kind: &str) -> bool {
        Self::VARIANTS.contains(&kind)
    }
}

/// Error for a discriminator outside a category.
pub fn unknown_variant(category: &'static str, kind: &str) -> TdError {
    TdError::UnknownVariant {
        category,
        kind: kind.to_string(),
    }
}

/// Serialize a variant's shape and stamp its discriminator on it.
#[doc(hidden)]
pub fn tagged_value<T: serde::Serialize>(kind: &str, shape: &T) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(shape)?;
    if let Value::Object(fields) = &mut value {
        fields.insert(TYPE_FIELD.to_string(), Value::String(kind.to_string()));
    }
    Ok(value)
}

/// Declare a polymorphic category.
///
/// Generates the enum, its [`Polymorphic`] impl, and serde impls that read and
/// write the `@type` field so the category can be nested in other shapes and
/// used as a request argument.
#[macro_export]
macro_rules! polymorphic {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $category:literal {
            $( $(#[$vmeta:meta])* $tag:literal => $variant:ident($shape:ty) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant($shape), )+
        }

        impl $crate::decode::Polymorphic for $name {
            const CATEGORY: &'static str = $category;
            const VARIANTS: &'static [&'static str] = &[$($tag),+];

            fn decode_tagged(kind: &str, raw: &[u8]) -> $crate::Result<Self> {
                match kind {
                    $( $tag => ::std::result::Result::Ok($name::$variant($crate::__private::serde_json::from_slice(raw)?)), )+
                    other => ::std::result::Result::Err($crate::decode::unknown_variant($category, other)),
                }
            }

            fn decode_tagged_value(
                kind: &str,
                value: $crate::__private::serde_json::Value,
            ) -> $crate::Result<Self> {
                match kind {
                    $( $tag => ::std::result::Result::Ok($name::$variant($crate::__private::serde_json::from_value(value)?)), )+
                    other => ::std::result::Result::Err($crate::decode::unknown_variant($category, other)),
                }
            }

            fn kind(&self) -> &'static str {
                match self {
                    $( $name::$variant(_) => $tag, )+
                }
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S: $crate::__private::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                let value = match self {
                    $( $name::$variant(shape) => $crate::decode::tagged_value($tag, shape), )+
                }
                .map_err(<S::Error as $crate::__private::serde::ser::Error>::custom)?;
                $crate::__private::serde::Serialize::serialize(&value, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D: $crate::__private::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let value = <$crate::__private::serde_json::Value as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                <$name as $crate::decode::Polymorphic>::from_value(value)
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Circle {
        radius: u32,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Square {
        side: u32,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Point {}

    crate::polymorphic! {
        enum Shape: "Shape" {
            "shapeCircle" => Circle(Circle),
            "shapeSquare" => Square(Square),
            "shapePoint" => Point(Point),
        }
    }

    #[derive(Debug, Deserialize)]
    struct Canvas {
        shape: Shape,
    }

    #[test]
    fn test_each_registered_tag_decodes_to_its_shape() {
        let cases = [
            (r#"{"@type":"shapeCircle","radius":3}"#, Shape::Circle(Circle { radius: 3 })),
            (r#"{"@type":"shapeSquare","side":4}"#, Shape::Square(Square { side: 4 })),
            (r#"{"@type":"shapePoint"}"#, Shape::Point(Point {})),
        ];
        for (raw, expected) in cases {
            let decoded = Shape::from_bytes(raw.as_bytes()).unwrap();
            assert_eq!(decoded.kind(), expected.kind());
            assert_eq!(decoded, expected);
        }
        assert_eq!(Shape::VARIANTS.len(), 3);
    }

    #[test]
    fn test_unregistered_tag_is_an_error() {
        let err = Shape::from_bytes(&br#"{"@type":"shapeHexagon","side":1}"#[..]).unwrap_err();
        match err {
            TdError::UnknownVariant { category, kind } => {
                assert_eq!(category, "Shape");
                assert_eq!(kind, "shapeHexagon");
            }
            other => panic!("Expected UnknownVariant, got: {:?}", other),
        }
        assert!(!Shape::accepts("shapeHexagon"));
    }

    #[test]
    fn test_missing_tag_is_an_error() {
        let err = Shape::from_bytes(&br#"{"radius":3}"#[..]).unwrap_err();
        assert!(matches!(err, TdError::MissingDiscriminator { category: "Shape" }));
    }

    #[test]
    fn test_remote_error_wins_over_unknown_variant() {
        let err =
            Shape::from_bytes(&br#"{"@type":"error","code":404,"message":"Not Found"}"#[..])
                .unwrap_err();
        assert_eq!(err.code(), Some(404));
    }

    #[test]
    fn test_shape_mismatch_is_a_json_error() {
        let err = Shape::from_bytes(&br#"{"@type":"shapeCircle","radius":"big"}"#[..]).unwrap_err();
        assert!(matches!(err, TdError::Json { .. }));
    }

    #[test]
    fn test_nested_and_serialized_forms() {
        let canvas: Canvas =
            serde_json::from_value(json!({"shape": {"@type": "shapeSquare", "side": 2}})).unwrap();
        assert_eq!(canvas.shape, Shape::Square(Square { side: 2 }));

        let value = serde_json::to_value(Shape::Circle(Circle { radius: 1 })).unwrap();
        assert_eq!(value, json!({"@type": "shapeCircle", "radius": 1}));

        assert!(serde_json::from_value::<Canvas>(json!({"shape": {"@type": "nope"}})).is_err());
    }
}
