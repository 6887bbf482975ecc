use super::int64;
use crate::polymorphic;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValueBoolean {
    pub value: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValueEmpty {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValueInteger {
    #[serde(with = "int64")]
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValueString {
    pub value: String,
}

polymorphic! {
    /// Value of a client option.
    pub enum OptionValue: "OptionValue" {
        "optionValueBoolean" => Boolean(OptionValueBoolean),
        "optionValueEmpty" => Empty(OptionValueEmpty),
        "optionValueInteger" => Integer(OptionValueInteger),
        "optionValueString" => String(OptionValueString),
    }
}

impl OptionValue {
    pub fn boolean(value: bool) -> Self {
        OptionValue::Boolean(OptionValueBoolean { value })
    }

    pub fn integer(value: i64) -> Self {
        OptionValue::Integer(OptionValueInteger { value })
    }

    pub fn string(value: impl Into<String>) -> Self {
        OptionValue::String(OptionValueString {
            value: value.into(),
        })
    }

    pub fn empty() -> Self {
        OptionValue::Empty(OptionValueEmpty {})
    }
}
