use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create an identifier, rejecting the empty string.
            pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(TypeError::EmptyId { kind: $kind });
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Stable external identifier of a [`Document`](crate::Document).
    ///
    /// Physically stored under the collection's id field (`d_id` by default).
    DocumentId,
    "document id"
);

string_id!(
    /// Opaque tag identifying a [`LogEntry`](crate::LogEntry).
    ///
    /// Unique within one document's log at any instant: writing an existing
    /// tag replaces the entry instead of appending a second one.
    EntryId,
    "entry id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert_eq!(
            DocumentId::new("").unwrap_err(),
            TypeError::EmptyId { kind: "document id" }
        );
        assert_eq!(
            EntryId::new(String::new()).unwrap_err(),
            TypeError::EmptyId { kind: "entry id" }
        );
    }

    #[test]
    fn display_and_debug() {
        let id = EntryId::new("1000").unwrap();
        assert_eq!(id.to_string(), "1000");
        assert_eq!(format!("{id:?}"), "EntryId(\"1000\")");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = DocumentId::new("100").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"100\"");
        let parsed: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn deserialize_rejects_empty() {
        let parsed: Result<EntryId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn borrow_as_str_for_set_lookups() {
        let mut set = std::collections::HashSet::new();
        set.insert(EntryId::new("1001").unwrap());
        assert!(set.contains("1001"));
    }
}
