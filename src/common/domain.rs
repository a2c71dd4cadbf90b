// src/common/domain.rs
//! Enum domains: fixed, named sets of allowed string values.
//!
//! A domain is declared once through [`enum_domain!`], which generates both the
//! typed Rust enum used by the entities and the [`EnumDomain`] constant the
//! validation schemas register. Both read from the same literal list, so the
//! data model and the validator can never disagree on the allowed values.

/// A named set of allowed string values for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumDomain {
    name: &'static str,
    values: &'static [&'static str],
}

impl EnumDomain {
    pub const fn new(name: &'static str, values: &'static [&'static str]) -> Self {
        Self { name, values }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn values(&self) -> &'static [&'static str] {
        self.values
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values().iter().any(|allowed| *allowed == value)
    }

    /// Renders the allowed set as `[A, B, C]` for violation messages
    pub fn describe(&self) -> String {
        format!("[{}]", self.values().join(", "))
    }
}

/// Returned when a string does not name any variant of a domain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{value}` is not a member of the {domain} domain")]
pub struct UnknownVariant {
    pub domain: &'static str,
    pub value: String,
}

/// Declares a string-valued enum together with its [`EnumDomain`].
///
/// ```ignore
/// enum_domain! {
///     /// Weekly availability
///     pub enum Day: "day" {
///         Monday => "MONDAY",
///         Tuesday => "TUESDAY",
///     }
/// }
/// ```
macro_rules! enum_domain {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $domain:literal {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const DOMAIN: $crate::common::domain::EnumDomain =
                $crate::common::domain::EnumDomain::new($domain, &[$($value),+]);

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::common::domain::UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err($crate::common::domain::UnknownVariant {
                        domain: $domain,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use enum_domain;
