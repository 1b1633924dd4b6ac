//! Macro for implementing code conversions on closed enumerations
//!
//! Regions, locales and leaderboard brackets are all small fixed sets of
//! string codes. This macro generates `as_str`, an `ALL` table, `Display` and
//! `FromStr` from a single variant-to-code mapping.
//!
//! # Example
//!
//! ```rust
//! use armory_domain::impl_code_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Bracket {
//!     TwoVsTwo,
//!     Rbg,
//! }
//!
//! impl_code_conversions!(Bracket {
//!     TwoVsTwo => "2v2",
//!     Rbg => "rbg",
//! });
//!
//! assert_eq!("RBG".parse::<Bracket>().unwrap(), Bracket::Rbg);
//! ```
//!
//! Prefix the enum with `exact` when the codes are case-sensitive (locale
//! codes such as `en_US` are matched verbatim).

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for code enums
///
/// # Arguments
///
/// * `exact` - Optional marker; when present parsing is case-sensitive
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their wire codes
///
/// Parsing failures return a `String` naming the enum and the rejected input.
#[macro_export]
macro_rules! impl_code_conversions {
    (exact $enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        $crate::impl_code_conversions!(@common $enum_name { $($variant => $str),+ });

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        $crate::impl_code_conversions!(@common $enum_name { $($variant => $str),+ });

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
    (@common $enum_name:ident { $($variant:ident => $str:literal),+ }) => {
        impl $enum_name {
            /// Every member of the enumeration, in declaration order.
            pub const ALL: &'static [$enum_name] = &[$(Self::$variant),+];

            /// Wire code for this member.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
