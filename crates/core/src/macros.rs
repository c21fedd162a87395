// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared by the prepalert crates.
//!
//! - [`simple_display!`]: `Display` from variant to string literal
//! - [`builder!`]: test builders with defaulted fields

/// Generate a `Display` impl that maps enum variants to string literals.
///
/// ```ignore
/// prepalert_core::simple_display! {
///     QueryStatus {
///         Running => "running",
///         Failed(..) => "failed",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident $(( $($ignore:tt)* ))? => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant $(( $($ignore)* ))? => $str, )+
                })
            }
        }
    };
}

/// Test builder for a plain data struct.
///
/// Every field is listed as `name: Type = default`. The builder wraps a
/// fully-defaulted value, and each setter takes `impl Into<Type>`, so
/// `Option` fields accept the bare value.
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            $( $field:ident : $ty:ty = $default:expr ),* $(,)?
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder($target);

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self($target { $( $field: $default, )* })
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $(
                pub fn $field(mut self, v: impl Into<$ty>) -> Self {
                    self.0.$field = v.into();
                    self
                }
            )*

            pub fn build(self) -> $target {
                self.0
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}
