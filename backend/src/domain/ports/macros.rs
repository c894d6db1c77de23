//! Helper macro behind the driven-port error enums.
//!
//! Every driven port declares its failure modes through
//! [`define_port_error`], which expands to a [`thiserror::Error`] enum plus
//! snake_case constructor functions. Adapters then build errors with
//! `TaskRepositoryError::connection("pool exhausted")` instead of spelling
//! out struct variants at each call site.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $error:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $display:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $error {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $error {
            $(
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@accumulate $variant () () $( $field : $ty, )*);
    };

    // Muncher: folds each field into an `impl Into` argument and an
    // initialiser, then emits the constructor once the list is empty.
    (@accumulate $variant:ident ($($args:tt)*) ($($build:tt)*) $field:ident : $ty:ty, $($tail:tt)*) => {
        define_port_error!(
            @accumulate
            $variant
            ($($args)* $field: impl Into<$ty>,)
            ($($build)* $field: $field.into(),)
            $($tail)*
        );
    };

    (@accumulate $variant:ident ($($args:tt)*) ($($build:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($args)*) -> Self {
                Self::$variant { $($build)* }
            }
        }
    };
}

pub(crate) use define_port_error;
