//! Helper macro generating domain port error enums.

/// Define a port error enum with `thiserror` display strings and snake_case
/// constructor helpers that accept `impl Into<FieldType>` arguments.
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            ::paste::paste! {
                $(
                    /// Constructor helper for the corresponding variant.
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum SamplePortError {
            Unreachable { message: String } => "unreachable: {message}",
            Exhausted { attempts: u32 } => "exhausted after {attempts} attempts",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::unreachable("socket closed");
        assert_eq!(err.to_string(), "unreachable: socket closed");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = SamplePortError::exhausted(4u32);
        assert_eq!(
            err,
            SamplePortError::Exhausted { attempts: 4 },
        );
        assert_eq!(err.to_string(), "exhausted after 4 attempts");
    }
}
