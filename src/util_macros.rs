// Quick little util for the closed byte-sized enums of the instruction set.
//
// Each variant carries its byte value and its label through strum attributes.  Use
// `to_string` for the canonical label (this is what gets printed), and `serialize`
// for any additional spellings that should be accepted when parsing.
macro_rules! code_enum {
    (
        $(#[$($Enum_attr:tt)+])*
        $vis:vis enum $Enum:ident {
            $(
                $(#[$($variant_attr:tt)+])* $Variant:ident = $value:literal,
            )*
        }
    ) => {
        $(#[$($Enum_attr)+])*
        #[derive(strum::Display, strum::EnumString, strum::IntoStaticStr)]
        #[repr(u8)]
        $vis enum $Enum {
            $( $(#[$($variant_attr)+])* $Variant = $value, )*
        }

        impl $Enum {
            /// Every variant, ordered by byte value.
            pub const ALL: &'static [$Enum] = &[$($Enum::$Variant),*];
            /// Cardinality.  Raw bytes are reduced modulo this number.
            pub const COUNT: u8 = Self::ALL.len() as u8;

            pub fn to_byte(self) -> u8 { self as u8 }

            /// Exact lookup, without clamping.
            pub fn from_byte(byte: u8) -> Option<Self> {
                match byte {
                    $( $value => Some($Enum::$Variant), )*
                    _ => None,
                }
            }

            /// The canonical mnemonic.
            pub fn label(self) -> &'static str { self.into() }
        }

        impl serde::Serialize for $Enum {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl crate::fmt::Format for $Enum {
            fn fmt<W: ::std::io::Write>(&self, out: &mut crate::fmt::Formatter<W>) -> crate::fmt::Result {
                out.fmt(self.label())
            }
        }
    }
}

/// Defines `clamp` for a [`code_enum!`] whose byte values are exactly `0..COUNT`.
macro_rules! impl_clamp {
    ($($Enum:ident),* $(,)?) => {$(
        impl $Enum {
            /// Reduce an arbitrary byte into range.  Never fails.
            pub fn clamp(raw: u8) -> Self {
                Self::ALL[(raw % Self::COUNT) as usize]
            }
        }
    )*};
}
