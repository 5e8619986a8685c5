//! The `udt_object!` macro

/// Map a struct onto an Oracle object type
///
/// Implements [`UdtObject`](crate::UdtObject) and [`Marshal`](crate::Marshal)
/// for the struct and for `Box` of it. The struct must implement `Default`
/// and every listed field's type must implement `Marshal`.
///
/// - `as "SCHEMA.NAME"` sets the UDT name used when none is given at
///   registration
/// - `collection "SCHEMA.NAME"` sets the UDT name of the collection type
/// - `field => "ATTR"` sets the UDT attribute name (default: the uppercased
///   field name)
/// - `#[ignore] field` excludes the field from marshaling
///
/// Fields not listed are not marshaled either.
///
/// # Example
///
/// ```rust
/// use oracle_udt::{udt_object, MarshalRegistry, UdtObject};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Address {
///     street: String,
///     city: String,
/// }
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Client {
///     id: i64,
///     name: String,
///     address: Option<Address>,
///     cache: Vec<u8>,
/// }
///
/// udt_object! { Address as "HR.ADDRESS_OBJ" { street, city } }
///
/// udt_object! {
///     Client as "HR.CLIENT_OBJ", collection "HR.CLIENT_LIST" {
///         id,
///         name => "FULL_NAME",
///         address,
///         #[ignore] cache,
///     }
/// }
///
/// let registry = MarshalRegistry::new();
/// let descriptor = registry.register_annotated::<Client>().unwrap();
/// assert_eq!(descriptor.udt_name(), "HR.CLIENT_OBJ");
/// assert_eq!(descriptor.fields().len(), 3);
/// ```
#[macro_export]
macro_rules! udt_object {
    (@opt) => {
        ::std::option::Option::None
    };
    (@opt $value:literal) => {
        ::std::option::Option::Some($value)
    };

    (@field $sample:ident, [ignore] $field:ident [$($prop:literal)?]) => {
        $crate::Field::<Self>::ignored(::std::stringify!($field))
    };
    (@field $sample:ident, [] $field:ident []) => {
        $crate::Field::<Self>::new(
            ::std::stringify!($field),
            $crate::marshal::shape_of(&$sample.$field),
            |obj: &Self, registry: &$crate::MarshalRegistry| {
                $crate::Marshal::to_wire(&obj.$field, registry)
            },
            |obj: &mut Self, value: $crate::WireValue, registry: &$crate::MarshalRegistry| {
                $crate::marshal::assign(&mut obj.$field, value, registry)
            },
        )
    };
    (@field $sample:ident, [] $field:ident [$prop:literal]) => {
        $crate::udt_object!(@field $sample, [] $field []).with_property($prop)
    };

    (
        $ty:ident $(as $udt:literal)? $(, collection $collection:literal)? {
            $( $(#[$attr:ident])? $field:ident $(=> $prop:literal)? ),* $(,)?
        }
    ) => {
        impl $crate::UdtObject for $ty {
            const UDT_NAME: ::std::option::Option<&'static str> =
                $crate::udt_object!(@opt $($udt)?);
            const UDT_COLLECTION_NAME: ::std::option::Option<&'static str> =
                $crate::udt_object!(@opt $($collection)?);

            fn fields() -> ::std::vec::Vec<$crate::Field<Self>> {
                #[allow(unused_variables)]
                let sample = <Self as ::std::default::Default>::default();
                ::std::vec![
                    $( $crate::udt_object!(@field sample, [$($attr)?] $field [$($prop)?]) ),*
                ]
            }
        }

        impl $crate::Marshal for $ty {
            fn shape() -> $crate::Shape {
                $crate::marshal::object_shape::<Self>()
            }

            fn to_wire(&self, registry: &$crate::MarshalRegistry) -> $crate::Result<$crate::WireValue> {
                $crate::marshal::object_to_wire(self, registry)
            }

            fn from_wire(
                value: $crate::WireValue,
                registry: &$crate::MarshalRegistry,
            ) -> $crate::Result<Self> {
                $crate::marshal::object_from_wire(value, registry)
            }

            fn null_wire(registry: &$crate::MarshalRegistry) -> $crate::Result<$crate::WireValue> {
                $crate::marshal::object_null_wire::<Self>(registry)
            }
        }

        impl $crate::Marshal for ::std::boxed::Box<$ty> {
            fn shape() -> $crate::Shape {
                $crate::marshal::object_shape::<$ty>()
            }

            fn to_wire(&self, registry: &$crate::MarshalRegistry) -> $crate::Result<$crate::WireValue> {
                $crate::marshal::object_to_wire::<$ty>(self, registry)
            }

            fn from_wire(
                value: $crate::WireValue,
                registry: &$crate::MarshalRegistry,
            ) -> $crate::Result<Self> {
                $crate::marshal::object_from_wire::<$ty>(value, registry).map(::std::boxed::Box::new)
            }

            fn null_wire(registry: &$crate::MarshalRegistry) -> $crate::Result<$crate::WireValue> {
                $crate::marshal::object_null_wire::<$ty>(registry)
            }
        }
    };
}
