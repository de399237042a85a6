// # Domain Traits
//
// Domain values are the plain structs exchanged with the management API.
// A struct opts into transcoding by implementing [`Domain`], declaring one
// [`DomainField`] per exposed field. Fields without a binding are invisible
// to the transcoder in both directions.
//
// Every bindable field type implements [`DomainType`], which fixes its
// [`Kind`] at registration time and lets the forward transcoder read it as
// a [`Datum`] and the reverse transcoder rebuild it from a [`Value`].
//
// ## Usage
//
// ```rust,ignore
// use scalebridge_core::{domain_field, domain_type, Domain, DomainField};
//
// #[derive(Debug, Default)]
// struct Contact {
//     email: String,
//     priority: i8,
// }
//
// impl Domain for Contact {
//     fn bindings() -> Vec<DomainField<Self>> {
//         vec![
//             domain_field!("email" => email),
//             domain_field!("priority" => priority),
//         ]
//     }
// }
//
// // Allows `Contact`, `Option<Contact>` and `Vec<Contact>` as field types
// domain_type!(Contact);
// ```

use std::any::TypeId;
use std::fmt;

use crate::error::Result;
use crate::registry::BindingRegistry;
use crate::reverse::Decoder;
use crate::value::Value;

/// A struct with declared domain bindings
pub trait Domain: Default + Send + Sync + 'static {
    /// Binding declarations, one per exposed field
    fn bindings() -> Vec<DomainField<Self>>;
}

/// A type that may appear as a bound domain field
pub trait DomainType: Default + Send + Sync + 'static {
    /// Kind of this type, fixed at registration
    fn kind() -> Kind;

    /// Read-only view used by the forward transcoder
    fn datum(&self) -> Datum<'_>;

    /// Rebuild from a tri-state value
    ///
    /// `Ok(None)` means the value was Null or Unknown and the destination
    /// field keeps its zero value.
    fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Option<Self>>;
}

/// Integer widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl IntKind {
    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            IntKind::U8 | IntKind::U16 | IntKind::U32 | IntKind::U64 | IntKind::Usize
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::Isize => "isize",
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::Usize => "usize",
        }
    }
}

/// Float widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

/// Closed set of domain field kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Int(IntKind),
    Float(FloatKind),
    String,
    Bool,
    Struct(StructRef),
    Optional(Box<Kind>),
    Sequence(Box<Kind>),
}

impl Kind {
    /// The kind with any `Optional` wrapper removed
    pub fn strip_optional(&self) -> &Kind {
        match self {
            Kind::Optional(inner) => inner.strip_optional(),
            other => other,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Int(int) => write!(f, "{}", int.name()),
            Kind::Float(FloatKind::F32) => write!(f, "f32"),
            Kind::Float(FloatKind::F64) => write!(f, "f64"),
            Kind::String => write!(f, "String"),
            Kind::Bool => write!(f, "bool"),
            Kind::Struct(target) => write!(f, "{}", target.name()),
            Kind::Optional(inner) => write!(f, "Option<{}>", inner),
            Kind::Sequence(inner) => write!(f, "Vec<{}>", inner),
        }
    }
}

/// Reference to a bound struct type, resolved lazily through a registry
#[derive(Clone, Copy)]
pub struct StructRef {
    name: &'static str,
    type_id: TypeId,
    descriptors: fn(&BindingRegistry) -> Result<Vec<FieldDescriptor>>,
}

impl StructRef {
    /// Reference to `T`
    pub fn of<T: Domain>() -> Self {
        Self {
            name: BindingRegistry::type_label::<T>(),
            type_id: TypeId::of::<T>(),
            descriptors: descriptors_of::<T>,
        }
    }

    /// Short type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Field descriptors of the referenced struct
    pub fn descriptors(&self, registry: &BindingRegistry) -> Result<Vec<FieldDescriptor>> {
        (self.descriptors)(registry)
    }
}

fn descriptors_of<T: Domain>(registry: &BindingRegistry) -> Result<Vec<FieldDescriptor>> {
    Ok(registry.domain::<T>()?.descriptors())
}

impl PartialEq for StructRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl fmt::Debug for StructRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StructRef").field(&self.name).finish()
    }
}

/// Static description of one bound field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Binding key
    pub key: &'static str,
    /// Rust field name
    pub field: &'static str,
    /// Declared kind
    pub kind: Kind,
}

impl FieldDescriptor {
    pub fn is_optional(&self) -> bool {
        matches!(self.kind, Kind::Optional(_))
    }

    /// Element kind when the field is a sequence (optionals unwrapped)
    pub fn element_kind(&self) -> Option<&Kind> {
        match self.kind.strip_optional() {
            Kind::Sequence(element) => Some(element),
            _ => None,
        }
    }
}

/// Borrowed, kind-erased view of a domain field's current value
#[derive(Clone)]
pub enum Datum<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'a str),
    Bool(bool),
    /// `None` optional
    Absent,
    Struct(&'a dyn DomainObject),
    Seq(Vec<Datum<'a>>),
}

impl Datum<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Datum::Int(_) => "signed integer",
            Datum::Uint(_) => "unsigned integer",
            Datum::Float(_) => "float",
            Datum::Str(_) => "string",
            Datum::Bool(_) => "bool",
            Datum::Absent => "absent optional",
            Datum::Struct(_) => "struct",
            Datum::Seq(_) => "sequence",
        }
    }
}

impl fmt::Debug for Datum<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Int(v) => write!(f, "Int({})", v),
            Datum::Uint(v) => write!(f, "Uint({})", v),
            Datum::Float(v) => write!(f, "Float({})", v),
            Datum::Str(v) => write!(f, "Str({:?})", v),
            Datum::Bool(v) => write!(f, "Bool({})", v),
            Datum::Absent => write!(f, "Absent"),
            Datum::Struct(object) => write!(f, "Struct({})", object.type_name()),
            Datum::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
        }
    }
}

/// Object-safe read access to a bound struct
pub trait DomainObject: Send + Sync {
    /// Short type name
    fn type_name(&self) -> &'static str;

    /// Kind and current value of the field bound to `key`, if any
    fn read_field<'a>(
        &'a self,
        registry: &BindingRegistry,
        key: &str,
    ) -> Result<Option<(Kind, Datum<'a>)>>;
}

impl<T: Domain> DomainObject for T {
    fn type_name(&self) -> &'static str {
        BindingRegistry::type_label::<T>()
    }

    fn read_field<'a>(
        &'a self,
        registry: &BindingRegistry,
        key: &str,
    ) -> Result<Option<(Kind, Datum<'a>)>> {
        let bindings = registry.domain::<T>()?;
        Ok(bindings
            .get(key)
            .map(|field| (field.descriptor().kind.clone(), field.read(self))))
    }
}

/// One binding of a domain struct: descriptor plus typed accessors
pub struct DomainField<S> {
    descriptor: FieldDescriptor,
    access: Box<dyn DomainAccess<S>>,
}

impl<S: 'static> DomainField<S> {
    /// Bind `key` to the field `field` reached by `get` / `get_mut`
    pub fn new<T: DomainType>(
        key: &'static str,
        field: &'static str,
        get: fn(&S) -> &T,
        get_mut: fn(&mut S) -> &mut T,
    ) -> Self {
        Self {
            descriptor: FieldDescriptor {
                key,
                field,
                kind: T::kind(),
            },
            access: Box::new(Accessor { get, get_mut }),
        }
    }

    pub fn key(&self) -> &'static str {
        self.descriptor.key
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// Read the field's current value
    pub fn read<'a>(&self, source: &'a S) -> Datum<'a> {
        self.access.read(source)
    }

    /// Decode `value` into the field; Null/Unknown leave it untouched
    pub fn assign(&self, target: &mut S, value: &Value, decoder: &Decoder<'_>) -> Result<()> {
        self.access.assign(target, value, decoder)
    }
}

impl<S> fmt::Debug for DomainField<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainField")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

trait DomainAccess<S>: Send + Sync {
    fn read<'a>(&self, source: &'a S) -> Datum<'a>;
    fn assign(&self, target: &mut S, value: &Value, decoder: &Decoder<'_>) -> Result<()>;
}

struct Accessor<S, T> {
    get: fn(&S) -> &T,
    get_mut: fn(&mut S) -> &mut T,
}

impl<S: 'static, T: DomainType> DomainAccess<S> for Accessor<S, T> {
    fn read<'a>(&self, source: &'a S) -> Datum<'a> {
        (self.get)(source).datum()
    }

    fn assign(&self, target: &mut S, value: &Value, decoder: &Decoder<'_>) -> Result<()> {
        if let Some(decoded) = T::decode(value, decoder)? {
            *(self.get_mut)(target) = decoded;
        }
        Ok(())
    }
}

macro_rules! signed_domain_type {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl DomainType for $ty {
                fn kind() -> Kind {
                    Kind::Int(IntKind::$kind)
                }

                fn datum(&self) -> Datum<'_> {
                    Datum::Int(*self as i64)
                }

                fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Option<Self>> {
                    decoder.integer::<$ty>(value)
                }
            }
        )+
    };
}

macro_rules! unsigned_domain_type {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl DomainType for $ty {
                fn kind() -> Kind {
                    Kind::Int(IntKind::$kind)
                }

                fn datum(&self) -> Datum<'_> {
                    Datum::Uint(*self as u64)
                }

                fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Option<Self>> {
                    decoder.integer::<$ty>(value)
                }
            }
        )+
    };
}

signed_domain_type!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
unsigned_domain_type!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

impl DomainType for f32 {
    fn kind() -> Kind {
        Kind::Float(FloatKind::F32)
    }

    fn datum(&self) -> Datum<'_> {
        Datum::Float(f64::from(*self))
    }

    fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Option<Self>> {
        decoder.float32(value)
    }
}

impl DomainType for f64 {
    fn kind() -> Kind {
        Kind::Float(FloatKind::F64)
    }

    fn datum(&self) -> Datum<'_> {
        Datum::Float(*self)
    }

    fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Option<Self>> {
        decoder.float64(value)
    }
}

impl DomainType for String {
    fn kind() -> Kind {
        Kind::String
    }

    fn datum(&self) -> Datum<'_> {
        Datum::Str(self)
    }

    fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Option<Self>> {
        decoder.string(value)
    }
}

impl DomainType for bool {
    fn kind() -> Kind {
        Kind::Bool
    }

    fn datum(&self) -> Datum<'_> {
        Datum::Bool(*self)
    }

    fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Option<Self>> {
        decoder.boolean(value)
    }
}

impl<T: DomainType> DomainType for Option<T> {
    fn kind() -> Kind {
        Kind::Optional(Box::new(T::kind()))
    }

    fn datum(&self) -> Datum<'_> {
        match self {
            Some(inner) => inner.datum(),
            None => Datum::Absent,
        }
    }

    fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Option<Self>> {
        Ok(T::decode(value, decoder)?.map(Some))
    }
}

impl<T: DomainType> DomainType for Vec<T> {
    fn kind() -> Kind {
        Kind::Sequence(Box::new(T::kind()))
    }

    fn datum(&self) -> Datum<'_> {
        Datum::Seq(self.iter().map(DomainType::datum).collect())
    }

    fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Option<Self>> {
        decoder.sequence::<T>(value)
    }
}

/// Declare a domain binding: `domain_field!("key" => field)`
#[macro_export]
macro_rules! domain_field {
    ($key:literal => $field:ident) => {
        $crate::DomainField::<Self>::new(
            $key,
            stringify!($field),
            |s| &s.$field,
            |s| &mut s.$field,
        )
    };
}

/// Make bound struct types usable as fields (plain, `Option<_>`, `Vec<_>`)
#[macro_export]
macro_rules! domain_type {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::DomainType for $ty {
                fn kind() -> $crate::Kind {
                    $crate::Kind::Struct($crate::StructRef::of::<Self>())
                }

                fn datum(&self) -> $crate::Datum<'_> {
                    $crate::Datum::Struct(self)
                }

                fn decode(
                    value: &$crate::Value,
                    decoder: &$crate::Decoder<'_>,
                ) -> $crate::Result<Option<Self>> {
                    decoder.nested::<Self>(value)
                }
            }
        )+
    };
}
