use graphql_parser::query;
use indexmap::IndexMap;

/// A reference to a type as written on a field, argument or variable: a named type
/// optionally wrapped in list and non-null layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: &str) -> TypeRef {
        TypeRef::Named(name.to_string())
    }

    pub fn list(inner: TypeRef) -> TypeRef {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> TypeRef {
        TypeRef::NonNull(Box::new(inner))
    }

    /// The name of the named type under every wrapper.
    pub fn inner_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) => inner.inner_name(),
            TypeRef::NonNull(inner) => inner.inner_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        match self {
            TypeRef::NonNull(_) => true,
            _ => false,
        }
    }

    /// Will return true for nullable and non-nullable list types, at any depth.
    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::Named(_) => false,
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::List(_) => true,
        }
    }

    /// Strips one non-null layer, if any.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }
}

impl ::std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    pub value_type: TypeRef,
    /// The default value as GraphQL source text.
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValue>,
    pub field_type: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    /// Object types implementing this interface, in schema order.
    pub possible_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    /// Members in declaration order.
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Scalar(ScalarType),
    Enum(EnumType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    InputObject(InputObjectType),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Scalar(ty) => &ty.name,
            TypeDefinition::Enum(ty) => &ty.name,
            TypeDefinition::Object(ty) => &ty.name,
            TypeDefinition::Interface(ty) => &ty.name,
            TypeDefinition::Union(ty) => &ty.name,
            TypeDefinition::InputObject(ty) => &ty.name,
        }
    }

    /// The selectable fields of object and interface types.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            TypeDefinition::Object(ty) => Some(&ty.fields),
            TypeDefinition::Interface(ty) => Some(&ty.fields),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        match self {
            TypeDefinition::Scalar(_) | TypeDefinition::Enum(_) => true,
            _ => false,
        }
    }

    pub fn is_abstract(&self) -> bool {
        match self {
            TypeDefinition::Interface(_) | TypeDefinition::Union(_) => true,
            _ => false,
        }
    }
}

/// See https://graphql.org/learn/schema/#scalar-types
pub const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    types: IndexMap<String, TypeDefinition>,
}

impl Schema {
    pub fn new() -> Schema {
        let mut types = IndexMap::new();

        for scalar in BUILTIN_SCALARS {
            types.insert(
                scalar.to_string(),
                TypeDefinition::Scalar(ScalarType {
                    name: scalar.to_string(),
                    description: None,
                }),
            );
        }

        Schema {
            query_type: None,
            mutation_type: None,
            subscription_type: None,
            types,
        }
    }

    pub fn set_root_type(&mut self, kind: OperationKind, name: Option<String>) {
        match kind {
            OperationKind::Query => self.query_type = name,
            OperationKind::Mutation => self.mutation_type = name,
            OperationKind::Subscription => self.subscription_type = name,
        }
    }

    pub fn insert_type(&mut self, definition: TypeDefinition) {
        self.types.insert(definition.name().to_string(), definition);
    }

    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        let name = match kind {
            OperationKind::Query => &self.query_type,
            OperationKind::Mutation => &self.mutation_type,
            OperationKind::Subscription => &self.subscription_type,
        };
        name.as_ref().map(|name| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    /// Looks up a field on an object or interface type.
    pub fn field(&self, parent: &str, name: &str) -> Option<&Field> {
        self.get(parent)
            .and_then(|definition| definition.fields())
            .and_then(|fields| fields.iter().find(|field| field.name == name))
    }

    /// The concrete object types an abstract type can resolve to, in schema order.
    pub fn possible_types(&self, name: &str) -> Vec<&str> {
        match self.get(name) {
            Some(TypeDefinition::Union(union_type)) => {
                union_type.types.iter().map(|member| member.as_str()).collect()
            }
            Some(TypeDefinition::Interface(interface_type)) => interface_type
                .possible_types
                .iter()
                .map(|member| member.as_str())
                .collect(),
            Some(TypeDefinition::Object(object_type)) => vec![object_type.name.as_str()],
            _ => Vec::new(),
        }
    }

    /// Converts a type as written in a query (e.g. a variable declaration) to a schema type reference.
    pub fn type_from_ast<'a>(&self, ty: &query::Type<'a, String>) -> TypeRef {
        match ty {
            query::Type::NamedType(name) => TypeRef::Named(name.clone()),
            query::Type::ListType(inner) => TypeRef::list(self.type_from_ast(inner)),
            query::Type::NonNullType(inner) => TypeRef::non_null(self.type_from_ast(inner)),
        }
    }
}

impl Default for Schema {
    fn default() -> Schema {
        Schema::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_list_type_works() {
        assert!(TypeRef::list(TypeRef::named("meow")).is_list());
        assert!(TypeRef::non_null(TypeRef::list(TypeRef::named("meow"))).is_list());
        assert!(!TypeRef::non_null(TypeRef::named("meow")).is_list());
    }

    #[test]
    fn inner_name_strips_every_wrapper() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("Episode"))));
        assert_eq!(ty.inner_name(), "Episode");
        assert_eq!(ty.to_string(), "[Episode!]!");
    }

    #[test]
    fn builtin_scalars_are_always_present() {
        let schema = Schema::new();
        for scalar in BUILTIN_SCALARS {
            assert!(schema.get(scalar).map(|ty| ty.is_leaf()).unwrap_or(false));
        }
    }
}
