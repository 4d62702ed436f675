//! These types are directly adapted from the introspection schema.
//! See https://github.com/facebook/graphql/blob/master/spec/Section%204%20--%20Introspection.md

use errors::SchemaError;
use json;
use schema::*;

/// The query sent to a GraphQL endpoint to learn its schema.
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::Interface => "INTERFACE",
            TypeKind::Union => "UNION",
            TypeKind::Enum => "ENUM",
            TypeKind::InputObject => "INPUT_OBJECT",
            TypeKind::List => "LIST",
            TypeKind::NonNull => "NON_NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionTypeRef {
    pub kind: TypeKind,
    pub name: Option<String>,
    pub of_type: Option<Box<IntrospectionTypeRef>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputValue {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_: IntrospectionTypeRef,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumValue {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionField {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub type_: IntrospectionTypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionType {
    pub kind: TypeKind,
    pub name: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<IntrospectionField>>,
    pub input_fields: Option<Vec<IntrospectionInputValue>>,
    pub interfaces: Option<Vec<IntrospectionTypeRef>>,
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
    pub possible_types: Option<Vec<IntrospectionTypeRef>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedTypeRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    pub query_type: Option<NamedTypeRef>,
    pub mutation_type: Option<NamedTypeRef>,
    pub subscription_type: Option<NamedTypeRef>,
    pub types: Vec<IntrospectionType>,
}

impl Schema {
    /// Builds a schema from an introspection result. Both the full response
    /// (`{"data": {"__schema": ...}}`) and the bare `{"__schema": ...}` object are accepted.
    pub fn from_introspection(introspection: &str) -> Result<Schema, SchemaError> {
        let value: json::Value = json::from_str(introspection)?;
        Schema::from_introspection_value(value)
    }

    pub fn from_introspection_value(mut value: json::Value) -> Result<Schema, SchemaError> {
        if let Some(data) = value.get_mut("data").map(|data| data.take()) {
            value = data;
        }

        let schema_value = value
            .get_mut("__schema")
            .map(|schema| schema.take())
            .ok_or(SchemaError::MissingSchema)?;
        let introspected: IntrospectionSchema = json::from_value(schema_value)?;
        introspected.into_schema()
    }
}

impl IntrospectionSchema {
    pub fn into_schema(self) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();

        let query_type = self.query_type
            .map(|root| root.name)
            .ok_or(SchemaError::MissingQueryType)?;
        schema.set_root_type(OperationKind::Query, Some(query_type));
        schema.set_root_type(
            OperationKind::Mutation,
            self.mutation_type.map(|root| root.name),
        );
        schema.set_root_type(
            OperationKind::Subscription,
            self.subscription_type.map(|root| root.name),
        );

        for introspected in self.types {
            let name = match introspected.name {
                Some(ref name) if name.starts_with("__") => continue,
                Some(ref name) => name.clone(),
                None => {
                    return Err(SchemaError::MissingTypeName {
                        kind: introspected.kind.as_str(),
                    })
                }
            };
            schema.insert_type(convert_type(name, introspected)?);
        }

        Ok(schema)
    }
}

fn convert_type(name: String, introspected: IntrospectionType) -> Result<TypeDefinition, SchemaError> {
    let IntrospectionType {
        kind,
        description,
        fields,
        input_fields,
        interfaces,
        enum_values,
        possible_types,
        ..
    } = introspected;

    let definition = match kind {
        TypeKind::Scalar => TypeDefinition::Scalar(ScalarType { name, description }),
        TypeKind::Enum => TypeDefinition::Enum(EnumType {
            name,
            description,
            values: enum_values
                .unwrap_or_default()
                .into_iter()
                .map(|value| EnumValue {
                    name: value.name,
                    description: value.description,
                })
                .collect(),
        }),
        TypeKind::Object => TypeDefinition::Object(ObjectType {
            name,
            description,
            fields: convert_fields(fields.unwrap_or_default())?,
            interfaces: named_refs(interfaces.unwrap_or_default())?,
        }),
        TypeKind::Interface => TypeDefinition::Interface(InterfaceType {
            name,
            description,
            fields: convert_fields(fields.unwrap_or_default())?,
            possible_types: named_refs(possible_types.unwrap_or_default())?,
        }),
        TypeKind::Union => TypeDefinition::Union(UnionType {
            name,
            description,
            types: named_refs(possible_types.unwrap_or_default())?,
        }),
        TypeKind::InputObject => TypeDefinition::InputObject(InputObjectType {
            name,
            description,
            fields: convert_input_values(input_fields.unwrap_or_default())?,
        }),
        TypeKind::List | TypeKind::NonNull => {
            return Err(SchemaError::UnknownTypeKind {
                kind: format!("{} as a named type", kind.as_str()),
            })
        }
    };

    Ok(definition)
}

fn convert_fields(fields: Vec<IntrospectionField>) -> Result<Vec<Field>, SchemaError> {
    fields
        .into_iter()
        .map(|field| {
            Ok(Field {
                name: field.name,
                description: field.description,
                arguments: convert_input_values(field.args)?,
                field_type: convert_type_ref(&field.type_)?,
            })
        })
        .collect()
}

fn convert_input_values(values: Vec<IntrospectionInputValue>) -> Result<Vec<InputValue>, SchemaError> {
    values
        .into_iter()
        .map(|value| {
            Ok(InputValue {
                value_type: convert_type_ref(&value.type_)?,
                name: value.name,
                description: value.description,
                default_value: value.default_value,
            })
        })
        .collect()
}

fn named_refs(refs: Vec<IntrospectionTypeRef>) -> Result<Vec<String>, SchemaError> {
    refs.into_iter()
        .map(|reference| {
            let kind = reference.kind.as_str();
            reference.name.ok_or(SchemaError::MissingTypeName { kind })
        })
        .collect()
}

pub fn convert_type_ref(reference: &IntrospectionTypeRef) -> Result<TypeRef, SchemaError> {
    match reference.kind {
        TypeKind::List | TypeKind::NonNull => {
            let kind = reference.kind.as_str();
            let inner = reference
                .of_type
                .as_ref()
                .ok_or(SchemaError::MissingOfType { kind })?;
            let inner = convert_type_ref(inner)?;
            if reference.kind == TypeKind::List {
                Ok(TypeRef::list(inner))
            } else {
                Ok(TypeRef::non_null(inner))
            }
        }
        _ => reference
            .name
            .clone()
            .map(TypeRef::Named)
            .ok_or(SchemaError::MissingTypeName {
                kind: reference.kind.as_str(),
            }),
    }
}
