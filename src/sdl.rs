//! Building a [`Schema`](../struct.Schema.html) from a GraphQL schema definition document.

use errors::SchemaError;
use graphql_parser;
use graphql_parser::schema;
use schema::*;

impl Schema {
    pub fn from_sdl(sdl: &str) -> Result<Schema, SchemaError> {
        let document = graphql_parser::parse_schema::<String>(sdl).map_err(|err| {
            SchemaError::SchemaParse {
                message: err.to_string(),
            }
        })?;
        let mut schema = Schema::new();
        extract_definitions(&document, &mut schema)?;
        Ok(schema)
    }
}

fn extract_definitions<'a>(
    document: &schema::Document<'a, String>,
    schema: &mut Schema,
) -> Result<(), SchemaError> {
    let mut schema_definition = None;
    let mut implementors: Vec<(String, Vec<String>)> = Vec::new();

    for definition in document.definitions.iter() {
        match definition {
            schema::Definition::TypeDefinition(type_def) => match type_def {
                schema::TypeDefinition::Object(object_type) => {
                    implementors.push((
                        object_type.name.clone(),
                        object_type.implements_interfaces.clone(),
                    ));
                    schema.insert_type(TypeDefinition::Object(ObjectType {
                        name: object_type.name.clone(),
                        description: object_type.description.clone(),
                        fields: convert_fields(&object_type.fields, schema),
                        interfaces: object_type.implements_interfaces.clone(),
                    }));
                }
                schema::TypeDefinition::Interface(interface_type) => {
                    schema.insert_type(TypeDefinition::Interface(InterfaceType {
                        name: interface_type.name.clone(),
                        description: interface_type.description.clone(),
                        fields: convert_fields(&interface_type.fields, schema),
                        possible_types: Vec::new(),
                    }));
                }
                schema::TypeDefinition::Enum(enum_type) => {
                    schema.insert_type(TypeDefinition::Enum(EnumType {
                        name: enum_type.name.clone(),
                        description: enum_type.description.clone(),
                        values: enum_type
                            .values
                            .iter()
                            .map(|value| EnumValue {
                                name: value.name.clone(),
                                description: value.description.clone(),
                            })
                            .collect(),
                    }));
                }
                schema::TypeDefinition::InputObject(input_object_type) => {
                    schema.insert_type(TypeDefinition::InputObject(InputObjectType {
                        name: input_object_type.name.clone(),
                        description: input_object_type.description.clone(),
                        fields: convert_input_values(&input_object_type.fields, schema),
                    }));
                }
                schema::TypeDefinition::Scalar(scalar_type) => {
                    schema.insert_type(TypeDefinition::Scalar(ScalarType {
                        name: scalar_type.name.clone(),
                        description: scalar_type.description.clone(),
                    }));
                }
                schema::TypeDefinition::Union(union_type) => {
                    schema.insert_type(TypeDefinition::Union(UnionType {
                        name: union_type.name.clone(),
                        description: union_type.description.clone(),
                        types: union_type.types.clone(),
                    }));
                }
            },
            schema::Definition::SchemaDefinition(definition) => {
                schema_definition = Some(definition);
            }
            schema::Definition::TypeExtension(_) => {
                return Err(SchemaError::Unsupported {
                    construct: "type extension",
                })
            }
            // Directives only matter to servers.
            schema::Definition::DirectiveDefinition(_) => (),
        }
    }

    // Interfaces learn about their implementors once every object is known.
    for (object_name, interfaces) in implementors {
        for interface_name in interfaces {
            if let Some(TypeDefinition::Interface(mut interface_type)) =
                schema.get(&interface_name).cloned()
            {
                interface_type.possible_types.push(object_name.clone());
                schema.insert_type(TypeDefinition::Interface(interface_type));
            }
        }
    }

    match schema_definition {
        Some(definition) => {
            schema.set_root_type(OperationKind::Query, definition.query.clone());
            schema.set_root_type(OperationKind::Mutation, definition.mutation.clone());
            schema.set_root_type(OperationKind::Subscription, definition.subscription.clone());
        }
        None => {
            for &(kind, default_name) in &[
                (OperationKind::Query, "Query"),
                (OperationKind::Mutation, "Mutation"),
                (OperationKind::Subscription, "Subscription"),
            ] {
                if schema.get(default_name).is_some() {
                    schema.set_root_type(kind, Some(default_name.to_string()));
                }
            }
        }
    }

    if schema.root_type_name(OperationKind::Query).is_none() {
        return Err(SchemaError::MissingQueryType);
    }

    Ok(())
}

fn convert_fields<'a>(fields: &[schema::Field<'a, String>], schema: &Schema) -> Vec<Field> {
    fields
        .iter()
        .map(|field| Field {
            name: field.name.clone(),
            description: field.description.clone(),
            arguments: convert_input_values(&field.arguments, schema),
            field_type: schema.type_from_ast(&field.field_type),
        })
        .collect()
}

fn convert_input_values<'a>(
    values: &[schema::InputValue<'a, String>],
    schema: &Schema,
) -> Vec<InputValue> {
    values
        .iter()
        .map(|value| InputValue {
            name: value.name.clone(),
            description: value.description.clone(),
            value_type: schema.type_from_ast(&value.value_type),
            default_value: value
                .default_value
                .as_ref()
                .map(|default| format!("{}", default)),
        })
        .collect()
}
