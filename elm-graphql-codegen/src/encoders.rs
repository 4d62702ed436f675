//! Encoders for operation variables, and the Elm record type callers pass them in.

use context::TranslationContext;
use elm_ast::{ElmDecl, ElmExpr, ElmField, ElmFunctionDecl, ElmParameter, ElmType};
use elm_graphql::{EnumType, InputValue, TypeDefinition, TypeRef};
use errors::TranslationError;
use shared::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence {
    /// Always sent.
    Required,
    /// Left out of the request when absent.
    Optional,
    /// Sent as `null` when absent, the server applies the default.
    Defaulted,
}

impl Presence {
    pub fn of(ty: &TypeRef, has_default: bool) -> Presence {
        if has_default {
            Presence::Defaulted
        } else if ty.is_non_null() || ty.is_list() {
            Presence::Required
        } else {
            Presence::Optional
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEncoder {
    pub key: String,
    /// The Elm record field holding the value.
    pub field: String,
    pub presence: Presence,
    pub encoder: Encoder,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Encoder {
    /// `Json.Encode.string`...
    Primitive(&'static str),
    Enum(String),
    List(Box<Encoder>),
    Object(Vec<KeyEncoder>),
}

/// An input type as seen from Elm.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInput {
    pub elm_type: ElmType,
    pub encoder: Encoder,
}

fn primitive_encoder(scalar: &str) -> Result<(&'static str, &'static str), TranslationError> {
    match scalar {
        "Int" => Ok(("Int", "Json.Encode.int")),
        "Float" => Ok(("Float", "Json.Encode.float")),
        "Boolean" => Ok(("Bool", "Json.Encode.bool")),
        "String" => Ok(("String", "Json.Encode.string")),
        "ID" => Ok(("ID", "Json.Encode.string")),
        other => Err(TranslationError::UnsupportedScalar {
            name: other.to_string(),
        }),
    }
}

/// The parameters record of an operation and the encoder of its variables.
pub fn resolve_variables(
    context: &mut TranslationContext,
    variables: &[VariableDefinition],
) -> Result<(Vec<ElmField>, Encoder), TranslationError> {
    let mut fields = Vec::with_capacity(variables.len());
    let mut keys = Vec::with_capacity(variables.len());

    for variable in variables {
        let ty = context.schema.type_from_ast(&variable.var_type);
        let presence = Presence::of(&ty, variable.default_value.is_some());
        let field = elm_safe_name(&variable.name);
        let resolved = resolve_input(context, &ty, &mut Vec::new())?;

        fields.push(ElmField::new(&field, parameter_type(resolved.elm_type, presence)));
        keys.push(KeyEncoder {
            key: variable.name.clone(),
            field,
            presence,
            encoder: resolved.encoder,
        });
    }

    Ok((fields, Encoder::Object(keys)))
}

fn parameter_type(elm_type: ElmType, presence: Presence) -> ElmType {
    match presence {
        Presence::Required => elm_type,
        Presence::Optional | Presence::Defaulted => ElmType::nullable(elm_type),
    }
}

/// `visiting` holds the input objects being resolved, an Elm record alias can not be recursive.
pub fn resolve_input(
    context: &mut TranslationContext,
    ty: &TypeRef,
    visiting: &mut Vec<String>,
) -> Result<ResolvedInput, TranslationError> {
    match ty {
        TypeRef::NonNull(inner) => resolve_input(context, inner, visiting),
        // Nullable elements are encoded as present values.
        TypeRef::List(inner) => {
            let element = resolve_input(context, inner.nullable(), visiting)?;
            Ok(ResolvedInput {
                elm_type: ElmType::list(element.elm_type),
                encoder: Encoder::List(Box::new(element.encoder)),
            })
        }
        TypeRef::Named(name) => match context.type_definition(name)? {
            TypeDefinition::Scalar(scalar) => {
                let (elm_type, encoder) = primitive_encoder(&scalar.name)?;
                Ok(ResolvedInput {
                    elm_type: ElmType::name(elm_type),
                    encoder: Encoder::Primitive(encoder),
                })
            }
            TypeDefinition::Enum(enum_type) => {
                context.register_enum(enum_type);
                Ok(ResolvedInput {
                    elm_type: ElmType::Name(enum_type_name(&enum_type.name)),
                    encoder: Encoder::Enum(enum_type.name.clone()),
                })
            }
            TypeDefinition::InputObject(input_object) => {
                if visiting.contains(&input_object.name) {
                    return Err(TranslationError::unsupported(format!(
                        "recursive input object {}",
                        input_object.name
                    )));
                }

                visiting.push(input_object.name.clone());
                let resolved = resolve_input_fields(context, &input_object.fields, visiting);
                visiting.pop();
                let (fields, keys) = resolved?;

                Ok(ResolvedInput {
                    elm_type: ElmType::record(fields),
                    encoder: Encoder::Object(keys),
                })
            }
            other => Err(TranslationError::unsupported(format!(
                "{} used as an input type",
                other.name()
            ))),
        },
    }
}

fn resolve_input_fields(
    context: &mut TranslationContext,
    input_fields: &[InputValue],
    visiting: &mut Vec<String>,
) -> Result<(Vec<ElmField>, Vec<KeyEncoder>), TranslationError> {
    let mut fields = Vec::with_capacity(input_fields.len());
    let mut keys = Vec::with_capacity(input_fields.len());

    for input_field in input_fields {
        // Only variable defaults are sent as `null`, the server fills in field defaults.
        let presence = Presence::of(&input_field.value_type, false);
        let field = elm_safe_name(&input_field.name);
        let resolved = resolve_input(context, &input_field.value_type, visiting)?;

        fields.push(ElmField::new(&field, parameter_type(resolved.elm_type, presence)));
        keys.push(KeyEncoder {
            key: input_field.name.clone(),
            field,
            presence,
            encoder: resolved.encoder,
        });
    }

    Ok((fields, keys))
}

impl Encoder {
    /// The encoder as a function, lambda variables are numbered by nesting `depth`.
    fn function(&self, depth: usize) -> String {
        match self {
            Encoder::Primitive(encoder) => encoder.to_string(),
            Encoder::Enum(name) => enum_encoder_name(name),
            other => {
                let variable = format!("v{}", depth);
                format!("(\\{} -> {})", variable, other.apply(&variable, depth + 1))
            }
        }
    }

    /// The encoder applied to the Elm expression `value`.
    pub fn apply(&self, value: &str, depth: usize) -> String {
        match self {
            Encoder::Primitive(_) | Encoder::Enum(_) => {
                format!("{} {}", self.function(depth), value)
            }
            Encoder::List(element) => format!(
                "Json.Encode.list (List.map {} {})",
                element.function(depth),
                value
            ),
            Encoder::Object(keys) if keys.is_empty() => "Json.Encode.object []".to_string(),
            Encoder::Object(keys) => {
                let pairs: Vec<String> = keys
                    .iter()
                    .map(|key| key.apply(value, depth))
                    .collect();
                format!(
                    "Json.Encode.object (List.filterMap identity [ {} ])",
                    pairs.join(", ")
                )
            }
        }
    }
}

impl KeyEncoder {
    /// A `Maybe (String, Value)`, `Nothing` leaves the key out.
    fn apply(&self, record: &str, depth: usize) -> String {
        let value = format!("{}.{}", record, self.field);
        match self.presence {
            Presence::Required => format!(
                "Just (\"{}\", {})",
                self.key,
                self.encoder.apply(&value, depth)
            ),
            Presence::Optional => format!(
                "maybeEncode \"{}\" {} {}",
                self.key,
                self.encoder.function(depth),
                value
            ),
            Presence::Defaulted => format!(
                "Just (\"{}\", Maybe.withDefault Json.Encode.null (Maybe.map {} {}))",
                self.key,
                self.encoder.function(depth),
                value
            ),
        }
    }
}

pub fn enum_encoder(enum_type: &EnumType) -> ElmDecl {
    let mut body = String::from("case item of");
    for value in &enum_type.values {
        body.push_str(&format!(
            "\n    {} -> Json.Encode.string \"{}\"",
            enum_tag(&value.name),
            value.name
        ));
    }

    ElmDecl::Function(ElmFunctionDecl {
        name: enum_encoder_name(&enum_type.name),
        parameters: vec![ElmParameter {
            name: "item".to_string(),
            parameter_type: ElmType::Name(enum_type_name(&enum_type.name)),
        }],
        return_type: ElmType::name("Json.Encode.Value"),
        body: ElmExpr::new(body),
    })
}
