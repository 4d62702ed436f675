use json;

#[derive(Debug, Fail)]
pub enum SchemaError {
    #[fail(display = "Invalid introspection result")]
    InvalidIntrospection(#[cause] json::Error),
    #[fail(display = "The introspection result has no __schema field")]
    MissingSchema,
    #[fail(display = "The schema has no query type")]
    MissingQueryType,
    #[fail(display = "Unknown type kind: {}", kind)]
    UnknownTypeKind { kind: String },
    #[fail(
        display = "A {} type reference has no name (should not happen, if you see this it is a bug in the schema source)",
        kind
    )]
    MissingTypeName { kind: &'static str },
    #[fail(display = "A {} type reference has no ofType", kind)]
    MissingOfType { kind: &'static str },
    #[fail(display = "Invalid schema definition: {}", message)]
    SchemaParse { message: String },
    #[fail(display = "Unsupported schema construct: {}", construct)]
    Unsupported { construct: &'static str },
}

impl From<json::Error> for SchemaError {
    fn from(err: json::Error) -> SchemaError {
        SchemaError::InvalidIntrospection(err)
    }
}
