use elm_graphql::SchemaError;
use graphql_parser::query::ParseError;

#[derive(Debug, Fail)]
pub enum TranslationError {
    #[fail(display = "Invalid query document: {}", message)]
    InvalidQuery { message: String },
    #[fail(display = "GraphQL schema does not define {} '{}'", operation, name)]
    UnknownOperation { operation: &'static str, name: String },
    #[fail(display = "Unknown GraphQL field: {} on {}", field, parent)]
    UnknownField { parent: String, field: String },
    #[fail(display = "Unknown fragment: {}", name)]
    UnknownFragment { name: String },
    #[fail(display = "Unknown GraphQL type: {}", name)]
    UnknownType { name: String },
    #[fail(display = "not a leaf type: {}", name)]
    NotALeafType { name: String },
    #[fail(display = "not implemented: {}", construct)]
    Unsupported { construct: String },
    #[fail(display = "Unsupported scalar type: {}", name)]
    UnsupportedScalar { name: String },
    #[fail(display = "Invalid schema")]
    Schema(#[cause] SchemaError),
    #[fail(
        display = "{} (should not happen, if you see this it is a bug, a report would be very appreciated)",
        message
    )]
    Internal { message: &'static str },
}

impl TranslationError {
    pub fn unsupported<S: Into<String>>(construct: S) -> TranslationError {
        TranslationError::Unsupported {
            construct: construct.into(),
        }
    }
}

impl From<ParseError> for TranslationError {
    fn from(err: ParseError) -> TranslationError {
        TranslationError::InvalidQuery {
            message: err.to_string(),
        }
    }
}

impl From<SchemaError> for TranslationError {
    fn from(err: SchemaError) -> TranslationError {
        TranslationError::Schema(err)
    }
}
