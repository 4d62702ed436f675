//! Translates GraphQL query documents into Elm 0.17 modules: one record type alias,
//! decoder and request function per operation, plus the enums, unions and fragment
//! aliases they need.

extern crate elm_graphql;
extern crate failure;
#[macro_use]
extern crate failure_derive;
extern crate graphql_parser;
extern crate heck;
extern crate indexmap;
#[macro_use]
extern crate tracing;

#[macro_use]
mod shared;

mod assembly;
mod context;
mod decoders;
pub mod elm_ast;
mod encoders;
pub mod errors;
mod query_text;
mod types;

pub use assembly::translate_document;
pub use errors::TranslationError;
pub use shared::Document;

use elm_graphql::Schema;

/// Where and how the generated request functions reach the GraphQL server.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Name of the generated Elm module.
    pub module_name: String,
    pub endpoint_url: String,
    /// HTTP verb of every request.
    pub method: String,
}

impl Options {
    pub fn new(module_name: &str) -> Options {
        Options {
            module_name: module_name.to_string(),
            endpoint_url: "/graphql".to_string(),
            method: "GET".to_string(),
        }
    }

    pub fn endpoint_url(mut self, endpoint_url: &str) -> Options {
        self.endpoint_url = endpoint_url.to_string();
        self
    }

    pub fn method(mut self, method: &str) -> Options {
        self.method = method.to_uppercase();
        self
    }
}

pub fn parse_document(text: &str) -> Result<Document, TranslationError> {
    Ok(graphql_parser::parse_query::<String>(text)?.into_static())
}

/// Parses `text` and renders the Elm module translating it.
pub fn query_to_elm(text: &str, schema: &Schema, options: &Options) -> Result<String, TranslationError> {
    let document = parse_document(text)?;
    let module = translate_document(&document, schema, options)?;
    info!(
        module = %module.name,
        declarations = module.declarations.len(),
        "translated query document"
    );
    Ok(module.to_string())
}
