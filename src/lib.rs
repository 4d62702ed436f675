//! The GraphQL schema as seen by the Elm code generator: a type graph that can be built
//! from a schema definition document or from the result of an introspection query.

extern crate failure;
#[macro_use]
extern crate failure_derive;
extern crate graphql_parser;
extern crate indexmap;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[cfg_attr(test, macro_use)]
extern crate serde_json as json;

pub mod errors;
pub mod introspection;
mod schema;
mod sdl;

pub use errors::SchemaError;
pub use introspection::INTROSPECTION_QUERY;
pub use schema::*;
