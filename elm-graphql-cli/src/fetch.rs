use elm_graphql::{Schema, INTROSPECTION_QUERY};
use failure::Error;
use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use std::fs;
use std::path::Path;

/// Runs the introspection query against `url` and builds the schema from the answer.
///
/// `GET` requests carry the query as the `query` URL parameter, every other verb posts it
/// as a JSON body.
pub fn fetch_schema(url: &str, method: &str) -> Result<Schema, Error> {
    info!(url = %url, method = %method, "fetching the GraphQL schema");
    let client = Client::new();

    let request = if method == "GET" {
        client.get(url).query(&[("query", minified_introspection_query())])
    } else {
        client
            .request(Method::from_bytes(method.as_bytes())?, url)
            .json(&json!({ "query": INTROSPECTION_QUERY }))
    };

    let response = request.send()?;
    let status = response.status();
    let body = response.text()?;

    if status != StatusCode::OK {
        return Err(format_err!(
            "The GraphQL server at {} responded with an error.\n{}\n\n{}",
            url,
            status,
            body.trim()
        ));
    }

    Ok(Schema::from_introspection(&body)?)
}

/// Reads a saved introspection result.
pub fn read_schema(path: &Path) -> Result<Schema, Error> {
    debug!(path = %path.display(), "reading the GraphQL schema");
    let text = fs::read_to_string(path)?;
    Ok(Schema::from_introspection(&text)?)
}

fn minified_introspection_query() -> String {
    INTROSPECTION_QUERY
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
