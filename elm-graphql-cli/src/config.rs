use failure::Error;
use json;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ELM_PACKAGE: &str = "elm-package.json";

const GRAPHQL_SECTION: &str = "graphql";

/// The `graphql` section of `elm-package.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLConfig {
    pub endpoint: String,
    /// Where to send the introspection query, when it is not the endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl GraphQLConfig {
    pub fn introspection_url(&self) -> &str {
        self.schema.as_ref().unwrap_or(&self.endpoint)
    }

    pub fn method(&self) -> String {
        self.method
            .as_ref()
            .map(|method| method.to_uppercase())
            .unwrap_or_else(|| "GET".to_string())
    }

    /// Command line flags take precedence over the configured values.
    pub fn resolve(
        configured: Option<GraphQLConfig>,
        endpoint: Option<String>,
        schema: Option<String>,
        method: Option<String>,
    ) -> Result<GraphQLConfig, Error> {
        let (configured_endpoint, configured_schema, configured_method) = match configured {
            Some(config) => (Some(config.endpoint), config.schema, config.method),
            None => (None, None, None),
        };

        let endpoint = endpoint.or(configured_endpoint).ok_or_else(|| {
            format_err!(
                "elm-graphql is not configured for this package. You need to run `elm-graphql init <URL>`."
            )
        })?;

        Ok(GraphQLConfig {
            endpoint,
            schema: schema.or(configured_schema),
            method: method.or(configured_method),
        })
    }
}

/// `elm-package.json`, keeping every key we do not manage as it was.
#[derive(Debug)]
pub struct ElmPackage {
    path: PathBuf,
    contents: json::Map<String, json::Value>,
}

impl ElmPackage {
    pub fn load(path: &Path) -> Result<ElmPackage, Error> {
        if !path.exists() {
            return Err(format_err!("expected {}", path.display()));
        }

        let text = fs::read_to_string(path)?;
        ElmPackage::parse(path, &text)
    }

    pub fn parse(path: &Path, text: &str) -> Result<ElmPackage, Error> {
        match json::from_str(text)? {
            json::Value::Object(contents) => Ok(ElmPackage {
                path: path.to_path_buf(),
                contents,
            }),
            _ => Err(format_err!("{} is not a JSON object", path.display())),
        }
    }

    pub fn graphql_config(&self) -> Result<Option<GraphQLConfig>, Error> {
        match self.contents.get(GRAPHQL_SECTION) {
            Some(section) => Ok(Some(json::from_value(section.clone())?)),
            None => Ok(None),
        }
    }

    pub fn set_graphql_config(&mut self, config: &GraphQLConfig) -> Result<(), Error> {
        self.contents
            .insert(GRAPHQL_SECTION.to_string(), json::to_value(config)?);
        Ok(())
    }

    /// Pretty printed with four spaces, the way `elm package` writes it.
    pub fn to_pretty_string(&self) -> Result<String, Error> {
        let mut buffer = Vec::new();
        {
            let formatter = json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = json::Serializer::with_formatter(&mut buffer, formatter);
            json::Value::Object(self.contents.clone()).serialize(&mut serializer)?;
        }
        Ok(String::from_utf8(buffer)?)
    }

    pub fn save(&self) -> Result<(), Error> {
        fs::write(&self.path, self.to_pretty_string()?)?;
        debug!(path = %self.path.display(), "saved package configuration");
        Ok(())
    }
}
