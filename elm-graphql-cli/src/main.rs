extern crate elm_graphql;
extern crate elm_graphql_codegen;
#[macro_use]
extern crate failure;
extern crate glob;
extern crate heck;
extern crate reqwest;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json as json;
extern crate structopt;
#[macro_use]
extern crate tracing;
extern crate tracing_subscriber;

mod config;
mod fetch;

use config::{ElmPackage, GraphQLConfig, ELM_PACKAGE};
use elm_graphql_codegen::{query_to_elm, Options};
use failure::Error;
use glob::MatchOptions;
use heck::CamelCase;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, StructOpt)]
#[structopt(name = "elm-graphql", about = "Generates Elm modules from GraphQL queries")]
enum Command {
    /// Configure the GraphQL endpoint of the Elm package in the current directory
    #[structopt(name = "init")]
    Init {
        /// URL of the GraphQL endpoint
        endpoint: String,
        /// URL of the schema endpoint, if different
        #[structopt(long)]
        schema: Option<String>,
        /// HTTP verb of the requests (GET by default)
        #[structopt(long)]
        method: Option<String>,
    },
    /// Generate an Elm module next to every GraphQL query file
    #[structopt(name = "generate")]
    Generate(Generate),
}

#[derive(Debug, StructOpt)]
struct Generate {
    /// Query files, every `.graphql` file below the current directory by default
    #[structopt(parse(from_os_str))]
    files: Vec<PathBuf>,
    #[structopt(long)]
    endpoint: Option<String>,
    #[structopt(long)]
    schema: Option<String>,
    #[structopt(long)]
    method: Option<String>,
    /// Read the schema from an introspection result instead of asking the server
    #[structopt(long, parse(from_os_str))]
    introspection: Option<PathBuf>,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Command::from_args() {
        Command::Init {
            endpoint,
            schema,
            method,
        } => init(GraphQLConfig {
            endpoint,
            schema,
            method,
        }),
        Command::Generate(generate) => run_generate(generate),
    }
}

fn init(config: GraphQLConfig) -> Result<(), Error> {
    let mut package = ElmPackage::load(Path::new(ELM_PACKAGE))?;

    // Checks that the endpoint works.
    fetch::fetch_schema(config.introspection_url(), &config.method())?;

    package.set_graphql_config(&config)?;
    package.save()?;

    println!("Success! You should now run `elm package install jahewson/elm-graphql-module`.");
    Ok(())
}

fn run_generate(generate: Generate) -> Result<(), Error> {
    let package_path = Path::new(ELM_PACKAGE);
    let configured = if package_path.exists() {
        ElmPackage::load(package_path)?.graphql_config()?
    } else {
        None
    };
    let config = GraphQLConfig::resolve(
        configured,
        generate.endpoint,
        generate.schema,
        generate.method,
    )?;

    let schema = match &generate.introspection {
        Some(path) => fetch::read_schema(path)?,
        None => fetch::fetch_schema(config.introspection_url(), &config.method())?,
    };

    let files = if generate.files.is_empty() {
        find_query_files()?
    } else {
        generate.files
    };

    for file in files.iter() {
        let module_name = module_name(file)
            .ok_or_else(|| format_err!("{} is not a valid query file name", file.display()))?;
        let options = Options::new(&module_name)
            .endpoint_url(&config.endpoint)
            .method(&config.method());

        let query = fs::read_to_string(file)?;
        let elm = query_to_elm(&query, &schema, &options)
            .map_err(|err| format_err!("{}: {}", file.display(), err))?;

        let output = file.with_extension("elm");
        fs::write(&output, elm)?;
        info!(query = %file.display(), module = %output.display(), "generated module");
        format_module(&output);
    }

    let plural = if files.len() == 1 { "" } else { "s" };
    println!("Success! Generated {} module{}.", files.len(), plural);
    Ok(())
}

/// Every `.graphql` file below the current directory, hidden directories excluded.
fn find_query_files() -> Result<Vec<PathBuf>, Error> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with("**/*.graphql", options)? {
        files.push(entry?);
    }
    Ok(files)
}

/// `star-wars.graphql` -> `StarWars`
fn module_name(file: &Path) -> Option<String> {
    let stem = file.file_stem()?.to_str()?;
    let name = stem.to_camel_case();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Runs elm-format on the generated module, when it is installed.
fn format_module(path: &Path) {
    match process::Command::new("elm-format")
        .arg(path)
        .arg("--yes")
        .output()
    {
        Ok(ref output) if output.status.success() => (),
        Ok(output) => warn!(
            module = %path.display(),
            stderr = %String::from_utf8_lossy(&output.stderr),
            "elm-format failed"
        ),
        Err(err) => debug!(error = %err, "elm-format is not available"),
    }
}
