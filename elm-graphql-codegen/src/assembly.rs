//! Puts the declarations of one query document together into an Elm module.

use context::TranslationContext;
use decoders::{decoder_declaration, enum_decoder};
use elm_ast::*;
use elm_graphql::{EnumType, OperationKind, Schema};
use encoders::{enum_encoder, resolve_variables, Encoder};
use errors::TranslationError;
use graphql_parser::query;
use query_text::{elm_string_contents, operation_text};
use shared::*;
use std::collections::HashSet;
use types::{resolve_selection_set, ResolvedSelection};
use Options;

const IMPORTS: &[&str] = &[
    "Task exposing (Task)",
    "Json.Decode exposing (..)",
    "Json.Encode exposing (encode)",
    "Http",
    "GraphQL exposing (apply, maybeEncode, ID)",
];

const ENDPOINT_URL: &str = "endpointUrl";

pub fn translate_document(
    document: &Document,
    schema: &Schema,
    options: &Options,
) -> Result<ElmModule, TranslationError> {
    let mut context = TranslationContext::new(schema, document);
    let mut emitted_fragments = HashSet::new();
    let mut definitions = Vec::new();

    for definition in document.definitions.iter() {
        match definition {
            Definition::Operation(operation) => definitions.extend(translate_operation(
                &mut context,
                operation,
                options,
                &mut emitted_fragments,
            )?),
            Definition::Fragment(fragment) => {
                definitions.extend(translate_fragment(&mut context, fragment)?)
            }
        }
    }

    let mut declarations = Vec::new();
    declarations.extend(context.enums.values().map(enum_declaration));
    declarations.extend(context.enums.values().map(enum_decoder));
    declarations.extend(context.enums.values().map(enum_encoder));
    declarations.extend(
        context
            .unions
            .iter()
            .map(|(name, members)| union_declaration(name, members)),
    );
    declarations.push(endpoint_url(options));
    declarations.extend(definitions);

    let exposing = declarations
        .iter()
        .filter(|declaration| declaration.name() != ENDPOINT_URL)
        .map(|declaration| match declaration {
            ElmDecl::Type(decl) => format!("{}(..)", decl.name),
            other => other.name().to_string(),
        })
        .collect();

    Ok(ElmModule {
        name: options.module_name.clone(),
        exposing,
        imports: IMPORTS.iter().map(|import| import.to_string()).collect(),
        declarations,
    })
}

struct OperationParts<'a> {
    kind: OperationKind,
    name: String,
    variables: &'a [VariableDefinition],
    selection_set: &'a SelectionSet,
}

fn operation_parts<'a>(
    operation: &'a OperationDefinition,
) -> Result<OperationParts<'a>, TranslationError> {
    let (kind, name, variables, selection_set) = match operation {
        query::OperationDefinition::SelectionSet(selection_set) => {
            (OperationKind::Query, None, &[][..], selection_set)
        }
        query::OperationDefinition::Query(query) => (
            OperationKind::Query,
            query.name.as_ref(),
            &query.variable_definitions[..],
            &query.selection_set,
        ),
        query::OperationDefinition::Mutation(mutation) => (
            OperationKind::Mutation,
            mutation.name.as_ref(),
            &mutation.variable_definitions[..],
            &mutation.selection_set,
        ),
        query::OperationDefinition::Subscription(subscription) => {
            return Err(TranslationError::unsupported(format!(
                "subscription {}",
                subscription
                    .name
                    .as_ref()
                    .map(|name| name.as_str())
                    .unwrap_or(ANONYMOUS_OPERATION)
            )))
        }
    };

    Ok(OperationParts {
        kind,
        name: name.cloned().unwrap_or_else(|| ANONYMOUS_OPERATION.to_string()),
        variables,
        selection_set,
    })
}

fn translate_operation<'a>(
    context: &mut TranslationContext<'a>,
    operation: &'a OperationDefinition,
    options: &Options,
    emitted_fragments: &mut HashSet<String>,
) -> Result<Vec<ElmDecl>, TranslationError> {
    let parts = operation_parts(operation)?;
    debug!(operation = %parts.name, kind = parts.kind.as_str(), "translating operation");

    let root = context.root_type(parts.kind, &parts.name)?;
    let selection = context.enter(root.clone(), |context| {
        resolve_selection_set(context, parts.selection_set)
    })?;
    let (parameters, encoder) = resolve_variables(context, parts.variables)?;
    let fragments = context.take_referenced_fragments();
    let query_text = operation_text(context.schema, root.inner_name(), operation, &fragments);

    let result_type = result_type_name(&parts.name);
    let mut declarations = vec![
        ElmDecl::TypeAlias(ElmTypeAliasDecl {
            name: result_type.clone(),
            parameters: Vec::new(),
            aliased: selection.elm_type(None),
        }),
        request_function(&parts, parameters, &encoder, &query_text, options),
        decoder_declaration(&result_decoder_name(&parts.name), &result_type, &selection),
    ];

    for fragment in fragments {
        if !has_aliases(context, fragment) || !emitted_fragments.insert(fragment.name.clone()) {
            continue;
        }
        let selection = resolve_fragment(context, fragment)?;
        declarations.push(decoder_declaration(
            &fragment_decoder_name(&fragment.name),
            &result_type_name(&fragment.name),
            &selection,
        ));
    }

    Ok(declarations)
}

fn request_function(
    parts: &OperationParts,
    parameters: Vec<ElmField>,
    encoder: &Encoder,
    query_text: &str,
    options: &Options,
) -> ElmDecl {
    let parameters = if parameters.is_empty() {
        Vec::new()
    } else {
        vec![ElmParameter {
            name: "params".to_string(),
            parameter_type: ElmType::record(parameters),
        }]
    };

    let body = format!(
        "let\n    graphQLQuery =\n        \"\"\"{query}\"\"\"\n\n    graphQLParams =\n        {params}\nin\n    GraphQL.{kind} \"{method}\" {endpoint} graphQLQuery \"{name}\" (encode 0 graphQLParams) {decoder}",
        query = elm_string_contents(query_text),
        params = encoder.apply("params", 0),
        kind = parts.kind.as_str(),
        method = options.method,
        endpoint = ENDPOINT_URL,
        name = parts.name,
        decoder = result_decoder_name(&parts.name),
    );

    ElmDecl::Function(ElmFunctionDecl {
        name: operation_function_name(&parts.name),
        parameters,
        return_type: ElmType::application(
            "Task",
            vec![
                ElmType::name("Http.Error"),
                ElmType::Name(result_type_name(&parts.name)),
            ],
        ),
        body: ElmExpr::new(body),
    })
}

/// Fragments on unions have no record of their own, their selections go to the members.
fn has_aliases(context: &TranslationContext, fragment: &FragmentDefinition) -> bool {
    !context.is_union(type_condition_name(fragment))
}

fn resolve_fragment<'a>(
    context: &mut TranslationContext<'a>,
    fragment: &'a FragmentDefinition,
) -> Result<ResolvedSelection, TranslationError> {
    let selection = context.enter_fragment(fragment, |context| {
        resolve_selection_set(context, &fragment.selection_set)
    })?;
    // Only operations embed fragments in their query text.
    context.take_referenced_fragments();
    Ok(selection)
}

fn translate_fragment<'a>(
    context: &mut TranslationContext<'a>,
    fragment: &'a FragmentDefinition,
) -> Result<Vec<ElmDecl>, TranslationError> {
    if !has_aliases(context, fragment) {
        debug!(fragment = %fragment.name, "fragment on a union, inlined into the member payloads");
        return Ok(Vec::new());
    }
    debug!(fragment = %fragment.name, "translating fragment");

    let selection = resolve_fragment(context, fragment)?;
    let open_alias = fragment_open_alias_name(&fragment.name);

    Ok(vec![
        ElmDecl::TypeAlias(ElmTypeAliasDecl {
            name: open_alias.clone(),
            parameters: vec!["a".to_string()],
            aliased: selection.elm_type(Some("a")),
        }),
        ElmDecl::TypeAlias(ElmTypeAliasDecl {
            name: result_type_name(&fragment.name),
            parameters: Vec::new(),
            aliased: ElmType::application(&open_alias, vec![ElmType::record(Vec::new())]),
        }),
    ])
}

fn enum_declaration(enum_type: &EnumType) -> ElmDecl {
    ElmDecl::Type(ElmTypeDecl {
        name: enum_type_name(&enum_type.name),
        parameters: Vec::new(),
        constructors: enum_type
            .values
            .iter()
            .map(|value| ElmConstructor {
                name: enum_tag(&value.name),
                arguments: Vec::new(),
            })
            .collect(),
    })
}

fn union_declaration(name: &str, members: &[String]) -> ElmDecl {
    ElmDecl::Type(ElmTypeDecl {
        name: upper_first(name),
        parameters: members
            .iter()
            .map(|member| variant_type_variable(member))
            .collect(),
        constructors: members
            .iter()
            .map(|member| ElmConstructor {
                name: variant_constructor(name, member),
                arguments: vec![ElmType::Name(variant_type_variable(member))],
            })
            .collect(),
    })
}

fn endpoint_url(options: &Options) -> ElmDecl {
    ElmDecl::Function(ElmFunctionDecl {
        name: ENDPOINT_URL.to_string(),
        parameters: Vec::new(),
        return_type: ElmType::name("String"),
        body: ElmExpr::new(format!("\"{}\"", options.endpoint_url)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parse_document;

    const SCHEMA: &str = r##"
        enum Episode { NEWHOPE, EMPIRE, JEDI }

        type Character {
            id: ID!
            name: String
            appearsIn: [Episode]
        }

        type Query {
            hero(episode: Episode): Character
            heroes(episodes: [Episode!]): [Character]
        }
    "##;

    fn translate(text: &str) -> ElmModule {
        let schema = Schema::from_sdl(SCHEMA).unwrap();
        let document = parse_document(text).unwrap();
        translate_document(&document, &schema, &Options::new("Test")).unwrap()
    }

    fn names(module: &ElmModule) -> Vec<&str> {
        module
            .declarations
            .iter()
            .map(|declaration| declaration.name())
            .collect()
    }

    #[test]
    fn declaration_order() {
        let module = translate(
            r##"
            query hero($episode: Episode) { hero(episode: $episode) { ...Names appearsIn } }
            fragment Names on Character { id name }
            "##,
        );

        assert_eq!(
            names(&module),
            vec![
                "Episode",
                "episodeDecoder",
                "episodeEncoder",
                "endpointUrl",
                "HeroResult",
                "hero",
                "heroResult",
                "names",
                "NamesResult_",
                "NamesResult",
            ]
        );
        assert_eq!(
            module.exposing,
            vec![
                "Episode(..)",
                "episodeDecoder",
                "episodeEncoder",
                "HeroResult",
                "hero",
                "heroResult",
                "names",
                "NamesResult_",
                "NamesResult",
            ]
        );
    }

    #[test]
    fn enums_are_declared_once() {
        let module = translate(
            r##"
            query a($episode: Episode) { hero(episode: $episode) { appearsIn } }
            query b($episodes: [Episode!]) { heroes(episodes: $episodes) { appearsIn } }
            "##,
        );

        let episode_declarations = names(&module)
            .into_iter()
            .filter(|name| *name == "Episode" || *name == "episodeDecoder")
            .count();
        assert_eq!(episode_declarations, 2);
    }

    #[test]
    fn fragment_decoders_are_emitted_once() {
        let module = translate(
            r##"
            query a { hero { ...Names } }
            query b { heroes { ...Names } }
            fragment Names on Character { name }
            "##,
        );

        let fragment_decoders = names(&module)
            .into_iter()
            .filter(|name| *name == "names")
            .count();
        assert_eq!(fragment_decoders, 1);
    }

    #[test]
    fn subscriptions_are_unsupported() {
        let schema = Schema::from_sdl(SCHEMA).unwrap();
        let document = parse_document("subscription onHero { hero { id } }").unwrap();

        match translate_document(&document, &schema, &Options::new("Test")) {
            Err(TranslationError::Unsupported { construct }) => {
                assert_eq!(construct, "subscription onHero")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_mutation_root() {
        let schema = Schema::from_sdl(SCHEMA).unwrap();
        let document = parse_document("mutation addHero { hero { id } }").unwrap();

        match translate_document(&document, &schema, &Options::new("Test")) {
            Err(TranslationError::UnknownOperation { operation, name }) => {
                assert_eq!(operation, "mutation");
                assert_eq!(name, "addHero");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
