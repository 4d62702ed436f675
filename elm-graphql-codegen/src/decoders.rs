//! Elm 0.17 `Json.Decode` decoders mirroring the resolved response types.

use elm_ast::{ElmDecl, ElmExpr, ElmFunctionDecl, ElmType};
use elm_graphql::EnumType;
use shared::*;
use types::{Leaf, ResolvedField, ResolvedSelection, ResolvedVariants, Shape, Wrapper};

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq)]
pub enum Decoder {
    /// A decoder in scope: `string`, `episodeDecoder`...
    Named(String),
    List(Box<Decoder>),
    Maybe(Box<Decoder>),
    /// `("key" := decoder)`
    Field(String, Box<Decoder>),
    Record(RecordDecoder),
    Union(Vec<RecordDecoder>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecoder {
    /// Wraps the record, for union payloads. Also the discriminator value then.
    pub constructor: Option<(String, String)>,
    pub fields: Vec<(String, Decoder)>,
}

impl Decoder {
    fn is_atom(&self) -> bool {
        match self {
            Decoder::Named(_) | Decoder::Field(..) => true,
            _ => false,
        }
    }

    fn render_atom(&self, depth: usize) -> String {
        if self.is_atom() {
            self.render(depth)
        } else {
            format!("({})", self.render(depth))
        }
    }

    /// Renders the decoder, `depth` being the indentation level continuation lines start at.
    pub fn render(&self, depth: usize) -> String {
        match self {
            Decoder::Named(name) => name.clone(),
            Decoder::List(inner) => format!("list {}", inner.render_atom(depth)),
            Decoder::Maybe(inner) => format!("maybe {}", inner.render_atom(depth)),
            Decoder::Field(key, inner) => {
                let inner = match **inner {
                    Decoder::Record(_) | Decoder::Union(_) => inner.render_atom(depth + 1),
                    _ => inner.render(depth + 1),
                };
                format!("(\"{}\" := {})", key, inner)
            }
            Decoder::Record(record) => record.render(depth),
            Decoder::Union(branches) => render_union(branches, depth),
        }
    }
}

impl RecordDecoder {
    fn render(&self, depth: usize) -> String {
        let wrap = |record: String| match &self.constructor {
            Some((constructor, _)) => format!("{} {}", constructor, record),
            None => record,
        };

        if self.fields.is_empty() {
            let record = wrap("{}".to_string());
            return match self.constructor {
                Some(_) => format!("succeed ({})", record),
                None => format!("succeed {}", record),
            };
        }

        let names: Vec<&str> = self.fields.iter().map(|(name, _)| name.as_str()).collect();
        let assignments: Vec<String> = names
            .iter()
            .map(|name| format!("{} = {}", name, name))
            .collect();
        let shape = format!(
            "(\\{} -> {})",
            names.join(" "),
            wrap(format!("{{ {} }}", assignments.join(", ")))
        );

        let indent = INDENT.repeat(depth + 1);
        let mut rendered = format!("map {}", shape);
        for (i, (_, decoder)) in self.fields.iter().enumerate() {
            if i == 0 {
                rendered.push(' ');
                rendered.push_str(&decoder.render_atom(depth + 1));
            } else {
                rendered.push_str(&format!(
                    "\n{}`apply` {}",
                    indent,
                    decoder.render_atom(depth + 1)
                ));
            }
        }
        rendered
    }
}

fn render_union(branches: &[RecordDecoder], depth: usize) -> String {
    let indent = INDENT.repeat(depth + 1);
    let mut rendered = String::from("(\"__typename\" := string) `andThen` (\\typename -> case typename of");

    for branch in branches {
        let typename = branch
            .constructor
            .as_ref()
            .map(|(_, typename)| typename.as_str())
            .unwrap_or_default();
        rendered.push_str(&format!(
            "\n{}\"{}\" -> {}",
            indent,
            typename,
            branch.render(depth + 2)
        ));
    }

    rendered.push_str(&format!("\n{}_ -> fail \"Unexpected union type\")", indent));
    rendered
}

/// The decoder of a selection: its own fields followed by the ones its spreads bring in.
pub fn selection_decoder(selection: &ResolvedSelection, constructor: Option<(String, String)>) -> RecordDecoder {
    RecordDecoder {
        constructor,
        fields: selection
            .all_fields()
            .map(|field| (field.name.clone(), field_decoder(field)))
            .collect(),
    }
}

fn variants_decoder(variants: &ResolvedVariants) -> Decoder {
    Decoder::Union(
        variants
            .variants
            .iter()
            .map(|(member, payload)| {
                let constructor = variant_constructor(&variants.type_name, member);
                selection_decoder(payload, Some((constructor, member.clone())))
            })
            .collect(),
    )
}

fn shape_decoder(shape: &Shape) -> Decoder {
    match shape {
        Shape::Leaf(Leaf::Scalar { decoder, .. }) => Decoder::Named(decoder.to_string()),
        Shape::Leaf(Leaf::Enum(name)) => Decoder::Named(enum_decoder_name(name)),
        Shape::Object(selection) => Decoder::Record(selection_decoder(selection, None)),
        Shape::Variants(variants) => variants_decoder(variants),
    }
}

/// A nullable field decodes with `maybe` around the field lookup, so a missing key also
/// decodes to `Nothing`. Inner wrappers apply to the field value.
pub fn field_decoder(field: &ResolvedField) -> Decoder {
    let (outer_maybe, inner_wrappers) = match field.wrappers.split_first() {
        Some((Wrapper::Nullable, rest)) => (true, rest),
        _ => (false, &field.wrappers[..]),
    };

    let value = inner_wrappers
        .iter()
        .rev()
        .fold(shape_decoder(&field.shape), |inner, wrapper| match wrapper {
            Wrapper::List => Decoder::List(Box::new(inner)),
            Wrapper::Nullable => Decoder::Maybe(Box::new(inner)),
        });

    let decoder = Decoder::Field(field.key.clone(), Box::new(value));
    if outer_maybe {
        Decoder::Maybe(Box::new(decoder))
    } else {
        decoder
    }
}

/// `heroResult : Decoder HeroResult`, or the decoder of a fragment.
pub fn decoder_declaration(name: &str, result_type: &str, selection: &ResolvedSelection) -> ElmDecl {
    ElmDecl::Function(ElmFunctionDecl {
        name: name.to_string(),
        parameters: Vec::new(),
        return_type: ElmType::application("Decoder", vec![ElmType::name(result_type)]),
        body: ElmExpr::new(selection_decoder(selection, None).render(0)),
    })
}

pub fn enum_decoder(enum_type: &EnumType) -> ElmDecl {
    let mut body = String::from("customDecoder string (\\s ->\n    case s of");
    for value in &enum_type.values {
        body.push_str(&format!(
            "\n        \"{}\" -> Ok {}",
            value.name,
            enum_tag(&value.name)
        ));
    }
    body.push_str(&format!(
        "\n        _ -> Err \"Unknown {}\")",
        enum_type.name
    ));

    ElmDecl::Function(ElmFunctionDecl {
        name: enum_decoder_name(&enum_type.name),
        parameters: Vec::new(),
        return_type: ElmType::application(
            "Decoder",
            vec![ElmType::Name(enum_type_name(&enum_type.name))],
        ),
        body: ElmExpr::new(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use context::TranslationContext;
    use elm_graphql::{EnumValue, Schema, TypeRef};
    use graphql_parser::parse_query;
    use graphql_parser::query;
    use types::resolve_selection_set;

    fn leaf(key: &str, wrappers: Vec<Wrapper>, leaf: Leaf) -> ResolvedField {
        ResolvedField {
            key: key.to_string(),
            name: elm_safe_name(key),
            wrappers,
            shape: Shape::Leaf(leaf),
        }
    }

    fn string() -> Leaf {
        Leaf::Scalar {
            elm_type: "String",
            decoder: "string",
        }
    }

    #[test]
    fn leaf_decoders() {
        let name = leaf("name", vec![Wrapper::Nullable], string());
        assert_eq!(field_decoder(&name).render(0), "maybe (\"name\" := string)");

        let appears_in = leaf(
            "appearsIn",
            vec![Wrapper::List],
            Leaf::Enum("Episode".to_string()),
        );
        assert_eq!(
            field_decoder(&appears_in).render(0),
            "(\"appearsIn\" := list episodeDecoder)"
        );

        let id = leaf("id", vec![], string());
        assert_eq!(field_decoder(&id).render(0), "(\"id\" := string)");
    }

    #[test]
    fn record_decoder_fields_follow_the_record() {
        let selection = ResolvedSelection {
            fields: vec![
                leaf("name", vec![Wrapper::Nullable], string()),
                leaf("type", vec![], string()),
            ],
            spreads: vec![],
            spread_fields: vec![],
        };

        assert_eq!(
            selection_decoder(&selection, None).render(0),
            "map (\\name type' -> { name = name, type' = type' }) (maybe (\"name\" := string))\n    `apply` (\"type\" := string)"
        );
    }

    #[test]
    fn spread_fields_are_decoded_in_place() {
        let selection = ResolvedSelection {
            fields: vec![leaf("id", vec![], string())],
            spreads: vec!["Names".to_string()],
            spread_fields: vec![leaf("name", vec![Wrapper::Nullable], string())],
        };

        let decoder = selection_decoder(&selection, None);
        let names: Vec<&str> = decoder.fields.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["id", "name"]);
    }

    #[test]
    fn empty_records_succeed() {
        let empty = ResolvedSelection::default();
        assert_eq!(selection_decoder(&empty, None).render(0), "succeed {}");
        assert_eq!(
            selection_decoder(&empty, Some(("FooTask".to_string(), "Task".to_string()))).render(0),
            "succeed (FooTask {})"
        );
    }

    #[test]
    fn union_dispatch() {
        let variants = ResolvedVariants {
            type_name: "Foo".to_string(),
            variants: vec![
                (
                    "List".to_string(),
                    ResolvedSelection {
                        fields: vec![leaf("id", vec![], string())],
                        spreads: vec![],
                        spread_fields: vec![],
                    },
                ),
                ("Task".to_string(), ResolvedSelection::default()),
            ],
        };

        assert_eq!(
            variants_decoder(&variants).render(0),
            "(\"__typename\" := string) `andThen` (\\typename -> case typename of\n    \"List\" -> map (\\id -> FooList { id = id }) (\"id\" := string)\n    \"Task\" -> succeed (FooTask {})\n    _ -> fail \"Unexpected union type\")"
        );
    }

    #[test]
    fn enum_decoders() {
        let episode = EnumType {
            name: "Episode".to_string(),
            description: None,
            values: vec!["NEWHOPE", "EMPIRE", "JEDI"]
                .into_iter()
                .map(|value| EnumValue {
                    name: value.to_string(),
                    description: None,
                })
                .collect(),
        };

        assert_eq!(
            enum_decoder(&episode).to_string(),
            r#"episodeDecoder : Decoder Episode
episodeDecoder =
    customDecoder string (\s ->
        case s of
            "NEWHOPE" -> Ok NEWHOPE
            "EMPIRE" -> Ok EMPIRE
            "JEDI" -> Ok JEDI
            _ -> Err "Unknown Episode")"#
        );
    }

    fn innermost(decoder: &Decoder) -> (&Decoder, usize) {
        match decoder {
            Decoder::Field(_, inner) => innermost(inner),
            Decoder::List(inner) | Decoder::Maybe(inner) => {
                let (decoder, wrappers) = innermost(inner);
                (decoder, wrappers + 1)
            }
            other => (other, 0),
        }
    }

    fn assert_isomorphic(selection: &ResolvedSelection, decoder: &RecordDecoder) {
        let field_names: Vec<&str> = selection.all_fields().map(|field| field.name.as_str()).collect();
        let decoded_names: Vec<&str> = decoder.fields.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(field_names, decoded_names);

        for (field, (_, decoder)) in selection.all_fields().zip(decoder.fields.iter()) {
            let (decoder, wrappers) = innermost(decoder);
            assert_eq!(wrappers, field.wrappers.len(), "wrappers of {}", field.name);

            match (&field.shape, decoder) {
                (Shape::Leaf(_), Decoder::Named(_)) => (),
                (Shape::Object(selection), Decoder::Record(record)) => {
                    assert_isomorphic(selection, record)
                }
                (Shape::Variants(variants), Decoder::Union(branches)) => {
                    assert_eq!(variants.variants.len(), branches.len());
                    for ((_, payload), branch) in variants.variants.iter().zip(branches.iter()) {
                        assert_isomorphic(payload, branch);
                    }
                }
                other => panic!("decoder does not match the type: {:?}", other),
            }
        }
    }

    #[test]
    fn decoders_mirror_the_resolved_types() {
        let schema = Schema::from_sdl(
            r##"
            enum Episode { NEWHOPE, EMPIRE, JEDI }
            interface Character { id: ID!, name: String, friends: [Character], appearsIn: [Episode] }
            type Human implements Character { id: ID!, name: String, friends: [Character], appearsIn: [Episode], homePlanet: String }
            type Droid implements Character { id: ID!, name: String, friends: [Character], appearsIn: [Episode] }
            union SearchResult = Human | Droid
            type Query {
                hero: Character
                search(text: String): [SearchResult!]!
            }
            "##,
        ).unwrap();
        let document = parse_query::<String>(
            r##"
            query everything {
                hero {
                    ...Names
                    friends { id appearsIn friends { name } }
                }
                search(text: "r2") {
                    __typename
                    ... on Human { homePlanet friends { ...Names } }
                    ...DroidFields
                }
            }
            fragment Names on Character { name appearsIn }
            fragment DroidFields on Droid { id name }
            "##,
        ).unwrap()
            .into_static();
        let mut context = TranslationContext::new(&schema, &document);

        let selection_set = match &document.definitions[0] {
            Definition::Operation(query::OperationDefinition::Query(operation)) => {
                &operation.selection_set
            }
            other => panic!("unexpected definition: {:?}", other),
        };
        let selection = context
            .enter(TypeRef::named("Query"), |context| {
                resolve_selection_set(context, selection_set)
            })
            .unwrap();

        assert_isomorphic(&selection, &selection_decoder(&selection, None));
    }
}
