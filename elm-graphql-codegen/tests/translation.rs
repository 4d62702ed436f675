extern crate elm_graphql;
extern crate elm_graphql_codegen;

use elm_graphql::Schema;
use elm_graphql_codegen::{query_to_elm, Options};

const STAR_WARS: &str = include_str!("star_wars_schema.graphql");
const TODO: &str = include_str!("todo_schema.graphql");
const TODO_INTROSPECTION: &str = include_str!("../../tests/fixtures/todo_introspection.json");

fn star_wars(query: &str) -> String {
    let schema = Schema::from_sdl(STAR_WARS).unwrap();
    query_to_elm(query, &schema, &Options::new("StarWars")).unwrap()
}

fn todo(query: &str) -> String {
    let schema = Schema::from_sdl(TODO).unwrap();
    query_to_elm(query, &schema, &Options::new("Todo")).unwrap()
}

fn assert_contains(elm: &str, expected: &str) {
    assert!(
        elm.contains(expected),
        "\n--- expected to find ---\n{}\n--- in ---\n{}",
        expected,
        elm
    );
}

#[test]
fn module_header_and_imports() {
    let elm = star_wars("query hero { hero { name } }");

    assert_contains(
        &elm,
        "module StarWars exposing (HeroResult, hero, heroResult)\n\nimport Task exposing (Task)\nimport Json.Decode exposing (..)\nimport Json.Encode exposing (encode)\nimport Http\nimport GraphQL exposing (apply, maybeEncode, ID)\n",
    );
}

#[test]
fn enums_are_declared_once_per_document() {
    let elm = star_wars(
        r##"
        query hero($episode: Episode) {
            hero(episode: $episode) { appearsIn }
        }

        query reviews($episode: Episode!) {
            reviews(episode: $episode) { episode stars }
        }
        "##,
    );

    assert_eq!(elm.matches("\ntype Episode\n").count(), 1);
    assert_eq!(elm.matches("\nepisodeDecoder : Decoder Episode\n").count(), 1);
    assert_eq!(elm.matches("\nepisodeEncoder : Episode -> Json.Encode.Value\n").count(), 1);
    assert_contains(
        &elm,
        "type Episode\n    = NEWHOPE\n    | EMPIRE\n    | JEDI\n",
    );
    assert_contains(
        &elm,
        "episodeEncoder item =\n    case item of\n        NEWHOPE -> Json.Encode.string \"NEWHOPE\"",
    );
}

#[test]
fn required_variable_is_always_encoded() {
    let elm = star_wars("query human($id: String!) { human(id: $id) { name } }");

    assert_contains(&elm, "human : { id : String } -> Task Http.Error HumanResult\nhuman params =");
    assert_contains(
        &elm,
        "Json.Encode.object (List.filterMap identity [ Just (\"id\", Json.Encode.string params.id) ])",
    );
}

#[test]
fn nullable_enum_variable_is_encoded_when_present() {
    let elm = star_wars("query hero($episode: Episode) { hero(episode: $episode) { name } }");

    assert_contains(&elm, "hero : { episode : Maybe Episode } -> Task Http.Error HeroResult");
    assert_contains(&elm, "maybeEncode \"episode\" episodeEncoder params.episode");
}

#[test]
fn overlapping_fragments_are_flattened() {
    let elm = star_wars(
        r##"
        query hero { hero { ...Identity ...Appearances } }
        fragment Identity on Character { id name }
        fragment Appearances on Character { id appearsIn }
        "##,
    );

    assert_contains(
        &elm,
        "type alias HeroResult =\n    { hero : Maybe { id : ID, name : Maybe String, appearsIn : List Episode }\n    }",
    );
    assert_contains(
        &elm,
        "(\\id name appearsIn -> { id = id, name = name, appearsIn = appearsIn })",
    );
    assert_contains(
        &elm,
        "fragment Identity on Character { __typename id name } fragment Appearances on Character { __typename id appearsIn } query hero",
    );
}

#[test]
fn fragments_become_open_records() {
    let elm = star_wars(
        r##"
        query hero { hero { id ...Names } }
        fragment Names on Character { name }
        "##,
    );

    assert_contains(
        &elm,
        "type alias HeroResult =\n    { hero : Maybe (NamesResult_ { id : ID })\n    }",
    );
    assert_contains(&elm, "type alias NamesResult_ a =\n    { a | name : Maybe String\n    }");
    assert_contains(&elm, "type alias NamesResult =\n    NamesResult_ {}");
    assert_contains(&elm, "names : Decoder NamesResult\nnames =\n    map (\\name -> { name = name }) (maybe (\"name\" := string))");
    assert_contains(&elm, "(\\id name -> { id = id, name = name })");
}

#[test]
fn union_covers_every_member() {
    let elm = todo("query test { test1 { ... on List { id } } }");

    assert_contains(&elm, "{ test1 : Maybe (Foo { id : ID } {})\n    }");
    assert_contains(
        &elm,
        "(maybe (\"test1\" := ((\"__typename\" := string) `andThen` (\\typename -> case typename of",
    );
    assert_contains(&elm, "\"List\" -> map (\\id -> FooList { id = id }) (\"id\" := string)");
    assert_contains(&elm, "\"Task\" -> succeed (FooTask {})");
    assert_contains(&elm, "_ -> fail \"Unexpected union type\"");
    assert_contains(&elm, "\"\"\"query test { test1 { __typename ... on List { id } } }\"\"\"");
}

#[test]
fn union_members_follow_the_schema_order() {
    let elm = star_wars(
        r##"
        query search($text: String) {
            search(text: $text) {
                ... on Droid { name }
                ... on Human { name homePlanet }
            }
        }
        "##,
    );

    assert_contains(
        &elm,
        "type SearchResult human droid starship\n    = SearchResultHuman human\n    | SearchResultDroid droid\n    | SearchResultStarship starship",
    );
    assert_contains(
        &elm,
        "search : Maybe (List (SearchResult { name : Maybe String, homePlanet : Maybe String } { name : Maybe String } {}))",
    );
}

#[test]
fn polymorphic_interfaces_are_tagged() {
    let elm = star_wars(
        r##"
        query hero {
            hero {
                name
                ... on Human { homePlanet }
                ... on Droid { primaryFunction }
            }
        }
        "##,
    );

    assert_contains(&elm, "type Character human droid\n    = CharacterHuman human\n    | CharacterDroid droid");
    assert_contains(
        &elm,
        "hero : Maybe (Character { name : Maybe String, homePlanet : Maybe String } { name : Maybe String, primaryFunction : Maybe String })",
    );
    assert_contains(&elm, "Character(..)");
}

#[test]
fn aliases_and_reserved_words() {
    let elm = todo("query tasks { tasks { type: title in: done } }");

    assert_contains(&elm, "{ tasks : Maybe (List { type' : String, in' : Bool })\n    }");
    assert_contains(
        &elm,
        "(\\type' in' -> { type' = type', in' = in' }) (\"type\" := string)",
    );
}

#[test]
fn input_object_variables() {
    let elm = todo(
        "query tasks($filter: TaskFilter) { tasks(filter: $filter) { id } }",
    );

    assert_contains(
        &elm,
        "tasks : { filter : Maybe { done : Maybe Bool, limit : Maybe Int, titles : List String } } -> Task Http.Error TasksResult",
    );
    assert_contains(
        &elm,
        "maybeEncode \"filter\" (\\v0 -> Json.Encode.object (List.filterMap identity [ maybeEncode \"done\" Json.Encode.bool v0.done, maybeEncode \"limit\" Json.Encode.int v0.limit, Just (\"titles\", Json.Encode.list (List.map Json.Encode.string v0.titles)) ])) params.filter",
    );
}

#[test]
fn schema_from_introspection() {
    let schema = Schema::from_introspection(TODO_INTROSPECTION).unwrap();
    let elm = query_to_elm(
        "query item($id: ID!) { item(id: $id) { ... on Task { id status } } }",
        &schema,
        &Options::new("Items"),
    ).unwrap();

    assert_contains(&elm, "type Item list task\n    = ItemList list\n    | ItemTask task");
    assert_contains(&elm, "statusDecoder : Decoder Status");
    assert_contains(&elm, "item : { id : ID } -> Task Http.Error ItemResult");
}

#[test]
fn multiline_string_arguments_keep_the_elm_literal_closed() {
    let elm = star_wars(
        r##"
        query find {
            search(text: """
                a "quoted"
                b
            """) { ... on Human { name } }
        }
        "##,
    );

    let line = elm
        .lines()
        .find(|line| line.contains("query find"))
        .unwrap();
    assert_eq!(line.matches("\"\"\"").count(), 2);
    assert_contains(
        &elm,
        r##""""query find { search(text: \"a \\\"quoted\\\"\\nb\") { __typename ... on Human { name } } }""""##,
    );
}

#[test]
fn input_field_defaults_are_left_to_the_server() {
    let schema = Schema::from_sdl(
        r##"
        input Filter { limit: Int! = 10, offset: Int = 0 }
        type Query { search(filter: Filter!): String }
        "##,
    ).unwrap();
    let elm = query_to_elm(
        "query s($filter: Filter!) { search(filter: $filter) }",
        &schema,
        &Options::new("Search"),
    ).unwrap();

    assert_contains(&elm, "s : { filter : { limit : Int, offset : Maybe Int } } -> Task Http.Error SResult");
    assert_contains(&elm, "Just (\"limit\", Json.Encode.int params.filter.limit)");
    assert_contains(&elm, "maybeEncode \"offset\" Json.Encode.int params.filter.offset");
}
