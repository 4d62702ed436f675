extern crate elm_graphql;

use elm_graphql::*;

const STAR_WARS_SDL: &str = include_str!("../elm-graphql-codegen/tests/star_wars_schema.graphql");
const TODO_INTROSPECTION: &str = include_str!("fixtures/todo_introspection.json");

#[test]
fn star_wars_from_sdl() {
    let schema = Schema::from_sdl(STAR_WARS_SDL).unwrap();

    assert_eq!(schema.root_type_name(OperationKind::Query), Some("Query"));
    assert_eq!(schema.root_type_name(OperationKind::Mutation), Some("Mutation"));

    match schema.get("Episode") {
        Some(TypeDefinition::Enum(episode)) => {
            let values: Vec<&str> = episode.values.iter().map(|v| v.name.as_str()).collect();
            assert_eq!(values, vec!["NEWHOPE", "EMPIRE", "JEDI"]);
        }
        other => panic!("unexpected Episode: {:?}", other),
    }

    assert_eq!(schema.possible_types("Character"), vec!["Human", "Droid"]);
    assert_eq!(
        schema
            .field("Character", "appearsIn")
            .map(|field| field.field_type.to_string()),
        Some("[Episode]".to_string())
    );
}

#[test]
fn todo_from_introspection() {
    let schema = Schema::from_introspection(TODO_INTROSPECTION).unwrap();

    assert_eq!(schema.root_type_name(OperationKind::Query), Some("Query"));
    assert_eq!(schema.root_type_name(OperationKind::Mutation), Some("Mutation"));
    assert_eq!(schema.root_type_name(OperationKind::Subscription), None);

    // Meta types are not part of the generated client.
    assert!(schema.get("__Schema").is_none());

    assert_eq!(schema.possible_types("Item"), vec!["List", "Task"]);
    assert_eq!(
        schema.field("Query", "lists").map(|f| f.field_type.to_string()),
        Some("[List!]!".to_string())
    );

    match schema.get("TaskInput") {
        Some(TypeDefinition::InputObject(input)) => {
            assert_eq!(input.fields[1].default_value, Some("TODO".to_string()));
        }
        other => panic!("unexpected TaskInput: {:?}", other),
    }
}

#[test]
fn bare_schema_object_is_accepted() {
    let bare = r#"{
        "__schema": {
            "queryType": { "name": "Query" },
            "types": [
                {
                    "kind": "OBJECT",
                    "name": "Query",
                    "fields": [
                        {
                            "name": "hello",
                            "args": [],
                            "type": { "kind": "SCALAR", "name": "String" }
                        }
                    ]
                }
            ]
        }
    }"#;

    let schema = Schema::from_introspection(bare).unwrap();
    assert_eq!(
        schema.field("Query", "hello").map(|f| &f.field_type),
        Some(&TypeRef::named("String"))
    );
}

#[test]
fn invalid_json_keeps_its_cause() {
    match Schema::from_introspection("{ not json") {
        Err(SchemaError::InvalidIntrospection(_)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
}
