use graphql_parser::query;
use heck::MixedCase;

pub type Document = query::Document<'static, String>;
pub type Definition = query::Definition<'static, String>;
pub type OperationDefinition = query::OperationDefinition<'static, String>;
pub type FragmentDefinition = query::FragmentDefinition<'static, String>;
pub type SelectionSet = query::SelectionSet<'static, String>;
pub type Selection = query::Selection<'static, String>;
pub type Field = query::Field<'static, String>;
pub type Directive = query::Directive<'static, String>;
pub type VariableDefinition = query::VariableDefinition<'static, String>;

pub const TYPENAME_FIELD: &str = "__typename";

/// Name used for operations declared without one.
pub const ANONYMOUS_OPERATION: &str = "AnonymousQuery";

/// See https://github.com/elm-lang/elm-compiler/blob/0.17.1/src/Parse/Helpers.hs
const ELM_RESERVED_WORDS: &[&str] = &[
    "if", "then", "else", "case", "of", "let", "in", "type", "module", "where", "import",
    "exposing", "as", "port", "infix", "infixl", "infixr", "alias", "effect", "command",
    "subscription",
];

/// Record field and parameter names must not clash with Elm keywords.
pub fn elm_safe_name(name: &str) -> String {
    if ELM_RESERVED_WORDS.contains(&name) {
        format!("{}'", name)
    } else {
        name.to_string()
    }
}

pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The request function of an operation, `Hero` -> `hero`.
pub fn operation_function_name(operation_name: &str) -> String {
    elm_safe_name(&lower_first(operation_name))
}

/// `hero` -> `HeroResult`
pub fn result_type_name(operation_name: &str) -> String {
    format!("{}Result", upper_first(operation_name))
}

/// `HeroResult` -> `heroResult`
pub fn result_decoder_name(operation_name: &str) -> String {
    lower_first(&result_type_name(operation_name))
}

/// The row-polymorphic alias of a fragment, `FriendFieldsResult_ a`.
pub fn fragment_open_alias_name(fragment_name: &str) -> String {
    format!("{}_", result_type_name(fragment_name))
}

pub fn fragment_decoder_name(fragment_name: &str) -> String {
    elm_safe_name(&lower_first(fragment_name))
}

pub fn enum_type_name(enum_name: &str) -> String {
    upper_first(enum_name)
}

pub fn enum_tag(value: &str) -> String {
    upper_first(value)
}

pub fn enum_decoder_name(enum_name: &str) -> String {
    format!("{}Decoder", enum_name.to_mixed_case())
}

pub fn enum_encoder_name(enum_name: &str) -> String {
    format!("{}Encoder", enum_name.to_mixed_case())
}

/// Constructor of one member of a union type, `SearchResultHuman`.
pub fn variant_constructor(type_name: &str, member: &str) -> String {
    format!("{}{}", upper_first(type_name), upper_first(member))
}

/// Type variable standing for the payload of one union member.
pub fn variant_type_variable(member: &str) -> String {
    elm_safe_name(&member.to_lowercase())
}

/// The key a field is found under in the response: its alias if it has one.
pub fn response_key(field: &Field) -> &str {
    field.alias.as_ref().unwrap_or(&field.name)
}

pub fn type_condition_name(fragment: &FragmentDefinition) -> &str {
    match &fragment.type_condition {
        query::TypeCondition::On(name) => name,
    }
}

/// Whether the server may leave the selected fields out of the response.
pub fn is_conditional(directives: &[Directive]) -> bool {
    directives
        .iter()
        .any(|directive| directive.name == "include" || directive.name == "skip")
}

#[cfg(test)]
macro_rules! assert_translates_to {
    ($schema:expr, $query:expr => $expected:expr) => {
        let schema = ::elm_graphql::Schema::from_sdl($schema).unwrap();
        let elm = ::query_to_elm($query, &schema, &::Options::new("Test")).unwrap();
        let expected: &str = $expected;
        assert!(
            elm.contains(expected.trim()),
            "\n--- expected to find ---\n{}\n--- in ---\n{}",
            expected.trim(),
            elm
        );
    };
}

#[cfg(test)]
macro_rules! assert_translation_fails {
    ($schema:expr, $query:expr => $pattern:pat) => {
        let schema = ::elm_graphql::Schema::from_sdl($schema).unwrap();
        match ::query_to_elm($query, &schema, &::Options::new("Test")) {
            Err($pattern) => (),
            other => panic!("unexpected translation result: {:?}", other),
        }
    };
}
