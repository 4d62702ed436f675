//! The query text embedded in the generated request functions.

use elm_graphql::Schema;
use graphql_parser::query;
use shared::*;

/// Prints an operation preceded by the fragments it needs, on one line.
pub fn operation_text(
    schema: &Schema,
    root_type: &str,
    operation: &OperationDefinition,
    fragments: &[&FragmentDefinition],
) -> String {
    let mut definitions: Vec<Definition> = fragments
        .iter()
        .map(|fragment| {
            let mut fragment = (*fragment).clone();
            let condition = type_condition_name(&fragment).to_string();
            add_typename(schema, &condition, &mut fragment.selection_set);
            Definition::Fragment(fragment)
        })
        .collect();

    let mut operation = operation.clone();
    add_typename(schema, root_type, operation_selection_set(&mut operation));
    definitions.push(Definition::Operation(operation));

    let document = Document { definitions };
    minify(&document.to_string())
}

fn operation_selection_set(operation: &mut OperationDefinition) -> &mut SelectionSet {
    match operation {
        query::OperationDefinition::SelectionSet(selection_set) => selection_set,
        query::OperationDefinition::Query(query) => &mut query.selection_set,
        query::OperationDefinition::Mutation(mutation) => &mut mutation.selection_set,
        query::OperationDefinition::Subscription(subscription) => {
            &mut subscription.selection_set
        }
    }
}

/// Requests `__typename` in every selection set made on a union or an interface, the
/// decoders dispatch on it.
fn add_typename(schema: &Schema, type_name: &str, selection_set: &mut SelectionSet) {
    let is_abstract = schema
        .get(type_name)
        .map(|definition| definition.is_abstract())
        .unwrap_or(false);
    let has_typename = selection_set.items.iter().any(|selection| match selection {
        Selection::Field(field) => field.name == TYPENAME_FIELD && field.alias.is_none(),
        _ => false,
    });

    if is_abstract && !has_typename {
        selection_set.items.insert(0, typename_field(selection_set));
    }

    for selection in selection_set.items.iter_mut() {
        match selection {
            Selection::Field(field) => {
                if let Some(schema_field) = schema.field(type_name, &field.name) {
                    let field_type = schema_field.field_type.inner_name().to_string();
                    add_typename(schema, &field_type, &mut field.selection_set);
                }
            }
            Selection::InlineFragment(inline) => {
                let condition = match &inline.type_condition {
                    Some(query::TypeCondition::On(condition)) => condition.clone(),
                    None => type_name.to_string(),
                };
                add_typename(schema, &condition, &mut inline.selection_set);
            }
            // Printed separately.
            Selection::FragmentSpread(_) => (),
        }
    }
}

fn typename_field(selection_set: &SelectionSet) -> Selection {
    Selection::Field(query::Field {
        position: selection_set.span.0,
        alias: None,
        name: TYPENAME_FIELD.to_string(),
        arguments: Vec::new(),
        directives: Vec::new(),
        selection_set: query::SelectionSet {
            span: selection_set.span,
            items: Vec::new(),
        },
    })
}

const BLOCK_QUOTE: &str = "\"\"\"";

/// Puts the printed document on one line.
///
/// Block strings, which the printer uses for any value spanning lines, are turned back
/// into regular strings first, collapsing their whitespace would change the value.
pub fn minify(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    let mut space = false;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            space = !output.is_empty();
            rest = &rest[c.len_utf8()..];
            continue;
        }
        if space {
            output.push(' ');
            space = false;
        }

        if rest.starts_with(BLOCK_QUOTE) {
            let body = &rest[BLOCK_QUOTE.len()..];
            let end = closing_block_quote(body);
            output.push_str(&quote(&block_string_value(&body[..end])));
            rest = &body[(end + BLOCK_QUOTE.len()).min(body.len())..];
        } else if c == '"' {
            let end = (closing_quote(&rest[1..]) + 2).min(rest.len());
            output.push_str(&rest[..end]);
            rest = &rest[end..];
        } else {
            output.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    output
}

fn closing_quote(body: &str) -> usize {
    let mut escaped = false;
    for (index, c) in body.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return index,
            _ => escaped = false,
        }
    }
    body.len()
}

fn closing_block_quote(body: &str) -> usize {
    let mut from = 0;
    while let Some(offset) = body[from..].find(BLOCK_QUOTE) {
        let at = from + offset;
        if !body[..at].ends_with('\\') {
            return at;
        }
        from = at + BLOCK_QUOTE.len();
    }
    body.len()
}

/// The value a GraphQL server reads from the raw text of a block string: common
/// indentation and surrounding blank lines removed.
fn block_string_value(raw: &str) -> String {
    let raw = raw.replace("\\\"\"\"", BLOCK_QUOTE);
    let lines: Vec<&str> = raw.lines().collect();

    let indentation = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let lines: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                line
            } else {
                line.get(indentation..).unwrap_or("")
            }
        })
        .collect();

    let first = lines.iter().position(|line| !line.trim().is_empty());
    let last = lines.iter().rposition(|line| !line.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Escapes the query for the Elm `"""` string literal it is embedded in.
pub fn elm_string_contents(query: &str) -> String {
    query.replace('\\', "\\\\").replace('"', "\\\"")
}
