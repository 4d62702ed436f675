//! Works out the shape of the response to every selection set of a query.
//!
//! The result of a resolution is consumed twice: once to declare the Elm types
//! ([`ResolvedSelection::elm_type`]) and once to build the matching decoders
//! (see the `decoders` module), so both always agree on field order and wrapping.

use context::TranslationContext;
use elm_ast::{ElmField, ElmType};
use elm_graphql::{TypeDefinition, TypeRef};
use errors::TranslationError;
use graphql_parser::query::TypeCondition;
use indexmap::IndexMap;
use shared::*;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wrapper {
    List,
    Nullable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Scalar {
        elm_type: &'static str,
        decoder: &'static str,
    },
    Enum(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Leaf(Leaf),
    Object(ResolvedSelection),
    Variants(ResolvedVariants),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    /// The key in the JSON response.
    pub key: String,
    /// The Elm record field.
    pub name: String,
    /// Outermost first.
    pub wrappers: Vec<Wrapper>,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedSelection {
    /// Fields declared in the record itself.
    pub fields: Vec<ResolvedField>,
    /// Fragments applied around the record, in document order.
    pub spreads: Vec<String>,
    /// Fields the spread fragments bring in. They are decoded, but declared by the
    /// fragment aliases.
    pub spread_fields: Vec<ResolvedField>,
}

/// A union, or an interface selected with type conditions: one payload per possible type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVariants {
    pub type_name: String,
    pub variants: Vec<(String, ResolvedSelection)>,
}

impl ResolvedField {
    pub fn elm_type(&self) -> ElmType {
        let inner = match &self.shape {
            Shape::Leaf(Leaf::Scalar { elm_type, .. }) => ElmType::name(elm_type),
            Shape::Leaf(Leaf::Enum(name)) => ElmType::Name(enum_type_name(name)),
            Shape::Object(selection) => selection.elm_type(None),
            Shape::Variants(variants) => variants.elm_type(),
        };

        self.wrappers
            .iter()
            .rev()
            .fold(inner, |inner, wrapper| match wrapper {
                Wrapper::List => ElmType::list(inner),
                Wrapper::Nullable => ElmType::nullable(inner),
            })
    }
}

impl ResolvedSelection {
    /// Every field a decoder for this selection produces, own fields first.
    pub fn all_fields(&self) -> impl Iterator<Item = &ResolvedField> {
        self.fields.iter().chain(self.spread_fields.iter())
    }

    /// The record type, with one fragment alias application per spread (the first spread
    /// innermost). `row` opens the innermost record, for fragment aliases.
    pub fn elm_type(&self, row: Option<&str>) -> ElmType {
        let record = ElmType::Record {
            row: row.map(|row| row.to_string()),
            fields: self.fields
                .iter()
                .map(|field| ElmField::new(&field.name, field.elm_type()))
                .collect(),
        };

        self.spreads.iter().fold(record, |inner, spread| {
            ElmType::application(&fragment_open_alias_name(spread), vec![inner])
        })
    }
}

impl ResolvedVariants {
    pub fn elm_type(&self) -> ElmType {
        ElmType::application(
            &upper_first(&self.type_name),
            self.variants
                .iter()
                .map(|(_, payload)| payload.elm_type(None))
                .collect(),
        )
    }
}

/// Wrappers of a scalar or enum field. Lists of leaves are never wrapped in `Maybe`.
pub fn leaf_wrappers(ty: &TypeRef) -> Vec<Wrapper> {
    match ty {
        TypeRef::NonNull(inner) => list_wrappers(inner),
        TypeRef::List(_) => list_wrappers(ty),
        TypeRef::Named(_) => vec![Wrapper::Nullable],
    }
}

/// Wrappers of an object field: lists are mirrored, and a nullable field is `Maybe` outermost.
pub fn composite_wrappers(ty: &TypeRef) -> Vec<Wrapper> {
    match ty {
        TypeRef::NonNull(inner) => list_wrappers(inner),
        other => {
            let mut wrappers = vec![Wrapper::Nullable];
            wrappers.extend(list_wrappers(other));
            wrappers
        }
    }
}

fn list_wrappers(ty: &TypeRef) -> Vec<Wrapper> {
    match ty {
        TypeRef::List(inner) => {
            let mut wrappers = vec![Wrapper::List];
            wrappers.extend(list_wrappers(inner));
            wrappers
        }
        TypeRef::NonNull(inner) => list_wrappers(inner),
        TypeRef::Named(_) => Vec::new(),
    }
}

pub fn scalar_leaf(name: &str) -> Result<Leaf, TranslationError> {
    let (elm_type, decoder) = match name {
        "Int" => ("Int", "int"),
        "Float" => ("Float", "float"),
        "Boolean" => ("Bool", "bool"),
        "String" => ("String", "string"),
        "ID" => ("ID", "string"),
        other => {
            return Err(TranslationError::UnsupportedScalar {
                name: other.to_string(),
            })
        }
    };

    Ok(Leaf::Scalar { elm_type, decoder })
}

/// Resolves a selection set against the current type of the context.
pub fn resolve_selection_set<'a>(
    context: &mut TranslationContext<'a>,
    selection_set: &'a SelectionSet,
) -> Result<ResolvedSelection, TranslationError> {
    let items: Vec<&'a Selection> = selection_set.items.iter().collect();
    resolve_items(context, &items)
}

fn resolve_field<'a>(
    context: &mut TranslationContext<'a>,
    field: &'a Field,
) -> Result<ResolvedField, TranslationError> {
    let field_type = context.field_type(&field.name)?;
    let key = response_key(field).to_string();
    let name = elm_safe_name(&key);
    trace!(field = %field.name, ty = %field_type, depth = context.depth(), "resolving field");

    context.enter(field_type.clone(), |context| {
        let definition = context.current_definition()?;
        let has_selection = !field.selection_set.items.is_empty();

        let (mut wrappers, shape) = if definition.is_leaf() {
            if has_selection {
                return Err(TranslationError::unsupported(format!(
                    "selection set on the {} field of leaf type {}",
                    field.name,
                    definition.name()
                )));
            }
            (
                leaf_wrappers(&field_type),
                Shape::Leaf(resolve_leaf(context, definition)?),
            )
        } else if has_selection {
            let items: Vec<&'a Selection> = field.selection_set.items.iter().collect();
            (
                composite_wrappers(&field_type),
                resolve_composite(context, &items)?,
            )
        } else {
            return Err(TranslationError::NotALeafType {
                name: definition.name().to_string(),
            });
        };

        if is_conditional(&field.directives) {
            make_nullable(&mut wrappers);
        }

        Ok(ResolvedField {
            key,
            name,
            wrappers,
            shape,
        })
    })
}

fn make_nullable(wrappers: &mut Vec<Wrapper>) {
    if wrappers.first() != Some(&Wrapper::Nullable) {
        wrappers.insert(0, Wrapper::Nullable);
    }
}

fn resolve_leaf(
    context: &mut TranslationContext,
    definition: &TypeDefinition,
) -> Result<Leaf, TranslationError> {
    match definition {
        TypeDefinition::Scalar(scalar) => scalar_leaf(&scalar.name),
        TypeDefinition::Enum(enum_type) => {
            context.register_enum(enum_type);
            Ok(Leaf::Enum(enum_type.name.clone()))
        }
        other => Err(TranslationError::NotALeafType {
            name: other.name().to_string(),
        }),
    }
}

fn resolve_composite<'a>(
    context: &mut TranslationContext<'a>,
    items: &[&'a Selection],
) -> Result<Shape, TranslationError> {
    let definition = context.current_definition()?;

    match definition {
        TypeDefinition::Union(union_type) => {
            Ok(Shape::Variants(resolve_union(context, &union_type.name, items)?))
        }
        TypeDefinition::Interface(interface_type) => {
            if is_polymorphic(context, &interface_type.name, items)? {
                let variants = resolve_interface(context, &interface_type.name, items)?;
                Ok(Shape::Variants(variants))
            } else {
                Ok(Shape::Object(resolve_items(context, items)?))
            }
        }
        _ => Ok(Shape::Object(resolve_items(context, items)?)),
    }
}

/// Fields kept in document order, first occurrence of every response key wins.
#[derive(Default)]
struct FieldCollector {
    fields: Vec<ResolvedField>,
    spreads: Vec<String>,
    spread_fields: Vec<ResolvedField>,
    flattened: Vec<ResolvedField>,
    seen: HashSet<String>,
    from_spreads: HashSet<String>,
    overlapping: bool,
}

impl FieldCollector {
    fn push_field(&mut self, field: ResolvedField) {
        if self.seen.contains(&field.key) {
            if self.from_spreads.contains(&field.key) {
                self.overlapping = true;
            }
            return;
        }

        self.seen.insert(field.key.clone());
        self.fields.push(field.clone());
        self.flattened.push(field);
    }

    /// The fields of a spread under `@include` or `@skip` no longer match the fragment
    /// alias, they are inlined.
    fn push_conditional_spread(&mut self, fields: Vec<ResolvedField>) {
        self.overlapping = true;
        for field in fields {
            self.push_field(field);
        }
    }

    fn push_spread(&mut self, name: &str, fields: Vec<ResolvedField>) {
        self.spreads.push(name.to_string());

        for field in fields {
            if self.seen.contains(&field.key) {
                self.overlapping = true;
                continue;
            }
            self.seen.insert(field.key.clone());
            self.from_spreads.insert(field.key.clone());
            self.spread_fields.push(field.clone());
            self.flattened.push(field);
        }
    }

    /// Fragment aliases can not declare a field twice, so spreads that overlap with each
    /// other or with the selected fields are inlined into one record.
    fn finish(self) -> ResolvedSelection {
        if self.overlapping {
            ResolvedSelection {
                fields: self.flattened,
                spreads: Vec::new(),
                spread_fields: Vec::new(),
            }
        } else {
            ResolvedSelection {
                fields: self.fields,
                spreads: self.spreads,
                spread_fields: self.spread_fields,
            }
        }
    }
}

fn resolve_items<'a>(
    context: &mut TranslationContext<'a>,
    items: &[&'a Selection],
) -> Result<ResolvedSelection, TranslationError> {
    let mut collector = FieldCollector::default();
    collect_items(context, items, false, &mut collector)?;
    Ok(collector.finish())
}

/// `conditional` is set below an inline fragment or spread under `@include` or `@skip`.
fn collect_items<'a>(
    context: &mut TranslationContext<'a>,
    items: &[&'a Selection],
    conditional: bool,
    collector: &mut FieldCollector,
) -> Result<(), TranslationError> {
    for &selection in items {
        match selection {
            Selection::Field(field) => {
                let mut resolved = resolve_field(context, field)?;
                if conditional {
                    make_nullable(&mut resolved.wrappers);
                }
                collector.push_field(resolved);
            }
            Selection::FragmentSpread(spread) => {
                let fragment = context.fragment(&spread.fragment_name)?;
                context.reference_fragment(&fragment.name)?;
                let resolved = context.enter_fragment(fragment, |context| {
                    resolve_selection_set(context, &fragment.selection_set)
                })?;
                let fields = resolved.all_fields().cloned();

                if conditional || is_conditional(&spread.directives) {
                    collector.push_conditional_spread(
                        fields
                            .map(|mut field| {
                                make_nullable(&mut field.wrappers);
                                field
                            })
                            .collect(),
                    );
                } else {
                    collector.push_spread(&fragment.name, fields.collect());
                }
            }
            Selection::InlineFragment(inline) => {
                let current = context.current_type_name()?.to_string();
                match &inline.type_condition {
                    // The current type itself, or an interface it implements.
                    Some(TypeCondition::On(condition))
                        if !context
                            .schema
                            .possible_types(condition)
                            .contains(&current.as_str()) =>
                    {
                        return Err(TranslationError::unsupported(format!(
                            "inline fragment on {} inside {}",
                            condition, current
                        )));
                    }
                    _ => {
                        let nested: Vec<&'a Selection> =
                            inline.selection_set.items.iter().collect();
                        let conditional = conditional || is_conditional(&inline.directives);
                        collect_items(context, &nested, conditional, collector)?;
                    }
                }
            }
        }
    }

    Ok(())
}

fn resolve_union<'a>(
    context: &mut TranslationContext<'a>,
    union_name: &str,
    items: &[&'a Selection],
) -> Result<ResolvedVariants, TranslationError> {
    let members: Vec<String> = context
        .schema
        .possible_types(union_name)
        .into_iter()
        .map(|member| member.to_string())
        .collect();

    let mut payloads: IndexMap<String, Vec<&'a Selection>> = members
        .iter()
        .map(|member| (member.clone(), Vec::new()))
        .collect();
    sort_union_items(context, union_name, items, &mut payloads)?;

    let mut variants = Vec::with_capacity(payloads.len());
    for (member, items) in payloads {
        let payload = context.enter(TypeRef::named(&member), |context| {
            resolve_items(context, &items)
        })?;
        variants.push((member, payload));
    }

    context.register_union(union_name, members);

    Ok(ResolvedVariants {
        type_name: union_name.to_string(),
        variants,
    })
}

/// Distributes the selections made on a union to the members they apply to.
fn sort_union_items<'a>(
    context: &mut TranslationContext<'a>,
    union_name: &str,
    items: &[&'a Selection],
    payloads: &mut IndexMap<String, Vec<&'a Selection>>,
) -> Result<(), TranslationError> {
    for &selection in items {
        match selection {
            // The discriminator, always requested.
            Selection::Field(field) if field.name == TYPENAME_FIELD => (),
            Selection::Field(field) => {
                return Err(TranslationError::unsupported(format!(
                    "field {} selected directly on union {}",
                    field.name, union_name
                )));
            }
            Selection::InlineFragment(inline) => {
                let nested: Vec<&'a Selection> = inline.selection_set.items.iter().collect();
                match &inline.type_condition {
                    Some(TypeCondition::On(condition)) if condition != union_name => {
                        match payloads.get_mut(condition) {
                            Some(payload) if is_conditional(&inline.directives) => {
                                payload.push(selection)
                            }
                            Some(payload) => payload.extend(nested),
                            None => {
                                return Err(TranslationError::unsupported(format!(
                                    "inline fragment on {} inside union {}",
                                    condition, union_name
                                )))
                            }
                        }
                    }
                    _ => sort_union_items(context, union_name, &nested, payloads)?,
                }
            }
            Selection::FragmentSpread(spread) => {
                let fragment = context.fragment(&spread.fragment_name)?;
                let condition = type_condition_name(fragment);

                if condition == union_name {
                    context.reference_fragment(&fragment.name)?;
                    let nested: Vec<&'a Selection> =
                        fragment.selection_set.items.iter().collect();
                    sort_union_items(context, union_name, &nested, payloads)?;
                } else if let Some(payload) = payloads.get_mut(condition) {
                    // Resolved as an ordinary spread inside the member's payload.
                    payload.push(selection);
                } else {
                    return Err(TranslationError::unsupported(format!(
                        "fragment {} on {} spread inside union {}",
                        fragment.name, condition, union_name
                    )));
                }
            }
        }
    }

    Ok(())
}

/// An interface is selected polymorphically when some of its selections are conditioned
/// on one of its implementations.
fn is_polymorphic<'a>(
    context: &TranslationContext<'a>,
    interface_name: &str,
    items: &[&'a Selection],
) -> Result<bool, TranslationError> {
    for &selection in items {
        let condition = match selection {
            Selection::Field(_) => continue,
            Selection::InlineFragment(inline) => match &inline.type_condition {
                Some(TypeCondition::On(condition)) => condition.as_str(),
                None => {
                    let nested: Vec<&'a Selection> = inline.selection_set.items.iter().collect();
                    if is_polymorphic(context, interface_name, &nested)? {
                        return Ok(true);
                    }
                    continue;
                }
            },
            Selection::FragmentSpread(spread) => {
                type_condition_name(context.fragment(&spread.fragment_name)?)
            }
        };

        if condition != interface_name {
            return Ok(true);
        }
    }

    Ok(false)
}

fn resolve_interface<'a>(
    context: &mut TranslationContext<'a>,
    interface_name: &str,
    items: &[&'a Selection],
) -> Result<ResolvedVariants, TranslationError> {
    let members: Vec<String> = context
        .schema
        .possible_types(interface_name)
        .into_iter()
        .map(|member| member.to_string())
        .collect();

    let mut shared = Vec::new();
    let mut specific: IndexMap<String, Vec<&'a Selection>> = members
        .iter()
        .map(|member| (member.clone(), Vec::new()))
        .collect();
    split_interface_items(context, interface_name, items, &mut shared, &mut specific)?;

    let mut variants = Vec::with_capacity(specific.len());
    for (member, own_items) in specific {
        let mut member_items = shared.clone();
        member_items.extend(own_items);
        let payload = context.enter(TypeRef::named(&member), |context| {
            resolve_items(context, &member_items)
        })?;
        variants.push((member, payload));
    }

    context.register_union(interface_name, members);

    Ok(ResolvedVariants {
        type_name: interface_name.to_string(),
        variants,
    })
}

fn split_interface_items<'a>(
    context: &TranslationContext<'a>,
    interface_name: &str,
    items: &[&'a Selection],
    shared: &mut Vec<&'a Selection>,
    specific: &mut IndexMap<String, Vec<&'a Selection>>,
) -> Result<(), TranslationError> {
    for &selection in items {
        let condition = match selection {
            Selection::Field(_) => {
                shared.push(selection);
                continue;
            }
            Selection::InlineFragment(inline) => match &inline.type_condition {
                Some(TypeCondition::On(condition)) if condition != interface_name => {
                    condition.as_str()
                }
                _ if is_conditional(&inline.directives) => {
                    shared.push(selection);
                    continue;
                }
                _ => {
                    let nested: Vec<&'a Selection> = inline.selection_set.items.iter().collect();
                    split_interface_items(context, interface_name, &nested, shared, specific)?;
                    continue;
                }
            },
            Selection::FragmentSpread(spread) => {
                let condition = type_condition_name(context.fragment(&spread.fragment_name)?);
                if condition == interface_name {
                    shared.push(selection);
                    continue;
                }
                condition
            }
        };

        match specific.get_mut(condition) {
            Some(member_items) => match selection {
                Selection::InlineFragment(inline) if !is_conditional(&inline.directives) => {
                    member_items.extend(inline.selection_set.items.iter())
                }
                _ => member_items.push(selection),
            },
            None => {
                return Err(TranslationError::unsupported(format!(
                    "fragment on {} inside interface {}",
                    condition, interface_name
                )))
            }
        }
    }

    Ok(())
}
