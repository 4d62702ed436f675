use elm_graphql::{EnumType, OperationKind, Schema, TypeDefinition, TypeRef};
use errors::TranslationError;
use indexmap::{IndexMap, IndexSet};
use shared::*;

/// Tracks where we are in the schema while walking a query: the type of the field (or
/// fragment, or operation root) whose selection set is being translated is on top.
#[derive(Debug, Default)]
pub struct TypeInfo {
    stack: Vec<TypeRef>,
}

impl TypeInfo {
    pub fn new() -> TypeInfo {
        TypeInfo { stack: Vec::new() }
    }

    pub fn current(&self) -> Option<&TypeRef> {
        self.stack.last()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn push(&mut self, ty: TypeRef) {
        self.stack.push(ty);
    }

    fn pop(&mut self) {
        self.stack.pop();
    }
}

/// Everything one document translation accumulates. A fresh context is built for every
/// document, nothing is shared between translations.
pub struct TranslationContext<'a> {
    pub schema: &'a Schema,
    fragments: IndexMap<String, &'a FragmentDefinition>,
    type_info: TypeInfo,
    /// Enums seen anywhere in the document, in order of first appearance.
    pub enums: IndexMap<String, EnumType>,
    /// Unions, and interfaces selected polymorphically, with their members.
    pub unions: IndexMap<String, Vec<String>>,
    referenced_fragments: IndexSet<String>,
    active_fragments: Vec<String>,
}

impl<'a> TranslationContext<'a> {
    pub fn new(schema: &'a Schema, document: &'a Document) -> TranslationContext<'a> {
        let mut fragments = IndexMap::new();

        for definition in document.definitions.iter() {
            if let Definition::Fragment(fragment) = definition {
                fragments.insert(fragment.name.clone(), fragment);
            }
        }

        TranslationContext {
            schema,
            fragments,
            type_info: TypeInfo::new(),
            enums: IndexMap::new(),
            unions: IndexMap::new(),
            referenced_fragments: IndexSet::new(),
            active_fragments: Vec::new(),
        }
    }

    /// Runs `f` with `ty` as the current type. The cursor is restored whatever `f` returns.
    pub fn enter<F, R>(&mut self, ty: TypeRef, f: F) -> Result<R, TranslationError>
    where
        F: FnOnce(&mut TranslationContext<'a>) -> Result<R, TranslationError>,
    {
        self.type_info.push(ty);
        let result = f(self);
        self.type_info.pop();
        result
    }

    /// Like `enter`, for the type condition of a spread fragment. Fragments spreading
    /// themselves, directly or not, are rejected.
    pub fn enter_fragment<F, R>(
        &mut self,
        fragment: &'a FragmentDefinition,
        f: F,
    ) -> Result<R, TranslationError>
    where
        F: FnOnce(&mut TranslationContext<'a>) -> Result<R, TranslationError>,
    {
        if self.active_fragments.contains(&fragment.name) {
            return Err(TranslationError::unsupported(format!(
                "fragment {} spreads itself",
                fragment.name
            )));
        }

        self.active_fragments.push(fragment.name.clone());
        let condition = type_condition_name(fragment);
        let result = self.enter(TypeRef::named(condition), f);
        self.active_fragments.pop();
        result
    }

    pub fn depth(&self) -> usize {
        self.type_info.depth()
    }

    /// The named type whose selection set is being walked.
    pub fn current_type_name(&self) -> Result<&str, TranslationError> {
        self.type_info
            .current()
            .map(|ty| ty.inner_name())
            .ok_or(TranslationError::Internal {
                message: "selection set walked outside of any type",
            })
    }

    pub fn current_definition(&self) -> Result<&'a TypeDefinition, TranslationError> {
        let name = self.current_type_name()?;
        self.type_definition(name)
    }

    pub fn type_definition(&self, name: &str) -> Result<&'a TypeDefinition, TranslationError> {
        let schema: &'a Schema = self.schema;
        schema.get(name).ok_or_else(|| TranslationError::UnknownType {
            name: name.to_string(),
        })
    }

    /// The declared type of a field selected on the current type.
    pub fn field_type(&self, field_name: &str) -> Result<TypeRef, TranslationError> {
        if field_name == TYPENAME_FIELD {
            return Ok(TypeRef::non_null(TypeRef::named("String")));
        }

        let parent = self.current_type_name()?;
        self.schema
            .field(parent, field_name)
            .map(|field| field.field_type.clone())
            .ok_or_else(|| TranslationError::UnknownField {
                parent: parent.to_string(),
                field: field_name.to_string(),
            })
    }

    pub fn root_type(&self, kind: OperationKind, name: &str) -> Result<TypeRef, TranslationError> {
        self.schema
            .root_type_name(kind)
            .map(TypeRef::named)
            .ok_or_else(|| TranslationError::UnknownOperation {
                operation: kind.as_str(),
                name: name.to_string(),
            })
    }

    pub fn fragment(&self, name: &str) -> Result<&'a FragmentDefinition, TranslationError> {
        self.fragments
            .get(name)
            .map(|fragment| *fragment)
            .ok_or_else(|| TranslationError::UnknownFragment {
                name: name.to_string(),
            })
    }

    pub fn register_enum(&mut self, enum_type: &EnumType) {
        if !self.enums.contains_key(&enum_type.name) {
            trace!(name = %enum_type.name, "registering enum");
            self.enums.insert(enum_type.name.clone(), enum_type.clone());
        }
    }

    pub fn register_union(&mut self, name: &str, members: Vec<String>) {
        if !self.unions.contains_key(name) {
            trace!(name = %name, "registering union");
            self.unions.insert(name.to_string(), members);
        }
    }

    pub fn is_union(&self, name: &str) -> bool {
        match self.schema.get(name) {
            Some(TypeDefinition::Union(_)) => true,
            _ => false,
        }
    }

    /// Marks a fragment, and the fragments it spreads, as needed by the current operation.
    pub fn reference_fragment(&mut self, name: &str) -> Result<(), TranslationError> {
        let mut pending = vec![name.to_string()];

        while let Some(name) = pending.pop() {
            if self.referenced_fragments.contains(&name) {
                continue;
            }
            let fragment = self.fragment(&name)?;
            self.referenced_fragments.insert(name);
            collect_spreads(&fragment.selection_set, &mut pending);
        }

        Ok(())
    }

    /// Fragments referenced since the last call, in order of first reference.
    pub fn take_referenced_fragments(&mut self) -> Vec<&'a FragmentDefinition> {
        let names: Vec<String> = self.referenced_fragments.drain(..).collect();
        names
            .iter()
            .filter_map(|name| self.fragments.get(name).map(|fragment| *fragment))
            .collect()
    }
}

fn collect_spreads(selection_set: &SelectionSet, names: &mut Vec<String>) {
    for selection in selection_set.items.iter() {
        match selection {
            Selection::Field(field) => collect_spreads(&field.selection_set, names),
            Selection::FragmentSpread(spread) => names.push(spread.fragment_name.clone()),
            Selection::InlineFragment(inline) => collect_spreads(&inline.selection_set, names),
        }
    }
}
