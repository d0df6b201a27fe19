//! Ordered attribute traversal.
//!
//! Every configuration entity lists its attributes as `(name, accessor)`
//! pairs in declaration order. Generic marshaling code walks entities through
//! [`Describe`] instead of knowing each struct. The order and the names
//! (`type`, `wasm_name`, `join`, ...) are the configuration's wire names and
//! must not change. Resolved state is never part of the traversal.

use crate::name::Name;
use crate::registry::TypeDescriptor;
use crate::schema::{Field, Key, Query, Schema, Table};

/// A borrowed attribute value.
#[derive(Debug)]
pub enum AttrValue<'a, T = TypeDescriptor> {
    Str(&'a str),
    OptStr(Option<&'a str>),
    Bool(bool),
    U32(u32),
    Name(Name),
    OptName(Option<Name>),
    Strings(&'a [String]),
    Fields(&'a [Field<T>]),
    Keys(&'a [Key]),
    Tables(&'a [Table<T>]),
    Queries(&'a [Query<T>]),
}

/// Reads one attribute of `E`.
pub type Accessor<E, T> = for<'a> fn(&'a E) -> AttrValue<'a, T>;

/// A named attribute of an entity.
pub struct Attribute<E, T = TypeDescriptor> {
    name: &'static str,
    get: Accessor<E, T>,
}

impl<E, T> Attribute<E, T> {
    /// Pair an attribute name with its accessor.
    pub const fn new(name: &'static str, get: Accessor<E, T>) -> Self {
        Self { name, get }
    }

    /// The attribute's wire name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Read the attribute from `entity`.
    pub fn get<'a>(&self, entity: &'a E) -> AttrValue<'a, T> {
        (self.get)(entity)
    }
}

/// Entities whose attributes can be enumerated in declaration order.
///
/// `T` is the type descriptor of the schema the entity belongs to.
pub trait Describe<T = TypeDescriptor>: Sized {
    /// Attributes in declaration order.
    fn attributes() -> Vec<Attribute<Self, T>>;

    /// This entity's attribute values in declaration order.
    fn describe(&self) -> Vec<(&'static str, AttrValue<'_, T>)> {
        Self::attributes()
            .iter()
            .map(|attr| (attr.name(), attr.get(self)))
            .collect()
    }
}

/// Receives attributes during [`visit_attributes`].
pub trait AttributeVisitor<T = TypeDescriptor> {
    fn visit(&mut self, name: &'static str, value: AttrValue<'_, T>);
}

/// Feed every attribute of `entity` to `visitor`, in declaration order.
pub fn visit_attributes<E, T, V>(entity: &E, visitor: &mut V)
where
    E: Describe<T>,
    V: AttributeVisitor<T> + ?Sized,
{
    for attr in E::attributes() {
        visitor.visit(attr.name(), attr.get(entity));
    }
}

/// Attribute names of `E`, in declaration order.
pub fn attribute_names<E: Describe>() -> Vec<&'static str> {
    E::attributes().iter().map(Attribute::name).collect()
}

impl<T> Describe<T> for Field<T> {
    fn attributes() -> Vec<Attribute<Self, T>> {
        let attr = Attribute::<Self, T>::new;
        vec![
            attr("name", |f| AttrValue::Str(&f.name)),
            attr("short_name", |f| AttrValue::Str(&f.short_name)),
            attr("type", |f| AttrValue::Str(&f.type_name)),
        ]
    }
}

impl<T> Describe<T> for Key {
    fn attributes() -> Vec<Attribute<Self, T>> {
        let attr = Attribute::<Self, T>::new;
        vec![
            attr("name", |k| AttrValue::Str(&k.name)),
            attr("new_name", |k| AttrValue::Str(&k.new_name)),
            attr("type", |k| AttrValue::Str(&k.type_name)),
            attr("expression", |k| AttrValue::Str(&k.expression)),
            attr("arg_expression", |k| AttrValue::Str(&k.arg_expression)),
            attr("desc", |k| AttrValue::Bool(k.desc)),
        ]
    }
}

impl<T> Describe<T> for Table<T> {
    fn attributes() -> Vec<Attribute<Self, T>> {
        let attr = Attribute::<Self, T>::new;
        vec![
            attr("name", |t| AttrValue::Str(&t.name)),
            attr("fields", |t| AttrValue::Fields(&t.fields)),
            attr("history_keys", |t| AttrValue::Keys(&t.history_keys)),
            attr("keys", |t| AttrValue::Keys(&t.keys)),
        ]
    }
}

impl<T> Describe<T> for Query<T> {
    fn attributes() -> Vec<Attribute<Self, T>> {
        let attr = Attribute::<Self, T>::new;
        vec![
            attr("wasm_name", |q| AttrValue::Name(q.identifier)),
            attr("index", |q| AttrValue::Str(&q.index)),
            attr("function", |q| AttrValue::Str(&q.function)),
            attr("table", |q| AttrValue::Str(&q.table_name)),
            attr("is_state", |q| AttrValue::Bool(q.is_state)),
            attr("limit_block_index", |q| AttrValue::Bool(q.limit_block_index)),
            attr("max_results", |q| AttrValue::U32(q.max_results)),
            attr("join", |q| AttrValue::OptStr(q.join_table_name.as_deref())),
            attr("join_query_wasm_name", |q| {
                AttrValue::OptName(q.join_query_identifier)
            }),
            attr("args", |q| AttrValue::Keys(&q.args)),
            attr("sort_keys", |q| AttrValue::Keys(&q.sort_keys)),
            attr("join_key_values", |q| AttrValue::Keys(&q.join_key_values)),
            attr("fields_from_join", |q| AttrValue::Keys(&q.fields_from_join)),
            attr("conditions", |q| AttrValue::Strings(&q.conditions)),
        ]
    }
}

impl<T> Describe<T> for Schema<T> {
    fn attributes() -> Vec<Attribute<Self, T>> {
        let attr = Attribute::<Self, T>::new;
        vec![
            attr("tables", |s| AttrValue::Tables(s.tables())),
            attr("queries", |s| AttrValue::Queries(s.queries())),
        ]
    }
}
