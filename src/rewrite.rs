//! Object-graph rewriting
//!
//! [`Tailorable`] is implemented by every type whose strings can be run
//! through a [`Tailor`]. Strings rewrite themselves; containers, smart
//! pointers and `serde_json::Value` recurse into their elements; scalars do
//! nothing. Record types get an implementation from `#[derive(Tailorable)]`,
//! which applies per-field [`Directive`]s.
//!
//! ## Directives
//!
//! A directive is the `(level, blocklist)` pair in force while a value is
//! visited. Containers pass the ambient directive down unchanged. A field
//! annotated with `#[tailor(...)]` replaces it for that field and everything
//! reached through it; sibling fields are unaffected.
//!
//! ## Write failures
//!
//! Values that cannot be written through a unique borrow (a shared `Rc` or
//! `Arc`, or an `Rc<RefCell<_>>` that is already borrowed) are skipped and
//! keep their value. Traversal continues with the next element.
//!
//! Cyclic graphs built from `Rc<RefCell<_>>` never reach the same cell
//! twice: a cell already borrowed higher up the walk is skipped.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::pipeline::{Level, Tailor};

/// The `(level, blocklist)` pair applied to strings during a rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Directive {
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub blocklist: bool,
}

impl Directive {
    pub const fn new(level: Level, blocklist: bool) -> Self {
        Self { level, blocklist }
    }

    /// The directive of a bare `#[tailor]` field: safe markup, blocklisted
    pub const fn marked() -> Self {
        Self::new(Level::Safe, true)
    }
}

/// A value whose strings can be rewritten by a [`Tailor`]
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Tailorable`",
    label = "this type cannot be walked for strings",
    note = "use `#[derive(Tailorable)]` on the type definition",
    note = "or mark the field with `#[tailor(skip)]`"
)]
pub trait Tailorable {
    /// Rewrites every string reachable from `self` under `directive`
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive);
}

macro_rules! impl_tailorable_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Tailorable for $ty {
                fn tailor_with(&mut self, _tailor: &mut Tailor, _directive: Directive) {}
            }
        )*
    };
}

impl_tailorable_scalar!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, (),
);

impl Tailorable for String {
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        if let Some(output) = tailor.tailor(self, directive.level, directive.blocklist) {
            *self = output;
        }
    }
}

impl Tailorable for Cow<'_, str> {
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        if let Some(output) = tailor.tailor(self, directive.level, directive.blocklist) {
            *self = Cow::Owned(output);
        }
    }
}

impl<T> Tailorable for Option<T>
where
    T: Tailorable,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        if let Some(value) = self {
            value.tailor_with(tailor, directive);
        }
    }
}

impl<T> Tailorable for Box<T>
where
    T: Tailorable + ?Sized,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        (**self).tailor_with(tailor, directive);
    }
}

impl<T> Tailorable for &mut T
where
    T: Tailorable + ?Sized,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        (**self).tailor_with(tailor, directive);
    }
}

impl<T> Tailorable for [T]
where
    T: Tailorable,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        for value in self.iter_mut() {
            value.tailor_with(tailor, directive);
        }
    }
}

impl<T, const N: usize> Tailorable for [T; N]
where
    T: Tailorable,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        self.as_mut_slice().tailor_with(tailor, directive);
    }
}

impl<T> Tailorable for Vec<T>
where
    T: Tailorable,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        self.as_mut_slice().tailor_with(tailor, directive);
    }
}

impl<T> Tailorable for VecDeque<T>
where
    T: Tailorable,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        for value in self.iter_mut() {
            value.tailor_with(tailor, directive);
        }
    }
}

// Keys are never rewritten.
impl<K, V, S> Tailorable for HashMap<K, V, S>
where
    V: Tailorable,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        for value in self.values_mut() {
            value.tailor_with(tailor, directive);
        }
    }
}

impl<K, V> Tailorable for BTreeMap<K, V>
where
    V: Tailorable,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        for value in self.values_mut() {
            value.tailor_with(tailor, directive);
        }
    }
}

// Set elements are rebuilt; rewritten values that collide collapse into one.
impl<T, S> Tailorable for HashSet<T, S>
where
    T: Tailorable + Hash + Eq,
    S: BuildHasher,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        let values: Vec<T> = self.drain().collect();
        for mut value in values {
            value.tailor_with(tailor, directive);
            self.insert(value);
        }
    }
}

impl<T> Tailorable for BTreeSet<T>
where
    T: Tailorable + Ord,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        for mut value in std::mem::take(self) {
            value.tailor_with(tailor, directive);
            self.insert(value);
        }
    }
}

impl<T> Tailorable for Rc<T>
where
    T: Tailorable + ?Sized,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        match Rc::get_mut(self) {
            Some(value) => value.tailor_with(tailor, directive),
            None => tracing::trace!(
                strong = Rc::strong_count(self),
                "skipping shared Rc during rewrite"
            ),
        }
    }
}

impl<T> Tailorable for Arc<T>
where
    T: Tailorable + ?Sized,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        match Arc::get_mut(self) {
            Some(value) => value.tailor_with(tailor, directive),
            None => tracing::trace!(
                strong = Arc::strong_count(self),
                "skipping shared Arc during rewrite"
            ),
        }
    }
}

impl<T> Tailorable for Rc<RefCell<T>>
where
    T: Tailorable + ?Sized,
{
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        match self.try_borrow_mut() {
            Ok(mut value) => value.tailor_with(tailor, directive),
            Err(_) => tracing::trace!("skipping borrowed RefCell during rewrite"),
        }
    }
}

impl Tailorable for serde_json::Value {
    fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
        use serde_json::Value;

        match self {
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
            Value::String(text) => text.tailor_with(tailor, directive),
            Value::Array(values) => values.tailor_with(tailor, directive),
            Value::Object(map) => {
                for value in map.values_mut() {
                    value.tailor_with(tailor, directive);
                }
            }
        }
    }
}

macro_rules! impl_tailorable_tuple {
    ($($name:ident),+) => {
        impl<$($name: Tailorable),+> Tailorable for ($($name,)+) {
            #[allow(non_snake_case)]
            fn tailor_with(&mut self, tailor: &mut Tailor, directive: Directive) {
                let ($($name,)+) = self;
                $($name.tailor_with(tailor, directive);)+
            }
        }
    };
}

impl_tailorable_tuple!(A);
impl_tailorable_tuple!(A, B);
impl_tailorable_tuple!(A, B, C);
impl_tailorable_tuple!(A, B, C, D);
