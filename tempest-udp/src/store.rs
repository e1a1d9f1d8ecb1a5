//! Latest-document store and key-based accessor.

use std::collections::HashMap;

use serde_json::Value;

use crate::{table, Document, Key, Kind};

/// Holds the most recent document of each kind.
///
/// A new document of a kind replaces the previous one wholesale. The store
/// also tracks the kind currently being dispatched to a notifier, which backs
/// [`Store::current_value`].
#[derive(Debug, Default, Clone)]
pub struct Store {
    documents: HashMap<Kind, Document>,
    current: Option<Kind>,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `key` in the latest document of `kind`.
    ///
    /// Returns `None` when the key is not part of that kind, when the kind has
    /// never been received, or when the stored message lacks the position.
    /// The value keeps its wire representation.
    pub fn get_value(&self, kind: Kind, key: Key) -> Option<&Value> {
        let location = table::location(kind, key)?;
        self.documents.get(&kind)?.resolve(location)
    }

    /// Returns the value of `key` for the kind currently being dispatched.
    ///
    /// Only meaningful inside a notifier; returns `None` everywhere else.
    pub fn current_value(&self, key: Key) -> Option<&Value> {
        self.get_value(self.current?, key)
    }

    /// Returns the kind currently being dispatched, if any.
    #[inline]
    pub fn current_kind(&self) -> Option<Kind> {
        self.current
    }

    /// Returns true if a document of `kind` has ever been stored.
    #[inline]
    pub fn has_object(&self, kind: Kind) -> bool {
        self.documents.contains_key(&kind)
    }

    /// Returns a copy of the latest document of `kind`, or an empty document.
    pub fn last_document(&self, kind: Kind) -> Document {
        self.documents.get(&kind).cloned().unwrap_or_default()
    }

    /// Returns the kinds that have been received, in protocol order.
    pub fn kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        Kind::ALL.into_iter().filter(|kind| self.has_object(*kind))
    }

    pub(crate) fn replace(&mut self, kind: Kind, document: Document) {
        self.documents.insert(kind, document);
    }

    pub(crate) fn set_current(&mut self, kind: Option<Kind>) {
        self.current = kind;
    }
}
