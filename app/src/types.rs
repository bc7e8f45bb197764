//! Domain types for the todo list.
//!
//! A [`TodoList`] is an immutable snapshot. Every update operation returns a
//! new list in a fresh allocation and leaves the receiver (and every other
//! snapshot sharing its allocation) untouched. Operations addressed at an
//! out-of-range index return a clone of the receiver that shares its
//! allocation, which is how callers tell "nothing changed" apart from an
//! update: compare with [`TodoList::ptr_eq`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Identifier of an assignable user
///
/// Select widgets hand values around as strings; [`FromStr`] and the
/// deserializer both normalize those to the numeric form stored on a [`Todo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a `UserId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid [`UserId`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid user id {0:?}")]
pub struct ParseUserIdError(String);

impl FromStr for UserId {
    type Err = ParseUserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseUserIdError(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(id) => Ok(Self(id)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A single todo item
///
/// Values are never edited in place once they are part of a [`TodoList`];
/// the `with_*` methods build the replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Title of the todo
    pub title: String,
    /// Assigned user, if any
    #[serde(default)]
    pub user: Option<UserId>,
    /// Whether the todo is done
    #[serde(default)]
    pub is_done: bool,
}

impl Todo {
    /// Creates an unassigned, open todo
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            user: None,
            is_done: false,
        }
    }

    /// Returns a copy assigned to `user`
    #[must_use]
    pub fn with_user(&self, user: UserId) -> Self {
        Self {
            user: Some(user),
            ..self.clone()
        }
    }

    /// Returns a copy with `is_done` set to `is_done`
    #[must_use]
    pub fn with_done(&self, is_done: bool) -> Self {
        Self {
            is_done,
            ..self.clone()
        }
    }

    /// Returns a copy with `is_done` flipped
    #[must_use]
    pub fn toggled(&self) -> Self {
        self.with_done(!self.is_done)
    }
}

/// True when the list is non-empty and every todo is done
#[must_use]
pub fn all_done(todos: &[Todo]) -> bool {
    !todos.is_empty() && todos.iter().all(|todo| todo.is_done)
}

/// Ordered, immutable snapshot of todos
///
/// Position is identity: toggle, assign and remove address items by index.
/// Cloning is cheap and shares the allocation.
#[derive(Clone, Debug)]
pub struct TodoList {
    items: Arc<[Todo]>,
}

impl TodoList {
    /// Creates an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    /// Number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the list holds no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Todo at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Todo> {
        self.items.get(index)
    }

    /// Iterates todos in order
    pub fn iter(&self) -> std::slice::Iter<'_, Todo> {
        self.items.iter()
    }

    /// The todos as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Todo] {
        &self.items
    }

    /// Number of todos marked done
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.items.iter().filter(|todo| todo.is_done).count()
    }

    /// See [`all_done`]
    #[must_use]
    pub fn all_done(&self) -> bool {
        all_done(&self.items)
    }

    /// True when both snapshots share one allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// New list with `todo` appended
    ///
    /// The title is stored as given; trimming and emptiness checks happen
    /// where the todo is created.
    #[must_use]
    pub fn add(&self, todo: Todo) -> Self {
        self.items
            .iter()
            .cloned()
            .chain(std::iter::once(todo))
            .collect()
    }

    /// New list with the todo at `index` toggled; unchanged when out of range
    #[must_use]
    pub fn toggle_at(&self, index: usize) -> Self {
        self.replace_at(index, Todo::toggled)
    }

    /// New list with the todo at `index` assigned to `user`; unchanged when out of range
    #[must_use]
    pub fn assign_at(&self, index: usize, user: UserId) -> Self {
        self.replace_at(index, |todo| todo.with_user(user))
    }

    /// New list without the todo at `index`; unchanged when out of range
    #[must_use]
    pub fn remove_at(&self, index: usize) -> Self {
        if index >= self.items.len() {
            return self.clone();
        }

        self.items
            .iter()
            .enumerate()
            .filter(|&(position, _)| position != index)
            .map(|(_, todo)| todo.clone())
            .collect()
    }

    /// Copy of `next` in a fresh allocation
    ///
    /// The copy keeps the "every update yields a new snapshot" rule even when
    /// `next` is the current list.
    #[must_use]
    pub fn replace_all(&self, next: &Self) -> Self {
        next.items.iter().cloned().collect()
    }

    /// New list with every todo set to done, or to open when all already are
    #[must_use]
    pub fn toggled_all(&self) -> Self {
        let target = !self.all_done();
        self.items.iter().map(|todo| todo.with_done(target)).collect()
    }

    fn replace_at(&self, index: usize, f: impl FnOnce(&Todo) -> Todo) -> Self {
        let Some(current) = self.items.get(index) else {
            return self.clone();
        };

        let replacement = f(current);
        let mut items = self.items.to_vec();
        items[index] = replacement;
        Self::from(items)
    }
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TodoList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for TodoList {}

impl From<Vec<Todo>> for TodoList {
    fn from(items: Vec<Todo>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }
}

impl FromIterator<Todo> for TodoList {
    fn from_iter<I: IntoIterator<Item = Todo>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a Todo;
    type IntoIter = std::slice::Iter<'a, Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for TodoList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TodoList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Todo>::deserialize(deserializer).map(Self::from)
    }
}
