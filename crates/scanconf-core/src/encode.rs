//! Update request encoding.
//!
//! Turns ordered entry lists into the query fragment the remote API takes,
//! e.g. `set_routes=a|b|c|d,e|f|g|h&set_vlans=...`. The encoder never re-sorts;
//! entries are emitted in the order they are given.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::entry::{Category, NetworkEntry};

/// What to send for a category that is part of the update but has no entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyCategoryPolicy {
    /// Emit the marker with an empty value (`set_vlans=`), clearing the category remotely.
    #[default]
    Clear,
    /// Leave the marker out, leaving the category unchanged remotely.
    Omit,
}

/// Which categories an update call carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateScope {
    pub routes: bool,
    pub vlans: bool,
}

impl UpdateScope {
    pub const ALL: Self = Self {
        routes: true,
        vlans: true,
    };

    pub fn includes(&self, category: Category) -> bool {
        match category {
            Category::Routes => self.routes,
            Category::Vlans => self.vlans,
        }
    }

    /// Widen the scope to cover `category`.
    pub fn include(&mut self, category: Category) {
        match category {
            Category::Routes => self.routes = true,
            Category::Vlans => self.vlans = true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.routes && !self.vlans
    }
}

/// Join rendered entries with `,` (no leading or trailing separator).
pub fn join_entries<'a, E>(entries: impl IntoIterator<Item = &'a E>) -> String
where
    E: NetworkEntry + 'a,
{
    entries
        .into_iter()
        .map(|entry| entry.render())
        .collect::<Vec<_>>()
        .join(",")
}

/// Encode one category: `set_vlans=<A>,<B>`.
pub fn encode_category<'a, E>(entries: impl IntoIterator<Item = &'a E>) -> String
where
    E: NetworkEntry + 'a,
{
    format!("{}={}", E::CATEGORY.marker(), join_entries(entries))
}

/// An encoded update payload: one `set_*` parameter per included category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePayload {
    params: Vec<(Category, String)>,
}

impl UpdatePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category built from `entries`, subject to `policy` when empty.
    pub fn push_category<'a, E>(
        &mut self,
        entries: impl IntoIterator<Item = &'a E>,
        policy: EmptyCategoryPolicy,
    ) where
        E: NetworkEntry + 'a,
    {
        let value = join_entries(entries);
        if value.is_empty() && policy == EmptyCategoryPolicy::Omit {
            return;
        }
        self.params.push((E::CATEGORY, value));
    }

    /// True when no category made it into the payload.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.params.iter().map(|(c, _)| *c)
    }

    /// Encoded value for `category`, if it is present.
    pub fn value(&self, category: Category) -> Option<&str> {
        self.params
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, v)| v.as_str())
    }

    /// `(marker, value)` pairs in payload order, unescaped.
    pub fn params(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.params
            .iter()
            .map(|(category, value)| (category.marker(), value.as_str()))
    }

    /// The full query fragment, categories joined with `&`.
    pub fn to_query(&self) -> String {
        self.params
            .iter()
            .map(|(category, value)| format!("{}={value}", category.marker()))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for UpdatePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

// Serialized as the query fragment it encodes.
impl Serialize for UpdatePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
