//! Bidirectional translation between on-disk column titles and in-memory
//! key/field names.

/// One `{title, alias}` pair. `title` is the column header as written in
/// the grid; `alias` is the map key or record field name it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleAlias {
    title: String,
    alias: String,
}

impl TitleAlias {
    pub fn new(title: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            alias: alias.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

/// Unordered translation table. Lookup is a linear scan with exact string
/// equality; the first matching entry wins, and a miss passes the input
/// through unchanged. An empty table is a no-op translator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<TitleAlias>,
}

impl AliasTable {
    pub fn new(entries: Vec<TitleAlias>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reading direction: column header → map key / field name.
    pub fn alias_for<'a>(&'a self, title: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|e| e.title == title)
            .map(|e| e.alias.as_str())
            .unwrap_or(title)
    }

    /// Writing direction: map key / field name → column header.
    pub fn title_for<'a>(&'a self, alias: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|e| e.alias == alias)
            .map(|e| e.title.as_str())
            .unwrap_or(alias)
    }
}

impl From<Vec<TitleAlias>> for AliasTable {
    fn from(entries: Vec<TitleAlias>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<TitleAlias> for AliasTable {
    fn from_iter<I: IntoIterator<Item = TitleAlias>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
