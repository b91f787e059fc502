use std::collections::BTreeSet;

/// Ids of the rows the user has ticked.
///
/// Ids are not checked against the list on insert; stale ones are pruned by
/// [`Selection::retain_known`] when the list is reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    selected: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_one(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Deselects every visible id when all of them are selected, otherwise
    /// selects them all. Ids outside `visible_ids` are left alone.
    pub fn toggle_all_visible<S: AsRef<str>>(&mut self, visible_ids: &[S]) {
        if self.is_all_visible_selected(visible_ids) {
            for id in visible_ids {
                self.selected.remove(id.as_ref());
            }
        } else {
            self.selected
                .extend(visible_ids.iter().map(|id| id.as_ref().to_string()));
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_all_visible_selected<S: AsRef<str>>(&self, visible_ids: &[S]) -> bool {
        !visible_ids.is_empty()
            && visible_ids
                .iter()
                .all(|id| self.selected.contains(id.as_ref()))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Drops ids the current list no longer contains.
    pub fn retain_known<'a>(&mut self, known: impl IntoIterator<Item = &'a str>) {
        let known: BTreeSet<&str> = known.into_iter().collect();
        self.selected.retain(|id| known.contains(id.as_str()));
    }

    /// Replaces the selection with exactly `ids`.
    pub fn replace<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = ids.into_iter().map(Into::into).collect();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}
