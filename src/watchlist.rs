use smallvec::SmallVec;

/// Result of a watchlist edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Applied,
    Rejected(&'static str),
}

impl ListChange {
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, ListChange::Applied)
    }
}

/// Tracked underlyings. Labels are unique and stored upper-case.
/// Always holds at least one label, and the selection always points at one.
#[derive(Debug, Clone)]
pub struct Watchlist {
    labels: SmallVec<[String; 8]>,
    selected: usize,
}

impl Watchlist {
    /// Build from raw labels. Blanks and case-insensitive duplicates are
    /// dropped. Falls back to the first label when `selected` is absent.
    /// Returns None when no usable label remains.
    pub fn new<I, S>(labels: I, selected: &str) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: SmallVec<[String; 8]> = SmallVec::new();
        for raw in labels {
            if let Some(label) = normalize(raw.as_ref()) {
                if !list.contains(&label) {
                    list.push(label);
                }
            }
        }
        if list.is_empty() {
            return None;
        }

        let mut wl = Self {
            labels: list,
            selected: 0,
        };
        if !wl.select(selected).is_applied() {
            tracing::debug!(selected, "initial selection not in watchlist, using first");
        }
        Some(wl)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn selected(&self) -> &str {
        &self.labels[self.selected]
    }

    pub fn add(&mut self, raw: &str) -> ListChange {
        let Some(label) = normalize(raw) else {
            return ListChange::Rejected("empty label");
        };
        if self.labels.contains(&label) {
            return ListChange::Rejected("already tracked");
        }
        self.labels.push(label);
        ListChange::Applied
    }

    pub fn remove(&mut self, raw: &str) -> ListChange {
        let Some(idx) = self.position(raw) else {
            return ListChange::Rejected("not tracked");
        };
        if self.labels.len() <= 1 {
            return ListChange::Rejected("cannot remove the last underlying");
        }

        self.labels.remove(idx);
        if idx == self.selected {
            self.selected = 0;
        } else if idx < self.selected {
            self.selected -= 1;
        }
        ListChange::Applied
    }

    pub fn select(&mut self, raw: &str) -> ListChange {
        match self.position(raw) {
            Some(idx) => {
                self.selected = idx;
                ListChange::Applied
            }
            None => ListChange::Rejected("not tracked"),
        }
    }

    fn position(&self, raw: &str) -> Option<usize> {
        let label = normalize(raw)?;
        self.labels.iter().position(|l| *l == label)
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}
