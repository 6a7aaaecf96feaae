//! User-item interaction streams.

/// One user-item interaction event at an epoch-second timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub user: i64,
    pub item: i64,
    pub timestamp: i64,
}

/// An ordered-by-time collection of interactions.
#[derive(Debug, Clone, Default)]
pub struct Interactions(Vec<Interaction>);

impl Interactions {
    /// Build from raw events, sorting by timestamp (stable, so ties keep
    /// their input order).
    pub fn new(mut events: Vec<Interaction>) -> Self {
        events.sort_by_key(|e| e.timestamp);
        Self(events)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interaction> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Interaction] {
        &self.0
    }

    /// Earliest and latest event timestamps, or `None` when empty.
    pub fn timestamp_range(&self) -> Option<(i64, i64)> {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }

    pub fn push(&mut self, event: Interaction) {
        self.0.push(event);
    }

    pub fn extend_from(&mut self, other: &Interactions) {
        self.0.extend_from_slice(&other.0);
    }
}

impl<'a> IntoIterator for &'a Interactions {
    type Item = &'a Interaction;
    type IntoIter = std::slice::Iter<'a, Interaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(user: i64, item: i64, t: i64) -> Interaction {
        Interaction {
            user,
            item,
            timestamp: t,
        }
    }

    #[test]
    fn new_sorts_by_timestamp() {
        let data = Interactions::new(vec![ev(1, 1, 30), ev(1, 2, 10), ev(2, 3, 20)]);
        let times: Vec<i64> = data.iter().map(|e| e.timestamp).collect();
        assert_eq!(times, vec![10, 20, 30]);
    }

    #[test]
    fn timestamp_range_spans_stream() {
        let data = Interactions::new(vec![ev(1, 1, 30), ev(1, 2, 10)]);
        assert_eq!(data.timestamp_range(), Some((10, 30)));
        assert_eq!(Interactions::default().timestamp_range(), None);
    }
}
