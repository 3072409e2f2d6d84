//! The active filter list
//!
//! Filters are addressed by 1-based ordinals in list order. Removing a filter
//! shifts the ordinals of everything after it down by one.

use super::error::FilterError;
use super::instance::FilterInstance;

/// Ordered list of active filters
#[derive(Debug, Clone, Default)]
pub struct FilterList {
    filters: Vec<FilterInstance>,
}

impl FilterList {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Append a filter
    ///
    /// # Errors
    ///
    /// Returns `FilterError::ConflictingGroupNegation` if the filter is a
    /// collection filter whose negation differs from an active one.
    pub fn push(&mut self, filter: FilterInstance) -> Result<(), FilterError> {
        if filter.is_group_filter()
            && self
                .filters
                .iter()
                .any(|f| f.is_group_filter() && f.negated() != filter.negated())
        {
            return Err(FilterError::ConflictingGroupNegation);
        }
        self.filters.push(filter);
        Ok(())
    }

    /// Remove the filter at a 1-based ordinal
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidOrdinal` if no filter has that ordinal.
    pub fn remove(&mut self, ordinal: usize) -> Result<FilterInstance, FilterError> {
        if ordinal == 0 || ordinal > self.filters.len() {
            return Err(FilterError::InvalidOrdinal {
                ordinal,
                len: self.filters.len(),
            });
        }
        Ok(self.filters.remove(ordinal - 1))
    }

    pub fn reset(&mut self) {
        self.filters.clear();
    }

    /// Replace the whole list, used by the selection engine after resolution
    pub(crate) fn replace(&mut self, filters: Vec<FilterInstance>) {
        self.filters = filters;
    }

    #[must_use]
    pub fn get(&self, ordinal: usize) -> Option<&FilterInstance> {
        ordinal.checked_sub(1).and_then(|idx| self.filters.get(idx))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterInstance> {
        self.filters.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[FilterInstance] {
        &self.filters
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        self.filters.iter().any(FilterInstance::is_placeholder)
    }

    /// Whether any collection filter is active, resolved or not
    #[must_use]
    pub fn has_group_filters(&self) -> bool {
        self.filters.iter().any(FilterInstance::is_group_filter)
    }

    /// Numbered descriptions, one per line
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        self.filters
            .iter()
            .enumerate()
            .map(|(idx, f)| format!("{}. {}", idx + 1, f.describe()))
            .collect()
    }

    /// Command lines that recreate the list
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.filters.iter().map(FilterInstance::command).collect()
    }
}

impl<'a> IntoIterator for &'a FilterList {
    type Item = &'a FilterInstance;
    type IntoIter = std::slice::Iter<'a, FilterInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::Registry;
    use crate::testing::fixed_context;

    fn filter(line: &str) -> FilterInstance {
        Registry::parse_command(line, &fixed_context()).unwrap()
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut list = FilterList::new();
        list.push(filter("stars 5")).unwrap();
        list.push(filter("bpm 180")).unwrap();
        list.push(filter("length 90")).unwrap();

        let removed = list.remove(1).unwrap();
        assert_eq!(removed.template().key, "stars");
        assert_eq!(list.get(1).unwrap().template().key, "bpm");
        assert_eq!(list.get(2).unwrap().template().key, "length");
        assert!(list.get(3).is_none());
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut list = FilterList::new();
        list.push(filter("stars 5")).unwrap();
        assert_eq!(
            list.remove(0).unwrap_err(),
            FilterError::InvalidOrdinal { ordinal: 0, len: 1 }
        );
        assert!(list.remove(2).is_err());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_reset_clears() {
        let mut list = FilterList::new();
        list.push(filter("stars 5")).unwrap();
        list.reset();
        assert!(list.is_empty());
    }

    #[test]
    fn test_group_filters_must_share_negation() {
        let mut list = FilterList::new();
        list.push(filter("collection a")).unwrap();
        list.push(filter("collection b")).unwrap();
        assert_eq!(
            list.push(filter("!collection c")).unwrap_err(),
            FilterError::ConflictingGroupNegation
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_describe_is_numbered() {
        let mut list = FilterList::new();
        list.push(filter("stars 5")).unwrap();
        list.push(filter("!author RLC")).unwrap();
        assert_eq!(
            list.describe(),
            vec!["1. Star rating at least 5", "2. Not mapped by RLC"]
        );
        assert_eq!(list.commands(), vec!["stars 5", "!author RLC"]);
    }
}
