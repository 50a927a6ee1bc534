//! Eager-loading directives for repository reads.

/// Set of related entities a read should materialise alongside the root rows.
///
/// # Examples
/// ```
/// use infusion_backend::domain::ports::{Includes, TreatmentRelation};
///
/// let includes = Includes::of([TreatmentRelation::Medicine, TreatmentRelation::Medicine]);
/// assert!(includes.contains(TreatmentRelation::Medicine));
/// assert!(!includes.contains(TreatmentRelation::Patient));
/// assert_eq!(includes.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Includes<R>(Vec<R>);

impl<R: Copy + PartialEq> Includes<R> {
    /// Load only the root rows.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Load the given relations; duplicates collapse.
    pub fn of(relations: impl IntoIterator<Item = R>) -> Self {
        let mut set = Vec::new();
        for relation in relations {
            if !set.contains(&relation) {
                set.push(relation);
            }
        }
        Self(set)
    }

    pub fn contains(&self, relation: R) -> bool {
        self.0.contains(&relation)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<R: Copy + PartialEq> Default for Includes<R> {
    fn default() -> Self {
        Self::none()
    }
}
