//! Grouped shape lists with lookup by position or by key.

use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use super::ShapeList;
use crate::brep::Shape;
use crate::{CadError, Result};

type KeyFn<K> = Rc<dyn Fn(&Shape) -> Result<K>>;

/// The result of a `group_by`: ordered groups plus the key that made each.
///
/// Groups are addressed by index (`groups[0]`), by key ([`GroupBy::group`]),
/// or by any member ([`GroupBy::group_for`]).
pub struct GroupBy<K> {
    keys: Vec<K>,
    groups: Vec<ShapeList>,
    key_fn: KeyFn<K>,
}

impl<K: PartialEq + fmt::Debug> GroupBy<K> {
    /// Partitions `shapes` by `key_fn`, keeping groups in first-seen key order.
    ///
    /// Members keep their relative order within a group.
    pub(crate) fn build(shapes: &[Shape], key_fn: KeyFn<K>) -> Result<Self> {
        let mut keys: Vec<K> = Vec::new();
        let mut groups: Vec<ShapeList> = Vec::new();
        for shape in shapes {
            let key = key_fn(shape)?;
            match keys.iter().position(|k| *k == key) {
                Some(i) => groups[i].push(shape.clone()),
                None => {
                    keys.push(key);
                    groups.push(ShapeList::from(vec![shape.clone()]));
                }
            }
        }
        Ok(Self {
            keys,
            groups,
            key_fn,
        })
    }

    /// Reorders groups by their keys.
    pub(crate) fn sort_groups_by<F>(mut self, mut compare: F) -> Self
    where
        F: FnMut(&K, &K) -> std::cmp::Ordering,
    {
        let mut order: Vec<usize> = (0..self.keys.len()).collect();
        order.sort_by(|a, b| compare(&self.keys[*a], &self.keys[*b]));
        let mut keys: Vec<Option<K>> = self.keys.into_iter().map(Some).collect();
        let mut groups: Vec<Option<ShapeList>> = self.groups.into_iter().map(Some).collect();
        self.keys = order.iter().filter_map(|i| keys[*i].take()).collect();
        self.groups = order.iter().filter_map(|i| groups[*i].take()).collect();
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Keys in group order.
    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShapeList> {
        self.groups.iter()
    }

    pub fn first(&self) -> Option<&ShapeList> {
        self.groups.first()
    }

    pub fn last(&self) -> Option<&ShapeList> {
        self.groups.last()
    }

    /// Returns the group whose members produced `key`.
    pub fn group(&self, key: &K) -> Result<&ShapeList> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| &self.groups[i])
            .ok_or_else(|| CadError::KeyNotFound(format!("no group with key {key:?}")))
    }

    /// Returns the group `shape` belongs to, by recomputing its key.
    pub fn group_for(&self, shape: &Shape) -> Result<&ShapeList> {
        let key = (self.key_fn)(shape)?;
        self.group(&key)
    }

    pub fn into_groups(self) -> Vec<ShapeList> {
        self.groups
    }
}

impl<K> Index<usize> for GroupBy<K> {
    type Output = ShapeList;

    fn index(&self, i: usize) -> &ShapeList {
        &self.groups[i]
    }
}

impl<'a, K> IntoIterator for &'a GroupBy<K> {
    type Item = &'a ShapeList;
    type IntoIter = std::slice::Iter<'a, ShapeList>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl<K: fmt::Debug> fmt::Debug for GroupBy<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.keys.iter().zip(self.groups.iter().map(|g| g.len())))
            .finish()
    }
}
