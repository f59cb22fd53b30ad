// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The selected subset and its hypervolume.

use crate::index::PointId;

/// A `k`-point subset together with the hypervolume it dominates.
///
/// Members are kept sorted by identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    hypervolume: f64,
    members: Vec<PointId>,
}

impl Solution {
    #[inline]
    pub fn new(hypervolume: f64, mut members: Vec<PointId>) -> Self {
        members.sort_unstable();
        Self {
            hypervolume,
            members,
        }
    }

    #[inline]
    pub fn hypervolume(&self) -> f64 {
        self.hypervolume
    }

    #[inline]
    pub fn members(&self) -> &[PointId] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: PointId) -> bool {
        self.members.binary_search(&id).is_ok()
    }

    /// Returns the `n`-length indicator with `1` at every member position.
    pub fn membership(&self, n: usize) -> Vec<u8> {
        let mut indicator = vec![0u8; n];
        for id in &self.members {
            debug_assert!(
                id.get() < n,
                "called `Solution::membership` with member out of bounds: the len is {} but the index is {}",
                n,
                id.get()
            );
            indicator[id.get()] = 1;
        }
        indicator
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Solution(hypervolume: {}, members: [", self.hypervolume)?;
        for (i, id) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id.get())?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(i: usize) -> PointId {
        PointId::new(i)
    }

    #[test]
    fn test_solution_sorts_members() {
        let s = Solution::new(12.5, vec![pid(4), pid(0), pid(2)]);
        assert_eq!(s.members(), &[pid(0), pid(2), pid(4)]);
        assert_eq!(s.len(), 3);
        assert!(s.contains(pid(2)));
        assert!(!s.contains(pid(3)));
        assert_eq!(s.hypervolume(), 12.5);
    }

    #[test]
    fn test_membership_indicator() {
        let s = Solution::new(1.0, vec![pid(3), pid(1)]);
        assert_eq!(s.membership(5), vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_display() {
        let s = Solution::new(9.0, vec![pid(2), pid(0)]);
        assert_eq!(format!("{}", s), "Solution(hypervolume: 9, members: [0, 2])");
    }
}
