// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! The catalog of all possible strict preference orders over a set of candidates.
//!
//! A ballot count vector is only meaningful relative to a catalog: entry i of the vector
//! is the number of voters whose preferences are exactly ordering i of the catalog.
//! Elimination rules work on *reduced* catalogs, where a candidate has been deleted from
//! every ordering. A reduced catalog keeps the same length and index alignment as the
//! catalog it came from, so the same ballot count vector still applies to it.

use crate::ballot_metadata::CandidateIndex;
use serde::{Serialize,Deserialize};

/// A (possibly partial, after reduction) strict preference order, most preferred first.
#[derive(Clone,Debug,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub struct CandidateOrdering(pub Vec<CandidateIndex>);

impl CandidateOrdering {
    pub fn first(&self) -> Option<CandidateIndex> { self.0.first().copied() }
    pub fn last(&self) -> Option<CandidateIndex> { self.0.last().copied() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn position_of(&self,candidate:CandidateIndex) -> Option<usize> { self.0.iter().position(|&c|c==candidate) }
}

const NOT_PRESENT : usize = usize::MAX;

/// All the orderings a ballot count vector is indexed by.
#[derive(Clone,Debug)]
pub struct OrderingCatalog {
    /// The candidates appearing in every ordering, sorted by index.
    candidates : Vec<CandidateIndex>,
    orderings : Vec<CandidateOrdering>,
    /// positions[i*stride+c] is the position of candidate c in ordering i, or NOT_PRESENT.
    positions : Vec<usize>,
    stride : usize,
    /// true iff this is exactly the output of `generate`, in which case `index_of` works.
    complete : bool,
}

/// n!, panicking on overflow (n>20), which is well past anything that could be enumerated.
pub fn factorial(n:usize) -> usize {
    (1..=n).try_fold(1usize,|acc,i|acc.checked_mul(i)).expect("factorial overflow")
}

impl OrderingCatalog {
    /// Every permutation of candidates 0..num_candidates, in lexicographic order.
    /// So for 3 candidates the order is ABC, ACB, BAC, BCA, CAB, CBA.
    /// ```
    /// use voting_criteria::orderings::OrderingCatalog;
    /// let catalog = OrderingCatalog::generate(3);
    /// assert_eq!(catalog.len(),6);
    /// assert_eq!(catalog.ordering(3).0.iter().map(|c|c.0).collect::<Vec<_>>(),vec![1,2,0]);
    /// ```
    pub fn generate(num_candidates:usize) -> Self {
        let candidates : Vec<CandidateIndex> = (0..num_candidates).map(CandidateIndex).collect();
        let mut orderings = Vec::with_capacity(factorial(num_candidates));
        let mut current = candidates.clone();
        loop {
            orderings.push(CandidateOrdering(current.clone()));
            if !next_permutation(&mut current) { break; }
        }
        let mut res = Self::from_orderings(candidates,orderings);
        res.complete=true;
        res
    }

    /// Make a catalog from explicit orderings. Each ordering should contain each of `candidates` exactly once.
    pub fn from_orderings(mut candidates:Vec<CandidateIndex>,orderings:Vec<CandidateOrdering>) -> Self {
        candidates.sort();
        let stride = candidates.last().map(|c|c.0+1).unwrap_or(0);
        let mut positions = vec![NOT_PRESENT;stride*orderings.len()];
        for (i,ordering) in orderings.iter().enumerate() {
            for (pos,c) in ordering.0.iter().enumerate() {
                positions[i*stride+c.0]=pos;
            }
        }
        OrderingCatalog{ candidates, orderings, positions, stride, complete:false }
    }

    /// Delete `to_remove` from every ordering. Index i of the result corresponds to index i of self.
    pub fn reduce(&self,to_remove:CandidateIndex) -> Self {
        let candidates = self.candidates.iter().copied().filter(|&c|c!=to_remove).collect();
        let orderings = self.orderings.iter().map(|o|CandidateOrdering(o.0.iter().copied().filter(|&c|c!=to_remove).collect())).collect();
        Self::from_orderings(candidates,orderings)
    }

    /// Delete several candidates, one after the other.
    pub fn reduce_all(&self,to_remove:&[CandidateIndex]) -> Self {
        let candidates = self.candidates.iter().copied().filter(|c|!to_remove.contains(c)).collect();
        let orderings = self.orderings.iter().map(|o|CandidateOrdering(o.0.iter().copied().filter(|c|!to_remove.contains(c)).collect())).collect();
        Self::from_orderings(candidates,orderings)
    }

    /// Apply some rearrangement to every ordering, keeping index alignment.
    pub fn transform(&self,f:impl Fn(&CandidateOrdering)->CandidateOrdering) -> Self {
        Self::from_orderings(self.candidates.clone(),self.orderings.iter().map(f).collect())
    }

    pub fn len(&self) -> usize { self.orderings.len() }
    pub fn is_empty(&self) -> bool { self.orderings.is_empty() }
    pub fn candidates(&self) -> &[CandidateIndex] { &self.candidates }
    pub fn num_candidates(&self) -> usize { self.candidates.len() }
    pub fn ordering(&self,index:usize) -> &CandidateOrdering { &self.orderings[index] }
    pub fn orderings(&self) -> &[CandidateOrdering] { &self.orderings }
    pub fn contains_candidate(&self,candidate:CandidateIndex) -> bool { self.candidates.binary_search(&candidate).is_ok() }

    /// The position (0=most preferred) of the candidate in ordering `index`.
    pub fn position(&self,index:usize,candidate:CandidateIndex) -> Option<usize> {
        if candidate.0>=self.stride { return None; }
        let pos = self.positions[index*self.stride+candidate.0];
        if pos==NOT_PRESENT { None } else { Some(pos) }
    }

    /// true iff ordering `index` ranks a above b. Both must be in the catalog.
    pub fn prefers(&self,index:usize,a:CandidateIndex,b:CandidateIndex) -> bool {
        self.positions[index*self.stride+a.0] < self.positions[index*self.stride+b.0]
    }

    /// The indices of all orderings where a is above b.
    pub fn indices_preferring(&self,a:CandidateIndex,b:CandidateIndex) -> Vec<usize> {
        (0..self.len()).filter(|&i|self.prefers(i,a,b)).collect()
    }

    /// Find the index of a full ordering. Only works for catalogs made by `generate`,
    /// where the lexicographic rank of the permutation is its index.
    pub fn index_of(&self,ordering:&[CandidateIndex]) -> Option<usize> {
        if !self.complete || ordering.len()!=self.candidates.len() { return None; }
        let n = ordering.len();
        let mut used = vec![false;n];
        let mut index = 0;
        for (pos,c) in ordering.iter().enumerate() {
            if c.0>=n || used[c.0] { return None; }
            let smaller_unused = (0..c.0).filter(|&i|!used[i]).count();
            index+=smaller_unused*factorial(n-1-pos);
            used[c.0]=true;
        }
        Some(index)
    }
}

/// Rearrange into the next lexicographic permutation. Return false if already the last one.
fn next_permutation(v:&mut [CandidateIndex]) -> bool {
    if v.len()<2 { return false; }
    let mut i = v.len()-1;
    while i>0 && v[i-1]>=v[i] { i-=1; }
    if i==0 { return false; }
    let mut j = v.len()-1;
    while v[j]<=v[i-1] { j-=1; }
    v.swap(i-1,j);
    v[i..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn as_usize(o:&CandidateOrdering) -> Vec<usize> { o.0.iter().map(|c|c.0).collect() }

    #[test]
    fn generates_all_distinct_permutations() {
        for n in 0..=6 {
            let catalog = OrderingCatalog::generate(n);
            assert_eq!(catalog.len(),factorial(n));
            let distinct : HashSet<&CandidateOrdering> = catalog.orderings().iter().collect();
            assert_eq!(distinct.len(),catalog.len());
            for o in catalog.orderings() {
                let mut sorted = as_usize(o);
                sorted.sort();
                assert_eq!(sorted,(0..n).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn three_candidate_order_is_lexicographic() {
        let catalog = OrderingCatalog::generate(3);
        let expected = vec![vec![0,1,2],vec![0,2,1],vec![1,0,2],vec![1,2,0],vec![2,0,1],vec![2,1,0]];
        assert_eq!(catalog.orderings().iter().map(as_usize).collect::<Vec<_>>(),expected);
    }

    #[test]
    fn generation_is_repeatable() {
        assert_eq!(OrderingCatalog::generate(4).orderings(),OrderingCatalog::generate(4).orderings());
    }

    #[test]
    fn reduce_keeps_alignment() {
        let catalog = OrderingCatalog::generate(3);
        let reduced = catalog.reduce(CandidateIndex(1));
        assert_eq!(reduced.len(),6);
        assert_eq!(reduced.candidates(),&[CandidateIndex(0),CandidateIndex(2)]);
        for i in 0..6 {
            let expected : Vec<usize> = as_usize(catalog.ordering(i)).into_iter().filter(|&c|c!=1).collect();
            assert_eq!(as_usize(reduced.ordering(i)),expected);
        }
        assert_eq!(reduced.position(3,CandidateIndex(2)),Some(0));
        assert_eq!(reduced.position(3,CandidateIndex(1)),None);
        assert_eq!(reduced.index_of(&[CandidateIndex(0),CandidateIndex(2)]),None);
    }

    #[test]
    fn index_of_inverts_generate() {
        let catalog = OrderingCatalog::generate(5);
        for i in 0..catalog.len() {
            assert_eq!(catalog.index_of(&catalog.ordering(i).0),Some(i));
        }
        assert_eq!(catalog.index_of(&[CandidateIndex(0),CandidateIndex(0),CandidateIndex(1),CandidateIndex(2),CandidateIndex(3)]),None);
    }

    #[test]
    fn half_the_orderings_prefer_each_side() {
        let catalog = OrderingCatalog::generate(4);
        let ab = catalog.indices_preferring(CandidateIndex(0),CandidateIndex(3));
        let ba = catalog.indices_preferring(CandidateIndex(3),CandidateIndex(0));
        assert_eq!(ab.len(),12);
        assert_eq!(ba.len(),12);
        assert!(ab.iter().all(|i|!ba.contains(i)));
    }
}
