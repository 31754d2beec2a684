// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! The result of a voting rule: candidates grouped from best to worst, ties sharing a group.

use serde::{Serialize,Deserialize};
use crate::ballot_metadata::CandidateIndex;

/// Groups of candidates, group 0 being the most preferred.
/// Every group is non-empty, and within a group candidates are in index order.
/// Serialized as just the groups.
#[derive(Clone,Debug,PartialEq,Eq,Serialize,Deserialize)]
#[serde(from="Vec<Vec<CandidateIndex>>",into="Vec<Vec<CandidateIndex>>")]
pub struct SocietalRank {
    groups : Vec<Vec<CandidateIndex>>,
    /// rank_of[c] is the group containing candidate c, or None if c is not ranked.
    rank_of : Vec<Option<usize>>,
}

/// How two candidates compare in a societal rank.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum RelativeRank {
    Above,
    Below,
    Tied,
}

impl SocietalRank {
    /// Make from groups, dropping empty groups so ranks stay contiguous.
    pub fn from_groups(groups:Vec<Vec<CandidateIndex>>) -> Self {
        let mut groups : Vec<Vec<CandidateIndex>> = groups.into_iter().filter(|g|!g.is_empty()).collect();
        for g in &mut groups { g.sort(); }
        let stride = groups.iter().flatten().map(|c|c.0+1).max().unwrap_or(0);
        let mut rank_of = vec![None;stride];
        for (rank,group) in groups.iter().enumerate() {
            for c in group { rank_of[c.0]=Some(rank); }
        }
        SocietalRank{groups,rank_of}
    }

    /// Sort candidates by key, smallest key best, with equal keys sharing a rank.
    /// Use std::cmp::Reverse for scores where bigger is better.
    /// ```
    /// use voting_criteria::ballot_metadata::CandidateIndex;
    /// use voting_criteria::societal_rank::SocietalRank;
    /// let scores = [5,1,5];
    /// let rank = SocietalRank::group_by_key(&[CandidateIndex(0),CandidateIndex(1),CandidateIndex(2)],|c|std::cmp::Reverse(scores[c.0]));
    /// assert_eq!(rank.groups(),&[vec![CandidateIndex(0),CandidateIndex(2)],vec![CandidateIndex(1)]]);
    /// ```
    pub fn group_by_key<K:Ord>(candidates:&[CandidateIndex],key:impl Fn(CandidateIndex)->K) -> Self {
        let mut keyed : Vec<(K,CandidateIndex)> = candidates.iter().map(|&c|(key(c),c)).collect();
        keyed.sort_by(|a,b|a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        let mut groups : Vec<Vec<CandidateIndex>> = vec![];
        let mut last_key : Option<&K> = None;
        for (k,c) in &keyed {
            if last_key==Some(k) {
                if let Some(g) = groups.last_mut() { g.push(*c) }
            } else {
                groups.push(vec![*c]);
                last_key=Some(k);
            }
        }
        Self::from_groups(groups)
    }

    /// Everyone tied.
    pub fn all_tied(candidates:&[CandidateIndex]) -> Self { Self::from_groups(vec![candidates.to_vec()]) }

    pub fn groups(&self) -> &[Vec<CandidateIndex>] { &self.groups }
    pub fn num_groups(&self) -> usize { self.groups.len() }

    /// The best group. Empty if there are no candidates at all.
    pub fn top(&self) -> &[CandidateIndex] { self.groups.first().map(|g|g.as_slice()).unwrap_or(&[]) }

    pub fn rank(&self,candidate:CandidateIndex) -> Option<usize> { self.rank_of.get(candidate.0).copied().flatten() }

    /// How a compares to b. Candidates not ranked at all are treated as below everyone ranked.
    pub fn relative(&self,a:CandidateIndex,b:CandidateIndex) -> RelativeRank {
        let ra = self.rank(a).unwrap_or(usize::MAX);
        let rb = self.rank(b).unwrap_or(usize::MAX);
        if ra<rb { RelativeRank::Above } else if ra>rb { RelativeRank::Below } else { RelativeRank::Tied }
    }

    /// All candidates, best first, ties in index order.
    pub fn flattened(&self) -> Vec<CandidateIndex> { self.groups.iter().flatten().copied().collect() }
}

impl From<Vec<Vec<CandidateIndex>>> for SocietalRank {
    fn from(groups:Vec<Vec<CandidateIndex>>) -> Self { Self::from_groups(groups) }
}

impl From<SocietalRank> for Vec<Vec<CandidateIndex>> {
    fn from(rank:SocietalRank) -> Self { rank.groups }
}
