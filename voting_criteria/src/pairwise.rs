// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! Head to head comparisons between candidates.

use serde::{Serialize,Deserialize};
use crate::ballot_counts::BallotCounts;
use crate::ballot_metadata::CandidateIndex;
use crate::orderings::OrderingCatalog;

/// Result of a head to head comparison of two candidates.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize,Deserialize)]
pub enum PairwiseOutcome {
    /// The first candidate asked about is preferred by more voters
    First,
    /// The second candidate asked about is preferred by more voters
    Second,
    Tie,
}

/// Number of voters preferring each of two candidates.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Default,Serialize,Deserialize)]
pub struct PairwiseTotals {
    pub first : u64,
    pub second : u64,
}

impl PairwiseTotals {
    pub fn outcome(&self) -> PairwiseOutcome {
        if self.first>self.second { PairwiseOutcome::First } else if self.second>self.first { PairwiseOutcome::Second } else { PairwiseOutcome::Tie }
    }
    /// first-second
    pub fn margin(&self) -> i64 { self.first as i64 - self.second as i64 }
}

/// Count how many voters put a above b, and vice versa, in the given catalog.
/// ```
/// use voting_criteria::ballot_counts::BallotCounts;
/// use voting_criteria::ballot_metadata::CandidateIndex;
/// use voting_criteria::orderings::OrderingCatalog;
/// use voting_criteria::pairwise::{compare, PairwiseOutcome};
/// let catalog = OrderingCatalog::generate(3);
/// let ballots = BallotCounts::new(vec![3,2,1,0,0,0],&catalog).unwrap();
/// let totals = compare(CandidateIndex(0),CandidateIndex(1),&ballots,&catalog);
/// assert_eq!((totals.first,totals.second),(5,1));
/// assert_eq!(totals.outcome(),PairwiseOutcome::First);
/// ```
pub fn compare(a:CandidateIndex,b:CandidateIndex,ballots:&BallotCounts,catalog:&OrderingCatalog) -> PairwiseTotals {
    let mut res = PairwiseTotals::default();
    for (i,count) in ballots.nonzero() {
        if catalog.prefers(i,a,b) { res.first+=count } else { res.second+=count }
    }
    res
}

/// All head to head totals for the candidates in a catalog.
#[derive(Clone,Debug)]
pub struct PairwiseMatrix {
    candidates : Vec<CandidateIndex>,
    stride : usize,
    /// support[a*stride+b] is the number of voters putting a above b.
    support : Vec<u64>,
}

impl PairwiseMatrix {
    pub fn new(ballots:&BallotCounts,catalog:&OrderingCatalog) -> Self {
        let candidates = catalog.candidates().to_vec();
        let stride = candidates.last().map(|c|c.0+1).unwrap_or(0);
        let mut support = vec![0;stride*stride];
        for (i,count) in ballots.nonzero() {
            let ordering = &catalog.ordering(i).0;
            for (pos,&above) in ordering.iter().enumerate() {
                for &below in &ordering[pos+1..] {
                    support[above.0*stride+below.0]+=count;
                }
            }
        }
        PairwiseMatrix{candidates,stride,support}
    }

    pub fn candidates(&self) -> &[CandidateIndex] { &self.candidates }

    /// The number of voters ranking a above b.
    pub fn preferring(&self,a:CandidateIndex,b:CandidateIndex) -> u64 { self.support[a.0*self.stride+b.0] }

    pub fn totals(&self,a:CandidateIndex,b:CandidateIndex) -> PairwiseTotals {
        PairwiseTotals{first:self.preferring(a,b),second:self.preferring(b,a)}
    }

    pub fn outcome(&self,a:CandidateIndex,b:CandidateIndex) -> PairwiseOutcome { self.totals(a,b).outcome() }

    /// true iff a strictly beats b head to head.
    pub fn beats(&self,a:CandidateIndex,b:CandidateIndex) -> bool { self.preferring(a,b)>self.preferring(b,a) }

    /// votes for a over b minus votes for b over a.
    pub fn margin(&self,a:CandidateIndex,b:CandidateIndex) -> i64 { self.totals(a,b).margin() }

    fn rivals(&self,candidate:CandidateIndex) -> impl Iterator<Item=CandidateIndex> + '_ {
        self.candidates.iter().copied().filter(move |&c|c!=candidate)
    }

    /// A candidate who strictly beats every other candidate. A lone candidate counts.
    pub fn condorcet_winner(&self) -> Option<CandidateIndex> {
        self.candidates.iter().copied().find(|&c|self.rivals(c).all(|r|self.beats(c,r)))
    }

    /// A candidate who strictly loses to every other candidate. Needs at least two candidates.
    pub fn condorcet_loser(&self) -> Option<CandidateIndex> {
        if self.candidates.len()<2 { return None; }
        self.candidates.iter().copied().find(|&c|self.rivals(c).all(|r|self.beats(r,c)))
    }

    /// Number of rivals strictly beaten, and number of rivals tied.
    pub fn wins_and_ties(&self,candidate:CandidateIndex) -> (usize,usize) {
        let mut wins = 0;
        let mut ties = 0;
        for r in self.rivals(candidate) {
            match self.outcome(candidate,r) {
                PairwiseOutcome::First => wins+=1,
                PairwiseOutcome::Tie => ties+=1,
                PairwiseOutcome::Second => {}
            }
        }
        (wins,ties)
    }
}
