// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! The interface every voting rule implements, and the per-candidate scores they compute.
//!
//! A rule never keeps state between calls. Each call to [VotingRule::tally] produces a
//! fresh [Tally], so nothing computed for one ballot vector can leak into the next.

use num::{Rational64, Zero};
use serde::{Serialize,Deserialize};
use crate::ballot_counts::BallotCounts;
use crate::ballot_metadata::CandidateIndex;
use crate::orderings::OrderingCatalog;
use crate::random_util::Randomness;
use crate::societal_rank::SocietalRank;

/// Points are exact rationals so that ties (e.g. Dowdall's 1/2+1/3 vs 5/6) are exact.
pub type Points = Rational64;

/// Everything a rule may compute about one candidate. Most rules use only one or two fields.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct CandidateScore {
    pub candidate : CandidateIndex,
    pub first_place_votes : u64,
    pub last_place_votes : u64,
    pub points : Points,
    pub pairwise_wins : usize,
    pub pairwise_losses : usize,
    /// For elimination rules, the round (0 = first) in which this candidate was eliminated.
    pub round_eliminated : Option<usize>,
    /// For the Coombs majority variant, the round in which this candidate won.
    pub round_won : Option<usize>,
    /// The biggest margin by which any rival beats this candidate head to head, 0 if never beaten.
    pub greatest_pairwise_defeat : u64,
}

impl CandidateScore {
    pub fn new(candidate:CandidateIndex) -> Self {
        CandidateScore{
            candidate,
            first_place_votes: 0,
            last_place_votes: 0,
            points: Points::zero(),
            pairwise_wins: 0,
            pairwise_losses: 0,
            round_eliminated: None,
            round_won: None,
            greatest_pairwise_defeat: 0,
        }
    }
}

/// Scores for each candidate in a catalog, in candidate index order.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct Tally {
    pub scores : Vec<CandidateScore>,
}

impl Tally {
    /// All zero scores for the candidates in the catalog.
    pub fn new(catalog:&OrderingCatalog) -> Self {
        Tally{scores:catalog.candidates().iter().map(|&c|CandidateScore::new(c)).collect()}
    }

    pub fn candidates(&self) -> Vec<CandidateIndex> { self.scores.iter().map(|s|s.candidate).collect() }

    /// Panics if the candidate is not in the tally.
    pub fn score(&self,candidate:CandidateIndex) -> &CandidateScore {
        &self.scores[self.position(candidate)]
    }

    pub fn score_mut(&mut self,candidate:CandidateIndex) -> &mut CandidateScore {
        let pos = self.position(candidate);
        &mut self.scores[pos]
    }

    fn position(&self,candidate:CandidateIndex) -> usize {
        match self.scores.binary_search_by_key(&candidate,|s|s.candidate) {
            Ok(pos) => pos,
            Err(_) => panic!("Candidate {} not in tally",candidate),
        }
    }

    /// Set first_place_votes and last_place_votes from the ballots.
    pub fn count_first_and_last_places(&mut self,ballots:&BallotCounts,catalog:&OrderingCatalog) {
        for (i,count) in ballots.nonzero() {
            let ordering = catalog.ordering(i);
            if let Some(first) = ordering.first() { self.score_mut(first).first_place_votes+=count; }
            if let Some(last) = ordering.last() { self.score_mut(last).last_place_votes+=count; }
        }
    }

    /// Add to points, the candidate at position p of an ordering of length n getting count*weight(p,n).
    pub fn add_positional_points(&mut self,ballots:&BallotCounts,catalog:&OrderingCatalog,weight:impl Fn(usize,usize)->Points) {
        for (i,count) in ballots.nonzero() {
            let ordering = catalog.ordering(i);
            let n = ordering.len();
            for (p,&c) in ordering.0.iter().enumerate() {
                let w = weight(p,n);
                if !w.is_zero() { self.score_mut(c).points+=w*Points::from_integer(count as i64); }
            }
        }
    }

    pub fn total_points(&self) -> Points { self.scores.iter().map(|s|s.points).sum() }
    pub fn total_first_place_votes(&self) -> u64 { self.scores.iter().map(|s|s.first_place_votes).sum() }
}

/// A social choice function, turning a ballot count vector into a societal ranking.
///
/// The catalog passed in may be a reduced catalog; rules rank exactly the candidates in it.
pub trait VotingRule : Send + Sync {
    /// A stable human readable name, e.g. "Instant Runoff".
    fn name(&self) -> String;

    /// Compute whatever per-candidate scores this rule needs.
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally;

    /// Group candidates best first. Randomness is only used by rules that need it for more than
    /// the final tie break (Top Two choosing who gets into the runoff).
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,randomness:&mut Randomness) -> SocietalRank;

    /// The best candidate, ties broken uniformly at random. None if there is nobody to choose.
    fn winner(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,randomness:&mut Randomness) -> Option<CandidateIndex> {
        let rank = self.rank(ballots,catalog,randomness);
        randomness.choose(rank.top())
    }

    /// false for rules (Pairwise Majority) whose ranking is not a genuine total preorder.
    fn produces_total_order(&self) -> bool { true }
}
