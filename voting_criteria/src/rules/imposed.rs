// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

use crate::ballot_counts::BallotCounts;
use crate::ballot_metadata::CandidateIndex;
use crate::orderings::OrderingCatalog;
use crate::random_util::Randomness;
use crate::societal_rank::SocietalRank;
use crate::voting_rule::{Tally, VotingRule};

/// The winner is decided before anyone votes, and the ballots are ignored.
/// Everyone other than the imposed winner ties for second.
#[derive(Clone,Copy,Debug)]
pub struct ImposedRule {
    pub winner : CandidateIndex,
}

impl ImposedRule {
    /// Draw the winner from candidates 0..num_candidates. None if there are no candidates.
    pub fn new(num_candidates:usize,randomness:&mut Randomness) -> Option<Self> {
        let candidates : Vec<CandidateIndex> = (0..num_candidates).map(CandidateIndex).collect();
        randomness.choose(&candidates).map(|winner|ImposedRule{winner})
    }
}

impl VotingRule for ImposedRule {
    fn name(&self) -> String { "Imposed Rule".to_string() }
    fn tally(&self,_ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally { Tally::new(catalog) }
    fn rank(&self,_ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        let (winner,rest) : (Vec<CandidateIndex>,Vec<CandidateIndex>) = catalog.candidates().iter().copied().partition(|&c|c==self.winner);
        SocietalRank::from_groups(vec![winner,rest])
    }
}
