// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

use std::cmp::Reverse;
use crate::ballot_counts::BallotCounts;
use crate::orderings::OrderingCatalog;
use crate::pairwise::PairwiseMatrix;
use crate::random_util::Randomness;
use crate::rules::positional::{borda_tally, rank_by_points};
use crate::societal_rank::SocietalRank;
use crate::voting_rule::{Tally, VotingRule};

/// Duncan Black's rule: the Condorcet winner if there is one, otherwise Borda.
///
/// With a Condorcet winner, they alone are rank 0 and everyone else is ranked by Borda points
/// from rank 1. The Condorcet winner is placed first even if their Borda score is lower than
/// someone else's, so the ranking of the others is not consistent with how the top is chosen.
#[derive(Clone,Copy,Debug,Default)]
pub struct Black;

impl VotingRule for Black {
    fn name(&self) -> String { "Black".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        let mut tally = borda_tally(ballots,catalog);
        tally.count_first_and_last_places(ballots,catalog);
        tally
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        let tally = self.tally(ballots,catalog);
        match PairwiseMatrix::new(ballots,catalog).condorcet_winner() {
            Some(winner) => {
                // (not the winner, Borda points) so the winner sorts first on its own.
                SocietalRank::group_by_key(&tally.candidates(),|c|(c!=winner,Reverse(tally.score(c).points)))
            }
            None => rank_by_points(&tally),
        }
    }
}
