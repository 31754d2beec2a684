// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! Rules built directly from head to head results.

use std::cmp::Reverse;
use crate::ballot_counts::BallotCounts;
use crate::ballot_metadata::CandidateIndex;
use crate::orderings::OrderingCatalog;
use crate::pairwise::PairwiseMatrix;
use crate::random_util::Randomness;
use crate::rules::positional::rank_by_points;
use crate::societal_rank::SocietalRank;
use crate::voting_rule::{Points, Tally, VotingRule};

/// Fill in pairwise_wins and pairwise_losses.
pub(crate) fn pairwise_record(matrix:&PairwiseMatrix,catalog:&OrderingCatalog) -> Tally {
    let mut tally = Tally::new(catalog);
    for score in &mut tally.scores {
        let (wins,ties) = matrix.wins_and_ties(score.candidate);
        score.pairwise_wins=wins;
        score.pairwise_losses=matrix.candidates().len()-1-wins-ties;
    }
    tally
}

/// Also called Pairwise Comparison. A point for each head to head win, half for a tie.
#[derive(Clone,Copy,Debug,Default)]
pub struct Copeland;

impl VotingRule for Copeland {
    fn name(&self) -> String { "Copeland (Pairwise Comparison)".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        let matrix = PairwiseMatrix::new(ballots,catalog);
        let mut tally = pairwise_record(&matrix,catalog);
        for score in &mut tally.scores {
            let (wins,ties) = matrix.wins_and_ties(score.candidate);
            score.points = Points::from_integer(wins as i64)+Points::new(ties as i64,2);
        }
        tally
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        rank_by_points(&self.tally(ballots,catalog))
    }
}

/// Smallest worst head to head defeat wins.
#[derive(Clone,Copy,Debug,Default)]
pub struct Minimax;

impl VotingRule for Minimax {
    fn name(&self) -> String { "Minimax".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        let matrix = PairwiseMatrix::new(ballots,catalog);
        let mut tally = pairwise_record(&matrix,catalog);
        for score in &mut tally.scores {
            let c = score.candidate;
            score.greatest_pairwise_defeat = matrix.candidates().iter().filter(|&&r|r!=c).map(|&r|matrix.preferring(r,c).saturating_sub(matrix.preferring(c,r))).max().unwrap_or(0);
        }
        tally
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        let tally = self.tally(ballots,catalog);
        SocietalRank::group_by_key(&tally.candidates(),|c|tally.score(c).greatest_pairwise_defeat)
    }
}

/// The majority relation itself. The winner is the Condorcet winner if there is one, otherwise
/// there is no winner at all. This is not a total order, as majorities can be cyclic; the
/// ranking reported is the Condorcet winner above everyone else, or everyone tied.
#[derive(Clone,Copy,Debug,Default)]
pub struct PairwiseMajority;

impl PairwiseMajority {
    fn condorcet_winner(ballots:&BallotCounts,catalog:&OrderingCatalog) -> Option<CandidateIndex> {
        PairwiseMatrix::new(ballots,catalog).condorcet_winner()
    }
}

impl VotingRule for PairwiseMajority {
    fn name(&self) -> String { "Pairwise Majority".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        pairwise_record(&PairwiseMatrix::new(ballots,catalog),catalog)
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        let tally = self.tally(ballots,catalog);
        let num_rivals = tally.scores.len().saturating_sub(1);
        // a Condorcet winner is exactly someone with a win against every rival.
        SocietalRank::group_by_key(&tally.candidates(),|c|Reverse(tally.score(c).pairwise_wins==num_rivals))
    }
    fn winner(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> Option<CandidateIndex> {
        Self::condorcet_winner(ballots,catalog)
    }
    fn produces_total_order(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(i:usize) -> CandidateIndex { CandidateIndex(i) }

    fn setup(counts:Vec<u64>) -> (OrderingCatalog,BallotCounts) {
        let catalog = OrderingCatalog::generate(3);
        let ballots = BallotCounts::new(counts,&catalog).unwrap();
        (catalog,ballots)
    }

    #[test]
    fn copeland_half_points_for_ties() {
        // ABC 1, CBA 1 : A-C tie, A-B tie, B-C tie.
        let (catalog,ballots) = setup(vec![1,0,0,0,0,1]);
        let tally = Copeland.tally(&ballots,&catalog);
        assert!(tally.scores.iter().all(|s|s.points==Points::from_integer(1)));
        // ABC 2, CBA 1 : A beats B and C, B beats C.
        let (catalog,ballots) = setup(vec![2,0,0,0,0,1]);
        let tally = Copeland.tally(&ballots,&catalog);
        assert_eq!(tally.score(c(0)).points,Points::from_integer(2));
        assert_eq!(tally.score(c(2)).pairwise_losses,2);
        assert_eq!(Copeland.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed).groups(),&[vec![c(0)],vec![c(1)],vec![c(2)]]);
        assert_eq!(Copeland.name(),"Copeland (Pairwise Comparison)");
    }

    #[test]
    fn minimax_worst_defeat() {
        // ABC 2, BCA 1, CAB 1 : A beats B 3-1, A ties C 2-2, B beats C 3-1.
        let (catalog,ballots) = setup(vec![2,0,0,1,1,0]);
        let tally = Minimax.tally(&ballots,&catalog);
        assert_eq!(tally.score(c(0)).greatest_pairwise_defeat,0);
        assert_eq!(tally.score(c(1)).greatest_pairwise_defeat,2);
        assert_eq!(tally.score(c(2)).greatest_pairwise_defeat,2);
        let rank = Minimax.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(rank.groups(),&[vec![c(0)],vec![c(1),c(2)]]);
        let single = OrderingCatalog::generate(1);
        assert_eq!(Minimax.tally(&BallotCounts::new(vec![3],&single).unwrap(),&single).score(c(0)).greatest_pairwise_defeat,0);
    }

    #[test]
    fn pairwise_majority_has_no_winner_in_a_cycle() {
        let (catalog,ballots) = setup(vec![1,0,0,1,1,0]);
        assert_eq!(PairwiseMajority.winner(&ballots,&catalog,&mut Randomness::FavourFirstListed),None);
        assert_eq!(PairwiseMajority.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed).num_groups(),1);
        assert!(!PairwiseMajority.produces_total_order());
        let (catalog,ballots) = setup(vec![3,2,1,0,0,0]);
        assert_eq!(PairwiseMajority.winner(&ballots,&catalog,&mut Randomness::FavourFirstListed),Some(c(0)));
        assert_eq!(PairwiseMajority.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed).groups(),&[vec![c(0)],vec![c(1),c(2)]]);
    }
}
