// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! A two round system, like many run off elections.

use std::cmp::Reverse;
use log::trace;
use crate::ballot_counts::BallotCounts;
use crate::ballot_metadata::CandidateIndex;
use crate::orderings::OrderingCatalog;
use crate::pairwise::{compare, PairwiseOutcome};
use crate::random_util::Randomness;
use crate::rules::positional::Plurality;
use crate::societal_rank::SocietalRank;
use crate::voting_rule::{Tally, VotingRule};

/// If someone has a majority of first preferences, this is plurality. Otherwise the top two
/// by first preferences go into a runoff decided head to head.
///
/// The two runoff candidates are ranked above everyone else, even when a third candidate tied
/// one of them on first preferences and missed out by random selection. The rest keep their
/// plurality order below the runoff. A tied runoff puts both runoff candidates in rank 0.
#[derive(Clone,Copy,Debug,Default)]
pub struct TopTwo;

impl TopTwo {
    /// Fill two places from the plurality groups in order, randomly choosing from a group
    /// that has more members than places left.
    fn choose_runoff(plurality:&SocietalRank,randomness:&mut Randomness) -> Vec<CandidateIndex> {
        let mut chosen = vec![];
        for group in plurality.groups() {
            let places_left = 2-chosen.len();
            if places_left==0 { break; }
            if group.len()<=places_left { chosen.extend_from_slice(group); }
            else { chosen.extend(randomness.choose_multiple(group,places_left)); }
        }
        chosen
    }
}

impl VotingRule for TopTwo {
    fn name(&self) -> String { "Top Two".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally { Plurality.tally(ballots,catalog) }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,randomness:&mut Randomness) -> SocietalRank {
        let tally = self.tally(ballots,catalog);
        let plurality = SocietalRank::group_by_key(&tally.candidates(),|c|Reverse(tally.score(c).first_place_votes));
        let total = ballots.total();
        let has_majority = tally.scores.iter().any(|s|2*s.first_place_votes>total);
        if has_majority || catalog.num_candidates()<2 { return plurality; }
        let runoff = Self::choose_runoff(&plurality,randomness);
        let (a,b) = (runoff[0],runoff[1]);
        let mut groups = match compare(a,b,ballots,catalog).outcome() {
            PairwiseOutcome::First => vec![vec![a],vec![b]],
            PairwiseOutcome::Second => vec![vec![b],vec![a]],
            PairwiseOutcome::Tie => vec![vec![a,b]],
        };
        trace!("Top Two runoff between {} and {} gives {:?}",a,b,groups);
        let rest : Vec<CandidateIndex> = tally.candidates().into_iter().filter(|c|!runoff.contains(c)).collect();
        let rest = SocietalRank::group_by_key(&rest,|c|Reverse(tally.score(c).first_place_votes));
        groups.extend(rest.groups().iter().cloned());
        SocietalRank::from_groups(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(i:usize) -> CandidateIndex { CandidateIndex(i) }

    #[test]
    fn majority_ends_it_in_round_one() {
        let catalog = OrderingCatalog::generate(3);
        let ballots = BallotCounts::new(vec![3,2,1,0,0,0],&catalog).unwrap();
        let rank = TopTwo.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(rank,Plurality.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed));
    }

    #[test]
    fn runoff_reverses_plurality() {
        // ABC 4, BCA 3, CBA 2 : A leads on first preferences but B wins the runoff 5-4.
        let catalog = OrderingCatalog::generate(3);
        let ballots = BallotCounts::new(vec![4,0,0,3,0,2],&catalog).unwrap();
        let rank = TopTwo.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(rank.groups(),&[vec![c(1)],vec![c(0)],vec![c(2)]]);
    }

    #[test]
    fn tied_runoff_shares_top_rank() {
        // ABC 1, ACB 1, BAC 1, BCA 1 : A 2, B 2 first preferences. A v B 2-2.
        let catalog = OrderingCatalog::generate(3);
        let ballots = BallotCounts::new(vec![1,1,1,1,0,0],&catalog).unwrap();
        let rank = TopTwo.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(rank.groups(),&[vec![c(0),c(1)],vec![c(2)]]);
    }

    #[test]
    fn tie_for_second_is_sampled() {
        // ABC 2, BAC 1, CAB 1 : A 2 (not a majority of 4), B and C tied on 1 for the other runoff place.
        let catalog = OrderingCatalog::generate(3);
        let ballots = BallotCounts::new(vec![2,0,1,0,1,0],&catalog).unwrap();
        let rank = TopTwo.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        // B gets the place, A beats B 3-1, C is below both despite tying B.
        assert_eq!(rank.groups(),&[vec![c(0)],vec![c(1)],vec![c(2)]]);
        let mut randomness = Randomness::seeded(11);
        for _ in 0..20 {
            let rank = TopTwo.rank(&ballots,&catalog,&mut randomness);
            assert_eq!(rank.top(),&[c(0)]);
            assert_eq!(rank.num_groups(),3);
        }
    }

    #[test]
    fn single_candidate() {
        let catalog = OrderingCatalog::generate(1);
        let ballots = BallotCounts::new(vec![0],&catalog).unwrap();
        assert_eq!(TopTwo.winner(&ballots,&catalog,&mut Randomness::FavourFirstListed),Some(c(0)));
    }
}
