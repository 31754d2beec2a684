// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! Rules that repeatedly eliminate the weakest candidates and recount.
//!
//! Each round works on a catalog from which all previously eliminated candidates have been
//! removed. Everyone tied for weakest goes in the same round. Candidates are ranked by round
//! eliminated, the last survivors being best.

use std::cmp::Reverse;
use log::trace;
use crate::ballot_counts::BallotCounts;
use crate::ballot_metadata::CandidateIndex;
use crate::orderings::OrderingCatalog;
use crate::random_util::Randomness;
use crate::rules::positional::borda_tally;
use crate::societal_rank::SocietalRank;
use crate::voting_rule::{CandidateScore, Points, Tally, VotingRule};

/// Run elimination rounds until nobody is left. `losers` picks the candidates to drop given the
/// current (reduced) catalog; it must return a non-empty subset of the catalog's candidates.
fn eliminate_in_rounds(name:&str,ballots:&BallotCounts,catalog:&OrderingCatalog,losers:impl Fn(&BallotCounts,&OrderingCatalog)->Vec<CandidateIndex>) -> Tally {
    let mut tally = Tally::new(catalog);
    let mut current = catalog.clone();
    let mut round = 0;
    while !current.candidates().is_empty() {
        let mut eliminated = losers(ballots,&current);
        if eliminated.is_empty() { eliminated=current.candidates().to_vec(); }
        trace!("{} round {} eliminates {:?}",name,round,eliminated);
        for &c in &eliminated { tally.score_mut(c).round_eliminated=Some(round); }
        current = current.reduce_all(&eliminated);
        round+=1;
    }
    tally
}

/// Later elimination is better.
fn rank_by_round_eliminated(tally:&Tally) -> SocietalRank {
    SocietalRank::group_by_key(&tally.candidates(),|c|Reverse(tally.score(c).round_eliminated))
}

/// Candidates whose key is the minimum over the tally.
fn lowest_by<K:Ord+Copy>(tally:&Tally,key:impl Fn(&CandidateScore)->K) -> Vec<CandidateIndex> {
    match tally.scores.iter().map(&key).min() {
        Some(min) => tally.scores.iter().filter(|s|key(s)==min).map(|s|s.candidate).collect(),
        None => vec![],
    }
}

fn first_and_last_places(ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
    let mut tally = Tally::new(catalog);
    tally.count_first_and_last_places(ballots,catalog);
    tally
}

/// Also known as the alternative vote, or preferential voting. Eliminate the candidates
/// with the fewest first preferences.
#[derive(Clone,Copy,Debug,Default)]
pub struct InstantRunoff;

impl VotingRule for InstantRunoff {
    fn name(&self) -> String { "Instant Runoff".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        eliminate_in_rounds("Instant Runoff",ballots,catalog,|b,c|lowest_by(&first_and_last_places(b,c),|s|s.first_place_votes))
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        rank_by_round_eliminated(&self.tally(ballots,catalog))
    }
}

/// Eliminate the candidates ranked last by the most voters.
#[derive(Clone,Copy,Debug,Default)]
pub struct Coombs;

impl VotingRule for Coombs {
    fn name(&self) -> String { "Coombs".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        eliminate_in_rounds("Coombs",ballots,catalog,|b,c|lowest_by(&first_and_last_places(b,c),|s|Reverse(s.last_place_votes)))
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        rank_by_round_eliminated(&self.tally(ballots,catalog))
    }
}

/// Eliminate the lowest Borda score, recomputing Borda on the survivors each round.
#[derive(Clone,Copy,Debug,Default)]
pub struct Baldwin;

impl VotingRule for Baldwin {
    fn name(&self) -> String { "Baldwin".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        eliminate_in_rounds("Baldwin",ballots,catalog,|b,c|lowest_by(&borda_tally(b,c),|s|s.points))
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        rank_by_round_eliminated(&self.tally(ballots,catalog))
    }
}

/// Each round eliminate everyone whose Borda score is at or below the mean.
#[derive(Clone,Copy,Debug,Default)]
pub struct Nanson;

impl VotingRule for Nanson {
    fn name(&self) -> String { "Nanson".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        eliminate_in_rounds("Nanson",ballots,catalog,|b,c|{
            let borda = borda_tally(b,c);
            let total = borda.total_points();
            let num = Points::from_integer(borda.scores.len() as i64);
            borda.scores.iter().filter(|s|s.points*num<=total).map(|s|s.candidate).collect()
        })
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        rank_by_round_eliminated(&self.tally(ballots,catalog))
    }
}

/// Coombs, except that a candidate with first preferences from at least half the voters wins.
///
/// Candidates are placed one round at a time. In each round the candidates not yet placed run a
/// Coombs style elimination; as soon as someone has at least half the first preferences among
/// those still standing they win that round and are set aside, and the next round starts again
/// from everyone not yet placed. If an elimination would remove everyone left standing, those
/// eliminated win the round instead.
#[derive(Clone,Copy,Debug,Default)]
pub struct CoombsMajority;

impl VotingRule for CoombsMajority {
    fn name(&self) -> String { "Coombs Majority".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        let mut tally = Tally::new(catalog);
        let voters = ballots.total();
        let mut unplaced = catalog.clone();
        let mut round = 0;
        while !unplaced.candidates().is_empty() {
            let mut field = unplaced.clone();
            let winners = loop {
                let counts = first_and_last_places(ballots,&field);
                let majority : Vec<CandidateIndex> = counts.scores.iter().filter(|s|2*s.first_place_votes>=voters).map(|s|s.candidate).collect();
                if !majority.is_empty() { break majority; }
                let losers = lowest_by(&counts,|s|Reverse(s.last_place_votes));
                if losers.len()==field.num_candidates() { break losers; }
                trace!("Coombs Majority round {} eliminates {:?}",round,losers);
                field = field.reduce_all(&losers);
            };
            trace!("Coombs Majority round {} won by {:?}",round,winners);
            for &c in &winners { tally.score_mut(c).round_won=Some(round); }
            unplaced = unplaced.reduce_all(&winners);
            round+=1;
        }
        tally
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        let tally = self.tally(ballots,catalog);
        SocietalRank::group_by_key(&tally.candidates(),|c|tally.score(c).round_won)
    }
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
    fn instant_runoff_eliminates_fewest_first_preferences() {
        // ABC 4, BAC 3, CBA 3 : B and C tie on 3 and both go, leaving A.
        let (catalog,ballots) = setup(vec![4,0,3,0,0,3]);
        let tally = InstantRunoff.tally(&ballots,&catalog);
        assert_eq!(tally.score(c(0)).round_eliminated,Some(1));
        assert_eq!(tally.score(c(1)).round_eliminated,Some(0));
        assert_eq!(tally.score(c(2)).round_eliminated,Some(0));
        let rank = InstantRunoff.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(rank.top(),&[c(0)]);
        assert!(tally.scores.iter().all(|s|s.round_eliminated.unwrap()<3));
    }

    #[test]
    fn instant_runoff_transfers() {
        // ABC 4, BCA 3, CBA 2 : C goes, transferring to B who then wins 5-4.
        let (catalog,ballots) = setup(vec![4,0,0,3,0,2]);
        let rank = InstantRunoff.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(rank.groups(),&[vec![c(1)],vec![c(0)],vec![c(2)]]);
    }

    #[test]
    fn coombs_eliminates_most_last_places() {
        // ABC 4, BCA 3, CBA 2 : last places C 4, A 5 so A goes first. Then B beats C 7-2.
        let (catalog,ballots) = setup(vec![4,0,0,3,0,2]);
        let rank = Coombs.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(rank.groups(),&[vec![c(1)],vec![c(2)],vec![c(0)]]);
    }

    #[test]
    fn baldwin_and_nanson() {
        // Borda A 17, B 11, C 8 ; mean 12.
        let (catalog,ballots) = setup(vec![3,2,1,0,0,0]);
        let baldwin = Baldwin.tally(&ballots,&catalog);
        assert_eq!(baldwin.score(c(2)).round_eliminated,Some(0));
        assert_eq!(baldwin.score(c(1)).round_eliminated,Some(1));
        assert_eq!(baldwin.score(c(0)).round_eliminated,Some(2));
        let nanson = Nanson.tally(&ballots,&catalog);
        assert_eq!(nanson.score(c(1)).round_eliminated,Some(0));
        assert_eq!(nanson.score(c(2)).round_eliminated,Some(0));
        assert_eq!(nanson.score(c(0)).round_eliminated,Some(1));
    }

    #[test]
    fn everyone_tied_goes_together() {
        let (catalog,ballots) = setup(vec![1,0,0,1,1,0]);
        for rule in [&InstantRunoff as &dyn VotingRule,&Coombs,&Baldwin,&Nanson] {
            let rank = rule.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
            assert_eq!(rank.num_groups(),1,"{}",rule.name());
        }
        let empty = BallotCounts::zeros(6);
        assert_eq!(InstantRunoff.rank(&empty,&catalog,&mut Randomness::FavourFirstListed).num_groups(),1);
    }

    #[test]
    fn single_candidate() {
        let catalog = OrderingCatalog::generate(1);
        let ballots = BallotCounts::new(vec![5],&catalog).unwrap();
        for rule in [&InstantRunoff as &dyn VotingRule,&Coombs,&Baldwin,&Nanson,&CoombsMajority] {
            assert_eq!(rule.winner(&ballots,&catalog,&mut Randomness::FavourFirstListed),Some(c(0)));
        }
    }

    #[test]
    fn coombs_majority_places_round_by_round() {
        // ABC 4, BCA 3, CBA 2 : 9 voters, nobody has 4.5 first preferences.
        // A has most last places and goes; then B has 7 and wins round 0.
        // Round 1 is A vs C, A has 4 and C 5, C wins. A wins round 2.
        let (catalog,ballots) = setup(vec![4,0,0,3,0,2]);
        let tally = CoombsMajority.tally(&ballots,&catalog);
        assert_eq!(tally.score(c(1)).round_won,Some(0));
        assert_eq!(tally.score(c(2)).round_won,Some(1));
        assert_eq!(tally.score(c(0)).round_won,Some(2));
        let rank = CoombsMajority.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(rank.groups(),&[vec![c(1)],vec![c(2)],vec![c(0)]]);
    }

    #[test]
    fn coombs_majority_with_immediate_majority() {
        let (catalog,ballots) = setup(vec![3,2,1,0,0,0]);
        let rank = CoombsMajority.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(rank.top(),&[c(0)]);
        assert_eq!(rank.num_groups(),3);
    }

    #[test]
    fn coombs_majority_cycle_all_win_together() {
        // ABC, BCA, CAB : one first and one last place each, so eliminating the
        // most last places would empty the field. All three win round 0.
        let (catalog,ballots) = setup(vec![1,0,0,1,1,0]);
        let tally = CoombsMajority.tally(&ballots,&catalog);
        for i in 0..3 { assert_eq!(tally.score(c(i)).round_won,Some(0)); }
        let rank = CoombsMajority.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(rank.num_groups(),1);
        assert_eq!(rank.top(),&[c(0),c(1),c(2)]);
    }

    #[test]
    fn coombs_majority_cycle_in_later_round() {
        // A is everyone's favourite and wins round 0. Without A the remaining
        // ballots BCD, CDB, DBC form a cycle, so B, C and D all win round 1.
        let catalog = OrderingCatalog::generate(4);
        let mut counts = vec![0;catalog.len()];
        for ordering in [[0,1,2,3],[0,2,3,1],[0,3,1,2]] {
            let ordering : Vec<CandidateIndex> = ordering.iter().map(|&i|c(i)).collect();
            counts[catalog.index_of(&ordering).unwrap()]+=1;
        }
        let ballots = BallotCounts::new(counts,&catalog).unwrap();
        let tally = CoombsMajority.tally(&ballots,&catalog);
        assert_eq!(tally.score(c(0)).round_won,Some(0));
        for i in 1..4 { assert_eq!(tally.score(c(i)).round_won,Some(1)); }
        let rank = CoombsMajority.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(rank.groups(),&[vec![c(0)],vec![c(1),c(2),c(3)]]);
    }
}
