// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! Rules where each position on a ballot is worth a fixed number of points.

use std::cmp::Reverse;
use crate::ballot_counts::BallotCounts;
use crate::orderings::OrderingCatalog;
use crate::random_util::Randomness;
use crate::societal_rank::SocietalRank;
use crate::voting_rule::{Points, Tally, VotingRule};

/// Group by points, most points best.
pub(crate) fn rank_by_points(tally:&Tally) -> SocietalRank {
    SocietalRank::group_by_key(&tally.candidates(),|c|Reverse(tally.score(c).points))
}

/// Borda points, where with n candidates left the top gets n and the bottom gets 1.
pub(crate) fn borda_tally(ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
    let mut tally = Tally::new(catalog);
    tally.add_positional_points(ballots,catalog,|p,n|Points::from_integer((n-p) as i64));
    tally
}

/// Most first place votes wins.
#[derive(Clone,Copy,Debug,Default)]
pub struct Plurality;

impl VotingRule for Plurality {
    fn name(&self) -> String { "Plurality".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        let mut tally = Tally::new(catalog);
        tally.count_first_and_last_places(ballots,catalog);
        tally
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        let tally = self.tally(ballots,catalog);
        SocietalRank::group_by_key(&tally.candidates(),|c|Reverse(tally.score(c).first_place_votes))
    }
}

/// A vote against your least favourite. One point for every position but last.
#[derive(Clone,Copy,Debug,Default)]
pub struct AntiPlurality;

impl VotingRule for AntiPlurality {
    fn name(&self) -> String { "Anti-Plurality".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        let mut tally = Tally::new(catalog);
        tally.add_positional_points(ballots,catalog,|p,n|Points::from_integer(if p+1<n {1} else {0}));
        tally
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        rank_by_points(&self.tally(ballots,catalog))
    }
}

#[derive(Clone,Copy,Debug,Default)]
pub struct Borda;

impl VotingRule for Borda {
    fn name(&self) -> String { "Borda Count".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally { borda_tally(ballots,catalog) }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        rank_by_points(&self.tally(ballots,catalog))
    }
}

/// Borda restricted to the top `k` positions, position p scoring k-p.
#[derive(Clone,Copy,Debug)]
pub struct TruncatedBorda {
    pub k : usize,
}

impl VotingRule for TruncatedBorda {
    fn name(&self) -> String { "Truncated Borda Count".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        let k = self.k;
        let mut tally = Tally::new(catalog);
        tally.add_positional_points(ballots,catalog,|p,n|Points::from_integer(if p<k.min(n) {(k-p) as i64} else {0}));
        tally
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        rank_by_points(&self.tally(ballots,catalog))
    }
}

/// Position p scores 1/(p+1). Used in Nauru.
#[derive(Clone,Copy,Debug,Default)]
pub struct Dowdall;

impl VotingRule for Dowdall {
    fn name(&self) -> String { "Dowdall".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        let mut tally = Tally::new(catalog);
        tally.add_positional_points(ballots,catalog,|p,_|Points::new(1,(p+1) as i64));
        tally
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        rank_by_points(&self.tally(ballots,catalog))
    }
}
