// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! Tests of whether a voting rule's result on a particular electorate violates some
//! desirable property.
//!
//! Every check returns a plain bool. Rules that do not produce a total order (Pairwise Majority)
//! are judged on the majority relation itself rather than on their nominal ranking.

use std::fmt;
use std::str::FromStr;
use anyhow::anyhow;
use log::trace;
use rand::Rng;
use serde::{Serialize,Deserialize};
use crate::ballot_counts::BallotCounts;
use crate::ballot_metadata::CandidateIndex;
use crate::orderings::{CandidateOrdering, OrderingCatalog};
use crate::pairwise::{PairwiseMatrix, PairwiseOutcome, PairwiseTotals};
use crate::random_util::{random_composition, Randomness};
use crate::societal_rank::{RelativeRank, SocietalRank};
use crate::voting_rule::VotingRule;

/// The properties that can be checked.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum Criterion {
    CondorcetWinner,
    CondorcetLoser,
    Majority,
    Unanimity,
    Transitivity,
    IIA,
}

impl Criterion {
    pub const ALL : [Criterion;6] = [Criterion::CondorcetWinner,Criterion::CondorcetLoser,Criterion::Majority,Criterion::Unanimity,Criterion::Transitivity,Criterion::IIA];
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Criterion::CondorcetWinner => "condorcet",
            Criterion::CondorcetLoser => "condorcet-loser",
            Criterion::Majority => "majority",
            Criterion::Unanimity => "unanimity",
            Criterion::Transitivity => "transitivity",
            Criterion::IIA => "iia",
        };
        f.write_str(s)
    }
}

impl FromStr for Criterion {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Criterion::ALL.iter().copied().find(|c|c.to_string()==s.to_lowercase()).ok_or_else(||anyhow!("Unknown criterion {}. Options are {}",s,Criterion::ALL.iter().map(|c|c.to_string()).collect::<Vec<_>>().join(", ")))
    }
}

/// How to search for violations of independence of irrelevant alternatives.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize,Deserialize)]
pub enum IiaMethod {
    /// For each pair, make this many random electorates in which every voter keeps their
    /// relative order of the pair, and see if the pair's societal order changes.
    Perturbation{samples:usize},
    /// For each pair, move every other candidate up or down one or two places on every
    /// ballot, then nudge the pair members themselves without swapping them.
    CandidateMoves,
    /// For each pair, delete everyone else and rank just the pair.
    RestrictToPair,
}

impl Default for IiaMethod {
    fn default() -> Self { IiaMethod::Perturbation{samples:DEFAULT_IIA_SAMPLES} }
}

pub const DEFAULT_IIA_SAMPLES : usize = 300;

impl fmt::Display for IiaMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IiaMethod::Perturbation{samples} => write!(f,"perturbation:{}",samples),
            IiaMethod::CandidateMoves => write!(f,"moves"),
            IiaMethod::RestrictToPair => write!(f,"pair"),
        }
    }
}

impl FromStr for IiaMethod {
    type Err = anyhow::Error;
    /// "perturbation", "perturbation:500", "moves" or "pair".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("perturbation",n)) => Ok(IiaMethod::Perturbation{samples:n.parse()?}),
            None if s=="perturbation" => Ok(IiaMethod::default()),
            None if s=="moves" => Ok(IiaMethod::CandidateMoves),
            None if s=="pair" => Ok(IiaMethod::RestrictToPair),
            _ => Err(anyhow!("Unknown IIA method {}. Options are perturbation, perturbation:N, moves, pair",s)),
        }
    }
}

/// Somebody with first preferences from more than half of the voters.
pub fn find_majority_candidate(ballots:&BallotCounts,catalog:&OrderingCatalog) -> Option<CandidateIndex> {
    let total = ballots.total();
    let mut firsts = vec![0u64;catalog.candidates().last().map(|c|c.0+1).unwrap_or(0)];
    for (i,count) in ballots.nonzero() {
        if let Some(first) = catalog.ordering(i).first() { firsts[first.0]+=count; }
    }
    catalog.candidates().iter().copied().find(|c|2*firsts[c.0]>total)
}

/// The societal order of a vs b. For rules without a genuine total order this is the majority relation.
fn relation(rule:&dyn VotingRule,rank:&SocietalRank,matrix:&PairwiseMatrix,a:CandidateIndex,b:CandidateIndex) -> RelativeRank {
    if rule.produces_total_order() { rank.relative(a,b) } else {
        match matrix.outcome(a,b) {
            PairwiseOutcome::First => RelativeRank::Above,
            PairwiseOutcome::Second => RelativeRank::Below,
            PairwiseOutcome::Tie => RelativeRank::Tied,
        }
    }
}

/// There is a Condorcet winner, and the rule does not elect them.
pub fn violates_condorcet_winner(rule:&dyn VotingRule,ballots:&BallotCounts,catalog:&OrderingCatalog,randomness:&mut Randomness) -> bool {
    match PairwiseMatrix::new(ballots,catalog).condorcet_winner() {
        Some(condorcet) => rule.winner(ballots,catalog,randomness)!=Some(condorcet),
        None => false,
    }
}

/// There is a Condorcet loser, and the rule elects them. No winner is never a violation.
pub fn violates_condorcet_loser(rule:&dyn VotingRule,ballots:&BallotCounts,catalog:&OrderingCatalog,randomness:&mut Randomness) -> bool {
    let Some(winner) = rule.winner(ballots,catalog,randomness) else { return false };
    PairwiseMatrix::new(ballots,catalog).condorcet_loser()==Some(winner)
}

/// Someone has a majority of first preferences, and the rule does not elect them.
pub fn violates_majority(rule:&dyn VotingRule,ballots:&BallotCounts,catalog:&OrderingCatalog,randomness:&mut Randomness) -> bool {
    match find_majority_candidate(ballots,catalog) {
        Some(majority) => rule.winner(ballots,catalog,randomness)!=Some(majority),
        None => false,
    }
}

/// Every voter prefers a to b, but a is not strictly above b.
pub fn violates_unanimity(rule:&dyn VotingRule,ballots:&BallotCounts,catalog:&OrderingCatalog,randomness:&mut Randomness) -> bool {
    let total = ballots.total();
    if total==0 { return false; }
    let matrix = PairwiseMatrix::new(ballots,catalog);
    let rank = rule.rank(ballots,catalog,randomness);
    let candidates = catalog.candidates();
    for (i,&a) in candidates.iter().enumerate() {
        for &b in &candidates[i+1..] {
            let violated = if matrix.preferring(a,b)==total { relation(rule,&rank,&matrix,a,b)!=RelativeRank::Above }
                else if matrix.preferring(b,a)==total { relation(rule,&rank,&matrix,b,a)!=RelativeRank::Above }
                else { false };
            if violated {
                trace!("Unanimity violated by {} for {} vs {}",rule.name(),a,b);
                return true;
            }
        }
    }
    false
}

/// Three candidates where a is at least as good as b, b at least as good as c, but a is not at
/// least as good as c. For a real ranking this cannot happen; for the majority relation it is a
/// Condorcet cycle.
pub fn violates_transitivity(rule:&dyn VotingRule,ballots:&BallotCounts,catalog:&OrderingCatalog,randomness:&mut Randomness) -> bool {
    let candidates = catalog.candidates();
    let at_least_as_good : Box<dyn Fn(CandidateIndex,CandidateIndex)->bool> = if rule.produces_total_order() {
        let rank = rule.rank(ballots,catalog,randomness);
        Box::new(move |x,y|rank.relative(x,y)!=RelativeRank::Below)
    } else {
        let matrix = PairwiseMatrix::new(ballots,catalog);
        Box::new(move |x,y|matrix.preferring(x,y)>=matrix.preferring(y,x))
    };
    for &a in candidates {
        for &b in candidates {
            if b==a || !at_least_as_good(a,b) { continue; }
            for &c in candidates {
                if c==a || c==b { continue; }
                if at_least_as_good(b,c) && !at_least_as_good(a,c) {
                    trace!("Transitivity violated by {} for {} {} {}",rule.name(),a,b,c);
                    return true;
                }
            }
        }
    }
    false
}

/// Is the relation of a and b different from the original (a strict order becoming a tie or
/// reversing, or a tie becoming strict)?
fn changed(original:RelativeRank,rule:&dyn VotingRule,ballots:&BallotCounts,catalog:&OrderingCatalog,randomness:&mut Randomness,a:CandidateIndex,b:CandidateIndex) -> bool {
    let rank = rule.rank(ballots,catalog,randomness);
    relation(rule,&rank,&PairwiseMatrix::new(ballots,catalog),a,b)!=original
}

/// A random electorate, the same size as the original, where `totals.first` voters put a above
/// b and `totals.second` put b above a, uniformly distributed over the orderings consistent
/// with that.
pub fn perturb_preserving_pair<R:Rng>(a:CandidateIndex,b:CandidateIndex,totals:PairwiseTotals,catalog:&OrderingCatalog,rng:&mut R) -> BallotCounts {
    let mut counts = vec![0;catalog.len()];
    for (first,second,total) in [(a,b,totals.first),(b,a,totals.second)] {
        let indices = catalog.indices_preferring(first,second);
        let composition = random_composition(total,indices.len(),rng);
        for (index,v) in indices.into_iter().zip(composition) { counts[index]=v; }
    }
    BallotCounts::from_vec_unchecked(counts)
}

/// Move `candidate` by `delta` places (negative is up, towards most preferred), clamped to the
/// ends. If the candidate is one of the pair, do nothing if that would swap them.
fn move_candidate(ordering:&CandidateOrdering,candidate:CandidateIndex,delta:isize,pair:(CandidateIndex,CandidateIndex)) -> CandidateOrdering {
    let mut order = ordering.0.clone();
    let Some(from) = ordering.position_of(candidate) else { return ordering.clone() };
    let rival = if candidate==pair.0 { Some(pair.1) } else if candidate==pair.1 { Some(pair.0) } else { None };
    if let Some(rival_pos) = rival.and_then(|r|ordering.position_of(r)) {
        if from as isize+delta.signum()==rival_pos as isize { return ordering.clone(); }
    }
    let to = (from as isize+delta).clamp(0,order.len() as isize-1) as usize;
    let c = order.remove(from);
    order.insert(to,c);
    CandidateOrdering(order)
}

/// The catalogs tried by IiaMethod::CandidateMoves for the pair a,b.
fn candidate_move_catalogs(catalog:&OrderingCatalog,a:CandidateIndex,b:CandidateIndex,original:RelativeRank) -> Vec<OrderingCatalog> {
    let pair = (a,b);
    let mut res = vec![];
    for &other in catalog.candidates() {
        if other==a || other==b { continue; }
        for delta in [-1,-2,1,2] {
            res.push(catalog.transform(|o|move_candidate(o,other,delta,pair)));
        }
    }
    for member in [a,b] {
        for delta in [-1,1] {
            res.push(catalog.transform(|o|move_candidate(o,member,delta,pair)));
        }
    }
    let preferred = match original {
        RelativeRank::Above => Some((a,b)),
        RelativeRank::Below => Some((b,a)),
        RelativeRank::Tied => None,
    };
    if let Some((more,less)) = preferred {
        res.push(catalog.transform(|o|move_candidate(&move_candidate(o,more,1,pair),less,-1,pair)));
        res.push(catalog.transform(|o|move_candidate(&move_candidate(o,less,-1,pair),more,1,pair)));
    }
    res
}

/// For some pair, changing only the positions of other candidates changes the pair's societal order.
///
/// The search is a bounded sample (or a fixed family of moves), so false is not a proof of IIA.
pub fn violates_iia<R:Rng>(rule:&dyn VotingRule,ballots:&BallotCounts,catalog:&OrderingCatalog,method:IiaMethod,randomness:&mut Randomness,rng:&mut R) -> bool {
    let matrix = PairwiseMatrix::new(ballots,catalog);
    let rank = rule.rank(ballots,catalog,randomness);
    let candidates = catalog.candidates();
    for (i,&a) in candidates.iter().enumerate() {
        for &b in &candidates[i+1..] {
            let original = relation(rule,&rank,&matrix,a,b);
            let violated = match method {
                IiaMethod::Perturbation{samples} => {
                    let totals = matrix.totals(a,b);
                    (0..samples).any(|_|{
                        let perturbed = perturb_preserving_pair(a,b,totals,catalog,rng);
                        changed(original,rule,&perturbed,catalog,randomness,a,b)
                    })
                }
                IiaMethod::CandidateMoves => candidate_move_catalogs(catalog,a,b,original).iter().any(|moved|changed(original,rule,ballots,moved,randomness,a,b)),
                IiaMethod::RestrictToPair => {
                    let others : Vec<CandidateIndex> = candidates.iter().copied().filter(|&c|c!=a && c!=b).collect();
                    changed(original,rule,ballots,&catalog.reduce_all(&others),randomness,a,b)
                }
            };
            if violated {
                trace!("IIA violated by {} for {} vs {}",rule.name(),a,b);
                return true;
            }
        }
    }
    false
}

/// Check one criterion. `iia` and `rng` are only used for Criterion::IIA.
/// `ballots` must have one entry per ordering in `catalog`; use `Contest::ballots` or
/// `ElectionSimulation::check_ballots` to check untrusted input.
pub fn violates<R:Rng>(criterion:Criterion,rule:&dyn VotingRule,ballots:&BallotCounts,catalog:&OrderingCatalog,iia:IiaMethod,randomness:&mut Randomness,rng:&mut R) -> bool {
    debug_assert_eq!(ballots.len(),catalog.len(),"ballot counts not built for this catalog");
    match criterion {
        Criterion::CondorcetWinner => violates_condorcet_winner(rule,ballots,catalog,randomness),
        Criterion::CondorcetLoser => violates_condorcet_loser(rule,ballots,catalog,randomness),
        Criterion::Majority => violates_majority(rule,ballots,catalog,randomness),
        Criterion::Unanimity => violates_unanimity(rule,ballots,catalog,randomness),
        Criterion::Transitivity => violates_transitivity(rule,ballots,catalog,randomness),
        Criterion::IIA => violates_iia(rule,ballots,catalog,iia,randomness,rng),
    }
}
