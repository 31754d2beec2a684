// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! Tideman's Ranked Pairs.
//!
//! Majority pairs are locked in from the biggest margin down, skipping any pair that
//! would make a cycle with pairs already locked. The locked graph is then a DAG, and its
//! topological order is the ranking. Every candidate gets their own rank.

use std::collections::VecDeque;
use log::trace;
use crate::ballot_counts::BallotCounts;
use crate::ballot_metadata::CandidateIndex;
use crate::orderings::OrderingCatalog;
use crate::pairwise::PairwiseMatrix;
use crate::random_util::Randomness;
use crate::rules::pairwise_methods::pairwise_record;
use crate::societal_rank::SocietalRank;
use crate::voting_rule::{Tally, VotingRule};

/// A directed graph over candidates, positions in `candidates` being node numbers.
#[derive(Clone,Debug)]
pub struct LockedPairs {
    pub candidates : Vec<CandidateIndex>,
    /// locked[w][l] means w is locked in above l.
    locked : Vec<Vec<bool>>,
}

impl LockedPairs {
    /// Lock in the majority pairs of the matrix.
    pub fn new(matrix:&PairwiseMatrix) -> Self {
        let candidates = matrix.candidates().to_vec();
        let n = candidates.len();
        // (winner,loser,margin), in (i,j) i<j enumeration order.
        let mut pairs : Vec<(usize,usize,u64)> = vec![];
        for i in 0..n {
            for j in i+1..n {
                let (ci,cj) = (candidates[i],candidates[j]);
                let (for_i,for_j) = (matrix.preferring(ci,cj),matrix.preferring(cj,ci));
                if for_i>for_j { pairs.push((i,j,for_i-for_j)) } else if for_j>for_i { pairs.push((j,i,for_j-for_i)) }
            }
        }
        pairs.sort_by(|a,b|b.2.cmp(&a.2)); // stable
        let mut res = LockedPairs{candidates,locked:vec![vec![false;n];n]};
        for (winner,loser,margin) in pairs {
            if res.reaches(loser,winner) {
                trace!("Ranked pairs skips {}>{} margin {} as it would make a cycle",res.candidates[winner],res.candidates[loser],margin);
            } else {
                res.locked[winner][loser]=true;
            }
        }
        res
    }

    /// true iff there is a path of locked pairs from `from` to `to`.
    fn reaches(&self,from:usize,to:usize) -> bool {
        let mut visited = vec![false;self.candidates.len()];
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if node==to { return true; }
            for next in 0..self.candidates.len() {
                if self.locked[node][next] && !visited[next] {
                    visited[next]=true;
                    stack.push(next);
                }
            }
        }
        false
    }

    pub fn is_locked(&self,winner:CandidateIndex,loser:CandidateIndex) -> bool {
        match (self.node(winner),self.node(loser)) {
            (Some(w),Some(l)) => self.locked[w][l],
            _ => false,
        }
    }

    fn node(&self,candidate:CandidateIndex) -> Option<usize> { self.candidates.iter().position(|&c|c==candidate) }

    /// Kahn's algorithm, starting from the unbeaten nodes in index order.
    pub fn topological_order(&self) -> Vec<CandidateIndex> {
        let n = self.candidates.len();
        let mut in_degree = vec![0usize;n];
        for row in &self.locked {
            for (j,&l) in row.iter().enumerate() { if l { in_degree[j]+=1; } }
        }
        let mut queue : VecDeque<usize> = (0..n).filter(|&i|in_degree[i]==0).collect();
        let mut res = Vec::with_capacity(n);
        while let Some(u) = queue.pop_front() {
            res.push(self.candidates[u]);
            for v in 0..n {
                if self.locked[u][v] {
                    in_degree[v]-=1;
                    if in_degree[v]==0 { queue.push_back(v); }
                }
            }
        }
        res
    }
}

#[derive(Clone,Copy,Debug,Default)]
pub struct RankedPairs;

impl VotingRule for RankedPairs {
    fn name(&self) -> String { "Ranked Pairs".to_string() }
    fn tally(&self,ballots:&BallotCounts,catalog:&OrderingCatalog) -> Tally {
        pairwise_record(&PairwiseMatrix::new(ballots,catalog),catalog)
    }
    fn rank(&self,ballots:&BallotCounts,catalog:&OrderingCatalog,_randomness:&mut Randomness) -> SocietalRank {
        let locked = LockedPairs::new(&PairwiseMatrix::new(ballots,catalog));
        SocietalRank::from_groups(locked.topological_order().into_iter().map(|c|vec![c]).collect())
    }
}
