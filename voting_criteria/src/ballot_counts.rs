// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! The compressed representation of an electorate: how many voters cast each possible ordering.

use serde::{Serialize,Deserialize};
use crate::orderings::OrderingCatalog;

/// Problems with input data. These are caught at the boundary; rules and criteria assume valid input.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BallotError {
    #[error("Ballot count vector has length {actual} but the ordering catalog has {expected} orderings")]
    WrongLength{expected:usize,actual:usize},
    #[error("Ballot count at index {index} is negative ({value})")]
    NegativeCount{index:usize,value:i64},
    #[error("Ballot counts sum to {actual} voters, expected {expected}")]
    WrongVoterTotal{expected:u64,actual:u64},
    #[error("Invalid distribution weights : {0}")]
    BadWeights(String),
    #[error("Too many candidates ({0}) to enumerate every ordering")]
    TooManyCandidates(usize),
    #[error("No candidate called {0}")]
    UnknownCandidate(String),
}

/// The number of voters casting each ordering in some catalog. Entry i is the number of voters
/// whose full ranking is ordering i.
#[derive(Clone,Debug,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub struct BallotCounts(Vec<u64>);

impl BallotCounts {
    /// Make ballot counts, checking that the length is right for the catalog.
    pub fn new(counts:Vec<u64>,catalog:&OrderingCatalog) -> Result<Self,BallotError> {
        if counts.len()!=catalog.len() { return Err(BallotError::WrongLength{expected:catalog.len(),actual:counts.len()}) }
        Ok(BallotCounts(counts))
    }

    /// Make ballot counts from possibly negative numbers (e.g. parsed from user input), rejecting negatives.
    pub fn try_from_signed(counts:&[i64],catalog:&OrderingCatalog) -> Result<Self,BallotError> {
        let mut res = Vec::with_capacity(counts.len());
        for (index,&value) in counts.iter().enumerate() {
            if value<0 { return Err(BallotError::NegativeCount{index,value}) }
            res.push(value as u64);
        }
        Self::new(res,catalog)
    }

    /// Make counts without checking against a catalog. Used by generators that know the length.
    pub fn from_vec_unchecked(counts:Vec<u64>) -> Self { BallotCounts(counts) }

    /// Everything zero.
    pub fn zeros(len:usize) -> Self { BallotCounts(vec![0;len]) }

    /// Check the number of voters is as expected.
    pub fn check_total(&self,expected:u64) -> Result<(),BallotError> {
        let actual = self.total();
        if actual==expected { Ok(()) } else { Err(BallotError::WrongVoterTotal{expected,actual}) }
    }

    pub fn total(&self) -> u64 { self.0.iter().sum() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn get(&self,index:usize) -> u64 { self.0[index] }
    pub fn as_slice(&self) -> &[u64] { &self.0 }
    pub fn increment(&mut self,index:usize) { self.0[index]+=1; }

    /// (ordering index, count) for orderings actually cast by someone.
    pub fn nonzero(&self) -> impl Iterator<Item=(usize,u64)> + '_ {
        self.0.iter().copied().enumerate().filter(|&(_,v)|v>0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed() {
        let catalog = OrderingCatalog::generate(3);
        assert_eq!(BallotCounts::new(vec![1,2,3],&catalog),Err(BallotError::WrongLength{expected:6,actual:3}));
        assert_eq!(BallotCounts::try_from_signed(&[1,0,-2,0,0,0],&catalog),Err(BallotError::NegativeCount{index:2,value:-2}));
        let ok = BallotCounts::try_from_signed(&[3,2,1,0,0,0],&catalog).unwrap();
        assert_eq!(ok.total(),6);
        assert!(ok.check_total(6).is_ok());
        assert_eq!(ok.check_total(7),Err(BallotError::WrongVoterTotal{expected:7,actual:6}));
        assert_eq!(ok.nonzero().collect::<Vec<_>>(),vec![(0,3),(1,2),(2,1)]);
    }
}
