// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! The fixed part of an experiment: who is standing, how many people vote, and the catalog of
//! orderings that ballot count vectors are indexed by.

use std::sync::Arc;
use crate::ballot_counts::{BallotCounts, BallotError};
use crate::ballot_metadata::ContestMetadata;
use crate::orderings::OrderingCatalog;

/// n! orderings are stored, so this can't get much bigger.
pub const MAX_CANDIDATES : usize = 8;

/// Shared read only by every rule evaluated against it.
#[derive(Clone,Debug)]
pub struct Contest {
    pub metadata : ContestMetadata,
    pub catalog : Arc<OrderingCatalog>,
    pub voters : u64,
}

impl Contest {
    pub fn new(metadata:ContestMetadata,voters:u64) -> Result<Self,BallotError> {
        let n = metadata.num_candidates();
        if n>MAX_CANDIDATES { return Err(BallotError::TooManyCandidates(n)) }
        Ok(Contest{catalog:Arc::new(OrderingCatalog::generate(n)),metadata,voters})
    }

    /// Candidates called A, B, C...
    pub fn with_letter_names(num_candidates:usize,voters:u64) -> Result<Self,BallotError> {
        if num_candidates>MAX_CANDIDATES { return Err(BallotError::TooManyCandidates(num_candidates)) }
        Self::new(ContestMetadata::with_letter_names(num_candidates),voters)
    }

    pub fn num_candidates(&self) -> usize { self.metadata.num_candidates() }

    /// Check a ballot count vector belongs to this contest.
    pub fn ballots(&self,counts:Vec<u64>) -> Result<BallotCounts,BallotError> {
        let ballots = BallotCounts::new(counts,&self.catalog)?;
        ballots.check_total(self.voters)?;
        Ok(ballots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contest_sizes() {
        let contest = Contest::with_letter_names(4,10).unwrap();
        assert_eq!(contest.catalog.len(),24);
        assert_eq!(contest.metadata.candidates[3].name,"D");
        assert_eq!(Contest::with_letter_names(9,10).unwrap_err(),BallotError::TooManyCandidates(9));
    }

    #[test]
    fn ballots_checked() {
        let contest = Contest::new(ContestMetadata::from_names("Lunch",&["Pie","Soup","Salad"]),6).unwrap();
        assert!(contest.ballots(vec![3,2,1,0,0,0]).is_ok());
        assert_eq!(contest.ballots(vec![3,2,1,0,0]).unwrap_err(),BallotError::WrongLength{expected:6,actual:5});
        assert_eq!(contest.ballots(vec![3,2,1,0,0,1]).unwrap_err(),BallotError::WrongVoterTotal{expected:6,actual:7});
    }
}
