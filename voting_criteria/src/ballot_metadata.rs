// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! Information about the contest, such as candidates.

use serde::{Serialize,Deserialize};
use std::fmt;
use std::str::FromStr;
use std::num::ParseIntError;

/// a candidate, referred to by position in the candidate list, 0 being first
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateIndex(pub usize);
// type alias really, don't want long display
impl fmt::Display for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}

impl FromStr for CandidateIndex {
    type Err = ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(CandidateIndex(s.parse()?)) }
}

/// Information about a contest being simulated.
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct ContestMetadata {
    /// A human readable description, e.g. "3 candidates, 1000 voters"
    pub name : String,
    pub candidates : Vec<Candidate>,
}

/// information about a candidate in the contest.
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq,Eq)]
pub struct Candidate {
    pub name : String,
}

impl ContestMetadata {
    /// Make metadata from a list of names, in the order given.
    pub fn from_names<S:AsRef<str>>(name:&str,names:&[S]) -> Self {
        ContestMetadata {
            name: name.to_string(),
            candidates: names.iter().map(|n|Candidate{name:n.as_ref().to_string()}).collect(),
        }
    }

    /// Make metadata for `num_candidates` candidates named A, B, C, ... (then A1, B1, ... past Z).
    pub fn with_letter_names(num_candidates:usize) -> Self {
        let names : Vec<String> = (0..num_candidates).map(letter_name).collect();
        Self::from_names(&format!("{} candidates",num_candidates),&names)
    }

    pub fn candidate(&self,index:CandidateIndex) -> &Candidate { &self.candidates[index.0] }

    pub fn num_candidates(&self) -> usize { self.candidates.len() }

    pub fn find_by_name(&self,name:&str) -> Option<CandidateIndex> {
        self.candidates.iter().position(|c|c.name==name).map(CandidateIndex)
    }

    /// Names joined in the given order, e.g. "A>B>C". Useful for printing orderings.
    pub fn describe_order(&self,order:&[CandidateIndex]) -> String {
        order.iter().map(|&c|self.candidate(c).name.as_str()).collect::<Vec<_>>().join(">")
    }
}

fn letter_name(i:usize) -> String {
    let letter = (b'A'+(i%26) as u8) as char;
    if i<26 { letter.to_string() } else { format!("{}{}",letter,i/26) }
}
