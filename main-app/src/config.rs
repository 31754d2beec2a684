// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! An experiment description, as stored in a .json file.

use std::fs::File;
use std::path::Path;
use serde::{Serialize,Deserialize};
use voting_criteria::ballot_metadata::ContestMetadata;
use voting_criteria::contest::Contest;
use voting_criteria::criteria::{Criterion, IiaMethod};
use voting_criteria::distributions::DistributionChoice;
use crate::rules::Rules;

#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub voters : u64,
    /// Candidate names, in index order.
    pub candidates : Vec<String>,
    /// Random electorates per rule. Ignored if exhaustive.
    pub trials : u64,
    pub distribution : DistributionChoice,
    pub criteria : Vec<Criterion>,
    pub iia : IiaMethod,
    pub seed : u64,
    pub threads : usize,
    /// Check every possible electorate instead of random ones.
    pub exhaustive : bool,
    /// If empty, Rules::STANDARD.
    pub rules : Vec<Rules>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig{
            voters: 100,
            candidates: letter_names(3),
            trials: 1000,
            distribution: DistributionChoice::IC,
            criteria: Criterion::ALL.to_vec(),
            iia: IiaMethod::default(),
            seed: 1,
            threads: 1,
            exhaustive: false,
            rules: vec![],
        }
    }
}

/// A, B, C...
pub fn letter_names(num_candidates:usize) -> Vec<String> {
    ContestMetadata::with_letter_names(num_candidates).candidates.into_iter().map(|c|c.name).collect()
}

impl ExperimentConfig {
    pub fn load(path:&Path) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn contest(&self) -> anyhow::Result<Contest> {
        let name = format!("{} candidates, {} voters",self.candidates.len(),self.voters);
        Ok(Contest::new(ContestMetadata::from_names(&name,&self.candidates),self.voters)?)
    }

    pub fn rules_to_check(&self) -> Vec<Rules> {
        if self.rules.is_empty() { Rules::STANDARD.to_vec() } else { self.rules.clone() }
    }
}
