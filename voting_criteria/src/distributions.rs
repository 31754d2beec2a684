// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! Random electorates.

use std::fmt;
use std::str::FromStr;
use anyhow::anyhow;
use rand::Rng;
use serde::{Serialize,Deserialize};
use crate::ballot_counts::{BallotCounts, BallotError};
use crate::orderings::OrderingCatalog;
use crate::random_util::random_composition;

/// Something that makes random ballot count vectors of a given size.
pub trait BallotDistribution {
    fn generate<R:Rng>(&self,voters:u64,catalog:&OrderingCatalog,rng:&mut R) -> BallotCounts;
}

/// Impartial Culture : each voter independently picks an ordering uniformly at random.
#[derive(Clone,Copy,Debug,Default)]
pub struct ImpartialCulture;

impl BallotDistribution for ImpartialCulture {
    fn generate<R:Rng>(&self,voters:u64,catalog:&OrderingCatalog,rng:&mut R) -> BallotCounts {
        let mut res = BallotCounts::zeros(catalog.len());
        if catalog.is_empty() { return res; }
        for _ in 0..voters { res.increment(rng.random_range(0..catalog.len())); }
        res
    }
}

/// Impartial Anonymous Culture : every ballot count vector with the right number of voters is equally likely.
#[derive(Clone,Copy,Debug,Default)]
pub struct ImpartialAnonymousCulture;

impl BallotDistribution for ImpartialAnonymousCulture {
    fn generate<R:Rng>(&self,voters:u64,catalog:&OrderingCatalog,rng:&mut R) -> BallotCounts {
        BallotCounts::from_vec_unchecked(random_composition(voters,catalog.len(),rng))
    }
}

/// Each voter independently picks ordering i with probability weights[i].
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct CustomDistribution {
    cumulative : Vec<f64>,
}

impl CustomDistribution {
    /// Weights must be non-negative, one per ordering, and sum to 1.
    pub fn new(weights:&[f64],catalog:&OrderingCatalog) -> Result<Self,BallotError> {
        if weights.len()!=catalog.len() { return Err(BallotError::BadWeights(format!("{} weights given for {} orderings",weights.len(),catalog.len()))) }
        if let Some(bad) = weights.iter().find(|w|!(**w>=0.0)) { return Err(BallotError::BadWeights(format!("weight {} is not a non-negative number",bad))) }
        let sum : f64 = weights.iter().sum();
        if (sum-1.0).abs()>1e-9 { return Err(BallotError::BadWeights(format!("weights sum to {} not 1",sum))) }
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut so_far = 0.0;
        for w in weights {
            so_far+=w;
            cumulative.push(so_far);
        }
        Ok(CustomDistribution{cumulative})
    }

    /// The first index whose cumulative weight exceeds u, so zero weight orderings are never
    /// picked. Past the end (rounding) is the last ordering with non-zero weight.
    fn index_for(&self,u:f64) -> usize {
        let top = self.cumulative.last().copied().unwrap_or(0.0);
        self.cumulative.iter().position(|&c|u<c)
            .or_else(||self.cumulative.iter().position(|&c|c>=top))
            .unwrap_or(0)
    }
}

impl BallotDistribution for CustomDistribution {
    fn generate<R:Rng>(&self,voters:u64,catalog:&OrderingCatalog,rng:&mut R) -> BallotCounts {
        let mut res = BallotCounts::zeros(catalog.len());
        for _ in 0..voters {
            let u : f64 = rng.random();
            res.increment(self.index_for(u));
        }
        res
    }
}

/// A choice of distribution, as used in configuration files.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub enum DistributionChoice {
    IC,
    IAC,
    Custom{weights:Vec<f64>},
}

impl fmt::Display for DistributionChoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DistributionChoice::IC => write!(f,"IC"),
            DistributionChoice::IAC => write!(f,"IAC"),
            DistributionChoice::Custom{..} => write!(f,"Custom"),
        }
    }
}

impl FromStr for DistributionChoice {
    type Err = anyhow::Error;
    /// "IC", "IAC", or "custom:" followed by comma separated weights.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None if s.eq_ignore_ascii_case("IC") => Ok(DistributionChoice::IC),
            None if s.eq_ignore_ascii_case("IAC") => Ok(DistributionChoice::IAC),
            Some((custom,weights)) if custom.eq_ignore_ascii_case("custom") => {
                let weights = weights.split(',').map(|w|w.trim().parse::<f64>()).collect::<Result<Vec<f64>,_>>()?;
                Ok(DistributionChoice::Custom{weights})
            }
            _ => Err(anyhow!("Unknown distribution {}. Options are IC, IAC, custom:w1,w2,...",s)),
        }
    }
}

/// A DistributionChoice checked against a particular catalog.
#[derive(Clone,Debug)]
pub enum Distribution {
    IC(ImpartialCulture),
    IAC(ImpartialAnonymousCulture),
    Custom(CustomDistribution),
}

impl DistributionChoice {
    pub fn build(&self,catalog:&OrderingCatalog) -> Result<Distribution,BallotError> {
        Ok(match self {
            DistributionChoice::IC => Distribution::IC(ImpartialCulture),
            DistributionChoice::IAC => Distribution::IAC(ImpartialAnonymousCulture),
            DistributionChoice::Custom{weights} => Distribution::Custom(CustomDistribution::new(weights,catalog)?),
        })
    }
}

impl BallotDistribution for Distribution {
    fn generate<R:Rng>(&self,voters:u64,catalog:&OrderingCatalog,rng:&mut R) -> BallotCounts {
        match self {
            Distribution::IC(d) => d.generate(voters,catalog,rng),
            Distribution::IAC(d) => d.generate(voters,catalog,rng),
            Distribution::Custom(d) => d.generate(voters,catalog,rng),
        }
    }
}
