// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.


//! Some utility routines using pseudo-random numbers.


use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use crate::ballot_metadata::CandidateIndex;

/// How ties are broken. Tie breaking is always random, but tests want it reproducible.
#[derive(Clone,Debug)]
pub enum Randomness {
    PRNG(ChaCha20Rng),
    /// Always take the lowest indexed of the tied candidates.
    FavourFirstListed,
}

impl Randomness {
    pub fn seeded(seed:u64) -> Self { Randomness::PRNG(ChaCha20Rng::seed_from_u64(seed)) }

    /// Pick one of the options uniformly. None if there are no options.
    pub fn choose(&mut self,options:&[CandidateIndex]) -> Option<CandidateIndex> {
        if options.is_empty() { return None; }
        match self {
            Randomness::PRNG(rng) => Some(options[rng.random_range(0..options.len())]),
            Randomness::FavourFirstListed => options.iter().copied().min(),
        }
    }

    /// Pick `amount` distinct options uniformly (or all of them if there are not that many).
    /// The result is in index order.
    pub fn choose_multiple(&mut self,options:&[CandidateIndex],amount:usize) -> Vec<CandidateIndex> {
        let mut res = options.to_vec();
        res.sort();
        if amount>=res.len() { return res; }
        match self {
            Randomness::PRNG(rng) => {
                // partial Fisher-Yates
                for i in 0..amount {
                    let j = rng.random_range(i..res.len());
                    res.swap(i,j);
                }
                res.truncate(amount);
                res.sort();
            }
            Randomness::FavourFirstListed => { res.truncate(amount); }
        }
        res
    }
}

/// Make a boolean array of length len such that num_true of them are true.
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
/// use voting_criteria::random_util::make_array_with_some_randomly_true;
/// let mut rng = ChaCha20Rng::seed_from_u64(1);
/// let a4_10 = make_array_with_some_randomly_true(10,4,&mut rng);
/// assert_eq!(10,a4_10.len());
/// assert_eq!(4,a4_10.iter().filter(|v|**v).count());
/// let a7_10 = make_array_with_some_randomly_true(10,7,&mut rng);
/// assert_eq!(7,a7_10.iter().filter(|v|**v).count());
/// ```
pub fn make_array_with_some_randomly_true<R:Rng>(len:usize,num_true:usize,rng:&mut R) -> Vec<bool> {
    let inverse = num_true>len/2;
    let mut res = vec![inverse;len];
    let mut togo = if inverse {len-num_true} else {num_true};
    while togo>0 {
        let pos = rng.random_range(0..len);
        if res[pos]==inverse { res[pos]=!inverse; togo-=1; }
    }
    res
}

/// A uniformly random way of writing `total` as an ordered sum of `parts` non-negative integers
/// (stars and bars: choose which parts-1 of the total+parts-1 slots are bars).
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
/// use voting_criteria::random_util::random_composition;
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
/// let c = random_composition(100,6,&mut rng);
/// assert_eq!(c.len(),6);
/// assert_eq!(c.iter().sum::<u64>(),100);
/// ```
pub fn random_composition<R:Rng>(total:u64,parts:usize,rng:&mut R) -> Vec<u64> {
    if parts==0 { return vec![]; }
    let slots = total as usize+parts-1;
    let bars = make_array_with_some_randomly_true(slots,parts-1,rng);
    let mut res = Vec::with_capacity(parts);
    let mut stars = 0;
    for is_bar in bars {
        if is_bar { res.push(stars); stars=0; } else { stars+=1; }
    }
    res.push(stars);
    res
}
