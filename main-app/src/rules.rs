// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.


use std::str::FromStr;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use anyhow::anyhow;
use serde::{Serialize,Deserialize};
use voting_criteria::random_util::Randomness;
use voting_criteria::rules::*;
use voting_criteria::voting_rule::VotingRule;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rules {
    Plurality,
    AntiPlurality,
    Borda,
    /// Borda where only the top k places score.
    TruncatedBorda(usize),
    Dowdall,
    InstantRunoff,
    Coombs,
    CoombsMajority,
    Baldwin,
    Nanson,
    Copeland,
    Minimax,
    PairwiseMajority,
    RankedPairs,
    Black,
    TopTwo,
    Imposed,
}

impl Rules {
    /// The rules checked when none are specified.
    pub const STANDARD : [Rules;17] = [
        Rules::Plurality, Rules::AntiPlurality, Rules::Borda, Rules::TruncatedBorda(2), Rules::Dowdall,
        Rules::InstantRunoff, Rules::Coombs, Rules::CoombsMajority, Rules::Baldwin, Rules::Nanson,
        Rules::Copeland, Rules::Minimax, Rules::PairwiseMajority, Rules::RankedPairs,
        Rules::Black, Rules::TopTwo, Rules::Imposed,
    ];

    /// Make the rule. The Imposed rule picks its winner now, using randomness.
    pub fn build(&self,num_candidates:usize,randomness:&mut Randomness) -> anyhow::Result<Arc<dyn VotingRule>> {
        Ok(match self {
            Rules::Plurality => Arc::new(Plurality),
            Rules::AntiPlurality => Arc::new(AntiPlurality),
            Rules::Borda => Arc::new(Borda),
            Rules::TruncatedBorda(k) => Arc::new(TruncatedBorda{k:*k}),
            Rules::Dowdall => Arc::new(Dowdall),
            Rules::InstantRunoff => Arc::new(InstantRunoff),
            Rules::Coombs => Arc::new(Coombs),
            Rules::CoombsMajority => Arc::new(CoombsMajority),
            Rules::Baldwin => Arc::new(Baldwin),
            Rules::Nanson => Arc::new(Nanson),
            Rules::Copeland => Arc::new(Copeland),
            Rules::Minimax => Arc::new(Minimax),
            Rules::PairwiseMajority => Arc::new(PairwiseMajority),
            Rules::RankedPairs => Arc::new(RankedPairs),
            Rules::Black => Arc::new(Black),
            Rules::TopTwo => Arc::new(TopTwo),
            Rules::Imposed => Arc::new(ImposedRule::new(num_candidates,randomness).ok_or_else(||anyhow!("The imposed rule needs at least one candidate"))?),
        })
    }
}

impl FromStr for Rules {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Plurality" => Ok(Rules::Plurality),
            "AntiPlurality" => Ok(Rules::AntiPlurality),
            "Borda" => Ok(Rules::Borda),
            "TruncatedBorda" => Ok(Rules::TruncatedBorda(2)),
            "Dowdall" => Ok(Rules::Dowdall),
            "InstantRunoff" => Ok(Rules::InstantRunoff),
            "IRV" => Ok(Rules::InstantRunoff), // common alias
            "Coombs" => Ok(Rules::Coombs),
            "CoombsMajority" => Ok(Rules::CoombsMajority),
            "Baldwin" => Ok(Rules::Baldwin),
            "Nanson" => Ok(Rules::Nanson),
            "Copeland" => Ok(Rules::Copeland),
            "Minimax" => Ok(Rules::Minimax),
            "PairwiseMajority" => Ok(Rules::PairwiseMajority),
            "RankedPairs" => Ok(Rules::RankedPairs),
            "Tideman" => Ok(Rules::RankedPairs),
            "Black" => Ok(Rules::Black),
            "TopTwo" => Ok(Rules::TopTwo),
            "Imposed" => Ok(Rules::Imposed),
            _ => match s.strip_prefix("TruncatedBorda") {
                Some(k) => k.parse::<usize>().map(Rules::TruncatedBorda).map_err(|_|"TruncatedBorda should be followed by the number of places that score, e.g. TruncatedBorda3"),
                None => Err("No such rule supported"),
            }
        }
    }
}

impl Display for Rules {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rules::Plurality => "Plurality",
            Rules::AntiPlurality => "AntiPlurality",
            Rules::Borda => "Borda",
            Rules::TruncatedBorda(k) => return write!(f,"TruncatedBorda{}",k),
            Rules::Dowdall => "Dowdall",
            Rules::InstantRunoff => "InstantRunoff",
            Rules::Coombs => "Coombs",
            Rules::CoombsMajority => "CoombsMajority",
            Rules::Baldwin => "Baldwin",
            Rules::Nanson => "Nanson",
            Rules::Copeland => "Copeland",
            Rules::Minimax => "Minimax",
            Rules::PairwiseMajority => "PairwiseMajority",
            Rules::RankedPairs => "RankedPairs",
            Rules::Black => "Black",
            Rules::TopTwo => "TopTwo",
            Rules::Imposed => "Imposed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for rule in Rules::STANDARD {
            assert_eq!(rule.to_string().parse::<Rules>(),Ok(rule));
        }
        assert_eq!("TruncatedBorda4".parse::<Rules>(),Ok(Rules::TruncatedBorda(4)));
        assert_eq!("IRV".parse::<Rules>(),Ok(Rules::InstantRunoff));
        assert!("TruncatedBordaX".parse::<Rules>().is_err());
        assert!("FirstPastThePost".parse::<Rules>().is_err());
    }

    #[test]
    fn build_every_rule() {
        let mut randomness = Randomness::seeded(0);
        for rule in Rules::STANDARD {
            let built = rule.build(3,&mut randomness).unwrap();
            assert!(!built.name().is_empty());
        }
        assert_eq!(Rules::Borda.build(3,&mut randomness).unwrap().name(),"Borda Count");
        assert!(Rules::Imposed.build(0,&mut randomness).is_err());
        assert!(!Rules::PairwiseMajority.build(3,&mut randomness).unwrap().produces_total_order());
    }
}
