// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.

//! The concrete voting rules.

pub mod positional;
pub mod elimination;
pub mod pairwise_methods;
pub mod ranked_pairs;
pub mod black;
pub mod top_two;
pub mod imposed;

pub use positional::{AntiPlurality, Borda, Dowdall, Plurality, TruncatedBorda};
pub use elimination::{Baldwin, Coombs, CoombsMajority, InstantRunoff, Nanson};
pub use pairwise_methods::{Copeland, Minimax, PairwiseMajority};
pub use ranked_pairs::RankedPairs;
pub use black::Black;
pub use top_two::TopTwo;
pub use imposed::ImposedRule;
