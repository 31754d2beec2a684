// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.


pub mod ballot_metadata;
pub mod orderings;
pub mod ballot_counts;
pub mod pairwise;
pub mod societal_rank;
pub mod random_util;
pub mod voting_rule;
pub mod rules;
pub mod criteria;
pub mod distributions;
pub mod contest;
pub mod monte_carlo;
