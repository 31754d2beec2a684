// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.


//! Small hand worked electorates with known answers.


#[cfg(test)]
mod tests {
    use voting_criteria::ballot_counts::BallotCounts;
    use voting_criteria::ballot_metadata::CandidateIndex;
    use voting_criteria::contest::Contest;
    use voting_criteria::criteria::{violates_condorcet_winner, violates_majority};
    use voting_criteria::orderings::OrderingCatalog;
    use voting_criteria::pairwise::{compare, PairwiseMatrix, PairwiseOutcome};
    use voting_criteria::random_util::Randomness;
    use voting_criteria::rules::*;
    use voting_criteria::voting_rule::VotingRule;

    const A : CandidateIndex = CandidateIndex(0);
    const B : CandidateIndex = CandidateIndex(1);
    const C : CandidateIndex = CandidateIndex(2);

    fn three(counts:Vec<u64>) -> (OrderingCatalog,BallotCounts) {
        let contest = Contest::with_letter_names(3,counts.iter().sum()).unwrap();
        let ballots = contest.ballots(counts).unwrap();
        ((*contest.catalog).clone(),ballots)
    }

    #[test]
    fn plurality_and_condorcet_agree() {
        // ABC 3, ACB 2, BAC 1
        let (catalog,ballots) = three(vec![3,2,1,0,0,0]);
        let r = &mut Randomness::FavourFirstListed;
        assert_eq!(Plurality.winner(&ballots,&catalog,r),Some(A));
        assert_eq!(Plurality.tally(&ballots,&catalog).score(A).first_place_votes,5);
        let matrix = PairwiseMatrix::new(&ballots,&catalog);
        assert_eq!(matrix.condorcet_winner(),Some(A));
        let ab = compare(A,B,&ballots,&catalog);
        assert_eq!((ab.first,ab.second),(5,1));
        assert_eq!(ab.outcome(),PairwiseOutcome::First);
        assert!(!violates_condorcet_winner(&Plurality,&ballots,&catalog,r));
        assert!(!violates_majority(&Plurality,&ballots,&catalog,r));
    }

    #[test]
    fn instant_runoff_single_winner() {
        // ABC 4, BCA 3, CBA 3 : B and C tie for fewest first preferences and go together.
        let (catalog,ballots) = three(vec![4,0,3,0,0,3]);
        let r = &mut Randomness::FavourFirstListed;
        let rank = InstantRunoff.rank(&ballots,&catalog,r);
        assert_eq!(rank.top(),&[A]);
        assert!(rank.num_groups()<=catalog.num_candidates());
        let tally = InstantRunoff.tally(&ballots,&catalog);
        assert!(tally.scores.iter().all(|s|s.round_eliminated.unwrap()<catalog.num_candidates()));
        assert_eq!(InstantRunoff.winner(&ballots,&catalog,r),Some(A));
    }

    #[test]
    fn cyclic_majority() {
        // ABC, BCA, CAB, one each.
        let (catalog,ballots) = three(vec![1,0,0,1,1,0]);
        let r = &mut Randomness::FavourFirstListed;
        let matrix = PairwiseMatrix::new(&ballots,&catalog);
        assert_eq!(matrix.condorcet_winner(),None);
        assert_eq!(matrix.condorcet_loser(),None);
        assert_eq!(Plurality.rank(&ballots,&catalog,r).groups(),&[vec![A,B,C]]);
        assert_eq!(PairwiseMajority.winner(&ballots,&catalog,r),None);
        let first = RankedPairs.rank(&ballots,&catalog,r);
        assert_eq!(first.num_groups(),3);
        for seed in 0..5 {
            assert_eq!(RankedPairs.rank(&ballots,&catalog,&mut Randomness::seeded(seed)),first);
        }
    }

    #[test]
    fn condorcet_loser_can_win_plurality() {
        // ABC 4, BCA 3, CBA 2
        let (catalog,ballots) = three(vec![4,0,0,3,0,2]);
        let r = &mut Randomness::FavourFirstListed;
        let matrix = PairwiseMatrix::new(&ballots,&catalog);
        assert_eq!(matrix.condorcet_winner(),Some(B));
        assert_eq!(matrix.condorcet_loser(),Some(A));
        assert_eq!(Plurality.winner(&ballots,&catalog,r),Some(A));
        for rule in [&InstantRunoff as &dyn VotingRule,&Black,&RankedPairs,&Copeland,&Minimax,&TopTwo,&Nanson,&Baldwin] {
            assert_eq!(rule.winner(&ballots,&catalog,r),Some(B),"{}",rule.name());
        }
    }

    /// Black puts the Condorcet winner first even if Borda would not, and Top Two puts both
    /// runoff candidates above someone who tied for second on first preferences. Both are
    /// kept deliberately, so a rank of the non winners need not match how the winner was found.
    #[test]
    fn known_asymmetric_tie_handling() {
        // ABC 3, BCA 2 : Borda prefers B, Black takes the Condorcet winner A.
        let (catalog,ballots) = three(vec![3,0,0,2,0,0]);
        let r = &mut Randomness::FavourFirstListed;
        assert_eq!(Borda.winner(&ballots,&catalog,r),Some(B));
        assert_eq!(Black.rank(&ballots,&catalog,r).groups(),&[vec![A],vec![B],vec![C]]);
        // ABC 2, BAC 1, CAB 1 : B and C tie on first preferences but only B makes the runoff.
        let (catalog,ballots) = three(vec![2,0,1,0,1,0]);
        let rank = TopTwo.rank(&ballots,&catalog,r);
        assert_eq!(rank.groups(),&[vec![A],vec![B],vec![C]]);
        assert!(rank.rank(B)<rank.rank(C));
    }

    #[test]
    fn named_candidates() {
        let contest = Contest::new(voting_criteria::ballot_metadata::ContestMetadata::from_names("Lunch",&["Pie","Soup","Salad"]),6).unwrap();
        let ballots = contest.ballots(vec![3,2,1,0,0,0]).unwrap();
        let rank = Borda.rank(&ballots,&contest.catalog,&mut Randomness::FavourFirstListed);
        assert_eq!(contest.metadata.describe_order(&rank.flattened()),"Pie>Soup>Salad");
    }
}
