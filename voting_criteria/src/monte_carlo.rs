// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.


//! Run a rule against lots of electorates, random or exhaustive, and count how often each
//! criterion is violated.


use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use anyhow::anyhow;
use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Serialize,Deserialize};
use crate::ballot_counts::{BallotCounts, BallotError};
use crate::contest::Contest;
use crate::criteria::{violates, Criterion, IiaMethod};
use crate::distributions::BallotDistribution;
use crate::pairwise::PairwiseMatrix;
use crate::random_util::Randomness;
use crate::voting_rule::VotingRule;

/// How many times something happened out of how many trials it was looked for in.
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq,Serialize,Deserialize)]
pub struct Count {
    pub found : u64,
    pub trials : u64,
}

impl Count {
    fn record(&mut self,happened:bool) {
        self.trials+=1;
        if happened { self.found+=1; }
    }
    fn merge(&mut self,other:&Count) {
        self.found+=other.found;
        self.trials+=other.trials;
    }
    /// 0 to 100. 0 if there were no trials.
    pub fn percentage(&self) -> f64 {
        if self.trials==0 { 0.0 } else { 100.0*(self.found as f64)/(self.trials as f64) }
    }
}

/// Violation counters for one rule. Each is reset-able separately.
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq,Serialize,Deserialize)]
pub struct ViolationCounts {
    pub condorcet : Count,
    pub condorcet_loser : Count,
    pub majority : Count,
    pub unanimity : Count,
    pub transitivity : Count,
    pub iia : Count,
    /// Trials violating at least one of the non IIA criteria checked.
    pub joint : Count,
    /// Trials in which there was a Condorcet winner.
    pub condorcet_winner_count : Count,
}

impl ViolationCounts {
    pub fn for_criterion(&self,criterion:Criterion) -> &Count {
        match criterion {
            Criterion::CondorcetWinner => &self.condorcet,
            Criterion::CondorcetLoser => &self.condorcet_loser,
            Criterion::Majority => &self.majority,
            Criterion::Unanimity => &self.unanimity,
            Criterion::Transitivity => &self.transitivity,
            Criterion::IIA => &self.iia,
        }
    }
    fn for_criterion_mut(&mut self,criterion:Criterion) -> &mut Count {
        match criterion {
            Criterion::CondorcetWinner => &mut self.condorcet,
            Criterion::CondorcetLoser => &mut self.condorcet_loser,
            Criterion::Majority => &mut self.majority,
            Criterion::Unanimity => &mut self.unanimity,
            Criterion::Transitivity => &mut self.transitivity,
            Criterion::IIA => &mut self.iia,
        }
    }
    /// add in other to the cumulative sum of self.
    pub fn merge(&mut self,other:&ViolationCounts) {
        for criterion in Criterion::ALL { self.for_criterion_mut(criterion).merge(other.for_criterion(criterion)); }
        self.joint.merge(&other.joint);
        self.condorcet_winner_count.merge(&other.condorcet_winner_count);
    }
}

/// Every ballot count vector with a given number of voters, as compositions of `voters` into
/// `parts` non-negative parts. Starts at [voters,0,...] and finishes at [...,0,voters].
pub struct Compositions {
    next : Option<Vec<u64>>,
}

impl Compositions {
    pub fn new(voters:u64,parts:usize) -> Self {
        let next = if parts==0 {
            if voters==0 { Some(vec![]) } else { None }
        } else {
            let mut first = vec![0;parts];
            first[0]=voters;
            Some(first)
        };
        Compositions{next}
    }
}

impl Iterator for Compositions {
    type Item = Vec<u64>;
    fn next(&mut self) -> Option<Vec<u64>> {
        let current = self.next.take()?;
        let m = current.len();
        if m>0 {
            let mut c = current.clone();
            let tail = c[m-1];
            c[m-1]=0;
            if let Some(i) = (0..m-1).rev().find(|&i|c[i]>0) {
                c[i]-=1;
                c[i+1]=tail+1;
                self.next=Some(c);
            }
        }
        Some(current)
    }
}

/// A rule being put through its paces on some contest.
pub struct ElectionSimulation {
    pub contest : Contest,
    pub rule : Arc<dyn VotingRule>,
    pub iia : IiaMethod,
    pub counts : ViolationCounts,
}

impl ElectionSimulation {
    pub fn new(contest:Contest,rule:Arc<dyn VotingRule>) -> Self {
        ElectionSimulation{contest,rule,iia:IiaMethod::default(),counts:ViolationCounts::default()}
    }

    pub fn with_iia_method(mut self,iia:IiaMethod) -> Self {
        self.iia=iia;
        self
    }

    /// Check one electorate against the given criteria, recording the results.
    /// Returns the criteria violated. Ballots not matching this contest's catalog are
    /// rejected, and nothing is recorded.
    pub fn check_ballots<R:Rng>(&mut self,ballots:&BallotCounts,criteria:&[Criterion],randomness:&mut Randomness,rng:&mut R) -> Result<Vec<Criterion>,BallotError> {
        if ballots.len()!=self.contest.catalog.len() { return Err(BallotError::WrongLength{expected:self.contest.catalog.len(),actual:ballots.len()}) }
        Ok(self.record_checks(ballots,criteria,randomness,rng))
    }

    /// check_ballots for vectors already known to be the right length.
    fn record_checks<R:Rng>(&mut self,ballots:&BallotCounts,criteria:&[Criterion],randomness:&mut Randomness,rng:&mut R) -> Vec<Criterion> {
        let catalog = self.contest.catalog.clone();
        let mut violated = vec![];
        for &criterion in criteria {
            let v = violates(criterion,self.rule.as_ref(),ballots,&catalog,self.iia,randomness,rng);
            self.counts.for_criterion_mut(criterion).record(v);
            if v { violated.push(criterion); }
        }
        if criteria.iter().any(|&c|c!=Criterion::IIA) {
            self.counts.joint.record(violated.iter().any(|&c|c!=Criterion::IIA));
        }
        self.counts.condorcet_winner_count.record(PairwiseMatrix::new(ballots,&catalog).condorcet_winner().is_some());
        if !violated.is_empty() { debug!("{} violates {:?} on {:?}",self.rule.name(),violated,ballots.as_slice()); }
        violated
    }

    /// Generate `trials` random electorates and check each against all the criteria.
    /// Fails if the distribution makes vectors of the wrong length for this contest.
    pub fn run_trials<D:BallotDistribution,R:Rng>(&mut self,trials:u64,criteria:&[Criterion],distribution:&D,randomness:&mut Randomness,rng:&mut R) -> Result<(),BallotError> {
        info!("Checking {} on {} random electorates of {} voters",self.rule.name(),trials,self.contest.voters);
        let catalog = self.contest.catalog.clone();
        for trial in 0..trials {
            let ballots = distribution.generate(self.contest.voters,&catalog,rng);
            trace!("Trial {} ballots {:?}",trial,ballots.as_slice());
            self.check_ballots(&ballots,criteria,randomness,rng)?;
        }
        info!("Finished checking {}",self.rule.name());
        Ok(())
    }

    fn find_violations<D:BallotDistribution,R:Rng>(&mut self,criterion:Criterion,trials:u64,distribution:&D,randomness:&mut Randomness,rng:&mut R) -> u64 {
        let before = self.counts.for_criterion(criterion).found;
        let catalog = self.contest.catalog.clone();
        for _ in 0..trials {
            let ballots = distribution.generate(self.contest.voters,&catalog,rng);
            let v = violates(criterion,self.rule.as_ref(),&ballots,&catalog,self.iia,randomness,rng);
            self.counts.for_criterion_mut(criterion).record(v);
        }
        let found = self.counts.for_criterion(criterion).found-before;
        info!("{} violated {} in {} of {} trials",self.rule.name(),criterion,found,trials);
        found
    }

    pub fn find_condorcet_violations<D:BallotDistribution,R:Rng>(&mut self,trials:u64,distribution:&D,randomness:&mut Randomness,rng:&mut R) -> u64 {
        self.find_violations(Criterion::CondorcetWinner,trials,distribution,randomness,rng)
    }
    pub fn find_condorcet_loser_violations<D:BallotDistribution,R:Rng>(&mut self,trials:u64,distribution:&D,randomness:&mut Randomness,rng:&mut R) -> u64 {
        self.find_violations(Criterion::CondorcetLoser,trials,distribution,randomness,rng)
    }
    pub fn find_majority_violations<D:BallotDistribution,R:Rng>(&mut self,trials:u64,distribution:&D,randomness:&mut Randomness,rng:&mut R) -> u64 {
        self.find_violations(Criterion::Majority,trials,distribution,randomness,rng)
    }
    pub fn find_unanimity_violations<D:BallotDistribution,R:Rng>(&mut self,trials:u64,distribution:&D,randomness:&mut Randomness,rng:&mut R) -> u64 {
        self.find_violations(Criterion::Unanimity,trials,distribution,randomness,rng)
    }
    pub fn find_transitivity_violations<D:BallotDistribution,R:Rng>(&mut self,trials:u64,distribution:&D,randomness:&mut Randomness,rng:&mut R) -> u64 {
        self.find_violations(Criterion::Transitivity,trials,distribution,randomness,rng)
    }
    pub fn find_iia_violations<D:BallotDistribution,R:Rng>(&mut self,trials:u64,distribution:&D,randomness:&mut Randomness,rng:&mut R) -> u64 {
        self.find_violations(Criterion::IIA,trials,distribution,randomness,rng)
    }

    /// Trials violating any of the criteria other than IIA. Only the joint counter is changed.
    pub fn find_joint_violations<D:BallotDistribution,R:Rng>(&mut self,trials:u64,distribution:&D,randomness:&mut Randomness,rng:&mut R) -> u64 {
        let before = self.counts.joint.found;
        let catalog = self.contest.catalog.clone();
        for _ in 0..trials {
            let ballots = distribution.generate(self.contest.voters,&catalog,rng);
            let v = Criterion::ALL.iter().filter(|&&c|c!=Criterion::IIA).any(|&c|violates(c,self.rule.as_ref(),&ballots,&catalog,self.iia,randomness,rng));
            self.counts.joint.record(v);
        }
        self.counts.joint.found-before
    }

    pub fn reset_condorcet_violations(&mut self) { self.counts.condorcet=Count::default(); }
    pub fn reset_condorcet_loser_violations(&mut self) { self.counts.condorcet_loser=Count::default(); }
    pub fn reset_majority_violations(&mut self) { self.counts.majority=Count::default(); }
    pub fn reset_unanimity_violations(&mut self) { self.counts.unanimity=Count::default(); }
    pub fn reset_transitivity_violations(&mut self) { self.counts.transitivity=Count::default(); }
    pub fn reset_iia_violations(&mut self) { self.counts.iia=Count::default(); }
    pub fn reset_joint_violations(&mut self) { self.counts.joint=Count::default(); }
    pub fn reset_condorcet_winner_count(&mut self) { self.counts.condorcet_winner_count=Count::default(); }
    pub fn reset_all(&mut self) { self.counts=ViolationCounts::default(); }

    /// Like run_trials, split amongst num_threads threads. Thread i uses seed+i, so results
    /// depend on the number of threads but are otherwise repeatable.
    pub fn run_multithreaded<D:BallotDistribution+Clone+Send+'static>(&mut self,trials:u64,criteria:&[Criterion],distribution:&D,seed:u64,num_threads:usize) -> anyhow::Result<()> {
        let num_threads = num_threads.max(1);
        let criteria : Arc<Vec<Criterion>> = Arc::new(criteria.to_vec());
        let mut handles = vec![];
        for thread_no in 0..num_threads {
            let num_to_do = trials / num_threads as u64 + (if trials % num_threads as u64 > thread_no as u64 { 1 } else { 0 });
            let mut worker = ElectionSimulation{contest:self.contest.clone(),rule:self.rule.clone(),iia:self.iia,counts:ViolationCounts::default()};
            let criteria = criteria.clone();
            let distribution = distribution.clone();
            let handle = thread::spawn(move || {
                let mut rng = ChaCha20Rng::seed_from_u64(seed.wrapping_add(thread_no as u64));
                let mut randomness = Randomness::PRNG(ChaCha20Rng::seed_from_u64(rng.random()));
                worker.run_trials(num_to_do,&criteria,&distribution,&mut randomness,&mut rng)?;
                Ok::<ViolationCounts,BallotError>(worker.counts)
            });
            handles.push(handle);
        }
        for handle in handles {
            let partial = handle.join().map_err(|_|anyhow!("A worker thread checking {} panicked",self.rule.name()))??;
            self.counts.merge(&partial);
        }
        Ok(())
    }

    /// Check every possible ballot count vector with the contest's number of voters once.
    /// Returns the number of vectors checked. This grows very fast with voters and candidates.
    pub fn run_exhaustive<R:Rng>(&mut self,criteria:&[Criterion],randomness:&mut Randomness,rng:&mut R) -> u64 {
        info!("Checking {} exhaustively for {} voters",self.rule.name(),self.contest.voters);
        let mut done = 0;
        for counts in Compositions::new(self.contest.voters,self.contest.catalog.len()) {
            let ballots = BallotCounts::from_vec_unchecked(counts);
            self.record_checks(&ballots,criteria,randomness,rng);
            done+=1;
        }
        info!("Checked {} electorates",done);
        done
    }
}

/// One line of an ExperimentResults report.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct CriterionReport {
    pub criterion : String,
    pub violations : u64,
    pub trials : u64,
    pub percentage : f64,
}

impl CriterionReport {
    fn new(criterion:String,count:&Count) -> Self {
        CriterionReport{criterion,violations:count.found,trials:count.trials,percentage:count.percentage()}
    }
}

/// The outcome of checking one rule, suitable for saving as JSON.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct ExperimentResults {
    pub rule : String,
    pub distribution : String,
    pub candidates : usize,
    pub voters : u64,
    pub counts : ViolationCounts,
    pub report : Vec<CriterionReport>,
}

impl ExperimentResults {
    /// Report on the given criteria, plus joint violations and how often there was a Condorcet winner.
    pub fn new(simulation:&ElectionSimulation,distribution:&str,criteria:&[Criterion]) -> Self {
        let counts = simulation.counts;
        let mut report : Vec<CriterionReport> = criteria.iter().map(|&c|CriterionReport::new(c.to_string(),counts.for_criterion(c))).collect();
        if counts.joint.trials>0 { report.push(CriterionReport::new("joint".to_string(),&counts.joint)); }
        report.push(CriterionReport::new("condorcet-winner-exists".to_string(),&counts.condorcet_winner_count));
        ExperimentResults{
            rule: simulation.rule.name(),
            distribution: distribution.to_string(),
            candidates: simulation.contest.num_candidates(),
            voters: simulation.contest.voters,
            counts,
            report,
        }
    }

    pub fn print_table(&self) {
        println!("{} : {} candidates, {} voters, {}",self.rule,self.candidates,self.voters,self.distribution);
        for line in &self.report {
            println!("{:>24} {:>10} / {:<10} {:>8.3}%",line.criterion,line.violations,line.trials,line.percentage);
        }
    }

}

/// Write results for one or more rules as a JSON array.
pub fn save_results(results:&[ExperimentResults],path:&Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() { std::fs::create_dir_all(parent)? }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file,results)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{ImpartialCulture, ImpartialAnonymousCulture};
    use crate::rules::{Borda, Plurality, RankedPairs};

    fn simulation(rule:Arc<dyn VotingRule>,candidates:usize,voters:u64) -> ElectionSimulation {
        ElectionSimulation::new(Contest::with_letter_names(candidates,voters).unwrap(),rule)
    }

    #[test]
    fn compositions_are_all_there() {
        let all : Vec<Vec<u64>> = Compositions::new(2,3).collect();
        assert_eq!(all.len(),6); // C(4,2)
        assert_eq!(all[0],vec![2,0,0]);
        assert_eq!(all[5],vec![0,0,2]);
        assert!(all.iter().all(|c|c.iter().sum::<u64>()==2));
        assert_eq!(Compositions::new(5,1).collect::<Vec<_>>(),vec![vec![5]]);
        assert_eq!(Compositions::new(0,4).count(),1);
        assert_eq!(Compositions::new(3,6).count(),56); // C(8,5)
    }

    #[test]
    fn counters_accumulate_and_reset() {
        let mut sim = simulation(Arc::new(Plurality),3,11);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut randomness = Randomness::seeded(3);
        let found = sim.find_condorcet_violations(200,&ImpartialCulture,&mut randomness,&mut rng);
        assert_eq!(sim.counts.condorcet.trials,200);
        assert_eq!(sim.counts.condorcet.found,found);
        assert!(found>0);
        sim.find_majority_violations(100,&ImpartialCulture,&mut randomness,&mut rng);
        assert_eq!(sim.counts.majority,Count{found:0,trials:100});
        sim.reset_condorcet_violations();
        assert_eq!(sim.counts.condorcet,Count::default());
        assert_eq!(sim.counts.majority.trials,100);
        sim.reset_all();
        assert_eq!(sim.counts,ViolationCounts::default());
    }

    #[test]
    fn joint_counts_each_trial_once() {
        let mut sim = simulation(Arc::new(Borda),3,9);
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let mut randomness = Randomness::seeded(8);
        let criteria = [Criterion::CondorcetWinner,Criterion::CondorcetLoser,Criterion::Majority];
        sim.run_trials(300,&criteria,&ImpartialAnonymousCulture,&mut randomness,&mut rng).unwrap();
        let c = sim.counts;
        assert_eq!(c.joint.trials,300);
        let most = c.condorcet.found.max(c.condorcet_loser.found).max(c.majority.found);
        assert!(c.joint.found>=most);
        assert!(c.joint.found<=c.condorcet.found+c.condorcet_loser.found+c.majority.found);
        assert_eq!(c.condorcet_winner_count.trials,300);
        assert!(c.condorcet.found<=c.condorcet_winner_count.found);
    }

    #[test]
    fn multithreaded_matches_single_thread_total() {
        let mut sim = simulation(Arc::new(Plurality),3,7);
        sim.run_multithreaded(101,&[Criterion::CondorcetWinner],&ImpartialCulture,1,4).unwrap();
        assert_eq!(sim.counts.condorcet.trials,101);
        assert_eq!(sim.counts.condorcet_winner_count.trials,101);
        // repeatable
        let mut again = simulation(Arc::new(Plurality),3,7);
        again.run_multithreaded(101,&[Criterion::CondorcetWinner],&ImpartialCulture,1,4).unwrap();
        assert_eq!(sim.counts,again.counts);
    }

    #[test]
    fn ballots_for_another_catalog_rejected() {
        let mut sim = simulation(Arc::new(Borda),4,6);
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let mut randomness = Randomness::seeded(5);
        let three = Contest::with_letter_names(3,6).unwrap();
        let short = three.ballots(vec![1,1,1,1,1,1]).unwrap();
        assert_eq!(sim.check_ballots(&short,&Criterion::ALL,&mut randomness,&mut rng),Err(BallotError::WrongLength{expected:24,actual:6}));
        let mut small = simulation(Arc::new(Borda),3,6);
        let long = BallotCounts::zeros(24);
        assert_eq!(small.check_ballots(&long,&Criterion::ALL,&mut randomness,&mut rng),Err(BallotError::WrongLength{expected:6,actual:24}));
        assert_eq!(sim.counts,ViolationCounts::default());
        assert_eq!(small.counts,ViolationCounts::default());
        // and the right length is accepted and recorded
        let mut ok = vec![0;24];
        ok[0]=6;
        let unanimous = sim.contest.ballots(ok).unwrap();
        assert_eq!(sim.check_ballots(&unanimous,&Criterion::ALL,&mut randomness,&mut rng),Ok(vec![]));
        assert_eq!(sim.counts.unanimity.trials,1);
    }

    #[test]
    fn exhaustive_ranked_pairs_is_condorcet_consistent() {
        let mut sim = simulation(Arc::new(RankedPairs),3,4);
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let done = sim.run_exhaustive(&[Criterion::CondorcetWinner,Criterion::Unanimity],&mut Randomness::FavourFirstListed,&mut rng);
        assert_eq!(done,126); // C(9,5)
        assert_eq!(sim.counts.condorcet.found,0);
        assert_eq!(sim.counts.condorcet.trials,126);
        assert!(sim.counts.condorcet_winner_count.found>0);
    }

    #[test]
    fn results_report() {
        let mut sim = simulation(Arc::new(Plurality),3,5);
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        sim.run_trials(10,&[Criterion::Majority],&ImpartialCulture,&mut Randomness::FavourFirstListed,&mut rng).unwrap();
        let results = ExperimentResults::new(&sim,"IC",&[Criterion::Majority]);
        assert_eq!(results.rule,"Plurality");
        assert_eq!(results.report[0].criterion,"majority");
        assert_eq!(results.report[0].violations,0);
        assert_eq!(results.report.len(),3);
        let json = serde_json::to_string(&results).unwrap();
        let back : ExperimentResults = serde_json::from_str(&json).unwrap();
        assert_eq!(back.counts,results.counts);
        let path = std::env::temp_dir().join("voting_criteria_results_report.json");
        save_results(&[results.clone()],&path).unwrap();
        let saved : Vec<ExperimentResults> = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(saved.len(),1);
        assert_eq!(saved[0].counts,results.counts);
        assert_eq!(saved[0].rule,results.rule);
    }
}
