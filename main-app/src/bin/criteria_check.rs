// Copyright 2024 Andrew Conway.
// This file is part of VotingCriteria.
// VotingCriteria is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// VotingCriteria is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with VotingCriteria.  If not, see <https://www.gnu.org/licenses/>.


use clap::Parser;
use std::path::PathBuf;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use log::info;
use main_app::config::{letter_names, ExperimentConfig};
use main_app::rules::Rules;
use voting_criteria::criteria::{Criterion, IiaMethod};
use voting_criteria::distributions::DistributionChoice;
use voting_criteria::monte_carlo::{save_results, ElectionSimulation, ExperimentResults};
use voting_criteria::random_util::Randomness;

#[derive(Parser)]
#[clap(version = "0.1", author = "Andrew Conway", name="CriteriaCheck")]
/// Check how often voting rules violate criteria such as the Condorcet criterion,
/// on random (or all) electorates of a given size.
struct Opts {
    /// The rules to check. If none are given, all are checked.
    /// Currently supported Plurality, AntiPlurality, Borda, TruncatedBordaK, Dowdall, InstantRunoff, Coombs,
    /// CoombsMajority, Baldwin, Nanson, Copeland, Minimax, PairwiseMajority, RankedPairs, Black, TopTwo, Imposed
    rules : Vec<Rules>,

    /// A .json file describing the experiment. Other options override values in it.
    #[clap(long)]
    config : Option<PathBuf>,

    /// The number of voters in each electorate.
    #[clap(short, long)]
    voters : Option<u64>,

    /// The number of candidates, who will be called A, B, C...
    #[clap(short, long)]
    candidates : Option<usize>,

    /// The number of random electorates to try for each rule.
    #[clap(short, long)]
    trials : Option<u64>,

    /// IC, IAC or custom:w1,w2,... with one weight per ordering.
    #[clap(short, long)]
    distribution : Option<DistributionChoice>,

    /// Comma separated list of criteria to check, from condorcet, condorcet-loser, majority, unanimity, transitivity, iia.
    #[clap(long,value_delimiter=',')]
    criteria : Option<Vec<Criterion>>,

    /// How to look for IIA violations : perturbation, perturbation:N (N samples per pair), moves or pair.
    #[clap(long)]
    iia : Option<IiaMethod>,

    /// Seed for the random number generator.
    #[clap(long)]
    seed : Option<u64>,

    /// Number of threads to split trials amongst.
    #[clap(long)]
    threads : Option<usize>,

    /// Check every possible electorate once instead of random ones. Only feasible for small numbers of voters and candidates.
    #[clap(long)]
    exhaustive : bool,

    /// An optional .json file to store the results in.
    #[clap(short, long)]
    output : Option<PathBuf>,

    /// Whether progress should be printed out to stdout.
    #[clap(long)]
    verbose: bool,
}

impl Opts {
    fn experiment(&self) -> anyhow::Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load(path)?,
            None => ExperimentConfig::default(),
        };
        if let Some(voters) = self.voters { config.voters=voters; }
        if let Some(candidates) = self.candidates { config.candidates=letter_names(candidates); }
        if let Some(trials) = self.trials { config.trials=trials; }
        if let Some(distribution) = &self.distribution { config.distribution=distribution.clone(); }
        if let Some(criteria) = &self.criteria { config.criteria=criteria.clone(); }
        if let Some(iia) = self.iia { config.iia=iia; }
        if let Some(seed) = self.seed { config.seed=seed; }
        if let Some(threads) = self.threads { config.threads=threads; }
        if self.exhaustive { config.exhaustive=true; }
        if !self.rules.is_empty() { config.rules=self.rules.clone(); }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt : Opts = Opts::parse();
    let config = opt.experiment()?;
    let contest = config.contest()?;
    let distribution = config.distribution.build(&contest.catalog)?;
    let mut randomness = Randomness::seeded(config.seed);
    let mut all_results = vec![];
    for rules in config.rules_to_check() {
        if opt.verbose { println!("Checking {}",rules); }
        let rule = rules.build(contest.num_candidates(),&mut randomness)?;
        let mut simulation = ElectionSimulation::new(contest.clone(),rule).with_iia_method(config.iia);
        if config.exhaustive {
            let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
            let done = simulation.run_exhaustive(&config.criteria,&mut randomness,&mut rng);
            if opt.verbose { println!("Checked all {} electorates",done); }
        } else if config.threads>1 {
            simulation.run_multithreaded(config.trials,&config.criteria,&distribution,config.seed,config.threads)?;
        } else {
            let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
            simulation.run_trials(config.trials,&config.criteria,&distribution,&mut randomness,&mut rng)?;
        }
        let results = ExperimentResults::new(&simulation,&config.distribution.to_string(),&config.criteria);
        results.print_table();
        all_results.push(results);
    }
    if let Some(output) = &opt.output {
        save_results(&all_results,output)?;
        info!("Saved results to {}",output.display());
    }
    Ok(())
}
