use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use voting_criteria::ballot_counts::BallotCounts;
use voting_criteria::criteria::{violates_iia, IiaMethod};
use voting_criteria::distributions::{BallotDistribution, ImpartialCulture};
use voting_criteria::orderings::OrderingCatalog;
use voting_criteria::random_util::Randomness;
use voting_criteria::rules::{InstantRunoff, RankedPairs, Borda};
use voting_criteria::voting_rule::VotingRule;

fn electorate(num_candidates:usize) -> (OrderingCatalog,BallotCounts) {
    let catalog = OrderingCatalog::generate(num_candidates);
    let ballots = ImpartialCulture.generate(1001,&catalog,&mut ChaCha20Rng::seed_from_u64(1));
    (catalog,ballots)
}

fn generate_catalog(c: &mut Criterion) {
    c.bench_function("Generate 7 candidate catalog", |b| b.iter(|| OrderingCatalog::generate(7)));
}

fn rank_5_candidates(c: &mut Criterion) {
    let (catalog,ballots) = electorate(5);
    c.bench_function("Borda 5 candidates", |b| b.iter(|| Borda.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed)));
    c.bench_function("Instant Runoff 5 candidates", |b| b.iter(|| InstantRunoff.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed)));
    c.bench_function("Ranked Pairs 5 candidates", |b| b.iter(|| RankedPairs.rank(&ballots,&catalog,&mut Randomness::FavourFirstListed)));
}

fn iia_4_candidates(c: &mut Criterion) {
    let (catalog,ballots) = electorate(4);
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    c.bench_function("IIA perturbation Borda 4 candidates", |b| b.iter(|| violates_iia(&Borda,&ballots,&catalog,IiaMethod::Perturbation{samples:50},&mut Randomness::FavourFirstListed,&mut rng)));
}

criterion_group!(benches, generate_catalog,rank_5_candidates,iia_4_candidates);
criterion_main!(benches);
