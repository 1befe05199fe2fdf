//! Provides an example of how to use mcinfer to sample from a belief network.
//!
//! Builds the student network of Koller & Friedman (Figure 3.4) and estimates the posterior of
//! the intelligence of a student with a good SAT score and a weak recommendation letter.

extern crate mcinfer;
extern crate ndarray;

use mcinfer as m;
use m::cpt::{Cpt, Table};
use m::init::Initialization;
use m::samplers::{ForwardSampling, InferenceStrategy, LikelihoodWeighting};
use ndarray::prelude as nd;

fn main() -> m::Result<()> {
    let difficulty = m::Variable::binary();
    let intelligence = m::Variable::binary();
    let grade = m::Variable::discrete(3);
    let sat = m::Variable::binary();
    let letter = m::Variable::binary();

    /////////////////////////////////////////////////////
    // Step 1: Build Model
    let mut grades = Table::zeros(vec![3, 2, 2]);
    let cols = [
        ((0, 0), [0.3, 0.4, 0.3]),
        ((0, 1), [0.05, 0.25, 0.7]),
        ((1, 0), [0.9, 0.08, 0.02]),
        ((1, 1), [0.5, 0.3, 0.2])
    ];
    for &((i, d), ref ps) in cols.iter() {
        for (g, &p) in ps.iter().enumerate() {
            grades[&[g, i, d][..]] = p;
        }
    }

    let model = m::BeliefNetworkBuilder::new()
        .with_named_variable(&difficulty, "difficulty", vec![], Initialization::Binomial(0.6))
        .with_named_variable(&intelligence, "intelligence", vec![], Initialization::Binomial(0.7))
        .with_named_variable(
            &grade,
            "grade",
            vec![intelligence, difficulty],
            Initialization::Table(Cpt::new(grade, vec![intelligence, difficulty], grades)?)
        )
        .with_named_variable(
            &sat,
            "sat",
            vec![intelligence],
            Initialization::Table(Cpt::new(sat, vec![intelligence], nd::arr2(&[[0.95, 0.2], [0.05, 0.8]]).into_dyn())?)
        )
        .with_named_variable(
            &letter,
            "letter",
            vec![grade],
            Initialization::Table(Cpt::new(letter, vec![grade], nd::arr2(&[[0.1, 0.4, 0.99], [0.9, 0.6, 0.01]]).into_dyn())?)
        )
        .build()?;

    /////////////////////////////////////////////////////
    // Step 2: Compile some evidence: S = 1, L = 0
    let evidence = vec![None, None, None, Some(1), Some(0)];

    /////////////////////////////////////////////////////
    // Step 3: Run both samplers
    run(&model, ForwardSampling::new(), &evidence)?;
    run(&model, LikelihoodWeighting::new(), &evidence)?;

    Ok(())
}

fn run<S: InferenceStrategy>(model: &m::BeliefNetwork, strategy: S, evidence: &[Option<usize>]) -> m::Result<()> {
    let mut sampler = m::Sampler::new(model, strategy);
    sampler.set_evidence(evidence.to_vec())?;
    sampler.set_num_samples(50_000);
    sampler.set_confidence_level(0.95);
    sampler.set_seed(42);

    let dist = sampler.infer()?;
    let i = 1;

    println!("{} ({} samples, {:?})", sampler.algorithm_name(), dist.num_samples(), sampler.sampling_time());
    for v in 0..dist.domain_size(i) {
        let ci = dist.confidence_interval(i, v)?;
        println!("  P(I = {} | S = 1, L = 0) = {:.4}  [{:.4}, {:.4}]", v, dist.get(i, v), ci.lower, ci.upper);
    }

    Ok(())
}
