extern crate mcinfer;
#[macro_use]
extern crate approx;
extern crate itertools;
extern crate ndarray;

use mcinfer::cpt::{Cpt, Table};
use mcinfer::init::Initialization;
use mcinfer::samplers::{ForwardSampling, LikelihoodWeighting};
use mcinfer::time_limited::{run_time_limited, TimeLimitedResult};
use mcinfer::{BeliefNetwork, BeliefNetworkBuilder, InferenceError, Sampler, SharedDistribution, Variable};

use itertools::Itertools;
use ndarray::prelude as nd;

use std::time::Duration;

/// The student network of Koller & Friedman, Figure 3.4, with nodes D, I, G, S, L
fn student() -> BeliefNetwork {
    let d = Variable::binary();
    let i = Variable::binary();
    let g = Variable::discrete(3);
    let s = Variable::binary();
    let l = Variable::binary();

    let mut tbl = Table::zeros(vec![3, 2, 2]);
    let cols = [
        ((0, 0), [0.3, 0.4, 0.3]),
        ((0, 1), [0.05, 0.25, 0.7]),
        ((1, 0), [0.9, 0.08, 0.02]),
        ((1, 1), [0.5, 0.3, 0.2])
    ];
    for &((iv, dv), ref ps) in cols.iter() {
        for (gv, &p) in ps.iter().enumerate() {
            tbl[&[gv, iv, dv][..]] = p;
        }
    }
    let cpt_g = Cpt::new(g, vec![i, d], tbl).unwrap();
    let cpt_s = Cpt::new(s, vec![i], nd::arr2(&[[0.95, 0.2], [0.05, 0.8]]).into_dyn()).unwrap();
    let cpt_l = Cpt::new(l, vec![g], nd::arr2(&[[0.1, 0.4, 0.99], [0.9, 0.6, 0.01]]).into_dyn()).unwrap();

    BeliefNetworkBuilder::new()
        .with_named_variable(&d, "difficulty", vec![], Initialization::Binomial(0.6))
        .with_named_variable(&i, "intelligence", vec![], Initialization::Binomial(0.7))
        .with_named_variable(&g, "grade", vec![i, d], Initialization::Table(cpt_g))
        .with_named_variable(&s, "sat", vec![i], Initialization::Table(cpt_s))
        .with_named_variable(&l, "letter", vec![g], Initialization::Table(cpt_l))
        .build()
        .unwrap()
}

/// P(node = value | evidence) by enumerating the joint distribution
fn exact(model: &BeliefNetwork, node: usize, value: usize, evidence: &[Option<usize>]) -> f64 {
    let domains: Vec<_> = model.nodes().iter().map(|v| 0..v.cardinality()).collect();

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for assignment in domains.into_iter().multi_cartesian_product() {
        let consistent = evidence.iter()
                                 .zip(assignment.iter())
                                 .all(|(e, &v)| e.map_or(true, |e| e == v));
        if !consistent {
            continue;
        }

        let p = model.probability(&assignment).unwrap();
        denominator += p;
        if assignment[node] == value {
            numerator += p;
        }
    }

    numerator / denominator
}


#[test]
fn forward_sampling_marginals() {
    let model = student();
    let mut sampler = Sampler::new(&model, ForwardSampling::new());
    sampler.set_num_samples(20000);
    sampler.set_seed(3);

    let dist = sampler.infer().unwrap();
    assert_eq!(dist.num_samples(), 20000);

    let none = vec![None; 5];
    for node in 0..5 {
        for value in 0..dist.domain_size(node) {
            assert_abs_diff_eq!(dist.get(node, value), exact(&model, node, value, &none), epsilon = 0.015);
        }
    }
}

#[test]
fn likelihood_weighting_posterior() {
    let model = student();
    let letter = model.lookup_variable("letter").cloned().unwrap();
    let sat = model.lookup_variable("sat").cloned().unwrap();

    let mut sampler = Sampler::new(&model, LikelihoodWeighting::new());
    let evidence = vec![None, None, None, Some(1), Some(0)];
    sampler.set_evidence(evidence.clone()).unwrap();
    sampler.set_num_samples(30000);
    sampler.set_seed(19);

    assert_eq!(sampler.node_index(&sat), Some(3));
    assert_eq!(sampler.node_index(&letter), Some(4));

    let dist = sampler.infer().unwrap();
    assert_abs_diff_eq!(dist.z(), 1.0, epsilon = 1e-9);
    for node in 0..3 {
        for value in 0..dist.domain_size(node) {
            assert_abs_diff_eq!(dist.get(node, value), exact(&model, node, value, &evidence), epsilon = 0.02);
        }
    }

    // observed nodes are point masses
    assert_abs_diff_eq!(dist.get(3, 1), 1.0);
    assert_abs_diff_eq!(dist.get(4, 0), 1.0);
}

#[test]
fn converges_before_num_samples() {
    let model = student();
    let mut sampler = Sampler::new(&model, LikelihoodWeighting::new());
    sampler.set_num_samples(1_000_000);
    sampler.set_confidence_level(0.95);
    sampler.set_confidence_interval_size_threshold(0.05);
    sampler.set_convergence_check_interval(500);
    sampler.set_seed(7);

    let dist = sampler.infer().unwrap();
    assert!(dist.num_samples() < 1_000_000);
    assert_eq!(dist.num_samples() % 500, 0);
    for node in 0..5 {
        for value in 0..dist.domain_size(node) {
            assert!(dist.confidence_interval(node, value).unwrap().size() <= 0.05 + 1e-9);
        }
    }
}

#[test]
fn impossible_evidence() {
    let model = student();
    let d = model.lookup_variable("difficulty").cloned().unwrap();
    let g = Variable::discrete(3);
    let i = Variable::binary();

    // a CPT for the grade that never gives an A to an easy course
    let cpt = Cpt::new(
        g,
        vec![i, d],
        nd::Array::from_shape_vec(vec![3, 2, 2], vec![0.0, 0.3, 0.0, 0.2, 0.5, 0.3, 0.5, 0.3, 0.5, 0.4, 0.5, 0.5]).unwrap()
    ).unwrap();
    let model = BeliefNetworkBuilder::new()
        .with_variable(&d, vec![], Initialization::Binomial(0.6))
        .with_variable(&i, vec![], Initialization::Binomial(0.7))
        .with_variable(&g, vec![i, d], Initialization::Table(cpt))
        .build()
        .unwrap();

    let mut sampler = Sampler::new(&model, LikelihoodWeighting::new());
    sampler.set_evidence(vec![Some(0), None, Some(0)]).unwrap();
    sampler.set_max_trials(25);

    assert_eq!(sampler.infer().err(), Some(InferenceError::MaxTrialsExceeded(25)));

    sampler.set_skip_failed_steps(true);
    sampler.set_num_samples(10);
    let dist = sampler.infer().unwrap();
    assert_eq!(dist.num_samples(), 0);
}

#[test]
fn time_limited_sampling() {
    let handle = SharedDistribution::new();
    let results = handle.clone();

    let job = move || {
        let model = student();
        let mut sampler = Sampler::new(&model, ForwardSampling::new());
        sampler.set_num_samples(usize::max_value());
        sampler.set_results_handle(results);
        sampler.infer()
    };

    match run_time_limited(job, &handle, Duration::from_millis(250)).unwrap() {
        TimeLimitedResult::TimedOut(Some(dist)) => {
            assert!(dist.num_samples() > 0);
            assert_abs_diff_eq!(dist.distribution(2).iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        },
        other => panic!("unexpected result {:?}", other)
    }
}
