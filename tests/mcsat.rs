extern crate mcinfer;
#[macro_use]
extern crate approx;

use mcinfer::config::McSatConfig;
use mcinfer::logic::{Database, Formula, WeightedClausalKb, WeightedFormula, WorldVariables};
use mcinfer::sat::{ExhaustiveSampler, SampleSat};
use mcinfer::McSat;

/// smokes -> cancer with weight 1.5, friends -> (smokes(a) <-> smokes(b)) as a hard formula,
/// and a weak prior against smoking
fn smokers() -> (WorldVariables, WeightedClausalKb) {
    let vars = WorldVariables::from_names(vec!["smokes(a)", "smokes(b)", "cancer(a)", "cancer(b)", "friends(a,b)"]);

    let mut kb = WeightedClausalKb::new();
    kb.add(WeightedFormula::soft(Formula::implies(Formula::atom(0), Formula::atom(2)), 1.5))
      .add(WeightedFormula::soft(Formula::implies(Formula::atom(1), Formula::atom(3)), 1.5))
      .add(WeightedFormula::hard(Formula::implies(Formula::atom(4), Formula::equiv(Formula::atom(0), Formula::atom(1)))))
      .add(WeightedFormula::soft(Formula::not(Formula::atom(0)), 0.5))
      .add(WeightedFormula::soft(Formula::not(Formula::atom(1)), 0.5));

    (vars, kb)
}

/// The exact marginals of the knowledge base, by enumerating every world consistent with `db`
fn exact_marginals(vars: &WorldVariables, kb: &WeightedClausalKb, db: &Database) -> Vec<f64> {
    let n = vars.len();
    let mut marginals = vec![0.0; n];
    let mut z = 0.0;

    for mask in 0..(1usize << n) {
        let world = mcinfer::logic::PossibleWorld::from_values((0..n).map(|i| mask & (1 << i) != 0).collect());
        if !db.is_consistent(&world) {
            continue;
        }

        let mut log_weight = 0.0;
        let mut possible = true;
        for wf in kb.formulas() {
            if wf.is_true(&world) {
                if !wf.is_hard {
                    log_weight += wf.weight;
                }
            } else if wf.is_hard {
                possible = false;
            }
        }
        if !possible {
            continue;
        }

        let w = f64::exp(log_weight);
        z += w;
        for (i, m) in marginals.iter_mut().enumerate() {
            if world.is_true(i) {
                *m += w;
            }
        }
    }

    marginals.iter().map(|m| m / z).collect()
}


#[test]
fn hard_and_soft_unit_formulas() {
    let vars = WorldVariables::from_names(vec!["a", "b"]);
    let mut kb = WeightedClausalKb::new();
    kb.add(WeightedFormula::hard(Formula::atom(0)))
      .add(WeightedFormula::soft(Formula::atom(1), f64::ln(2.0)));

    let mut mcsat = McSat::new(&kb, &vars, &Database::new()).unwrap();
    mcsat.set_seed(11);
    mcsat.run(5000).unwrap();

    let a = vars.lookup("a").unwrap();
    let b = vars.lookup("b").unwrap();
    assert_abs_diff_eq!(mcsat.get_result(a), 1.0);
    // worlds with b weigh e^w = 2 against 1
    assert_abs_diff_eq!(mcsat.get_result(b), 2.0 / 3.0, epsilon = 0.04);
}

#[test]
fn weighted_disjunction() {
    let vars = WorldVariables::from_names(vec!["a", "b"]);
    let mut kb = WeightedClausalKb::new();
    kb.add(WeightedFormula::soft(Formula::or(vec![Formula::atom(0), Formula::atom(1)]), 2.0));

    let exact = exact_marginals(&vars, &kb, &Database::new());
    // three of the four worlds weigh e^2
    assert_abs_diff_eq!(exact[0], 2.0 * f64::exp(2.0) / (1.0 + 3.0 * f64::exp(2.0)), epsilon = 1e-12);

    let mut mcsat = McSat::new(&kb, &vars, &Database::new()).unwrap();
    mcsat.set_seed(31);
    mcsat.run(50000).unwrap();

    let dist = mcsat.poll_results().unwrap();
    assert_abs_diff_eq!(dist.get_result(0), exact[0], epsilon = 0.015);
    assert_abs_diff_eq!(dist.get_result(1), exact[1], epsilon = 0.015);
}

#[test]
fn hard_formulas_hold_in_every_sample() {
    let (vars, kb) = smokers();
    let mut db = Database::new();
    db.set(4, true);

    let mut mcsat = McSat::new(&kb, &vars, &db).unwrap();
    mcsat.set_seed(5);

    let mut samples = 0;
    mcsat.run_with(500, |world| {
        samples += 1;
        assert!(world.is_true(4));
        assert_eq!(world.is_true(0), world.is_true(1));
    }).unwrap();

    assert_eq!(samples, 500);
    let dist = mcsat.poll_results().unwrap();
    assert_abs_diff_eq!(dist.get_result(4), 1.0);
    assert_abs_diff_eq!(dist.get_result(0), dist.get_result(1));
}

#[test]
fn matches_exact_marginals() {
    let (vars, kb) = smokers();
    let mut db = Database::new();
    db.set(2, true);

    let exact = exact_marginals(&vars, &kb, &db);

    let mut mcsat = McSat::new(&kb, &vars, &db).unwrap();
    mcsat.set_seed(2024);
    mcsat.run(20000).unwrap();
    let dist = mcsat.poll_results().unwrap();

    assert_abs_diff_eq!(dist.get_result(2), 1.0);
    for (i, &p) in exact.iter().enumerate() {
        assert_abs_diff_eq!(dist.get_result(i), p, epsilon = 0.03);
    }
}

#[test]
fn exhaustive_sampler_agrees() {
    let (vars, kb) = smokers();
    let db = Database::new();
    let exact = exact_marginals(&vars, &kb, &db);

    let sat = ExhaustiveSampler::new(&vars, &db).unwrap();
    let config = McSatConfig { seed: Some(8), ..McSatConfig::default() };
    let mut mcsat = McSat::with_sampler(&kb, &vars, sat, config).unwrap();
    assert_eq!(mcsat.algorithm_name(), "MCSAT[Exhaustive]");
    mcsat.run(20000).unwrap();

    let dist = mcsat.poll_results().unwrap();
    for (i, &p) in exact.iter().enumerate() {
        assert_abs_diff_eq!(dist.get_result(i), p, epsilon = 0.03);
    }
}

#[test]
fn seeded_runs_are_reproducible() {
    let (vars, kb) = smokers();
    let db = Database::new();

    let run = |seed| {
        let sat = SampleSat::new(&vars, &db).unwrap();
        let config = McSatConfig { seed: Some(seed), ..McSatConfig::default() };
        let mut mcsat = McSat::with_sampler(&kb, &vars, sat, config).unwrap();

        let mut worlds = Vec::new();
        mcsat.run_with(200, |w| worlds.push(w.clone())).unwrap();
        worlds
    };

    assert_eq!(run(17), run(17));
}
