//! Provides an example of how to use mcinfer to run MC-SAT on a small knowledge base.
//!
//! The classic smokers example: smoking causes cancer, and friends either both smoke or both
//! don't. Anna is known to have cancer and to be friends with Bob.

extern crate mcinfer;

use mcinfer as m;
use m::logic::{Database, Formula, WeightedClausalKb, WeightedFormula, WorldVariables};
use m::sat::ExhaustiveSampler;

fn main() -> m::Result<()> {
    /////////////////////////////////////////////////////
    // Step 1: Ground the atoms and formulas
    let mut vars = WorldVariables::new();
    let smokes_a = vars.add("smokes(Anna)");
    let smokes_b = vars.add("smokes(Bob)");
    let cancer_a = vars.add("cancer(Anna)");
    let cancer_b = vars.add("cancer(Bob)");
    let friends = vars.add("friends(Anna,Bob)");

    let mut kb = WeightedClausalKb::new();
    kb.add(WeightedFormula::soft(Formula::implies(Formula::atom(smokes_a), Formula::atom(cancer_a)), 1.5))
      .add(WeightedFormula::soft(Formula::implies(Formula::atom(smokes_b), Formula::atom(cancer_b)), 1.5))
      .add(WeightedFormula::hard(Formula::implies(
          Formula::atom(friends),
          Formula::equiv(Formula::atom(smokes_a), Formula::atom(smokes_b))
      )))
      .add(WeightedFormula::soft(Formula::not(Formula::atom(smokes_a)), 0.5))
      .add(WeightedFormula::soft(Formula::not(Formula::atom(smokes_b)), 0.5));

    /////////////////////////////////////////////////////
    // Step 2: Compile some evidence
    let mut db = Database::new();
    db.set(cancer_a, true);
    db.set(friends, true);

    /////////////////////////////////////////////////////
    // Step 3: Sample with SampleSAT, then with exact uniform sampling
    let mut mcsat = m::McSat::new(&kb, &vars, &db)?;
    mcsat.set_seed(42);
    mcsat.run(10_000)?;
    report(&mcsat.algorithm_name(), &vars, |atom| mcsat.get_result(atom));

    let sat = ExhaustiveSampler::new(&vars, &db)?;
    let config = m::McSatConfig { seed: Some(42), ..m::McSatConfig::default() };
    let mut exact = m::McSat::with_sampler(&kb, &vars, sat, config)?;
    exact.run(10_000)?;
    report(&exact.algorithm_name(), &vars, |atom| exact.get_result(atom));

    Ok(())
}

fn report<F>(name: &str, vars: &WorldVariables, result: F)
    where F: Fn(&m::logic::GroundAtom) -> f64
{
    println!("{}", name);
    for atom in vars.iter() {
        println!("  P({}) = {:.4}", atom, result(atom));
    }
}
