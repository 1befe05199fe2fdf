//! Defines likelihood weighted particle generation for belief networks.
//!
//! Koller & Friedman Algorithm 12.2 (pp 493)

use super::{InferenceStrategy, SamplingContext, WeightedSample};


/// Samples unobserved nodes from their CPTs and clamps observed nodes to the evidence. The
/// weight of a sample is the product of ```P(e | Pa(E))``` over the observed nodes ```E```.
///
/// A sample whose weight is zero, or that reaches an all-zero CPT column, is a failed trial.
#[derive(Clone, Copy, Debug, Default)]
pub struct LikelihoodWeighting;

impl LikelihoodWeighting {

    pub fn new() -> Self {
        LikelihoodWeighting
    }

}

impl InferenceStrategy for LikelihoodWeighting {

    fn algorithm_name(&self) -> &'static str {
        "LikelihoodWeighting"
    }

    fn draw(&mut self, ctx: &mut SamplingContext) -> Option<WeightedSample> {
        let network = ctx.network();
        let mut assignment = vec![0; network.num_nodes()];
        let mut w = 1.0;

        for (i, (node, _)) in network.iter().enumerate() {
            let observed = ctx.evidence()[i];

            match observed {
                Some(value) => {
                    assignment[i] = value;
                    // update the weight by P(node | Pa(node))
                    w *= ctx.cpt_probability(node, &assignment).ok()?;
                    if w == 0.0 {
                        return None;
                    }
                },
                None => {
                    assignment[i] = ctx.sample_forward(node, &assignment)?;
                }
            }
        }

        Some(WeightedSample::new(assignment, w))
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use bayesnet::{BeliefNetwork, BeliefNetworkBuilder};
    use cpt::{Cpt, Table};
    use init::Initialization;
    use samplers::Sampler;
    use variable::Variable;

    use ndarray::prelude as nd;

    /// The student network, Koller & Friedman Figure 3.4. Nodes are D, I, G, S, L.
    fn student() -> BeliefNetwork {
        let d = Variable::binary();
        let i = Variable::binary();
        let g = Variable::discrete(3);
        let s = Variable::binary();
        let l = Variable::binary();

        // axes [g, i, d]
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
        let cpt_l = Cpt::new(l, vec![g], nd::arr2(&[[0.1, 0.4, 0.99], [0.9, 0.6, 0.01]]).into_dyn()).unwrap();
        let cpt_s = Cpt::new(s, vec![i], nd::arr2(&[[0.95, 0.2], [0.05, 0.8]]).into_dyn()).unwrap();

        BeliefNetworkBuilder::new()
            .with_variable(&d, vec![], Initialization::Binomial(0.6))
            .with_variable(&i, vec![], Initialization::Binomial(0.7))
            .with_variable(&g, vec![i, d], Initialization::Table(cpt_g))
            .with_variable(&s, vec![i], Initialization::Table(cpt_s))
            .with_variable(&l, vec![g], Initialization::Table(cpt_l))
            .build()
            .unwrap()
    }

    #[test]
    fn weights() {
        let model = student();
        let mut sampler = Sampler::new(&model, LikelihoodWeighting::new());
        sampler.set_evidence(vec![None, None, None, Some(1), Some(0)]).unwrap();
        sampler.set_seed(1);

        let mut strategy = LikelihoodWeighting::new();
        let mut found = false;
        for _ in 0..1000 {
            let s = strategy.draw(&mut sampler.ctx).unwrap();
            let v = &s.node_domain_indices;

            assert!(v[0] < 2 && v[1] < 2 && v[2] < 3);
            assert_eq!(v[3], 1);
            assert_eq!(v[4], 0);
            assert!(s.weight > 0.0 && s.weight <= 1.0);

            // Koller & Friedman Example 12.3: w = P(s1 | i0) * P(l0 | g2)
            if v[0] == 1 && v[1] == 0 && v[2] == 1 {
                assert_abs_diff_eq!(s.weight, 0.05 * 0.4, epsilon = 1e-12);
                found = true;
            }
        }
        assert!(found);
    }

    #[test]
    fn posterior() {
        let model = student();
        let mut sampler = Sampler::new(&model, LikelihoodWeighting::new());
        sampler.set_seed(7);
        sampler.set_num_samples(50000);
        sampler.set_evidence(vec![Some(0), None, None, Some(0), Some(1)]).unwrap();

        // exact posterior by enumeration
        let mut joint = [0.0; 2];
        for iv in 0..2 {
            for gv in 0..3 {
                joint[iv] += model.probability(&[0, iv, gv, 0, 1]).unwrap();
            }
        }
        let expected = joint[1] / (joint[0] + joint[1]);

        let dist = sampler.infer().unwrap();
        assert_abs_diff_eq!(dist.get_result(1), expected, epsilon = 0.01);
        assert_abs_diff_eq!(dist.get(0, 0), 1.0);
        assert_abs_diff_eq!(dist.get(4, 1), 1.0);
    }

    #[test]
    fn impossible_evidence() {
        let a = Variable::binary();
        let b = Variable::binary();
        let cpt = Cpt::new(b, vec![a], nd::arr2(&[[1.0, 1.0], [0.0, 0.0]]).into_dyn()).unwrap();
        let model = BeliefNetworkBuilder::new()
            .with_variable(&a, vec![], Initialization::Uniform)
            .with_variable(&b, vec![a], Initialization::Table(cpt))
            .build()
            .unwrap();

        let mut sampler = Sampler::new(&model, LikelihoodWeighting::new());
        sampler.set_evidence(vec![None, Some(1)]).unwrap();
        sampler.set_max_trials(10);
        sampler.set_num_samples(3);
        assert_eq!(sampler.infer().err(), Some(::util::InferenceError::MaxTrialsExceeded(10)));
    }
}
