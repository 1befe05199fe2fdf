//! Defines forward (logic) sampling for belief networks
//!
//! Implementation of Koller & Friedman Algorithm 12.1 (pp 489). Evidence is handled by rejection:
//! a sample that disagrees with an observed node is a failed trial.

use super::{InferenceStrategy, SamplingContext, WeightedSample};


/// Draws every node in topological order from its CPT and rejects samples that contradict the
/// evidence. Accepted samples have weight 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardSampling;

impl ForwardSampling {

    pub fn new() -> Self {
        ForwardSampling
    }

}

impl InferenceStrategy for ForwardSampling {

    fn algorithm_name(&self) -> &'static str {
        "ForwardSampling"
    }

    fn draw(&mut self, ctx: &mut SamplingContext) -> Option<WeightedSample> {
        let network = ctx.network();
        let mut assignment = vec![0; network.num_nodes()];

        for (i, (node, _)) in network.iter().enumerate() {
            // topological order guarantees the parents are already sampled
            let value = ctx.sample_forward(node, &assignment)?;

            if let Some(observed) = ctx.evidence()[i] {
                if observed != value {
                    return None;
                }
            }

            assignment[i] = value;
        }

        Some(WeightedSample::new(assignment, 1.0))
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use bayesnet::BeliefNetworkBuilder;
    use cpt::Cpt;
    use init::Initialization;
    use samplers::Sampler;
    use variable::Variable;

    use ndarray::prelude as nd;

    #[test]
    fn sample() {
        let intelligence = Variable::binary();
        let sat = Variable::binary();

        let scpt = Cpt::new(sat, vec![intelligence], nd::arr2(&[[0.95, 0.2], [0.05, 0.8]]).into_dyn()).unwrap();
        let model = BeliefNetworkBuilder::new()
            .with_named_variable(&intelligence, "I", vec![], Initialization::Multinomial(&[0.7, 0.3]))
            .with_named_variable(&sat, "S", vec![intelligence], Initialization::Table(scpt))
            .build()
            .unwrap();

        let mut sampler = Sampler::new(&model, ForwardSampling::new());
        sampler.set_seed(11);
        sampler.set_num_samples(20000);
        assert_eq!(sampler.algorithm_name(), "ForwardSampling");

        let dist = sampler.infer().unwrap();
        assert_eq!(dist.num_samples(), 20000);
        assert_abs_diff_eq!(dist.get_result(0), 0.3, epsilon = 0.015);
        // P(S = 1) = 0.7 * 0.05 + 0.3 * 0.8
        assert_abs_diff_eq!(dist.get_result(1), 0.275, epsilon = 0.015);
    }

    #[test]
    fn rejection() {
        let intelligence = Variable::binary();
        let sat = Variable::binary();

        let scpt = Cpt::new(sat, vec![intelligence], nd::arr2(&[[0.95, 0.2], [0.05, 0.8]]).into_dyn()).unwrap();
        let model = BeliefNetworkBuilder::new()
            .with_variable(&intelligence, vec![], Initialization::Multinomial(&[0.7, 0.3]))
            .with_variable(&sat, vec![intelligence], Initialization::Table(scpt))
            .build()
            .unwrap();

        let mut sampler = Sampler::new(&model, ForwardSampling::new());
        sampler.set_seed(5);
        sampler.set_num_samples(20000);
        sampler.set_debug_mode(true);
        sampler.set_evidence(vec![None, Some(1)]).unwrap();

        // P(I = 1 | S = 1) = 0.24 / 0.275
        let dist = sampler.infer().unwrap();
        assert_abs_diff_eq!(dist.get_result(0), 0.24 / 0.275, epsilon = 0.015);
        assert_abs_diff_eq!(dist.get_result(1), 1.0);
    }
}
