//! Annealing configuration: decay method, iteration variation, seeding.

use crate::error::Error;

/// Temperature decay method, applied once per cooling step.
///
/// Formulas live in [`decay_temperature`](crate::sa::decay_temperature).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecayMethod {
    /// Geometric (exponential) decay: `T_{k+1} = alpha * T_k`.
    ///
    /// The classic schedule; `alpha` is derived from instance size.
    #[default]
    Geometric,

    /// Linear decay: a fixed amount per step, floored at the minimum
    /// temperature.
    Linear,

    /// Gradual decay: a multiplicative factor that shrinks as the
    /// iteration count approaches the budget.
    Gradual,

    /// Logarithmic decay: `T_k = T_0 / ln(2 + k)`. Extremely slow; in
    /// practice another stop criterion ends the run first.
    Logarithmic,
}

impl DecayMethod {
    /// Parses a method name, case-insensitively.
    ///
    /// Unknown names fall back to [`DecayMethod::Geometric`] with a
    /// warning rather than failing the run.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "geometric" => DecayMethod::Geometric,
            "linear" => DecayMethod::Linear,
            "gradual" => DecayMethod::Gradual,
            "logarithmic" => DecayMethod::Logarithmic,
            other => {
                tracing::warn!(
                    event = "unknown_decay_method",
                    name = other,
                    "unknown decay method, using geometric"
                );
                DecayMethod::Geometric
            }
        }
    }
}

/// How the number of moves attempted per temperature level changes as
/// the run progresses.
///
/// Formulas live in [`vary_iterations`](crate::sa::vary_iterations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IterationMethod {
    /// Same move budget at every temperature level.
    #[default]
    Constant,

    /// Budget grows by one per thousand elapsed iterations.
    Linear,

    /// Budget grows by 2% per five thousand elapsed iterations.
    Exponential,

    /// Budget plus a uniform random bonus of up to a fifth of itself.
    Random,
}

impl IterationMethod {
    /// Parses a method name, case-insensitively.
    ///
    /// Unknown names fall back to [`IterationMethod::Constant`] with a
    /// warning rather than failing the run.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "constant" => IterationMethod::Constant,
            "linear" => IterationMethod::Linear,
            "exponential" => IterationMethod::Exponential,
            "random" => IterationMethod::Random,
            other => {
                tracing::warn!(
                    event = "unknown_iteration_method",
                    name = other,
                    "unknown iteration method, using constant"
                );
                IterationMethod::Constant
            }
        }
    }
}

/// Configuration for the simulated annealing engine.
///
/// Everything not set here is auto-tuned from the instance at the start
/// of a run; see [`SaParams::auto_tune`](crate::sa::SaParams::auto_tune).
///
/// # Examples
///
/// ```
/// use tsp_anneal::sa::{DecayMethod, IterationMethod, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(250.0)
///     .with_decay(DecayMethod::Gradual)
///     .with_iteration_variation(IterationMethod::Random)
///     .with_seed(42);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature override. `None` derives it from the mean
    /// pairwise distance of the instance.
    pub initial_temperature: Option<f64>,

    /// Temperature decay method.
    pub decay: DecayMethod,

    /// Per-level move budget variation.
    pub iteration_variation: IterationMethod,

    /// Random seed for reproducibility. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = Some(t);
        self
    }

    pub fn with_decay(mut self, decay: DecayMethod) -> Self {
        self.decay = decay;
        self
    }

    /// Sets the decay method by name; see [`DecayMethod::from_name`].
    pub fn with_decay_name(mut self, name: &str) -> Self {
        self.decay = DecayMethod::from_name(name);
        self
    }

    pub fn with_iteration_variation(mut self, variation: IterationMethod) -> Self {
        self.iteration_variation = variation;
        self
    }

    /// Sets the variation method by name; see [`IterationMethod::from_name`].
    pub fn with_iteration_variation_name(mut self, name: &str) -> Self {
        self.iteration_variation = IterationMethod::from_name(name);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(t) = self.initial_temperature {
            if !t.is_finite() || t <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "initial_temperature must be finite and positive, got {t}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SaConfig::default();
        assert_eq!(config.initial_temperature, None);
        assert_eq!(config.decay, DecayMethod::Geometric);
        assert_eq!(config.iteration_variation, IterationMethod::Constant);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_decay_from_name_is_case_insensitive() {
        assert_eq!(DecayMethod::from_name("GEOMETRIC"), DecayMethod::Geometric);
        assert_eq!(DecayMethod::from_name("Linear"), DecayMethod::Linear);
        assert_eq!(DecayMethod::from_name("gradual"), DecayMethod::Gradual);
        assert_eq!(
            DecayMethod::from_name("Logarithmic"),
            DecayMethod::Logarithmic
        );
    }

    #[test]
    fn test_decay_from_name_falls_back_to_geometric() {
        assert_eq!(DecayMethod::from_name("quadratic"), DecayMethod::Geometric);
        assert_eq!(DecayMethod::from_name(""), DecayMethod::Geometric);
    }

    #[test]
    fn test_iteration_from_name_is_case_insensitive() {
        assert_eq!(
            IterationMethod::from_name("Constant"),
            IterationMethod::Constant
        );
        assert_eq!(
            IterationMethod::from_name("LINEAR"),
            IterationMethod::Linear
        );
        assert_eq!(
            IterationMethod::from_name("exponential"),
            IterationMethod::Exponential
        );
        assert_eq!(
            IterationMethod::from_name("Random"),
            IterationMethod::Random
        );
    }

    #[test]
    fn test_iteration_from_name_falls_back_to_constant() {
        assert_eq!(
            IterationMethod::from_name("fibonacci"),
            IterationMethod::Constant
        );
    }

    #[test]
    fn test_builders_compose() {
        let config = SaConfig::default()
            .with_initial_temperature(50.0)
            .with_decay_name("linear")
            .with_iteration_variation_name("exponential")
            .with_seed(7);

        assert_eq!(config.initial_temperature, Some(50.0));
        assert_eq!(config.decay, DecayMethod::Linear);
        assert_eq!(config.iteration_variation, IterationMethod::Exponential);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate_ok() {
        assert!(SaConfig::default().validate().is_ok());
        assert!(SaConfig::default()
            .with_initial_temperature(1e-3)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_temperature() {
        let err = SaConfig::default()
            .with_initial_temperature(0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        assert!(SaConfig::default()
            .with_initial_temperature(-10.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_temperature() {
        assert!(SaConfig::default()
            .with_initial_temperature(f64::NAN)
            .validate()
            .is_err());
        assert!(SaConfig::default()
            .with_initial_temperature(f64::INFINITY)
            .validate()
            .is_err());
    }
}
