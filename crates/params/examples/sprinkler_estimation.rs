//! Estimating the Sprinkler Network from Data
//!
//! Run with: cargo run -p bayesnet-params --example sprinkler_estimation
//!
//! This example demonstrates:
//! - Flat CPT layout and strides for a two-parent variable
//! - Bayesian estimation with an equivalent sample size
//! - How the prior strength pulls estimates toward uniform
//! - Reading an estimated CPT as a Markov kernel

use bayesnet_params::{
    sprinkler_structure, BayesianEstimator, Dataset, Dist, Network, NetworkStructure, ParamError,
};

/// Deterministic pseudo-random sampling from the textbook sprinkler CPTs.
fn synthetic_rows(n: usize) -> Vec<[u8; 4]> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut uniform = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..n)
        .map(|_| {
            let cloudy = uniform() < 0.5;
            let sprinkler = uniform() < if cloudy { 0.1 } else { 0.5 };
            let rain = uniform() < if cloudy { 0.8 } else { 0.2 };
            let p_wet = match (sprinkler, rain) {
                (false, false) => 0.0,
                (false, true) => 0.8,
                (true, false) => 0.9,
                (true, true) => 0.99,
            };
            let wet = uniform() < p_wet;
            [cloudy as u8, sprinkler as u8, rain as u8, wet as u8]
        })
        .collect()
}

fn print_cpt(net: &Network, name: &str) -> Result<(), ParamError> {
    let var = net
        .find(name)
        .ok_or_else(|| ParamError::UnknownVariable {
            name: name.to_string(),
        })?;
    let cpt = net.cpt(var).ok_or_else(|| ParamError::MissingParameters {
        variable: name.to_string(),
    })?;

    let parents: Vec<&str> = net.parents(var).iter().map(|&p| net.name(p)).collect();
    println!("P({} | {:?})  strides = {:?}", name, parents, cpt.scope().strides());
    for (config, block) in cpt.blocks().enumerate() {
        println!("  config {}: {:?}", config, block);
    }
    println!();
    Ok(())
}

fn main() -> Result<(), ParamError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    println!("=== Estimating the Sprinkler Network ===\n");

    // -------------------------------------------------------------------------
    // 1. Structure and Layout
    // -------------------------------------------------------------------------
    println!("1. Structure and Layout");
    println!("-----------------------");
    let mut net = sprinkler_structure()?;
    for var in net.variables() {
        println!(
            "  {:<10} parents = {:?}  scope size = {}",
            net.name(var),
            net.parents(var)
                .iter()
                .map(|&p| net.name(p))
                .collect::<Vec<_>>(),
            net.scope_size(var)
        );
    }
    println!();

    // -------------------------------------------------------------------------
    // 2. Bayesian Estimation
    // -------------------------------------------------------------------------
    println!("2. Bayesian Estimation (S = 4)");
    println!("------------------------------");
    let data = Dataset::from_rows(4, synthetic_rows(2000))?;
    BayesianEstimator::new()
        .with_equivalent_sample_size(4.0)
        .fit(&mut net, &data)?;

    for name in ["Cloudy", "Sprinkler", "Rain", "WetGrass"] {
        print_cpt(&net, name)?;
    }
    println!("Log-likelihood: {:.2}\n", net.log_likelihood(&data)?);

    // -------------------------------------------------------------------------
    // 3. Prior Strength
    // -------------------------------------------------------------------------
    println!("3. Prior Strength on a Small Sample");
    println!("-----------------------------------");
    let small = Dataset::from_rows(4, synthetic_rows(20))?;
    let rain = net.find("Rain").ok_or_else(|| ParamError::UnknownVariable {
        name: "Rain".to_string(),
    })?;
    for s in [0.0, 2.0, 20.0, 2000.0] {
        let params = BayesianEstimator::new()
            .with_equivalent_sample_size(s)
            .estimate(&net, &small)?;
        if let Some(cpt) = params.get(rain) {
            println!(
                "  S = {:>6}: P(Rain=1 | Cloudy=1) = {:.3}",
                s,
                cpt.prob(1, &[1])?
            );
        }
    }
    println!();

    // -------------------------------------------------------------------------
    // 4. CPTs as Kernels
    // -------------------------------------------------------------------------
    println!("4. CPTs as Kernels");
    println!("------------------");
    let cloudy = net.find("Cloudy").ok_or_else(|| ParamError::UnknownVariable {
        name: "Cloudy".to_string(),
    })?;
    if let (Some(p_cloudy), Some(p_rain)) = (net.cpt(cloudy), net.cpt(rain)) {
        let prior: Dist = p_cloudy.distribution(&[])?;
        let marginal = p_rain.to_kernel().apply(&prior)?;
        println!("  P(Rain) = {:?}", marginal.p);
        println!("  Most likely: Rain = {}", marginal.mode());
        println!("  Entropy: {:.3} nats", marginal.entropy());
    }

    Ok(())
}
