//! End-to-end estimation scenarios.
//!
//! These tests drive the public API only:
//! - Hand-computed posterior tables for small networks
//! - Limits of the equivalent sample size (0 and very large)
//! - All-or-nothing installation when the data is malformed

use bayesnet_params::{
    sprinkler_structure, BayesianEstimator, Dataset, EstimatorConfig, Network, NetworkStructure,
    ParamError, VarId, Variable, PROB_TOLERANCE,
};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < PROB_TOLERANCE
}

fn parent_child() -> (Network, VarId, VarId) {
    let mut net = Network::new();
    let p = net.add_variable(Variable::binary("P")).unwrap();
    let y = net.add_variable(Variable::binary("Y")).unwrap();
    net.set_parents(y, vec![p]).unwrap();
    (net, p, y)
}

// ============================================================================
// Hand-computed scenarios
// ============================================================================

#[test]
fn single_binary_variable_with_prior() {
    let mut net = Network::new();
    let x = net.add_variable(Variable::binary("X")).unwrap();
    let data = Dataset::from_rows(1, [[0], [1], [1], [1]]).unwrap();

    let estimator = BayesianEstimator::new().with_equivalent_sample_size(2.0);

    // Seeds 2/2 = 1 per cell, then counts 1 and 3
    let tables = estimator.counts(&net, &data).unwrap();
    assert_eq!(tables[0].cells(), &[2.0, 4.0]);

    estimator.fit(&mut net, &data).unwrap();
    let cpt = net.cpt(x).unwrap();
    assert!(approx_eq(cpt.probs()[0], 1.0 / 3.0));
    assert!(approx_eq(cpt.probs()[1], 2.0 / 3.0));
}

#[test]
fn binary_child_maximum_likelihood() {
    let (mut net, _, y) = parent_child();
    let mut data = Dataset::for_structure(&net);
    for (p, yv) in [(0, 0), (0, 1), (1, 1), (1, 1)] {
        data.push_record(&net, [("P", p), ("Y", yv)]).unwrap();
    }

    BayesianEstimator::new()
        .with_equivalent_sample_size(0.0)
        .fit(&mut net, &data)
        .unwrap();

    let cpt = net.cpt(y).unwrap();
    assert_eq!(cpt.prob(1, &[0]).unwrap(), 0.5);
    assert_eq!(cpt.prob(1, &[1]).unwrap(), 1.0);
    assert_eq!(cpt.prob(0, &[1]).unwrap(), 0.0);
}

#[test]
fn default_sample_size_is_row_count() {
    let (net, p, _) = parent_child();
    let data = Dataset::from_rows(2, [[0, 0], [0, 1], [0, 1]]).unwrap();

    let implicit = BayesianEstimator::new().estimate(&net, &data).unwrap();
    let explicit = BayesianEstimator::new()
        .with_equivalent_sample_size(3.0)
        .estimate(&net, &data)
        .unwrap();
    assert_eq!(implicit, explicit);

    // P: seeds 1.5 each, counts [3, 0] → [4.5, 1.5] / 6
    let cpt = implicit.get(p).unwrap();
    assert!(approx_eq(cpt.probs()[0], 0.75));
}

#[test]
fn named_values_and_three_states() {
    let mut net = Network::new();
    let weather = net
        .add_variable(Variable::new("Weather", ["sun", "rain", "snow"]))
        .unwrap();
    let umbrella = net
        .add_variable(Variable::new("Umbrella", ["no", "yes"]))
        .unwrap();
    net.set_parents(umbrella, vec![weather]).unwrap();

    let mut data = Dataset::for_structure(&net);
    for (w, u) in [
        ("sun", "no"),
        ("sun", "no"),
        ("sun", "yes"),
        ("rain", "yes"),
        ("rain", "yes"),
        ("snow", "no"),
    ] {
        data.push_record(&net, [("Weather", w), ("Umbrella", u)])
            .unwrap();
    }

    BayesianEstimator::new()
        .with_equivalent_sample_size(6.0)
        .fit(&mut net, &data)
        .unwrap();

    // Umbrella seeds 6/6 = 1 per cell
    let cpt = net.cpt(umbrella).unwrap();
    assert!(approx_eq(cpt.prob(1, &[0]).unwrap(), 2.0 / 5.0));
    assert!(approx_eq(cpt.prob(1, &[1]).unwrap(), 3.0 / 4.0));
    assert!(approx_eq(cpt.prob(1, &[2]).unwrap(), 1.0 / 3.0));

    // Weather seeds 2 per cell: [5, 4, 3] / 12
    let cpt = net.cpt(weather).unwrap();
    assert!(approx_eq(cpt.probs()[0], 5.0 / 12.0));
    assert!(approx_eq(cpt.probs()[2], 3.0 / 12.0));
}

#[test]
fn sprinkler_two_parent_layout() {
    let mut net = sprinkler_structure().unwrap();
    let wet = net.find("WetGrass").unwrap();

    // Columns: Cloudy, Sprinkler, Rain, WetGrass
    let data = Dataset::from_rows(
        4,
        [
            [0, 1, 0, 1],
            [0, 1, 0, 1],
            [1, 0, 1, 1],
            [1, 0, 1, 0],
            [0, 0, 0, 0],
            [1, 1, 1, 1],
        ],
    )
    .unwrap();

    BayesianEstimator::maximum_likelihood()
        .fit(&mut net, &data)
        .unwrap();

    // Parents [Sprinkler, Rain]: stride(Sprinkler) = 2, stride(Rain) = 4
    let cpt = net.cpt(wet).unwrap();
    assert_eq!(cpt.scope().strides(), &[1, 2, 4]);
    assert_eq!(cpt.prob(1, &[1, 0]).unwrap(), 1.0);
    assert_eq!(cpt.prob(1, &[0, 1]).unwrap(), 0.5);
    assert_eq!(cpt.prob(0, &[0, 0]).unwrap(), 1.0);
    assert_eq!(cpt.prob(1, &[1, 1]).unwrap(), 1.0);
    assert_eq!(cpt.block(1), Some(&[0.0, 1.0][..]));
}

// ============================================================================
// Sample size limits
// ============================================================================

#[test]
fn zero_sample_size_matches_relative_frequencies() {
    let (net, p, y) = parent_child();
    let rows = [[0, 0], [0, 0], [0, 1], [1, 0], [1, 1], [1, 1], [1, 1]];
    let data = Dataset::from_rows(2, rows).unwrap();

    let params = BayesianEstimator::maximum_likelihood()
        .estimate(&net, &data)
        .unwrap();

    let p_cpt = params.get(p).unwrap();
    assert!(approx_eq(p_cpt.probs()[0], 3.0 / 7.0));

    let y_cpt = params.get(y).unwrap();
    assert!(approx_eq(y_cpt.prob(0, &[0]).unwrap(), 2.0 / 3.0));
    assert!(approx_eq(y_cpt.prob(1, &[1]).unwrap(), 3.0 / 4.0));
}

#[test]
fn large_sample_size_approaches_uniform() {
    let (net, _, y) = parent_child();
    let data = Dataset::from_rows(2, [[0, 0], [0, 0], [0, 0], [1, 1]]).unwrap();

    let params = BayesianEstimator::new()
        .with_equivalent_sample_size(1e9)
        .estimate(&net, &data)
        .unwrap();

    for p in params.get(y).unwrap().probs() {
        assert!((p - 0.5).abs() < 1e-6);
    }
}

#[test]
fn unobserved_parent_configuration_is_uniform_without_prior() {
    let (net, _, y) = parent_child();
    let data = Dataset::from_rows(2, [[0, 1], [0, 1]]).unwrap();

    let params = BayesianEstimator::maximum_likelihood()
        .estimate(&net, &data)
        .unwrap();

    let cpt = params.get(y).unwrap();
    assert_eq!(cpt.block(0), Some(&[0.0, 1.0][..]));
    assert_eq!(cpt.block(1), Some(&[0.5, 0.5][..]));
}

#[test]
fn config_file_drives_estimation() {
    let (net, p, _) = parent_child();
    let data = Dataset::from_rows(2, [[0, 0], [1, 1]]).unwrap();

    let config = EstimatorConfig::from_json(
        r#"{ "equivalent_sample_size": 0.0, "priors": { "P": { "0": 2.0 } } }"#,
    )
    .unwrap();
    let params = BayesianEstimator::from_config(config)
        .unwrap()
        .estimate(&net, &data)
        .unwrap();

    // P seeds [2, 0], counts [1, 1] → [3, 1] / 4
    let cpt = params.get(p).unwrap();
    assert!(approx_eq(cpt.probs()[0], 0.75));
}

// ============================================================================
// Malformed data
// ============================================================================

#[test]
fn missing_value_writes_no_cpt() {
    let (mut net, p, y) = parent_child();
    let mut data = Dataset::for_structure(&net);
    data.push_record(&net, [("P", "0"), ("Y", "1")]).unwrap();
    data.push_record(&net, [("P", "1")]).unwrap();

    let result = BayesianEstimator::new().fit(&mut net, &data);
    assert_eq!(
        result,
        Err(ParamError::IncompleteObservation {
            row: 1,
            variable: "Y".to_string(),
        })
    );
    assert!(net.cpt(p).is_none());
    assert!(net.cpt(y).is_none());
}

#[test]
fn failed_refit_keeps_previous_tables() {
    let (mut net, p, y) = parent_child();
    let good = Dataset::from_rows(2, [[0, 0], [1, 1]]).unwrap();
    BayesianEstimator::new().fit(&mut net, &good).unwrap();
    let before = (net.cpt(p).cloned(), net.cpt(y).cloned());

    let bad = Dataset::from_rows(2, [[0, 0], [1, 7]]).unwrap();
    let result = BayesianEstimator::new().fit(&mut net, &bad);
    assert!(matches!(
        result,
        Err(ParamError::InvalidObservation { row: 1, .. })
    ));
    assert_eq!((net.cpt(p).cloned(), net.cpt(y).cloned()), before);
}

#[test]
fn degenerate_domain_is_an_error() {
    let mut net = Network::new();
    net.add_variable(Variable::binary("A")).unwrap();
    net.add_variable(Variable::new("Empty", Vec::<&str>::new()))
        .unwrap();
    let data = Dataset::from_rows(2, [["0"]]).unwrap();

    let result = BayesianEstimator::new().estimate(&net, &data);
    assert_eq!(
        result,
        Err(ParamError::DegenerateDomain {
            variable: "Empty".to_string(),
        })
    );
}

#[test]
fn unknown_variable_rejected_at_boundary() {
    let (net, _, _) = parent_child();
    let mut data = Dataset::for_structure(&net);
    let result = data.push_record(&net, [("P", "0"), ("y", "1")]);
    assert!(matches!(result, Err(ParamError::UnknownVariable { .. })));
}

#[test]
fn negative_sample_size_rejected() {
    let (net, _, _) = parent_child();
    let data = Dataset::from_rows(2, [[0, 0]]).unwrap();
    let result = BayesianEstimator::new()
        .with_equivalent_sample_size(-3.0)
        .estimate(&net, &data);
    assert!(matches!(result, Err(ParamError::InvalidSampleSize { .. })));
}

#[test]
fn log_likelihood_prefers_fitted_data() {
    let (mut net, _, _) = parent_child();
    let train = Dataset::from_rows(2, [[0, 0], [0, 0], [1, 1], [1, 1]]).unwrap();
    BayesianEstimator::new()
        .with_equivalent_sample_size(1.0)
        .fit(&mut net, &train)
        .unwrap();

    let other = Dataset::from_rows(2, [[0, 1], [0, 1], [1, 0], [1, 0]]).unwrap();
    assert!(net.log_likelihood(&train).unwrap() > net.log_likelihood(&other).unwrap());
}
