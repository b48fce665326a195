use digit_network::{Dataset, Network, data::two_clusters};
use ndarray_rand::rand::{SeedableRng, rngs::StdRng};

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[test]
fn separates_two_clusters() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut training_data = two_clusters(200, 0.3, &mut rng)
        .into_iter()
        .map(|datum| datum.into_training_datum(2).unwrap())
        .collect::<Vec<_>>();
    let test_data = two_clusters(100, 0.3, &mut rng);

    let mut network = Network::new(vec![2, 4, 2], &mut rng).unwrap();
    let initial_cost = network.total_cost(&training_data);

    let reports = network
        .stochastic_gradient_descent(
            &mut training_data,
            40,
            10,
            3.0,
            Some(test_data.as_slice()),
            &mut rng,
        )
        .unwrap();

    let costs: Vec<f64> = reports.iter().map(|report| report.cost).collect();
    let final_cost = costs[costs.len() - 1];
    println!("cost {initial_cost} -> {final_cost}");
    assert!(final_cost < initial_cost);
    assert!(mean(&costs[costs.len() - 5..]) <= mean(&costs[..5]));

    let accuracy = reports[reports.len() - 1].accuracy().unwrap();
    assert!(accuracy >= 0.95, "accuracy {accuracy} below 95%");
    assert_eq!(network.evaluate(&test_data), reports[reports.len() - 1].correct.unwrap());
}

#[test]
fn fixed_seeds_give_identical_trajectories() {
    let run = || {
        let mut rng = StdRng::seed_from_u64(99);
        let mut dataset = Dataset::two_clusters(30, &mut rng).unwrap();
        let mut network = Network::new(vec![2, 3, 2], &mut rng).unwrap();
        let reports = network
            .stochastic_gradient_descent(
                &mut dataset.training_data,
                5,
                7,
                1.5,
                Some(dataset.test_data.as_slice()),
                &mut rng,
            )
            .unwrap();
        (network, reports)
    };

    let (first_network, first_reports) = run();
    let (second_network, second_reports) = run();
    assert_eq!(first_network, second_network);
    assert_eq!(first_reports, second_reports);
}

#[test]
fn different_seeds_initialize_differently() {
    let a = Network::new(vec![3, 3], &mut StdRng::seed_from_u64(1)).unwrap();
    let b = Network::new(vec![3, 3], &mut StdRng::seed_from_u64(2)).unwrap();
    assert_ne!(a.weights(), b.weights());
}

#[test]
fn training_mutates_parameters_but_not_shapes() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut dataset = Dataset::two_clusters(10, &mut rng).unwrap();
    let mut network = Network::new(vec![2, 5, 3, 2], &mut rng).unwrap();
    let before = network.clone();

    network
        .stochastic_gradient_descent(&mut dataset.training_data, 2, 3, 0.5, None, &mut rng)
        .unwrap();

    assert_ne!(network, before);
    assert_eq!(network.sizes(), before.sizes());
    for (after, before) in network.weights().iter().zip(before.weights()) {
        assert_eq!(after.dim(), before.dim());
    }
    for (after, before) in network.biases().iter().zip(before.biases()) {
        assert_eq!(after.dim(), before.dim());
    }
}
