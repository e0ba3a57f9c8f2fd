#[cfg(test)]
mod tests {
    use crate::cluster::membership_matrix;
    use crate::{
        aggregate_centers, central_fuzzy_db, federated_fuzzy_db, knowledge_gap, ClientLearner,
        FcmConfig, LocalLearner, Metric, Result,
    };
    use ndarray::{array, s, Array2};
    use proptest::prelude::*;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    /// Three noisy blobs around (0, 0), (5, 5) and (10, 0).
    fn three_blobs(per_blob: usize, seed: u64) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let means = [(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)];
        let mut data = Array2::zeros((per_blob * means.len(), 2));
        for (b, &(mx, my)) in means.iter().enumerate() {
            for i in 0..per_blob {
                let row = b * per_blob + i;
                data[[row, 0]] = mx + rng.random_range(-0.5..0.5);
                data[[row, 1]] = my + rng.random_range(-0.5..0.5);
            }
        }
        data
    }

    fn split(data: &Array2<f64>, n_clients: usize, config: &FcmConfig) -> Result<Vec<ClientLearner>> {
        let n = data.nrows();
        let chunk = n.div_ceil(n_clients);
        (0..n)
            .step_by(chunk)
            .map(|start| {
                let end = (start + chunk).min(n);
                ClientLearner::new(data.slice(s![start..end, ..]).to_owned(), config.clone())
            })
            .collect()
    }

    #[test]
    fn test_federated_rounds_recover_blobs() -> Result<()> {
        let mut data = three_blobs(20, 11);
        // Shuffle rows so every client sees every blob.
        let mut order: Vec<usize> = (0..data.nrows()).collect();
        order.shuffle(&mut StdRng::seed_from_u64(5));
        data = data.select(ndarray::Axis(0), &order);

        let config = FcmConfig::new(3).with_max_iter(20).with_tol(1e-6);
        let mut clients = split(&data, 4, &config)?;
        assert_eq!(clients.len(), 4);

        let mut global = array![[1.0, 1.0], [4.0, 4.0], [9.0, 1.0]];
        for _round in 0..5 {
            for client in clients.iter_mut() {
                client.receive_centers(global.clone())?;
                client.fit_local()?;
            }
            global = aggregate_centers(&clients)?;
        }
        for client in clients.iter_mut() {
            client.receive_centers(global.clone())?;
        }

        let truth = array![[0.0, 0.0], [5.0, 5.0], [10.0, 0.0]];
        let gap = knowledge_gap(truth.view(), global.view(), &Metric::Euclidean)?;
        assert!(gap < 0.5, "knowledge gap {gap}");

        let federated = federated_fuzzy_db(&clients, 3)?;
        let membership = membership_matrix(data.view(), global.view(), 2.0, &Metric::Euclidean)?;
        let central = central_fuzzy_db(data.view(), global.view(), membership.view(), 3)?;
        assert!((federated - central).abs() < 1e-9, "{federated} vs {central}");

        let total_support: f64 = clients
            .iter()
            .map(|c| c.center_support().map(|s| s.sum()).unwrap_or(0.0))
            .sum();
        assert!((total_support - data.nrows() as f64).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_better_centers_score_lower() -> Result<()> {
        let data = three_blobs(15, 3);
        let config = FcmConfig::new(3);
        let good = array![[0.0, 0.0], [5.0, 5.0], [10.0, 0.0]];
        let bad = array![[2.0, 2.0], [3.0, 2.0], [8.0, 1.0]];

        let score = |centers: &Array2<f64>| -> Result<f64> {
            let mut clients = split(&data, 3, &config)?;
            for client in clients.iter_mut() {
                client.receive_centers(centers.clone())?;
            }
            federated_fuzzy_db(&clients, 3)
        };

        assert!(score(&good)? < score(&bad)?);
        Ok(())
    }

    proptest! {
        #[test]
        fn federated_equals_central_on_any_partition(
            points in proptest::collection::vec((-20.0f64..20.0, -20.0f64..20.0), 4..60),
            offsets in proptest::collection::vec((-5.0f64..5.0, -5.0f64..5.0), 2..5),
            chunk in 1usize..20,
            m in 1.2f64..3.0,
        ) {
            let n = points.len();
            let k = offsets.len();
            let flat: Vec<f64> = points.iter().flat_map(|&(x, y)| [x, y]).collect();
            let data = Array2::from_shape_vec((n, 2), flat).unwrap();
            // Spread centers apart so none coincide.
            let centers = Array2::from_shape_fn((k, 2), |(j, d)| {
                let (ox, oy) = offsets[j];
                if d == 0 { ox + 15.0 * j as f64 } else { oy }
            });

            let config = FcmConfig::new(k).with_fuzziness(m);
            let mut clients = Vec::new();
            for start in (0..n).step_by(chunk) {
                let end = (start + chunk).min(n);
                let mut client =
                    ClientLearner::new(data.slice(s![start..end, ..]).to_owned(), config.clone()).unwrap();
                client.receive_centers(centers.clone()).unwrap();
                clients.push(client);
            }

            let federated = federated_fuzzy_db(&clients, k).unwrap();
            let membership = membership_matrix(data.view(), centers.view(), m, &Metric::Euclidean).unwrap();
            let central = central_fuzzy_db(data.view(), centers.view(), membership.view(), k).unwrap();

            prop_assert!((federated - central).abs() <= 1e-9 * central.abs().max(1.0));
        }
    }
}
