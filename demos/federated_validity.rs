use fedfuzz::{
    aggregate_centers, central_fuzzy_db, federated_fuzzy_db, ClientLearner, FcmConfig,
    FuzzyCMeans, Initialization, LocalLearner,
};
use ndarray::{array, Array2, Axis};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Two obvious clusters in 2D, already scaled to [0, 1].
    let data: Array2<f64> = array![
        // Cluster A (near (0.1, 0.1))
        [0.05, 0.10],
        [0.12, 0.08],
        [0.10, 0.15],
        [0.08, 0.05],
        // Cluster B (near (0.9, 0.9))
        [0.90, 0.88],
        [0.85, 0.92],
        [0.93, 0.95],
        [0.88, 0.86],
    ];

    // Central baseline.
    let mut central = FuzzyCMeans::new(FcmConfig::new(2).with_seed(7))?;
    let summary = central.fit(data.view(), Initialization::RandomMembership)?;
    let centers = central.centers().ok_or("no centers after fit")?;
    let membership = central.membership().ok_or("no membership after fit")?;
    let central_db = central_fuzzy_db(data.view(), centers.view(), membership.view(), 2)?;
    println!(
        "central: iterations={} converged={} db={:.6}",
        summary.iterations, summary.converged, central_db
    );

    // Same data split over three clients, each seeing both clusters.
    let config = FcmConfig::new(2).with_max_iter(50);
    let mut clients = Vec::new();
    for rows in [&[0, 4][..], &[1, 2, 5, 6], &[3, 7]] {
        let local = data.select(Axis(0), rows);
        clients.push(ClientLearner::new(local, config.clone())?);
    }

    let mut global = array![[0.3, 0.3], [0.7, 0.7]];
    for round in 0..3 {
        for client in clients.iter_mut() {
            client.receive_centers(global.clone())?;
            client.fit_local()?;
        }
        global = aggregate_centers(&clients)?;
        println!("round {round}: centers={global:.4}");
    }
    for client in clients.iter_mut() {
        client.receive_centers(global.clone())?;
    }

    let federated_db = federated_fuzzy_db(&clients, 2)?;
    println!("federated: db={federated_db:.6}");
    for (i, client) in clients.iter().enumerate() {
        let support = client.center_support().ok_or("client has no support")?;
        println!("  client {i}: points={} support={support:.4}", client.client_data().nrows());
    }

    Ok(())
}
