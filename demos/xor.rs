use kiln_nn::{
    tabular_classifier, CompileConfig, CrossEntropy, Driver, MemoryStream, MetricsReport, Sgd,
    TaskKind,
};

fn main() {
    env_logger::init();

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    // One-hot targets: class 1 = "XOR is true".
    let targets = vec![
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
    ];

    let mut train = MemoryStream::shuffled(inputs.clone(), targets.clone(), 4).unwrap();
    let mut eval = MemoryStream::new(inputs.clone(), targets, 4).unwrap();

    let mut driver = Driver::new(tabular_classifier(2, &[8], 2));
    driver
        .compile(CompileConfig::new(
            TaskKind::Classification,
            CrossEntropy,
            Sgd::with_momentum(0.5, 0.9),
        ))
        .unwrap();

    let history = driver.fit(2000, &mut train, None).unwrap();
    let last = history.last().unwrap();
    println!(
        "after {} epochs: loss = {:.6}, accuracy = {:.2}%",
        history.len(),
        last.train_loss,
        last.train_metric * 100.0
    );

    if let MetricsReport::Classification(m) = driver.metrics(&mut eval).unwrap() {
        println!(
            "accuracy = {:.2}%, precision = {:.3}, f1 = {:.3}",
            m.accuracy * 100.0,
            m.precision,
            m.f1
        );
    }

    for (input, prediction) in inputs.iter().zip(driver.predict(&mut eval).unwrap()) {
        println!("Input: {:?} -> P(true) = {:.4}", input, prediction[1]);
    }
}
