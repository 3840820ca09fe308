use kiln_nn::{
    tabular_regressor, CompileConfig, Driver, Evaluation, MemoryStream, Mse, ScheduleCadence, Sgd,
    StepLr, TaskKind,
};

fn main() {
    env_logger::init();

    // y = 2x - 1 over a small grid; train on most points, validate on the rest.
    let xs: Vec<f64> = (0..40).map(|i| i as f64 / 10.0).collect();
    let (mut train_in, mut train_out) = (Vec::new(), Vec::new());
    let (mut val_in, mut val_out) = (Vec::new(), Vec::new());
    for (i, &x) in xs.iter().enumerate() {
        let y = 2.0 * x - 1.0;
        if i % 5 == 0 {
            val_in.push(vec![x]);
            val_out.push(vec![y]);
        } else {
            train_in.push(vec![x]);
            train_out.push(vec![y]);
        }
    }

    let mut train = MemoryStream::shuffled(train_in, train_out, 8).unwrap();
    let mut val = MemoryStream::new(val_in.clone(), val_out, val_in.len()).unwrap();

    let mut driver = Driver::new(tabular_regressor(1, &[], 1));
    driver
        .compile(
            CompileConfig::new(TaskKind::Regression, Mse, Sgd::new(0.1))
                .with_scheduler(StepLr { initial_lr: 0.1, step_size: 50, gamma: 0.8 })
                .with_cadence(ScheduleCadence::PerEpoch)
                .with_gradient_clip(10.0),
        )
        .unwrap();

    let history = driver.fit(200, &mut train, Some(&mut val)).unwrap();
    let last = history.last().unwrap();
    println!(
        "after {} epochs: train_loss = {:.6}, val_loss = {:.6}, R² = {:.4}",
        history.len(),
        last.train_loss,
        last.val_loss.unwrap(),
        last.train_metric
    );

    if let Evaluation::Regression { loss, mse } = driver.evaluate(&mut val).unwrap() {
        println!("validation: loss = {:.6}, mse = {:.6}", loss, mse);
    }

    history.save_json("line_fit_history.json").unwrap();
    std::fs::write("line_fit_loss.svg", history.loss_curve_svg()).unwrap();
    std::fs::write("line_fit_r2.svg", history.metric_curve_svg()).unwrap();
    println!("wrote line_fit_history.json, line_fit_loss.svg, line_fit_r2.svg");
}
