//! End-to-end sessions, driven the way a host application would: text from form fields in, values,
//! status lines and exports out.

use chromatune::fields::{parse_xyy, parse_xyz};
use chromatune::prelude::*;
use chromatune::report::{read_history_csv, write_history_csv};

fn primaries(readings: [[&str; 3]; 3]) -> PrimarySet {
    PrimarySet::new(
        parse_xyy("Red", readings[0]).unwrap(),
        parse_xyy("Green", readings[1]).unwrap(),
        parse_xyy("Blue", readings[2]).unwrap(),
    )
}

#[test]
fn white_balance_to_d65() {
    let mut panel = PanelSimulator::new();
    let mut calibrator = GainCalibrator::new(Illuminant::D65.chromaticity());
    let outcome = calibrator.run(&mut panel);

    assert_eq!(outcome.reason, StopReason::StepLimit);
    assert_eq!(outcome.steps, 20);
    assert_eq!(panel.readings(), 20);

    let history = calibrator.history();
    assert_eq!(history[0].gains, GainTriple::max());
    assert!(history[1].distance < history[0].distance);
    for (i, step) in history.iter().enumerate() {
        assert_eq!(step.index, i);
    }

    let best = outcome.best.unwrap();
    assert!(best.distance < 0.01);
    assert!(history.iter().all(|step| best.distance <= step.distance));
    assert_eq!(history[best.iteration].gains, best.gains);

    let lines: Vec<String> = history.iter().map(|step| step.to_string()).collect();
    assert!(lines[0].starts_with("[01] R:192 G:192 B:192 | x:0.3556 y:0.3644 | Dist:0.0556"));
    assert!(lines[19].starts_with("[20] "));

    let mut csv = vec![];
    write_history_csv(&mut csv, history).unwrap();
    assert_eq!(read_history_csv(csv.as_slice()).unwrap().as_slice(), history);

    let series = calibrator.plot_series();
    assert_eq!(series.path.len(), 20);
    assert_eq!(series.target, Illuminant::D65.chromaticity());
}

#[test]
fn noisy_panel_with_probing_and_early_exit() {
    let mut panel = PanelSimulator::with_noise(0.0005, 2024);
    let config = ControllerConfig {
        convergence_threshold: Some(0.003),
        ..ControllerConfig::default()
    };
    let mut calibrator = GainCalibrator::with_config(Illuminant::D65.chromaticity(), config);
    let sensitivity = calibrator.probe_sensitivity(&mut panel).unwrap();
    assert!(sensitivity.is_usable());
    assert!(calibrator.history().is_empty());

    let outcome = calibrator.run(&mut panel);
    let best = outcome.best.unwrap();
    assert!(outcome.steps <= 20);
    if outcome.reason == StopReason::Converged {
        assert!(calibrator.history().last().unwrap().distance < 0.003);
    } else {
        assert_eq!(outcome.reason, StopReason::StepLimit);
    }
    assert!(calibrator
        .history()
        .iter()
        .all(|step| best.distance <= step.distance));
}

#[test]
fn sensor_correction_session() {
    let reference = primaries([
        ["0.6400", "0.3300", "21.26"],
        ["0.3000", "0.6000", "71.52"],
        ["0.1500", "0.0600", "7.22"],
    ]);
    let sensor = primaries([
        ["0.6350", "0.3350", "20.10"],
        ["0.3100", "0.5900", "73.00"],
        ["0.1520", "0.0650", "7.90"],
    ]);
    let matrix = compute_correction_matrix(&reference, &sensor).unwrap();
    for &primary in [Primary::Red, Primary::Green, Primary::Blue].iter() {
        let corrected = matrix.apply(sensor.get(primary).to_xyz());
        let expected = reference.get(primary).to_xyz();
        assert!((corrected.x - expected.x).abs() <= 1e-9);
        assert!((corrected.y - expected.y).abs() <= 1e-9);
        assert!((corrected.z - expected.z).abs() <= 1e-9);
    }
    assert_eq!(matrix.to_string().lines().count(), 3);

    let broken = primaries([
        ["0.6350", "0.3350", "20.10"],
        ["0.6350", "0.3350", "20.10"],
        ["0.1520", "0.0650", "7.90"],
    ]);
    match compute_correction_matrix(&reference, &broken) {
        Err(CalibrationError::SingularMatrix { .. }) => {}
        other => panic!("expected a singular matrix, got {:?}", other),
    }
}

#[test]
fn delta_e_session() {
    let first = parse_xyz("Color 1", ["41.24", "21.26", "1.93"]).unwrap();
    let second = parse_xyz("Color 2", ["41.24", "21.26", "1.93"]).unwrap();
    let same = delta_e_2000(first, second);
    assert_eq!(format_delta_e(same), "Delta E 2000: 0.0000");
    assert_eq!(DeltaECategory::from_delta_e(same), DeltaECategory::Imperceptible);

    let white = Illuminant::D65.white_point();
    let de = delta_e_2000(first, white);
    assert!(de > 10.0);
    assert!((de - delta_e_2000(white, first)).abs() <= 1e-9);
    assert_eq!(DeltaECategory::from_delta_e(de), DeltaECategory::Large);
}
