use barrel_calculator::correction::api_gravity::{API_CORRECTION_MAX, API_CORRECTION_MIN};
use barrel_calculator::correction::temperature::{VCF_MAX, VCF_MIN};
use barrel_calculator::{VolumeCorrectionCalculator, round_to_cents, validate_inputs};
use barrel_types::AllocationInput;
use proptest::prelude::*;

#[test]
fn two_partner_scenario_net_volumes() {
    let calculator = VolumeCorrectionCalculator::default();
    let a = AllocationInput::new("A", 1000.0, 2.0, 80.0, 30.0);
    let b = AllocationInput::new("B", 800.0, 3.0, 75.0, 28.0);

    let fa = calculator.correction_factors(&a, 32.0);
    let fb = calculator.correction_factors(&b, 32.0);

    // A: alpha = 0.000425, beta = 2.75e-7, dT = 20
    let vcf_a = 1.0 - 0.000425 * 20.0 - 0.000_000_275 * 400.0;
    assert!((fa.vcf - vcf_a).abs() < 1e-12);
    let api_a = 161.5 / 163.5;
    assert!((fa.api_correction - api_a).abs() < 1e-12);
    assert!((fa.net_volume - round_to_cents(1000.0 * 0.98 * vcf_a * api_a)).abs() <= 0.01);

    // B: alpha = 0.000415, beta = 2.45e-7, dT = 15
    let vcf_b = 1.0 - 0.000415 * 15.0 - 0.000_000_245 * 225.0;
    assert!((fb.vcf - vcf_b).abs() < 1e-12);
    assert!(fb.net_volume < 800.0 * 0.97);
    assert!(fb.net_volume > 700.0);
}

#[test]
fn documented_extremes_stay_clamped() {
    let calculator = VolumeCorrectionCalculator::default();
    for api in [10.0, 45.0] {
        for temp in [-50.0, 200.0] {
            for terminal_api in [10.0, 45.0] {
                let entry = AllocationInput::new("edge", 100.0, 0.0, temp, api);
                let factors = calculator.correction_factors(&entry, terminal_api);
                assert!((VCF_MIN..=VCF_MAX).contains(&factors.vcf));
                assert!((API_CORRECTION_MIN..=API_CORRECTION_MAX).contains(&factors.api_correction));
            }
        }
    }
}

#[test]
fn valid_entries_pass_validation_before_correction() {
    let entries = vec![
        AllocationInput::new("A", 1000.0, 2.0, 80.0, 30.0),
        AllocationInput::new("B", 800.0, 3.0, 75.0, 28.0),
    ];
    assert!(validate_inputs(&entries).is_empty());
}

proptest! {
    #[test]
    fn correction_factors_always_within_bounds(
        gross in 0.01f64..5_000_000.0,
        bsw in 0.0f64..99.99,
        temp in -50.0f64..=200.0,
        api in 10.0f64..=45.0,
        terminal_api in 10.0f64..=45.0,
    ) {
        let calculator = VolumeCorrectionCalculator::default();
        let entry = AllocationInput::new("P", gross, bsw, temp, api);
        let factors = calculator.correction_factors(&entry, terminal_api);

        prop_assert!(factors.vcf >= VCF_MIN && factors.vcf <= VCF_MAX);
        prop_assert!(factors.api_correction >= API_CORRECTION_MIN);
        prop_assert!(factors.api_correction <= API_CORRECTION_MAX);
        prop_assert!(factors.net_volume >= 0.0);
        prop_assert!(factors.net_volume <= gross * VCF_MAX * API_CORRECTION_MAX + 0.01);
    }
}
