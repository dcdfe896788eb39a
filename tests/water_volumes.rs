use brew_water_toolbox::{
    config::UnitSystem,
    water::{compute_water, MashMethod, WaterInput},
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn us_batch() -> WaterInput {
    WaterInput::defaults_for(UnitSystem::Us)
}

#[test]
fn us_no_sparge_batch() {
    let res = compute_water(us_batch());
    assert!(approx(res.total_absorption, 1.25), "abs={}", res.total_absorption);
    assert!(approx(res.pre_boil_volume, 6.75));
    assert!(approx(res.total_water, 8.0));
    assert!(approx(res.strike_volume, 8.0));
    assert_eq!(res.sparge_volume, 0.0);
    assert!(approx(res.strike_temp, 157.125), "strike_temp={}", res.strike_temp);
    // 8 gal + 10 lb * 0.08 gal/lb
    assert!(approx(res.total_mash_volume, 8.8));
}

#[test]
fn us_sparge_splits_total_water() {
    let res = compute_water(WaterInput {
        mash_method: MashMethod::Sparge,
        ..us_batch()
    });
    assert!(approx(res.strike_volume, 3.75));
    assert!(approx(res.sparge_volume, 4.25));
    assert!(approx(res.strike_volume + res.sparge_volume, res.total_water));
    assert!(res.strike_temp > 162.9 && res.strike_temp < 163.0, "strike_temp={}", res.strike_temp);
}

#[test]
fn thick_mash_is_clamped_to_total_water() {
    let res = compute_water(WaterInput {
        mash_method: MashMethod::Sparge,
        mash_thickness: 10.0,
        ..us_batch()
    });
    assert!(approx(res.strike_volume, res.total_water));
    assert_eq!(res.sparge_volume, 0.0);
}

#[test]
fn total_water_grows_with_each_loss() {
    let base = compute_water(us_batch()).total_water;
    let bumps: [fn(&mut WaterInput); 6] = [
        |w| w.target_volume = 6.0,
        |w| w.trub_loss = 0.5,
        |w| w.boil_time = 90.0,
        |w| w.boiloff_rate = 1.5,
        |w| w.absorption_rate = 0.6,
        |w| w.grain_weight = 12.0,
    ];
    for bump in bumps {
        let mut input = us_batch();
        bump(&mut input);
        let total = compute_water(input.clone()).total_water;
        assert!(total > base, "{input:?} gave {total} <= {base}");
    }
}

#[test]
fn zero_grain_keeps_mash_temp() {
    let res = compute_water(WaterInput {
        grain_weight: 0.0,
        ..us_batch()
    });
    assert_eq!(res.strike_temp, 152.0);
    assert_eq!(res.total_absorption, 0.0);
    assert!(approx(res.total_water, 6.75));
}

#[test]
fn metric_batch_uses_litre_constants() {
    let res = compute_water(WaterInput::defaults_for(UnitSystem::Metric));
    assert!(approx(res.pre_boil_volume, 25.8));
    assert!(approx(res.total_absorption, 4.68));
    assert!(approx(res.total_water, 30.48));
    assert!(approx(res.grain_displacement, 4.5 * 0.67));
    assert!(
        (res.strike_temp - 69.784).abs() < 1e-3,
        "strike_temp={}",
        res.strike_temp
    );
}

#[test]
fn same_input_same_result() {
    assert_eq!(compute_water(us_batch()), compute_water(us_batch()));
}
