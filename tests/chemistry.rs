use brew_water_toolbox::{
    chemistry::{compute_chemistry, default_profile, ChemistryInput, IonConcentrations},
    config::UnitSystem,
};

fn metric_default(water_volume: f64) -> ChemistryInput {
    ChemistryInput {
        water_volume,
        beer_color_srm: 5.0,
        target_mash_ph: 5.4,
        grain_weight: 4.5,
        target: default_profile().ions,
        unit_system: UnitSystem::Metric,
    }
}

fn ions(
    calcium: f64,
    magnesium: f64,
    sodium: f64,
    sulfate: f64,
    chloride: f64,
) -> IonConcentrations {
    IonConcentrations {
        calcium,
        magnesium,
        sodium,
        sulfate,
        chloride,
    }
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

#[test]
fn metric_default_profile_twenty_litres() {
    let res = compute_chemistry(metric_default(20.0));
    assert!(close(res.epsom_g, 2.028, 1e-3), "epsom={}", res.epsom_g);
    assert!(close(res.salt_g, 0.509, 1e-3), "salt={}", res.salt_g);
    // 엡섬염/소금이 채운 황산/염화 이온만큼 석고/염화칼슘이 줄어든다.
    assert!(close(res.gypsum_g, 0.374, 1e-3), "gypsum={}", res.gypsum_g);
    assert!(close(res.cacl2_g, 1.434, 1e-3), "cacl2={}", res.cacl2_g);
    assert!(close(res.lime_g, 0.968, 1e-3), "lime={}", res.lime_g);
    let ph = res.estimated_mash_ph.expect("estimated pH");
    assert!(close(ph, 5.485, 1e-3), "ph={ph}");
    assert!(close(res.acid_ml, 3.378, 1e-2), "acid={}", res.acid_ml);
    assert!(close(res.acid_g, res.acid_ml * 1.21, 1e-9));
}

#[test]
fn empty_volume_gives_no_additions() {
    for vol in [0.0, -3.0] {
        let res = compute_chemistry(metric_default(vol));
        assert_eq!(res.gypsum_g + res.cacl2_g + res.epsom_g + res.salt_g + res.lime_g, 0.0);
        assert_eq!(res.acid_ml, 0.0);
        assert!(res.estimated_mash_ph.is_none());
    }
}

#[test]
fn additions_are_never_negative() {
    let targets = [
        IonConcentrations::default(),
        ions(150.0, 5.0, 0.0, 400.0, 0.0),
        ions(0.0, 40.0, 100.0, 10.0, 10.0),
    ];
    for target in targets {
        for srm in [1.0, 20.0, 40.0] {
            let res = compute_chemistry(ChemistryInput {
                target,
                beer_color_srm: srm,
                target_mash_ph: 5.6,
                ..metric_default(25.0)
            });
            for g in [res.gypsum_g, res.cacl2_g, res.epsom_g, res.salt_g, res.lime_g, res.acid_ml] {
                assert!(g >= 0.0, "{target:?} srm={srm} -> {res:?}");
            }
        }
    }
}

#[test]
fn calcium_covered_by_salts_needs_no_lime() {
    let res = compute_chemistry(ChemistryInput {
        target: ions(10.0, 0.0, 0.0, 100.0, 100.0),
        ..metric_default(20.0)
    });
    assert_eq!(res.lime_g, 0.0);
}

/// 황산/염화 이온이 0이면 칼슘 부족분이 목표 칼슘과 같다.
fn calcium_only(calcium: f64) -> ChemistryInput {
    ChemistryInput {
        target: ions(calcium, 0.0, 0.0, 0.0, 0.0),
        ..metric_default(20.0)
    }
}

#[test]
fn tiny_calcium_deficit_is_ignored() {
    for calcium in [0.01, 0.05, 0.1] {
        let res = compute_chemistry(calcium_only(calcium));
        assert_eq!(res.lime_g, 0.0, "calcium={calcium}");
    }
}

#[test]
fn calcium_deficit_above_noise_floor_gets_lime() {
    let res = compute_chemistry(calcium_only(0.2));
    // 0.2 mg/L * 20 L / 540
    assert!(close(res.lime_g, 0.2 * 20.0 / 540.0, 1e-12), "lime={}", res.lime_g);
    assert!(res.lime_g > 0.0);
}

#[test]
fn us_volume_is_converted_to_litres() {
    let us = compute_chemistry(ChemistryInput {
        water_volume: 20.0 / 3.78541,
        grain_weight: 4.5 / 0.453592,
        unit_system: UnitSystem::Us,
        ..metric_default(0.0)
    });
    let metric = compute_chemistry(metric_default(20.0));
    assert!(close(us.gypsum_g, metric.gypsum_g, 1e-9));
    assert!(close(us.acid_ml, metric.acid_ml, 1e-9));
}

#[test]
fn darker_beer_needs_less_acid() {
    let pale = compute_chemistry(metric_default(20.0));
    let dark = compute_chemistry(ChemistryInput {
        beer_color_srm: 30.0,
        ..metric_default(20.0)
    });
    assert!(dark.acid_ml < pale.acid_ml);
}
