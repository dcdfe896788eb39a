use brew_water_toolbox::{
    chemistry::{compute_chemistry, default_profile, ChemistryInput},
    config::UnitSystem,
    session::{BrewSession, ChemistryRequest, SessionError},
    water::WaterInput,
};

fn request() -> ChemistryRequest {
    ChemistryRequest::with_defaults(10.0, default_profile().ions, UnitSystem::Us)
}

#[test]
fn salts_before_volumes_is_rejected() {
    let mut session = BrewSession::new();
    let err = session.request_chemistry(request()).unwrap_err();
    assert_eq!(err, SessionError::WaterNotCalculated);
    assert_eq!(err.to_string(), "Calculate Volumes first!");
    assert!(session.last_chemistry().is_none());
}

#[test]
fn salts_use_latest_total_water() {
    let mut session = BrewSession::new();
    session.request_water(WaterInput::defaults_for(UnitSystem::Us));
    let bigger = WaterInput {
        target_volume: 10.0,
        ..WaterInput::defaults_for(UnitSystem::Us)
    };
    let total = session.request_water(bigger).total_water;
    let got = session.request_chemistry(request()).unwrap().clone();

    let req = request();
    let expected = compute_chemistry(ChemistryInput {
        water_volume: total,
        beer_color_srm: req.beer_color_srm,
        target_mash_ph: req.target_mash_ph,
        grain_weight: req.grain_weight,
        target: req.target,
        unit_system: req.unit_system,
    });
    assert_eq!(got, expected);
}

#[test]
fn new_volumes_clear_old_salts() {
    let mut session = BrewSession::new();
    session.request_water(WaterInput::defaults_for(UnitSystem::Us));
    session.request_chemistry(request()).unwrap();
    assert!(session.last_chemistry().is_some());

    session.request_water(WaterInput::defaults_for(UnitSystem::Us));
    assert!(session.last_chemistry().is_none());
    assert!(session.last_water().is_some());
}
