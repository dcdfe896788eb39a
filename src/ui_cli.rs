use std::io::{self, Write};
use std::ops::RangeInclusive;

use crate::app::AppError;
use crate::chemistry::{
    ChemistryResult, IonConcentrations, MineralProfile, ProfileSet, ION_RANGE, MASH_PH_RANGE,
    SRM_RANGE,
};
use crate::config::{Config, UnitSystem};
use crate::i18n::{keys, Translator};
use crate::session::{BrewSession, ChemistryRequest};
use crate::water::{
    MashMethod, WaterInput, WaterResult, BOIL_TIME_RANGE, GRAIN_RATIO_RANGE, GRAIN_WEIGHT_RANGE,
    TEMPERATURE_RANGE, VOLUME_RANGE,
};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Water,
    Chemistry,
    Profiles,
    Settings,
    Exit,
}

/// 대화형 모드에서 메뉴를 오가는 동안 유지되는 입력값.
#[derive(Debug, Clone)]
pub struct CliForms {
    pub water: WaterInput,
    pub profile_name: String,
    pub chemistry: ChemistryRequest,
}

impl CliForms {
    pub fn new(unit_system: UnitSystem, profile: &MineralProfile) -> Self {
        let water = WaterInput::defaults_for(unit_system);
        let chemistry =
            ChemistryRequest::with_defaults(water.grain_weight, profile.ions, unit_system);
        Self {
            water,
            profile_name: profile.name.clone(),
            chemistry,
        }
    }

    /// 단위 시스템만 바꾼다. 이미 입력한 숫자는 환산하지 않는다.
    pub fn set_unit_system(&mut self, unit_system: UnitSystem) {
        self.water.unit_system = unit_system;
        self.chemistry.unit_system = unit_system;
    }
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("\n=== {} ===", tr.t(keys::APP_TITLE));
    for key in [
        keys::MAIN_MENU_WATER,
        keys::MAIN_MENU_CHEMISTRY,
        keys::MAIN_MENU_PROFILES,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(&tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Water),
            "2" => return Ok(MenuChoice::Chemistry),
            "3" => return Ok(MenuChoice::Profiles),
            "4" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 물량 계산 메뉴를 처리한다.
pub fn handle_water(
    tr: &Translator,
    forms: &mut CliForms,
    session: &mut BrewSession,
) -> Result<(), AppError> {
    let units = forms.water.unit_system.default_units();
    let (wt, temp, vol) = (
        units.mass.symbol(),
        units.temperature.symbol(),
        units.volume.symbol(),
    );
    let ratio = units.grain_ratio_label();
    println!("\n-- {} --", tr.t(keys::WATER_HEADING));
    println!("{}", tr.t(keys::PROMPT_KEEP_DEFAULT));

    let w = &mut forms.water;
    println!(
        "{}: 1) {}  2) {}",
        tr.t(keys::MASH_METHOD),
        tr.t(keys::MASH_METHOD_NO_SPARGE),
        tr.t(keys::MASH_METHOD_SPARGE)
    );
    let current = if w.mash_method == MashMethod::Sparge { "2" } else { "1" };
    let sel = read_line(&format!("[{current}]: "))?;
    match sel.trim() {
        "1" => w.mash_method = MashMethod::NoSparge,
        "2" => w.mash_method = MashMethod::Sparge,
        _ => {}
    }

    w.grain_weight = read_f64_in(
        tr,
        &labelled(tr, keys::GRAIN_WEIGHT, wt),
        w.grain_weight,
        GRAIN_WEIGHT_RANGE,
    )?;
    w.grain_temp = read_f64_in(
        tr,
        &labelled(tr, keys::GRAIN_TEMP, temp),
        w.grain_temp,
        TEMPERATURE_RANGE,
    )?;
    w.mash_temp = read_f64_in(
        tr,
        &labelled(tr, keys::MASH_TEMP, temp),
        w.mash_temp,
        TEMPERATURE_RANGE,
    )?;
    w.target_volume = read_f64_in(
        tr,
        &labelled(tr, keys::TARGET_VOLUME, vol),
        w.target_volume,
        VOLUME_RANGE,
    )?;
    w.trub_loss = read_f64_in(
        tr,
        &labelled(tr, keys::TRUB_LOSS, vol),
        w.trub_loss,
        VOLUME_RANGE,
    )?;
    w.boil_time = read_f64_in(
        tr,
        &labelled(tr, keys::BOIL_TIME, "min"),
        w.boil_time,
        BOIL_TIME_RANGE,
    )?;
    w.boiloff_rate = read_f64_in(
        tr,
        &labelled(tr, keys::BOILOFF_RATE, &units.boiloff_label()),
        w.boiloff_rate,
        VOLUME_RANGE,
    )?;
    w.absorption_rate = read_f64_in(
        tr,
        &labelled(tr, keys::ABSORPTION_RATE, &ratio),
        w.absorption_rate,
        GRAIN_RATIO_RANGE,
    )?;
    if w.mash_method == MashMethod::Sparge {
        w.mash_thickness = read_f64_in(
            tr,
            &labelled(tr, keys::MASH_THICKNESS, &ratio),
            w.mash_thickness,
            GRAIN_RATIO_RANGE,
        )?;
    }

    forms.chemistry.grain_weight = forms.water.grain_weight;
    let result = session.request_water(forms.water.clone());
    println!();
    print!("{}", format_water_result(tr, result, forms.water.unit_system));
    Ok(())
}

/// 염 첨가량 메뉴를 처리한다. 물량 계산 전이면 오류 메시지만 출력한다.
pub fn handle_chemistry(
    tr: &Translator,
    profiles: &ProfileSet,
    forms: &mut CliForms,
    session: &mut BrewSession,
) -> Result<(), AppError> {
    if session.last_water().is_none() {
        println!("{}: {}", tr.t(keys::ERROR_PREFIX), tr.t(keys::ERROR_WATER_FIRST));
        return Ok(());
    }
    println!("\n-- {} --", tr.t(keys::CHEMISTRY_HEADING));
    println!("{}", tr.t(keys::PROMPT_KEEP_DEFAULT));

    print!("{}", format_profile_list(tr, profiles));
    let current = profiles
        .names()
        .position(|n| n == forms.profile_name)
        .map(|i| i + 1)
        .unwrap_or(0);
    let sel = read_line(&format!("{} [{current}]: ", tr.t(keys::PROMPT_PROFILE_SELECT)))?;
    if let Some(p) = sel
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| profiles.iter().nth(i))
    {
        forms.profile_name = p.name.clone();
        forms.chemistry.target = p.ions;
    }

    let c = &mut forms.chemistry;
    let srm_label = tr.t(keys::BEER_SRM);
    c.beer_color_srm = read_f64_in(tr, &srm_label, c.beer_color_srm, SRM_RANGE)?;
    let ph_label = tr.t(keys::TARGET_PH);
    c.target_mash_ph = read_f64_in(tr, &ph_label, c.target_mash_ph, MASH_PH_RANGE)?;
    let t = &mut c.target;
    for (key, value) in [
        (keys::CALCIUM, &mut t.calcium),
        (keys::MAGNESIUM, &mut t.magnesium),
        (keys::SODIUM, &mut t.sodium),
        (keys::SULFATE, &mut t.sulfate),
        (keys::CHLORIDE, &mut t.chloride),
    ] {
        *value = read_f64_in(tr, &labelled(tr, key, "mg/L"), *value, ION_RANGE)?;
    }

    match session.request_chemistry(forms.chemistry.clone()) {
        Ok(result) => {
            println!();
            print!("{}", format_chemistry_result(tr, result));
        }
        Err(_) => println!("{}: {}", tr.t(keys::ERROR_PREFIX), tr.t(keys::ERROR_WATER_FIRST)),
    }
    Ok(())
}

/// 설정 메뉴를 처리한다. 단위 시스템이 바뀌면 true를 돌려준다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<bool, AppError> {
    println!("\n-- {} --", tr.t(keys::SETTINGS_HEADING));
    println!(
        "{}: {}",
        tr.t(keys::SETTINGS_CURRENT_UNIT_SYSTEM),
        unit_system_label(tr, cfg.unit_system)
    );
    let sel = read_line(&tr.t(keys::SETTINGS_TOGGLE_PROMPT))?;
    if !matches!(sel.trim(), "y" | "Y" | "yes") {
        return Ok(false);
    }
    cfg.unit_system = cfg.unit_system.toggled();
    println!(
        "{}: {}",
        tr.t(keys::SETTINGS_CURRENT_UNIT_SYSTEM),
        unit_system_label(tr, cfg.unit_system)
    );
    Ok(true)
}

pub fn unit_system_label(tr: &Translator, unit_system: UnitSystem) -> String {
    match unit_system {
        UnitSystem::Us => tr.t(keys::UNIT_SYSTEM_US),
        UnitSystem::Metric => tr.t(keys::UNIT_SYSTEM_METRIC),
    }
}

/// 물량 결과를 화면 출력용 문자열로 만든다. 체적은 소수 둘째 자리, 온도는 첫째 자리.
pub fn format_water_result(tr: &Translator, w: &WaterResult, unit_system: UnitSystem) -> String {
    let units = unit_system.default_units();
    let vol = units.volume.symbol();
    let temp = units.temperature.symbol();
    let mut out = format!("### {} ###\n", tr.t(keys::WATER_RESULTS_HEADING));
    out += &format!("{}: {:.2} {vol}\n", tr.t(keys::STRIKE_WATER), w.strike_volume);
    out += &format!("{}: {:.2} {vol}\n", tr.t(keys::SPARGE_WATER), w.sparge_volume);
    out += &format!("{}: {:.1} {temp}\n", tr.t(keys::STRIKE_TEMP), w.strike_temp);
    out += &format!("{}: {:.2} {vol}\n", tr.t(keys::PRE_BOIL_VOLUME), w.pre_boil_volume);
    out += &format!("{}: {:.2} {vol}\n", tr.t(keys::TOTAL_WATER), w.total_water);
    out += &format!("{}: {:.2} {vol}\n", tr.t(keys::TOTAL_MASH_VOLUME), w.total_mash_volume);
    out += &format!("{}\n", tr.t(keys::MASH_TUN_WARNING));
    out
}

/// 염 첨가량 결과를 화면 출력용 문자열로 만든다.
pub fn format_chemistry_result(tr: &Translator, s: &ChemistryResult) -> String {
    let mut out = format!("### {} ###\n", tr.t(keys::SALT_RESULTS_HEADING));
    for (key, grams) in [
        (keys::GYPSUM, s.gypsum_g),
        (keys::CACL2, s.cacl2_g),
        (keys::EPSOM, s.epsom_g),
        (keys::SALT, s.salt_g),
        (keys::LIME, s.lime_g),
    ] {
        out += &format!("{}: {grams:.2} g\n", tr.t(key));
    }
    out += &format!(
        "{}: {:.2} ml ({:.2} g)\n",
        tr.t(keys::LACTIC_ACID),
        s.acid_ml,
        s.acid_g
    );
    if let Some(ph) = s.estimated_mash_ph {
        out += &format!("{}: {ph:.2}\n", tr.t(keys::ESTIMATED_PH));
    }
    out
}

/// 프로파일 목록을 번호와 이온 농도 표로 만든다.
pub fn format_profile_list(tr: &Translator, profiles: &ProfileSet) -> String {
    let mut out = format!("{}\n", tr.t(keys::PROFILE_LIST_HEADING));
    for (i, p) in profiles.iter().enumerate() {
        out += &format!("{:>2}) {:<20} {}\n", i + 1, p.name, format_ions(&p.ions));
    }
    out
}

fn format_ions(ions: &IonConcentrations) -> String {
    ions.entries()
        .iter()
        .map(|(ion, v)| format!("{ion}={v:.0}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn labelled(tr: &Translator, key: &str, unit: &str) -> String {
    format!("{} ({unit})", tr.t(key))
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(AppError::Io(io::ErrorKind::UnexpectedEof.into()));
    }
    Ok(buf)
}

/// 입력 한 줄을 숫자로 해석한다.
///
/// 빈 입력이면 현재 값을 유지한다. 숫자가 아니거나(NaN 포함) 범위를 벗어나면 None.
fn parse_in_range(input: &str, current: f64, range: &RangeInclusive<f64>) -> Option<f64> {
    let s = input.trim();
    if s.is_empty() {
        return Some(current);
    }
    s.parse::<f64>().ok().filter(|v| range.contains(v))
}

/// 범위 안의 숫자를 입력받는다. 잘못된 입력이면 다시 묻는다.
fn read_f64_in(
    tr: &Translator,
    label: &str,
    current: f64,
    range: RangeInclusive<f64>,
) -> Result<f64, AppError> {
    loop {
        let s = read_line(&format!("{label} [{current}]: "))?;
        if let Some(v) = parse_in_range(&s, current, &range) {
            return Ok(v);
        }
        let vars = [
            ("min", range.start().to_string()),
            ("max", range.end().to_string()),
        ];
        println!("{}", tr.t_with(keys::ERROR_OUT_OF_RANGE, &vars));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::default_profile;
    use crate::water::compute_water;

    #[test]
    fn water_result_uses_display_precision() {
        let tr = Translator::new("en");
        let w = compute_water(WaterInput::defaults_for(UnitSystem::Us));
        let text = format_water_result(&tr, &w, UnitSystem::Us);
        assert!(text.contains("Strike Water: 8.00 gal"), "{text}");
        assert!(text.contains("Sparge Water: 0.00 gal"), "{text}");
        assert!(text.contains("Strike Temp: 157.1 °F"), "{text}");
        assert!(text.contains("Pre-Boil Volume: 6.75 gal"), "{text}");
    }

    #[test]
    fn chemistry_result_lists_acid_in_ml_and_grams() {
        let tr = Translator::new("en");
        let s = ChemistryResult {
            acid_ml: 2.0,
            acid_g: 2.42,
            ..ChemistryResult::default()
        };
        let text = format_chemistry_result(&tr, &s);
        assert!(text.contains("Lactic (88%): 2.00 ml (2.42 g)"), "{text}");
        assert!(text.contains("Gypsum: 0.00 g"), "{text}");
        assert!(!text.contains("Estimated"), "{text}");
    }

    #[test]
    fn profile_list_is_numbered_from_one() {
        let tr = Translator::new("en");
        let text = format_profile_list(&tr, &ProfileSet::fallback());
        assert!(text.contains(" 1) Default"), "{text}");
        assert!(text.contains("SO4=50"), "{text}");
    }

    #[test]
    fn blank_input_keeps_current_value() {
        assert_eq!(parse_in_range("  \n", 10.0, &GRAIN_WEIGHT_RANGE), Some(10.0));
        assert_eq!(parse_in_range("12.5\n", 10.0, &GRAIN_WEIGHT_RANGE), Some(12.5));
    }

    #[test]
    fn negative_and_nan_entries_are_rejected() {
        assert_eq!(parse_in_range("-20", 10.0, &GRAIN_WEIGHT_RANGE), None);
        assert_eq!(parse_in_range("0", 10.0, &GRAIN_WEIGHT_RANGE), None);
        assert_eq!(parse_in_range("nan", 10.0, &GRAIN_WEIGHT_RANGE), None);
        assert_eq!(parse_in_range("inf", 5.5, &VOLUME_RANGE), None);
        assert_eq!(parse_in_range("-0.5", 0.25, &VOLUME_RANGE), None);
        assert_eq!(parse_in_range("-100", 10.0, &ION_RANGE), None);
        assert_eq!(parse_in_range("abc", 10.0, &ION_RANGE), None);
    }

    #[test]
    fn range_edges_are_accepted() {
        assert_eq!(parse_in_range("0.1", 10.0, &GRAIN_WEIGHT_RANGE), Some(0.1));
        assert_eq!(parse_in_range("0", 0.25, &VOLUME_RANGE), Some(0.0));
        assert_eq!(parse_in_range("6.5", 5.4, &MASH_PH_RANGE), Some(6.5));
        assert_eq!(parse_in_range("0.9", 5.0, &SRM_RANGE), None);
    }

    #[test]
    fn out_of_range_message_names_bounds() {
        let tr = Translator::new("en");
        let vars = [("min", "0.1".to_string()), ("max", "1000".to_string())];
        assert_eq!(
            tr.t_with(keys::ERROR_OUT_OF_RANGE, &vars),
            "Enter a value between 0.1 and 1000."
        );
    }

    #[test]
    fn switching_units_keeps_entered_numbers() {
        let mut forms = CliForms::new(UnitSystem::Us, &default_profile());
        forms.set_unit_system(UnitSystem::Metric);
        assert_eq!(forms.water.unit_system, UnitSystem::Metric);
        assert_eq!(forms.water.grain_weight, 10.0);
        assert_eq!(forms.chemistry.unit_system, UnitSystem::Metric);
    }
}
