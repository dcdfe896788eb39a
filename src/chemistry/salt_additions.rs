use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::chemistry::profiles::IonConcentrations;
use crate::config::UnitSystem;
use crate::units::{convert_mass, convert_volume, MassUnit, VolumeUnit};

/// 맥주 색도 입력 범위 [SRM]
pub const SRM_RANGE: RangeInclusive<f64> = 1.0..=40.0;
/// 목표 매시 pH 입력 범위
pub const MASH_PH_RANGE: RangeInclusive<f64> = 4.5..=6.5;
/// 목표 이온 농도 입력 범위 [mg/L]
pub const ION_RANGE: RangeInclusive<f64> = 0.0..=1000.0;

/// 염 첨가량 계산 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemistryInput {
    /// 처리할 총 물량 [gal | L]. 보통 `WaterResult::total_water`.
    pub water_volume: f64,
    /// 맥주 색도 [SRM]
    pub beer_color_srm: f64,
    /// 목표 매시 pH
    pub target_mash_ph: f64,
    /// 곡물 무게 [lb | kg]
    pub grain_weight: f64,
    /// 목표 이온 농도 [mg/L]
    pub target: IonConcentrations,
    pub unit_system: UnitSystem,
}

/// 염/산 첨가량 결과. 모든 값은 0 이상이다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChemistryResult {
    /// 석고(CaSO4·2H2O) [g]
    pub gypsum_g: f64,
    /// 염화칼슘(CaCl2) [g]
    pub cacl2_g: f64,
    /// 엡솜염(MgSO4·7H2O) [g]
    pub epsom_g: f64,
    /// 식염(NaCl) [g]
    pub salt_g: f64,
    /// 소석회(Ca(OH)2) [g]
    pub lime_g: f64,
    /// 젖산(88%) [ml]
    pub acid_ml: f64,
    /// 젖산(88%) [g]
    pub acid_g: f64,
    /// 산 첨가 전 추정 매시 pH. 물량이 0 이하이면 계산하지 않는다.
    pub estimated_mash_ph: Option<f64>,
}

// 목표 농도(mg/L)와 물량(L)으로 첨가량(g)을 구하는 염별 환산 계수
const EPSOM_FACTOR: f64 = 98.6;
const SALT_FACTOR: f64 = 393.0;
const GYPSUM_FACTOR: f64 = 558.0;
const CACL2_FACTOR: f64 = 482.0;
const LIME_FACTOR: f64 = 540.0;

// 염 1 g 중 함께 들어가는 이온의 질량 분율
const EPSOM_SULFATE_FRACTION: f64 = 0.39;
const SALT_CHLORIDE_FRACTION: f64 = 0.607;
const GYPSUM_CALCIUM_FRACTION: f64 = 0.233;
const CACL2_CALCIUM_FRACTION: f64 = 0.272;

/// 이 값 이하의 칼슘 부족분은 무시하고 소석회를 넣지 않는다.
const LIME_THRESHOLD_MG_L: f64 = 0.1;

/// RO수 기준 매시 pH 절편과 SRM당 기울기
const BASE_MASH_PH: f64 = 5.70;
const PH_PER_SRM: f64 = 0.018;
/// 당량 환산 [mg/mEq]
const CALCIUM_MG_PER_MEQ: f64 = 20.0;
const MAGNESIUM_MG_PER_MEQ: f64 = 12.15;
/// mEq당 pH 강하
const CALCIUM_PH_DROP_PER_MEQ: f64 = 0.04;
const MAGNESIUM_PH_DROP_PER_MEQ: f64 = 0.03;

/// 곡물 kg·pH 1 당 젖산 [ml]
const ACID_ML_PER_KG_PH: f64 = 3.0;
/// 소석회 1 g을 상쇄하는 젖산 [ml]
const ACID_ML_PER_LIME_G: f64 = 2.3;
/// 88% 젖산 밀도 [g/ml]
const LACTIC_ACID_DENSITY: f64 = 1.21;

/// 목표 농도 `target_mg_l`을 `vol_l` 리터에 맞추는 염 첨가량 [g].
fn salt_grams(target_mg_l: f64, vol_l: f64, factor: f64) -> f64 {
    (target_mg_l * vol_l) / factor
}

/// 염 `grams` g이 `vol_l` 리터에 더하는 이온 농도 [mg/L].
fn added_ion_mg_l(grams: f64, ion_fraction: f64, vol_l: f64) -> f64 {
    (grams * 1000.0 * ion_fraction) / vol_l
}

/// 목표 수질 프로파일에 맞춘 염 첨가량과 젖산량을 계산한다.
///
/// 마그네슘/나트륨 염을 먼저 정하고, 그 염이 더한 황산/염화 이온을 뺀 나머지로
/// 석고와 염화칼슘을 정한다. 칼슘이 여전히 부족하면 소석회로 채운다.
/// 모든 상수는 L, kg 기준이므로 US 입력은 먼저 환산한다.
pub fn compute_chemistry(input: ChemistryInput) -> ChemistryResult {
    if input.water_volume <= 0.0 {
        return ChemistryResult::default();
    }

    let (vol_l, grain_kg) = match input.unit_system {
        UnitSystem::Metric => (input.water_volume, input.grain_weight),
        UnitSystem::Us => (
            convert_volume(input.water_volume, VolumeUnit::Gallon, VolumeUnit::Liter),
            convert_mass(input.grain_weight, MassUnit::Pound, MassUnit::Kilogram),
        ),
    };
    let target = &input.target;

    let epsom_g = salt_grams(target.magnesium, vol_l, EPSOM_FACTOR);
    let added_so4_epsom = added_ion_mg_l(epsom_g, EPSOM_SULFATE_FRACTION, vol_l);
    let salt_g = salt_grams(target.sodium, vol_l, SALT_FACTOR);
    let added_cl_salt = added_ion_mg_l(salt_g, SALT_CHLORIDE_FRACTION, vol_l);

    let remaining_so4 = (target.sulfate - added_so4_epsom).max(0.0);
    let gypsum_g = salt_grams(remaining_so4, vol_l, GYPSUM_FACTOR);
    let added_ca_gypsum = added_ion_mg_l(gypsum_g, GYPSUM_CALCIUM_FRACTION, vol_l);

    let remaining_cl = (target.chloride - added_cl_salt).max(0.0);
    let cacl2_g = salt_grams(remaining_cl, vol_l, CACL2_FACTOR);
    let added_ca_cacl2 = added_ion_mg_l(cacl2_g, CACL2_CALCIUM_FRACTION, vol_l);

    let total_ca_salts = added_ca_gypsum + added_ca_cacl2;
    let remaining_ca = (target.calcium - total_ca_salts).max(0.0);
    let lime_g = if remaining_ca > LIME_THRESHOLD_MG_L {
        salt_grams(remaining_ca, vol_l, LIME_FACTOR)
    } else {
        0.0
    };

    // 어두운 맥아일수록 산성이 강해 기준 pH가 색도에 비례해 내려간다.
    let base_mash_ph = BASE_MASH_PH - PH_PER_SRM * input.beer_color_srm;
    let meq_ca = (total_ca_salts + remaining_ca) / CALCIUM_MG_PER_MEQ;
    let meq_mg = target.magnesium / MAGNESIUM_MG_PER_MEQ;
    let salt_ph_drop = meq_ca * CALCIUM_PH_DROP_PER_MEQ + meq_mg * MAGNESIUM_PH_DROP_PER_MEQ;
    let estimated_mash_ph = base_mash_ph - salt_ph_drop;

    let ml_acid_base = if grain_kg > 0.0 {
        (estimated_mash_ph - input.target_mash_ph) * grain_kg * ACID_ML_PER_KG_PH
    } else {
        0.0
    };
    let acid_ml = (ml_acid_base + lime_g * ACID_ML_PER_LIME_G).max(0.0);

    tracing::debug!(
        vol_l,
        gypsum_g,
        cacl2_g,
        epsom_g,
        salt_g,
        lime_g,
        acid_ml,
        estimated_mash_ph,
        "salt additions computed"
    );

    ChemistryResult {
        gypsum_g,
        cacl2_g,
        epsom_g,
        salt_g,
        lime_g,
        acid_ml,
        acid_g: acid_ml * LACTIC_ACID_DENSITY,
        estimated_mash_ph: Some(estimated_mash_ph),
    }
}
