use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::config::UnitSystem;
use crate::units::QUARTS_PER_GALLON;

/// 입력 허용 범위. CLI와 GUI가 같은 범위로 검사한다.
pub const GRAIN_WEIGHT_RANGE: RangeInclusive<f64> = 0.1..=1000.0;
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = -50.0..=250.0;
pub const BOIL_TIME_RANGE: RangeInclusive<f64> = 0.0..=600.0;
/// 목표 체적, 트럽 손실, 시간당 증발량
pub const VOLUME_RANGE: RangeInclusive<f64> = 0.0..=1000.0;
/// 흡수율, 매시 농도
pub const GRAIN_RATIO_RANGE: RangeInclusive<f64> = 0.0..=10.0;

/// 매시 방식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum MashMethod {
    /// 스파징 없이 전량을 스트라이크 워터로 쓰는 방식(BIAB)
    #[default]
    NoSparge,
    /// 매시 농도만큼만 스트라이크로 넣고 나머지는 스파지 워터로 쓴다.
    Sparge,
}

/// 물량/스트라이크 온도 계산 입력. 단위는 `unit_system`을 따른다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterInput {
    /// 곡물 무게 [lb | kg]
    pub grain_weight: f64,
    /// 곡물 온도 [°F | °C]
    pub grain_temp: f64,
    /// 목표 매시 온도 [°F | °C]
    pub mash_temp: f64,
    /// 발효조로 들어갈 목표 체적 [gal | L]
    pub target_volume: f64,
    /// 케틀 트럽 손실 [gal | L]
    pub trub_loss: f64,
    /// 끓임 시간 [min]
    pub boil_time: f64,
    /// 시간당 증발량 [gal/hr | L/hr]
    pub boiloff_rate: f64,
    /// 곡물 흡수율 [qt/lb | L/kg]
    pub absorption_rate: f64,
    pub mash_method: MashMethod,
    /// 매시 농도 [qt/lb | L/kg]. Sparge 방식에서만 사용한다.
    pub mash_thickness: f64,
    pub unit_system: UnitSystem,
}

impl WaterInput {
    /// 단위 시스템별 입력 기본값.
    pub fn defaults_for(unit_system: UnitSystem) -> Self {
        match unit_system {
            UnitSystem::Us => Self {
                grain_weight: 10.0,
                grain_temp: 70.0,
                mash_temp: 152.0,
                target_volume: 5.5,
                trub_loss: 0.25,
                boil_time: 60.0,
                boiloff_rate: 1.0,
                absorption_rate: 0.5,
                mash_method: MashMethod::NoSparge,
                mash_thickness: 1.5,
                unit_system,
            },
            UnitSystem::Metric => Self {
                grain_weight: 4.5,
                grain_temp: 21.0,
                mash_temp: 67.0,
                target_volume: 21.0,
                trub_loss: 1.0,
                boil_time: 60.0,
                boiloff_rate: 3.8,
                absorption_rate: 1.04,
                mash_method: MashMethod::NoSparge,
                mash_thickness: 3.0,
                unit_system,
            },
        }
    }
}

/// 물량 계산 결과. 체적은 [gal | L], 온도는 입력과 같은 단위.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterResult {
    pub strike_volume: f64,
    pub sparge_volume: f64,
    pub strike_temp: f64,
    /// 스트라이크 워터 + 곡물 배제 체적. 매시 툰 용량 확인용.
    pub total_mash_volume: f64,
    pub pre_boil_volume: f64,
    pub total_water: f64,
    pub post_boil_volume: f64,
    pub total_boiloff: f64,
    pub total_absorption: f64,
    pub grain_displacement: f64,
}

/// 미터법 곡물 배제 체적 [L/kg]
const GRAIN_DISPLACEMENT_METRIC: f64 = 0.67;
/// US 곡물 배제 체적 [gal/lb]
const GRAIN_DISPLACEMENT_US: f64 = 0.08;
/// 인퓨전 열평형식 계수 (미터법, L/kg 기준)
const INFUSION_CONSTANT_METRIC: f64 = 0.41;
/// 인퓨전 열평형식 계수 (US, qt/lb 기준)
const INFUSION_CONSTANT_US: f64 = 0.2;

/// US 입력의 qt/lb 비율을 gal 체적으로 바꾼다.
///
/// 흡수율과 매시 농도는 qt/lb로 입력받지만 결과 체적은 gal이므로 4로 나눈다.
/// 기존 계산기와 결과를 맞추기 위해 이 산식을 그대로 유지한다.
fn grain_ratio_volume(grain_weight: f64, ratio: f64, unit_system: UnitSystem) -> f64 {
    match unit_system {
        UnitSystem::Metric => grain_weight * ratio,
        UnitSystem::Us => (grain_weight * ratio) / QUARTS_PER_GALLON,
    }
}

/// 곡물량/목표 체적/공정 손실로부터 필요한 물량과 스트라이크 온도를 계산한다.
///
/// 곡물 무게가 0 이하이면 비율 계산을 건너뛰고 스트라이크 온도는 매시 온도로 둔다.
pub fn compute_water(input: WaterInput) -> WaterResult {
    let metric = input.unit_system.is_metric();

    let post_boil_volume = input.target_volume + input.trub_loss;
    let total_boiloff = input.boiloff_rate * (input.boil_time / 60.0);
    let pre_boil_volume = post_boil_volume + total_boiloff;

    let total_absorption =
        grain_ratio_volume(input.grain_weight, input.absorption_rate, input.unit_system);
    let total_water = pre_boil_volume + total_absorption;

    let (strike_volume, sparge_volume) = match input.mash_method {
        MashMethod::Sparge => {
            let strike =
                grain_ratio_volume(input.grain_weight, input.mash_thickness, input.unit_system)
                    .min(total_water);
            (strike, total_water - strike)
        }
        MashMethod::NoSparge => (total_water, 0.0),
    };

    let grain_displacement = input.grain_weight
        * if metric {
            GRAIN_DISPLACEMENT_METRIC
        } else {
            GRAIN_DISPLACEMENT_US
        };
    let total_mash_volume = strike_volume + grain_displacement;

    let mut strike_temp = input.mash_temp;
    if input.grain_weight > 0.0 && strike_volume > 0.0 {
        let delta = input.mash_temp - input.grain_temp;
        strike_temp = if metric {
            let ratio = strike_volume / input.grain_weight;
            input.mash_temp + (INFUSION_CONSTANT_METRIC / ratio) * delta
        } else {
            // 계수 0.2는 qt/lb 기준이므로 gal을 qt로 되돌린다.
            let ratio = (strike_volume * QUARTS_PER_GALLON) / input.grain_weight;
            input.mash_temp + (INFUSION_CONSTANT_US / ratio) * delta
        };
    }

    tracing::debug!(
        total_water,
        strike_volume,
        sparge_volume,
        strike_temp,
        "water volumes computed"
    );

    WaterResult {
        strike_volume,
        sparge_volume,
        strike_temp,
        total_mash_volume,
        pre_boil_volume,
        total_water,
        post_boil_volume,
        total_boiloff,
        total_absorption,
        grain_displacement,
    }
}
