//! 한 번의 계산 세션 동안 유지되는 최근 계산 결과.
//!
//! 염 계산은 직전 물량 계산의 총 물량을 입력으로 쓰므로 물량 계산이 먼저 있어야 한다.
//! 상태는 전역이 아니라 호출자(CLI 루프, GUI 앱)가 소유한다.

use serde::{Deserialize, Serialize};

use crate::chemistry::{compute_chemistry, ChemistryInput, ChemistryResult, IonConcentrations};
use crate::config::UnitSystem;
use crate::water::{compute_water, WaterInput, WaterResult};

/// 세션 순서 위반 오류.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// 물량 계산 전에 염 계산을 요청함
    #[error("Calculate Volumes first!")]
    WaterNotCalculated,
}

/// 염 계산 요청. 물량은 세션의 최근 물량 결과에서 가져온다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemistryRequest {
    pub beer_color_srm: f64,
    pub target_mash_ph: f64,
    pub grain_weight: f64,
    pub target: IonConcentrations,
    pub unit_system: UnitSystem,
}

impl ChemistryRequest {
    /// 화면 기본값(SRM 5, pH 5.4)으로 요청을 만든다.
    pub fn with_defaults(
        grain_weight: f64,
        target: IonConcentrations,
        unit_system: UnitSystem,
    ) -> Self {
        Self {
            beer_color_srm: 5.0,
            target_mash_ph: 5.4,
            grain_weight,
            target,
            unit_system,
        }
    }
}

/// 최근 물량/염 계산 결과를 담는 세션 컨텍스트. 새 계산이 오면 덮어쓴다.
#[derive(Debug, Clone, Default)]
pub struct BrewSession {
    last_water_result: Option<WaterResult>,
    last_chemistry_result: Option<ChemistryResult>,
}

impl BrewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 물량을 계산해 저장한다. 이전 염 계산 결과는 더 이상 맞지 않으므로 지운다.
    pub fn request_water(&mut self, input: WaterInput) -> &WaterResult {
        self.last_chemistry_result = None;
        self.last_water_result.insert(compute_water(input))
    }

    /// 최근 물량 결과의 총 물량으로 염 첨가량을 계산해 저장한다.
    pub fn request_chemistry(
        &mut self,
        request: ChemistryRequest,
    ) -> Result<&ChemistryResult, SessionError> {
        let Some(water) = self.last_water_result.as_ref() else {
            tracing::warn!("salt calculation requested before water volumes");
            return Err(SessionError::WaterNotCalculated);
        };
        let input = ChemistryInput {
            water_volume: water.total_water,
            beer_color_srm: request.beer_color_srm,
            target_mash_ph: request.target_mash_ph,
            grain_weight: request.grain_weight,
            target: request.target,
            unit_system: request.unit_system,
        };
        Ok(self.last_chemistry_result.insert(compute_chemistry(input)))
    }

    pub fn last_water(&self) -> Option<&WaterResult> {
        self.last_water_result.as_ref()
    }

    pub fn last_chemistry(&self) -> Option<&ChemistryResult> {
        self.last_chemistry_result.as_ref()
    }
}
