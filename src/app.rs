use serde::Serialize;
use std::path::PathBuf;

use crate::chemistry::{ChemistryResult, IonConcentrations, ProfileSet};
use crate::config::{Config, ConfigError};
use crate::i18n::{keys, Translator};
use crate::session::{BrewSession, ChemistryRequest, SessionError};
use crate::ui_cli::{self, CliForms, MenuChoice};
use crate::water::{WaterInput, WaterResult};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 파일/콘솔 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 계산 순서 오류
    #[error("{0}")]
    Session(#[from] SessionError),
    /// JSON 출력 오류
    #[error("JSON 출력 오류: {0}")]
    Json(#[from] serde_json::Error),
    /// 목록에 없는 프로파일 이름
    #[error("알 수 없는 프로파일: {0}")]
    UnknownProfile(String),
}

/// 일회성 명령의 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// CLI 실행에 필요한 설정/번역/프로파일 묶음.
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub tr: Translator,
    pub profiles: ProfileSet,
}

/// 개별 이온 농도 덮어쓰기 값.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IonOverrides {
    pub calcium: Option<f64>,
    pub magnesium: Option<f64>,
    pub sodium: Option<f64>,
    pub sulfate: Option<f64>,
    pub chloride: Option<f64>,
}

/// 물량 + 염 계산 결과를 JSON으로 낼 때의 형태.
#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    profile: &'a str,
    water: &'a WaterResult,
    chemistry: &'a ChemistryResult,
}

/// 프로파일 이름(없으면 첫 번째)을 찾아 목표 농도를 정하고 덮어쓰기 값을 반영한다.
pub fn resolve_targets(
    profiles: &ProfileSet,
    name: Option<&str>,
    overrides: IonOverrides,
) -> Result<(String, IonConcentrations), AppError> {
    let profile = match name {
        Some(n) => profiles
            .find(n)
            .ok_or_else(|| AppError::UnknownProfile(n.to_string()))?,
        None => profiles.first(),
    };
    let base = profile.ions;
    let ions = IonConcentrations {
        calcium: overrides.calcium.unwrap_or(base.calcium),
        magnesium: overrides.magnesium.unwrap_or(base.magnesium),
        sodium: overrides.sodium.unwrap_or(base.sodium),
        sulfate: overrides.sulfate.unwrap_or(base.sulfate),
        chloride: overrides.chloride.unwrap_or(base.chloride),
    };
    Ok((profile.name.clone(), ions))
}

/// 물량만 계산해 출력한다.
pub fn run_water(
    ctx: &AppContext,
    input: WaterInput,
    format: OutputFormat,
) -> Result<(), AppError> {
    let unit_system = input.unit_system;
    let mut session = BrewSession::new();
    let result = session.request_water(input);
    match format {
        OutputFormat::Table => {
            print!("{}", ui_cli::format_water_result(&ctx.tr, result, unit_system))
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }
    Ok(())
}

/// 물량을 계산한 뒤 그 총 물량으로 염 첨가량을 계산해 출력한다.
pub fn run_plan(
    ctx: &AppContext,
    water: WaterInput,
    chemistry: ChemistryRequest,
    profile_name: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let unit_system = water.unit_system;
    let mut session = BrewSession::new();
    let water = session.request_water(water).clone();
    let chemistry = session.request_chemistry(chemistry)?.clone();
    match format {
        OutputFormat::Table => {
            println!("{}: {profile_name}", ctx.tr.t(keys::PROFILE));
            print!("{}", ui_cli::format_water_result(&ctx.tr, &water, unit_system));
            println!();
            print!("{}", ui_cli::format_chemistry_result(&ctx.tr, &chemistry));
        }
        OutputFormat::Json => {
            let report = PlanReport {
                profile: profile_name,
                water: &water,
                chemistry: &chemistry,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

/// 로드된 프로파일 목록을 출력한다.
pub fn list_profiles(ctx: &AppContext) {
    print!("{}", ui_cli::format_profile_list(&ctx.tr, &ctx.profiles));
}

/// 대화형 CLI의 메인 루프를 실행한다.
pub fn run(ctx: &mut AppContext) -> Result<(), AppError> {
    let tr = ctx.tr.clone();
    println!("{}", tr.t(keys::ASSUMPTIONS_HEADING));
    for key in [
        keys::ASSUMPTION_RO_WATER,
        keys::ASSUMPTION_SPARGE,
        keys::ASSUMPTION_RISK,
    ] {
        println!("  {}", tr.t(key));
    }

    let mut session = BrewSession::new();
    let mut forms = CliForms::new(ctx.config.unit_system, ctx.profiles.first());
    loop {
        match ui_cli::main_menu(&tr)? {
            MenuChoice::Water => ui_cli::handle_water(&tr, &mut forms, &mut session)?,
            MenuChoice::Chemistry => {
                ui_cli::handle_chemistry(&tr, &ctx.profiles, &mut forms, &mut session)?
            }
            MenuChoice::Profiles => list_profiles(ctx),
            MenuChoice::Settings => {
                if ui_cli::handle_settings(&tr, &mut ctx.config)? {
                    forms.set_unit_system(ctx.config.unit_system);
                    ctx.config.save_to(&ctx.config_path)?;
                    println!("{}", tr.t(keys::SETTINGS_SAVED));
                }
            }
            MenuChoice::Exit => {
                ctx.config.save_to(&ctx.config_path)?;
                println!("{}", tr.t(keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::profiles::parse_profiles;

    fn two_profiles() -> ProfileSet {
        parse_profiles(
            r#"[
                {"name": "Balanced", "ca": 50, "mg": 10, "na": 10, "so4": 50, "cl": 50},
                {"name": "Hoppy", "ca": 110, "mg": 18, "na": 17, "so4": 350, "cl": 50}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn first_profile_is_used_without_name() {
        let (name, ions) = resolve_targets(&two_profiles(), None, IonOverrides::default()).unwrap();
        assert_eq!(name, "Balanced");
        assert_eq!(ions.sulfate, 50.0);
    }

    #[test]
    fn overrides_replace_single_ions() {
        let overrides = IonOverrides {
            chloride: Some(120.0),
            ..IonOverrides::default()
        };
        let (_, ions) = resolve_targets(&two_profiles(), Some("Hoppy"), overrides).unwrap();
        assert_eq!(ions.sulfate, 350.0);
        assert_eq!(ions.chloride, 120.0);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let err = resolve_targets(&two_profiles(), Some("Burton"), IonOverrides::default())
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownProfile(n) if n == "Burton"));
    }
}
