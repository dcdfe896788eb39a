use clap::{Args, Parser, Subcommand};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::process::ExitCode;

use brew_water_toolbox::app::{self, AppContext, AppError, IonOverrides, OutputFormat};
use brew_water_toolbox::chemistry::{load_profiles, ION_RANGE, MASH_PH_RANGE, SRM_RANGE};
use brew_water_toolbox::config::{self, UnitSystem};
use brew_water_toolbox::i18n::{self, keys, Translator};
use brew_water_toolbox::logging;
use brew_water_toolbox::session::ChemistryRequest;
use brew_water_toolbox::water::{
    MashMethod, WaterInput, BOIL_TIME_RANGE, GRAIN_RATIO_RANGE, GRAIN_WEIGHT_RANGE,
    TEMPERATURE_RANGE, VOLUME_RANGE,
};

#[derive(Parser)]
#[command(
    name = "brew_water_toolbox_cli",
    version,
    about = "Brew-day water volume, strike temperature and salt addition calculator"
)]
struct Cli {
    /// 설정 파일 경로 (기본: config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 언어 코드: auto, ko, en-us
    #[arg(short = 'L', long, global = true)]
    lang: Option<String>,

    /// 단위 시스템 (설정값을 덮어쓴다)
    #[arg(long, global = true, value_enum)]
    units: Option<UnitSystem>,

    /// 목표 수질 프로파일 JSON 경로
    #[arg(long, global = true, value_name = "FILE")]
    profiles: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 메뉴 방식 대화형 모드 (기본)
    Interactive,
    /// 물량과 스트라이크 온도만 계산
    Water {
        #[command(flatten)]
        water: WaterArgs,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// 물량을 계산한 뒤 염/젖산 첨가량까지 계산
    Plan {
        #[command(flatten)]
        water: WaterArgs,

        #[command(flatten)]
        chemistry: ChemistryArgs,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// 로드된 목표 수질 프로파일 목록
    Profiles,
}

/// 물량 계산 입력. 생략한 값은 단위 시스템별 기본값을 쓴다.
#[derive(Args)]
struct WaterArgs {
    /// 곡물 무게 [lb | kg]
    #[arg(long, value_parser = parse_grain_weight)]
    grain_weight: Option<f64>,
    /// 곡물 온도 [°F | °C]
    #[arg(long, allow_negative_numbers = true, value_parser = parse_temperature)]
    grain_temp: Option<f64>,
    /// 목표 매시 온도 [°F | °C]
    #[arg(long, allow_negative_numbers = true, value_parser = parse_temperature)]
    mash_temp: Option<f64>,
    /// 발효조 투입량 [gal | L]
    #[arg(long, value_parser = parse_volume)]
    target_volume: Option<f64>,
    /// 트럽 손실 [gal | L]
    #[arg(long, value_parser = parse_volume)]
    trub_loss: Option<f64>,
    /// 끓임 시간 [min]
    #[arg(long, value_parser = parse_boil_time)]
    boil_time: Option<f64>,
    /// 증발량 [gal/hr | L/hr]
    #[arg(long, value_parser = parse_volume)]
    boiloff_rate: Option<f64>,
    /// 곡물 흡수율 [qt/lb | L/kg]
    #[arg(long, value_parser = parse_grain_ratio)]
    absorption_rate: Option<f64>,
    /// 매시 방식
    #[arg(long, value_enum)]
    method: Option<MashMethod>,
    /// 매시 농도 [qt/lb | L/kg] (sparge 전용)
    #[arg(long, value_parser = parse_grain_ratio)]
    mash_thickness: Option<f64>,
}

impl WaterArgs {
    fn into_input(self, unit_system: UnitSystem) -> WaterInput {
        let d = WaterInput::defaults_for(unit_system);
        WaterInput {
            grain_weight: self.grain_weight.unwrap_or(d.grain_weight),
            grain_temp: self.grain_temp.unwrap_or(d.grain_temp),
            mash_temp: self.mash_temp.unwrap_or(d.mash_temp),
            target_volume: self.target_volume.unwrap_or(d.target_volume),
            trub_loss: self.trub_loss.unwrap_or(d.trub_loss),
            boil_time: self.boil_time.unwrap_or(d.boil_time),
            boiloff_rate: self.boiloff_rate.unwrap_or(d.boiloff_rate),
            absorption_rate: self.absorption_rate.unwrap_or(d.absorption_rate),
            mash_method: self.method.unwrap_or(d.mash_method),
            mash_thickness: self.mash_thickness.unwrap_or(d.mash_thickness),
            unit_system,
        }
    }
}

/// 염 계산 입력. 프로파일 값은 개별 이온 옵션으로 덮어쓸 수 있다.
#[derive(Args)]
struct ChemistryArgs {
    /// 목표 프로파일 이름 (기본: 목록의 첫 번째)
    #[arg(long)]
    profile: Option<String>,
    /// 맥주 색도 [SRM, 1-40]
    #[arg(long, default_value_t = 5.0, value_parser = parse_srm)]
    srm: f64,
    /// 목표 매시 pH [4.5-6.5]
    #[arg(long, default_value_t = 5.4, value_parser = parse_ph)]
    ph: f64,
    /// 칼슘 [mg/L]
    #[arg(long, value_parser = parse_ion)]
    calcium: Option<f64>,
    /// 마그네슘 [mg/L]
    #[arg(long, value_parser = parse_ion)]
    magnesium: Option<f64>,
    /// 나트륨 [mg/L]
    #[arg(long, value_parser = parse_ion)]
    sodium: Option<f64>,
    /// 황산염 [mg/L]
    #[arg(long, value_parser = parse_ion)]
    sulfate: Option<f64>,
    /// 염화물 [mg/L]
    #[arg(long, value_parser = parse_ion)]
    chloride: Option<f64>,
}

impl ChemistryArgs {
    fn overrides(&self) -> IonOverrides {
        IonOverrides {
            calcium: self.calcium,
            magnesium: self.magnesium,
            sodium: self.sodium,
            sulfate: self.sulfate,
            chloride: self.chloride,
        }
    }
}

fn parse_in_range(s: &str, range: RangeInclusive<f64>) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if range.contains(&v) {
        Ok(v)
    } else {
        Err(format!("{v} is outside {}..={}", range.start(), range.end()))
    }
}

fn parse_grain_weight(s: &str) -> Result<f64, String> {
    parse_in_range(s, GRAIN_WEIGHT_RANGE)
}

fn parse_temperature(s: &str) -> Result<f64, String> {
    parse_in_range(s, TEMPERATURE_RANGE)
}

fn parse_boil_time(s: &str) -> Result<f64, String> {
    parse_in_range(s, BOIL_TIME_RANGE)
}

fn parse_volume(s: &str) -> Result<f64, String> {
    parse_in_range(s, VOLUME_RANGE)
}

fn parse_grain_ratio(s: &str) -> Result<f64, String> {
    parse_in_range(s, GRAIN_RATIO_RANGE)
}

fn parse_ion(s: &str) -> Result<f64, String> {
    parse_in_range(s, ION_RANGE)
}

fn parse_srm(s: &str) -> Result<f64, String> {
    parse_in_range(s, SRM_RANGE)
}

fn parse_ph(s: &str) -> Result<f64, String> {
    parse_in_range(s, MASH_PH_RANGE)
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let lang_flag = cli.lang.clone().unwrap_or_else(|| "auto".to_string());
    if let Err(err) = try_run(cli) {
        let tr = Translator::new(&i18n::resolve_language(&lang_flag, None));
        eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let (mut cfg, origin, config_path) = match cli.config {
        Some(path) => {
            let (cfg, origin) = config::load_or_default_from(&path)?;
            (cfg, origin, path)
        }
        None => {
            let (cfg, origin) = config::load_or_default()?;
            (cfg, origin, PathBuf::from(config::CONFIG_FILE))
        }
    };
    logging::init(&cfg.log_filter);
    origin.log(&config_path);

    if let Some(units) = cli.units {
        cfg.unit_system = units;
    }
    if let Some(lang) = &cli.lang {
        cfg.language = lang.clone();
    }
    let lang_code = i18n::resolve_language(&cfg.language, None);
    let tr = Translator::new_with_pack(&lang_code, cfg.language_pack_dir.as_deref());
    let profiles_path = cli.profiles.unwrap_or_else(|| cfg.profiles_path.clone());
    let profiles = load_profiles(&profiles_path);
    tracing::debug!(lang = %lang_code, unit_system = ?cfg.unit_system, "cli started");

    let unit_system = cfg.unit_system;
    let mut ctx = AppContext {
        config: cfg,
        config_path,
        tr,
        profiles,
    };

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => app::run(&mut ctx),
        Commands::Water { water, output } => {
            app::run_water(&ctx, water.into_input(unit_system), output)
        }
        Commands::Plan {
            water,
            chemistry,
            output,
        } => {
            let (profile_name, target) = app::resolve_targets(
                &ctx.profiles,
                chemistry.profile.as_deref(),
                chemistry.overrides(),
            )?;
            let water = water.into_input(unit_system);
            let request = ChemistryRequest {
                beer_color_srm: chemistry.srm,
                target_mash_ph: chemistry.ph,
                grain_weight: water.grain_weight,
                target,
                unit_system,
            };
            app::run_plan(&ctx, water, request, &profile_name, output)
        }
        Commands::Profiles => {
            app::list_profiles(&ctx);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flag_values_use_form_limits() {
        assert!(parse_grain_weight("-20").is_err());
        assert!(parse_grain_weight("nan").is_err());
        assert_eq!(parse_grain_weight("0.1"), Ok(0.1));
        assert_eq!(parse_temperature("-5"), Ok(-5.0));
        assert!(parse_volume("-0.25").is_err());
        assert!(parse_ion("-100").is_err());
        assert!(parse_srm("41").is_err());
        assert!(parse_ph("4.4").is_err());
    }

    #[test]
    fn water_flags_fall_back_to_unit_defaults() {
        let cli = Cli::try_parse_from(["cli", "--units", "metric", "water", "--grain-weight", "5"])
            .unwrap();
        let Some(Commands::Water { water, .. }) = cli.command else {
            panic!("expected water subcommand");
        };
        let input = water.into_input(UnitSystem::Metric);
        assert_eq!(input.grain_weight, 5.0);
        assert_eq!(input.target_volume, 21.0);
    }

    #[test]
    fn negative_grain_flag_is_rejected() {
        assert!(Cli::try_parse_from(["cli", "water", "--grain-weight=-20"]).is_err());
    }
}
