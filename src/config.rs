use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::units::*;

/// 기본 설정 파일 경로.
pub const CONFIG_FILE: &str = "config.toml";

/// 기본 목표 수질 프로파일 파일 경로.
pub const DEFAULT_PROFILES_FILE: &str = "target_water_profiles.json";

/// 사용 가능한 단위 시스템. 모든 계산식의 분기와 표시 단위를 결정한다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum UnitSystem {
    /// 미국식(lb / gal / °F). 원래 기본값.
    #[default]
    Us,
    /// 미터법(kg / L / °C)
    Metric,
}

impl UnitSystem {
    pub fn is_metric(self) -> bool {
        matches!(self, UnitSystem::Metric)
    }

    /// 단위 시스템별 표시 단위를 돌려준다.
    pub fn default_units(self) -> DefaultUnits {
        match self {
            UnitSystem::Us => DefaultUnits {
                mass: MassUnit::Pound,
                volume: VolumeUnit::Gallon,
                temperature: TemperatureUnit::Fahrenheit,
                grain_ratio_volume: VolumeUnit::Quart,
            },
            UnitSystem::Metric => DefaultUnits {
                mass: MassUnit::Kilogram,
                volume: VolumeUnit::Liter,
                temperature: TemperatureUnit::Celsius,
                grain_ratio_volume: VolumeUnit::Liter,
            },
        }
    }

    /// 반대 단위 시스템. 설정 메뉴의 토글에 쓴다.
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Us => UnitSystem::Metric,
            UnitSystem::Metric => UnitSystem::Us,
        }
    }
}

/// 단위 시스템에 따른 물리량별 표시 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultUnits {
    pub mass: MassUnit,
    pub volume: VolumeUnit,
    pub temperature: TemperatureUnit,
    /// 흡수율/매시 농도(체적/질량)의 분자 단위. US는 관례상 qt를 쓴다.
    pub grain_ratio_volume: VolumeUnit,
}

impl DefaultUnits {
    /// "qt/lb", "L/kg" 형태의 비율 단위 표기.
    pub fn grain_ratio_label(&self) -> String {
        format!("{}/{}", self.grain_ratio_volume.symbol(), self.mass.symbol())
    }

    /// "gal/hr", "L/hr" 형태의 증발량 단위 표기.
    pub fn boiloff_label(&self) -> String {
        format!("{}/hr", self.volume.symbol())
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub unit_system: UnitSystem,
    /// 언어 코드. "auto"면 시스템 로케일을 따른다.
    pub language: String,
    /// 언어팩(TOML) 디렉터리
    pub language_pack_dir: Option<String>,
    /// 목표 수질 프로파일 JSON 경로
    pub profiles_path: PathBuf,
    /// tracing EnvFilter 지시문. RUST_LOG가 있으면 그쪽이 우선한다.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit_system: UnitSystem::Us,
            language: "auto".to_string(),
            language_pack_dir: None,
            profiles_path: PathBuf::from(DEFAULT_PROFILES_FILE),
            log_filter: "info".to_string(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 읽었는지 새로 만들었는지.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    Loaded,
    Created,
}

impl ConfigOrigin {
    /// 로깅 구독자가 설치된 뒤 호출한다.
    pub fn log(self, path: &Path) {
        match self {
            ConfigOrigin::Loaded => tracing::debug!(path = %path.display(), "loaded config"),
            ConfigOrigin::Created => {
                tracing::info!(path = %path.display(), "created default config")
            }
        }
    }
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<(Config, ConfigOrigin), ConfigError> {
    load_or_default_from(Path::new(CONFIG_FILE))
}

/// 지정한 경로의 설정을 로드한다. 파일이 없으면 기본값으로 새로 만든다.
pub fn load_or_default_from(path: &Path) -> Result<(Config, ConfigOrigin), ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok((cfg, ConfigOrigin::Loaded))
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        Ok((cfg, ConfigOrigin::Created))
    }
}

impl Config {
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let (cfg, origin) = load_or_default_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(origin, ConfigOrigin::Created);
        assert!(path.exists());

        let (_, origin) = load_or_default_from(&path).unwrap();
        assert_eq!(origin, ConfigOrigin::Loaded);
    }

    #[test]
    fn saved_unit_system_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config {
            unit_system: UnitSystem::Metric,
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();
        let (loaded, _) = load_or_default_from(&path).unwrap();
        assert_eq!(loaded.unit_system, UnitSystem::Metric);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "unit_system = \"Metric\"\n").unwrap();
        let (cfg, origin) = load_or_default_from(&path).unwrap();
        assert_eq!(origin, ConfigOrigin::Loaded);
        assert_eq!(cfg.unit_system, UnitSystem::Metric);
        assert_eq!(cfg.language, "auto");
        assert_eq!(cfg.profiles_path, PathBuf::from(DEFAULT_PROFILES_FILE));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "unit_system = [").unwrap();
        assert!(matches!(
            load_or_default_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn unit_labels_follow_system() {
        let us = UnitSystem::Us.default_units();
        assert_eq!(us.grain_ratio_label(), "qt/lb");
        assert_eq!(us.boiloff_label(), "gal/hr");
        let metric = UnitSystem::Metric.default_units();
        assert_eq!(metric.grain_ratio_label(), "L/kg");
        assert_eq!(metric.temperature.symbol(), "°C");
    }
}
