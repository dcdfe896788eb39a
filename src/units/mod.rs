//! 단위 정의 및 변환 모듈 모음.

pub mod mass;
pub mod temperature;
pub mod volume;

pub use mass::{convert_mass, MassUnit, KG_PER_POUND};
pub use temperature::TemperatureUnit;
pub use volume::{convert_volume, VolumeUnit, LITERS_PER_GALLON, QUARTS_PER_GALLON};
