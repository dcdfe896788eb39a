use serde::{Deserialize, Serialize};

/// 1 US gal에 해당하는 L.
pub const LITERS_PER_GALLON: f64 = 3.78541;

/// 1 gal = 4 qt.
pub const QUARTS_PER_GALLON: f64 = 4.0;

/// 체적 단위. 내부 기준은 리터이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeUnit {
    Liter,
    Gallon,
    Quart,
}

impl VolumeUnit {
    /// 화면 표시용 기호.
    pub fn symbol(self) -> &'static str {
        match self {
            VolumeUnit::Liter => "L",
            VolumeUnit::Gallon => "gal",
            VolumeUnit::Quart => "qt",
        }
    }
}

fn to_liter(value: f64, unit: VolumeUnit) -> f64 {
    match unit {
        VolumeUnit::Liter => value,
        VolumeUnit::Gallon => value * LITERS_PER_GALLON,
        VolumeUnit::Quart => value * LITERS_PER_GALLON / QUARTS_PER_GALLON,
    }
}

fn from_liter(value: f64, unit: VolumeUnit) -> f64 {
    match unit {
        VolumeUnit::Liter => value,
        VolumeUnit::Gallon => value / LITERS_PER_GALLON,
        VolumeUnit::Quart => value * QUARTS_PER_GALLON / LITERS_PER_GALLON,
    }
}

/// 체적을 변환한다.
pub fn convert_volume(value: f64, from: VolumeUnit, to: VolumeUnit) -> f64 {
    let liters = to_liter(value, from);
    from_liter(liters, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gallon_to_liter_uses_fixed_factor() {
        let l = convert_volume(2.0, VolumeUnit::Gallon, VolumeUnit::Liter);
        assert!((l - 7.57082).abs() < 1e-9, "l={l}");
    }

    #[test]
    fn four_quarts_make_a_gallon() {
        let gal = convert_volume(4.0, VolumeUnit::Quart, VolumeUnit::Gallon);
        assert!((gal - 1.0).abs() < 1e-9, "gal={gal}");
    }
}
