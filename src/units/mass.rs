use serde::{Deserialize, Serialize};

/// 1 lb에 해당하는 kg.
pub const KG_PER_POUND: f64 = 0.453592;

/// 질량 단위. 내부 기준은 kg이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassUnit {
    Kilogram,
    Pound,
}

impl MassUnit {
    /// 화면 표시용 기호.
    pub fn symbol(self) -> &'static str {
        match self {
            MassUnit::Kilogram => "kg",
            MassUnit::Pound => "lb",
        }
    }
}

fn to_kg(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Kilogram => value,
        MassUnit::Pound => value * KG_PER_POUND,
    }
}

fn from_kg(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Kilogram => value,
        MassUnit::Pound => value / KG_PER_POUND,
    }
}

/// 질량을 변환한다.
pub fn convert_mass(value: f64, from: MassUnit, to: MassUnit) -> f64 {
    let base = to_kg(value, from);
    from_kg(base, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pound_to_kilogram_uses_fixed_factor() {
        let kg = convert_mass(10.0, MassUnit::Pound, MassUnit::Kilogram);
        assert!((kg - 4.53592).abs() < 1e-12, "kg={kg}");
    }

    #[test]
    fn kilogram_round_trips_through_pounds() {
        let lb = convert_mass(4.5, MassUnit::Kilogram, MassUnit::Pound);
        assert!((lb - 9.9208).abs() < 1e-4, "lb={lb}");
    }
}
