//! 양조용 물 화학 계산 모듈.
//! 목표 수질 프로파일 로드와 염/젖산 첨가량 계산으로 구성한다.

pub mod profiles;
pub mod salt_additions;

pub use profiles::{
    default_profile, load_profiles, read_profiles, IonConcentrations, MineralProfile,
    ProfileError, ProfileSet,
};
pub use salt_additions::*;
