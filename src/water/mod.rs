//! 양조 물량 계산 모듈.
//! 스트라이크/스파지 워터 분배, 끓임 전 체적, 스트라이크 온도를 다룬다.

pub mod water_volumes;

pub use water_volumes::*;
