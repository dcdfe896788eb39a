#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use brew_water_toolbox::{
    chemistry::{self, IonConcentrations, ProfileSet, ION_RANGE, MASH_PH_RANGE, SRM_RANGE},
    config::{self, UnitSystem},
    i18n::{self, keys},
    logging,
    session::{BrewSession, ChemistryRequest},
    water::{
        MashMethod, WaterInput, BOIL_TIME_RANGE, GRAIN_RATIO_RANGE, GRAIN_WEIGHT_RANGE,
        TEMPERATURE_RANGE, VOLUME_RANGE,
    },
};
use clap::Parser;
use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::{
    fs,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(name = "brew_water_toolbox", version, about = "Brew Water Toolbox (desktop)")]
struct GuiArgs {
    /// 언어 코드: auto, ko, en-us
    #[arg(short = 'L', long)]
    lang: Option<String>,

    /// 설정 파일 경로 (기본: config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), eframe::Error> {
    let args = GuiArgs::parse();
    let loaded = match &args.config {
        Some(path) => config::load_or_default_from(path),
        None => config::load_or_default(),
    };
    let config_path = args
        .config
        .unwrap_or_else(|| PathBuf::from(config::CONFIG_FILE));
    let (mut app_cfg, origin) = match loaded {
        Ok((cfg, origin)) => (cfg, Ok(origin)),
        Err(e) => (config::Config::default(), Err(e)),
    };
    logging::init(&app_cfg.log_filter);
    match origin {
        Ok(origin) => origin.log(&config_path),
        Err(e) => tracing::warn!(
            path = %config_path.display(),
            error = %e,
            "config unreadable, using defaults"
        ),
    }
    if let Some(lang_cli) = args.lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }

    let mut viewport = egui::ViewportBuilder::default().with_inner_size([1100.0, 780.0]);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "Brew Water Toolbox",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                tracing::warn!("font error: {e}");
            }
            Box::new(GuiApp::new(app_cfg, config_path))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 공통: 바이너리 폰트 바이트를 egui에 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .insert(0, font_name);
    ctx.set_fonts(fonts);
}

/// 한글을 표시하기 위해 폰트를 찾아 우선 적용한다.
/// 1) assets/fonts 아래 폰트
/// 2) Windows/Linux 시스템 폰트
/// 3) 모두 실패 시 기본 폰트를 유지하고 Err를 돌려준다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates: Vec<PathBuf> = ["assets/fonts/NanumGothic.ttf", "assets/fonts/malgun.ttf"]
        .iter()
        .map(PathBuf::from)
        .collect();
    if let Some(windir) = std::env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.extend(["malgun.ttf", "gulim.ttc"].iter().map(|f| fonts.join(f)));
    }
    candidates.extend(
        [
            "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        ]
        .iter()
        .map(PathBuf::from),
    );

    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read font ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }
    Err("Korean font not found; using the default font.".into())
}

struct GuiApp {
    config: config::Config,
    config_path: PathBuf,
    tr: i18n::Translator,
    lang_input: String,
    settings_status: Option<String>,
    profiles: ProfileSet,
    profiles_status: Option<String>,
    session: BrewSession,
    // 물량 입력
    water_form: WaterInput,
    // 염 입력
    profile_name: String,
    targets: IonConcentrations,
    srm: f64,
    target_ph: f64,
    chemistry_error: Option<String>,
    ui_scale: f32,
}

impl GuiApp {
    fn new(config: config::Config, config_path: PathBuf) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        tracing::debug!(lang = %lang_code, "gui language resolved");
        let profiles = chemistry::load_profiles(&config.profiles_path);
        let first = profiles.first().clone();
        Self {
            lang_input: config.language.clone(),
            water_form: WaterInput::defaults_for(config.unit_system),
            config,
            config_path,
            tr,
            settings_status: None,
            profiles,
            profiles_status: None,
            session: BrewSession::new(),
            profile_name: first.name,
            targets: first.ions,
            srm: 5.0,
            target_ph: 5.4,
            chemistry_error: None,
            ui_scale: 1.0,
        }
    }

    /// 단위 시스템을 바꾼다. 입력값은 환산하지 않는다.
    fn set_unit_system(&mut self, unit_system: UnitSystem) {
        self.config.unit_system = unit_system;
        self.water_form.unit_system = unit_system;
    }

    fn select_profile(&mut self, name: &str) {
        if let Some(p) = self.profiles.find(name) {
            self.profile_name = p.name.clone();
            self.targets = p.ions;
        }
    }

    fn calculate_water(&mut self) {
        self.session.request_water(self.water_form.clone());
        self.chemistry_error = None;
    }

    fn calculate_salts(&mut self) {
        let request = ChemistryRequest {
            beer_color_srm: self.srm,
            target_mash_ph: self.target_ph,
            grain_weight: self.water_form.grain_weight,
            target: self.targets,
            unit_system: self.water_form.unit_system,
        };
        self.chemistry_error = match self.session.request_chemistry(request) {
            Ok(_) => None,
            Err(_) => Some(self.tr.t(keys::ERROR_WATER_FIRST)),
        };
    }

    fn load_profiles_from(&mut self, path: PathBuf) {
        match chemistry::read_profiles(&path) {
            Ok(set) => {
                self.profiles_status = Some(
                    self.tr
                        .t_with(keys::PROFILES_LOADED, &[("count", set.len().to_string())]),
                );
                self.profiles = set;
                let first = self.profiles.first().name.clone();
                self.select_profile(&first);
                self.config.profiles_path = path;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "profile file rejected");
                self.profiles_status = Some(format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)));
            }
        }
    }

    fn save_config(&mut self) {
        self.settings_status = Some(match self.config.save_to(&self.config_path) {
            Ok(()) => self.tr.t(keys::SETTINGS_SAVED),
            Err(e) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
        });
    }

    fn ui_sidebar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let tr = self.tr.clone();
        ui.heading(tr.t(keys::ASSUMPTIONS_HEADING));
        for key in [
            keys::ASSUMPTION_RO_WATER,
            keys::ASSUMPTION_SPARGE,
            keys::ASSUMPTION_RISK,
        ] {
            ui.label(tr.t(key));
        }
        ui.separator();

        ui.heading(tr.t(keys::SETTINGS_HEADING));
        ui.label(tr.t(keys::UNIT_SYSTEM));
        let mut unit_system = self.config.unit_system;
        ui.radio_value(&mut unit_system, UnitSystem::Us, tr.t(keys::UNIT_SYSTEM_US));
        ui.radio_value(&mut unit_system, UnitSystem::Metric, tr.t(keys::UNIT_SYSTEM_METRIC));
        if unit_system != self.config.unit_system {
            self.set_unit_system(unit_system);
        }
        ui.add_space(6.0);

        if ui.button(tr.t(keys::LOAD_PROFILES_FILE)).clicked() {
            if let Some(path) = FileDialog::new().add_filter("JSON", &["json"]).pick_file() {
                self.load_profiles_from(path);
            }
        }
        if let Some(msg) = &self.profiles_status {
            ui.label(egui::RichText::new(msg).small());
        }
        ui.add_space(6.0);

        ui.label(tr.t(keys::LANGUAGE));
        egui::ComboBox::from_id_source("lang_choice")
            .selected_text(self.lang_input.clone())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.lang_input, "auto".into(), "auto");
                ui.selectable_value(&mut self.lang_input, "en-us".into(), "English (US)");
                ui.selectable_value(&mut self.lang_input, "ko".into(), "한국어");
            });
        ui.label("UI scale");
        if ui
            .add(egui::Slider::new(&mut self.ui_scale, 0.8..=1.6).suffix(" x"))
            .changed()
        {
            ctx.set_pixels_per_point(self.ui_scale);
        }
        if ui.button("💾").on_hover_text(tr.t(keys::SETTINGS_SAVED)).clicked() {
            self.config.language = self.lang_input.clone();
            let resolved = i18n::resolve_language(&self.config.language, None);
            let pack_dir = self.config.language_pack_dir.as_deref();
            self.tr = i18n::Translator::new_with_pack(&resolved, pack_dir);
            self.save_config();
        }
        if let Some(msg) = &self.settings_status {
            ui.label(msg);
        }
    }

    fn ui_inputs(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let units = self.water_form.unit_system.default_units();
        let (wt, temp, vol) = (
            units.mass.symbol(),
            units.temperature.symbol(),
            units.volume.symbol(),
        );
        let ratio = units.grain_ratio_label();
        let boiloff = units.boiloff_label();

        ui.heading(tr.t(keys::WATER_HEADING));
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(tr.t(keys::MASH_METHOD));
                let m = &mut self.water_form.mash_method;
                ui.radio_value(m, MashMethod::NoSparge, tr.t(keys::MASH_METHOD_NO_SPARGE));
                ui.radio_value(m, MashMethod::Sparge, tr.t(keys::MASH_METHOD_SPARGE));
            });
            let w = &mut self.water_form;
            let sparge = w.mash_method == MashMethod::Sparge;
            let mut rows = vec![
                (
                    labelled(&tr, keys::GRAIN_WEIGHT, wt),
                    &mut w.grain_weight,
                    0.1,
                    GRAIN_WEIGHT_RANGE,
                ),
                (labelled(&tr, keys::BOIL_TIME, "min"), &mut w.boil_time, 1.0, BOIL_TIME_RANGE),
                (labelled(&tr, keys::GRAIN_TEMP, temp), &mut w.grain_temp, 0.5, TEMPERATURE_RANGE),
                (labelled(&tr, keys::MASH_TEMP, temp), &mut w.mash_temp, 0.5, TEMPERATURE_RANGE),
                (
                    labelled(&tr, keys::BOILOFF_RATE, &boiloff),
                    &mut w.boiloff_rate,
                    0.05,
                    VOLUME_RANGE,
                ),
                (
                    labelled(&tr, keys::ABSORPTION_RATE, &ratio),
                    &mut w.absorption_rate,
                    0.01,
                    GRAIN_RATIO_RANGE,
                ),
                (labelled(&tr, keys::TRUB_LOSS, vol), &mut w.trub_loss, 0.05, VOLUME_RANGE),
                (labelled(&tr, keys::TARGET_VOLUME, vol), &mut w.target_volume, 0.1, VOLUME_RANGE),
            ];
            if sparge {
                let label = labelled(&tr, keys::MASH_THICKNESS, &ratio);
                rows.push((label, &mut w.mash_thickness, 0.05, GRAIN_RATIO_RANGE));
            }
            egui::Grid::new("water_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for (label, value, speed, range) in rows {
                        number_row(ui, &label, value, speed, range);
                    }
                });
            let button = egui::Button::new(tr.t(keys::CALCULATE_WATER))
                .min_size(egui::vec2(ui.available_width(), 32.0));
            if ui.add(button).clicked() {
                self.calculate_water();
            }
        });

        ui.add_space(12.0);
        ui.heading(tr.t(keys::CHEMISTRY_HEADING));
        egui::Frame::group(ui.style()).show(ui, |ui| {
            let mut selected = self.profile_name.clone();
            egui::ComboBox::from_label(tr.t(keys::PROFILE))
                .selected_text(selected.clone())
                .show_ui(ui, |ui| {
                    for name in self.profiles.names() {
                        ui.selectable_value(&mut selected, name.to_string(), name);
                    }
                });
            if selected != self.profile_name {
                self.select_profile(&selected);
            }
            let t = &mut self.targets;
            let rows = [
                (tr.t(keys::BEER_SRM), &mut self.srm, 1.0, SRM_RANGE),
                (tr.t(keys::TARGET_PH), &mut self.target_ph, 0.1, MASH_PH_RANGE),
                (tr.t(keys::CALCIUM), &mut t.calcium, 1.0, ION_RANGE),
                (tr.t(keys::MAGNESIUM), &mut t.magnesium, 1.0, ION_RANGE),
                (tr.t(keys::SODIUM), &mut t.sodium, 1.0, ION_RANGE),
                (tr.t(keys::SULFATE), &mut t.sulfate, 1.0, ION_RANGE),
                (tr.t(keys::CHLORIDE), &mut t.chloride, 1.0, ION_RANGE),
            ];
            egui::Grid::new("chem_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for (label, value, speed, range) in rows {
                        number_row(ui, &label, value, speed, range);
                    }
                });
            let button = egui::Button::new(tr.t(keys::CALCULATE_SALTS))
                .min_size(egui::vec2(ui.available_width(), 32.0));
            if ui.add(button).clicked() {
                self.calculate_salts();
            }
            if let Some(err) = &self.chemistry_error {
                ui.colored_label(egui::Color32::RED, err);
            }
        });
    }

    fn ui_results(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let units = self.water_form.unit_system.default_units();
        let vol = units.volume.symbol();
        let temp = units.temperature.symbol();

        ui.heading(tr.t(keys::RESULTS_HEADING));
        let Some(w) = self.session.last_water() else {
            return;
        };
        let water_rows = [
            (keys::STRIKE_WATER, format!("{:.2} {vol}", w.strike_volume)),
            (keys::SPARGE_WATER, format!("{:.2} {vol}", w.sparge_volume)),
            (keys::STRIKE_TEMP, format!("{:.1} {temp}", w.strike_temp)),
            (keys::PRE_BOIL_VOLUME, format!("{:.2} {vol}", w.pre_boil_volume)),
            (keys::TOTAL_WATER, format!("{:.2} {vol}", w.total_water)),
            (keys::TOTAL_MASH_VOLUME, format!("{:.2} {vol}", w.total_mash_volume)),
        ];
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.strong(format!("💧 {}", tr.t(keys::WATER_RESULTS_HEADING)));
            egui::Grid::new("water_result_grid")
                .num_columns(2)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    for (key, value) in water_rows {
                        result_row(ui, &tr.t(key), value);
                    }
                });
            let amber = egui::Color32::from_rgb(200, 140, 0);
            ui.colored_label(amber, tr.t(keys::MASH_TUN_WARNING));
        });

        ui.add_space(8.0);
        let Some(s) = self.session.last_chemistry() else {
            ui.label(tr.t(keys::CHEMISTRY_PENDING));
            return;
        };
        let mut salt_rows: Vec<(&str, String)> = [
            (keys::GYPSUM, s.gypsum_g),
            (keys::CACL2, s.cacl2_g),
            (keys::EPSOM, s.epsom_g),
            (keys::SALT, s.salt_g),
            (keys::LIME, s.lime_g),
        ]
        .into_iter()
        .map(|(key, grams)| (key, format!("{grams:.2} g")))
        .collect();
        salt_rows.push((
            keys::LACTIC_ACID,
            format!("{:.2} ml ({:.2} g)", s.acid_ml, s.acid_g),
        ));
        if let Some(ph) = s.estimated_mash_ph {
            salt_rows.push((keys::ESTIMATED_PH, format!("{ph:.2}")));
        }
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.strong(format!("🧂 {}", tr.t(keys::SALT_RESULTS_HEADING)));
            egui::Grid::new("salt_result_grid")
                .num_columns(2)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    for (key, value) in salt_rows {
                        result_row(ui, &tr.t(key), value);
                    }
                });
        });
    }
}

fn labelled(tr: &i18n::Translator, key: &str, unit: &str) -> String {
    format!("{} ({unit})", tr.t(key))
}

fn number_row(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut f64,
    speed: f64,
    range: RangeInclusive<f64>,
) {
    ui.label(label);
    ui.add(egui::DragValue::new(value).speed(speed).clamp_range(range));
    ui.end_row();
}

fn result_row(ui: &mut egui::Ui, label: &str, value: String) {
    ui.label(label);
    ui.strong(value);
    ui.end_row();
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let title = self.tr.t(keys::APP_TITLE);
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(title);
                ui.label(" | Desktop GUI");
            });
        });

        egui::SidePanel::left("sidebar")
            .resizable(true)
            .min_width(180.0)
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.ui_sidebar(ui, ctx));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.columns(2, |cols| {
                        self.ui_inputs(&mut cols[0]);
                        self.ui_results(&mut cols[1]);
                    });
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> GuiApp {
        let dir = std::env::temp_dir();
        let cfg = config::Config {
            profiles_path: dir.join("brew_water_toolbox_missing_profiles.json"),
            ..config::Config::default()
        };
        GuiApp::new(cfg, dir.join("brew_water_toolbox_gui_test.toml"))
    }

    #[test]
    fn salts_before_volumes_shows_error() {
        let mut app = app();
        app.calculate_salts();
        assert!(app.chemistry_error.is_some());
        assert!(app.session.last_chemistry().is_none());
    }

    #[test]
    fn volumes_then_salts_clears_error() {
        let mut app = app();
        app.calculate_salts();
        app.calculate_water();
        assert!(app.chemistry_error.is_none());
        app.calculate_salts();
        assert!(app.chemistry_error.is_none());
        assert!(app.session.last_chemistry().is_some());
    }

    #[test]
    fn missing_profile_file_offers_default_profile() {
        let app = app();
        assert_eq!(app.profile_name, "Default");
        assert_eq!(app.targets.sulfate, 50.0);
    }

    #[test]
    fn unit_toggle_keeps_entered_values() {
        let mut app = app();
        app.water_form.grain_weight = 12.0;
        app.set_unit_system(UnitSystem::Metric);
        assert_eq!(app.water_form.unit_system, UnitSystem::Metric);
        assert_eq!(app.water_form.grain_weight, 12.0);
    }

    #[test]
    fn rejected_profile_file_keeps_current_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[]").unwrap();
        let mut app = app();
        app.load_profiles_from(path);
        assert!(app.profiles_status.is_some());
        assert_eq!(app.profiles.len(), 1);
        assert_eq!(app.profile_name, "Default");
    }
}
