//! Tests for the application bootstrap, covering settings translation and
//! readiness signalling.

use std::ffi::OsString;

use super::{HealthState, ServerConfig, create_server, server_config};
use actix_web::web;
use env_lock::lock_env;
use ortho_config::OrthoConfig;
use rstest::{fixture, rstest};
use salon_crm::domain::FollowUpPolicy;
use salon_crm::settings::CrmSettings;
use tempfile::TempDir;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

const VARS: [&str; 6] = [
    "CRM_DATA_DIR",
    "CRM_BIND_ADDR",
    "CRM_UNDO_CAPACITY",
    "CRM_FOLLOW_UP_DAYS",
    "CRM_RETOUCH_DAYS",
    "CRM_EPHEMERAL",
];

fn settings_from(env: &[(&'static str, &str)]) -> CrmSettings {
    let _guard = lock_env(VARS.map(|name| {
        let value = env
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| (*value).to_owned());
        (name, value)
    }));
    CrmSettings::load_from_iter([OsString::from("salon-crm")]).expect("config should load")
}

#[rstest]
fn ephemeral_settings_skip_the_data_dir() {
    let settings = settings_from(&[("CRM_EPHEMERAL", "true"), ("CRM_DATA_DIR", "/srv/salon")]);

    let config = server_config(&settings).expect("config builds");

    assert!(config.data_dir.is_none());
}

#[rstest]
fn data_dir_and_offsets_flow_into_the_config() {
    let settings = settings_from(&[
        ("CRM_DATA_DIR", "/srv/salon"),
        ("CRM_FOLLOW_UP_DAYS", "25"),
        ("CRM_UNDO_CAPACITY", "3"),
    ]);

    let config = server_config(&settings).expect("config builds");

    assert_eq!(
        config.data_dir.as_ref().map(|path| path.as_str()),
        Some("/srv/salon")
    );
    assert_eq!(config.policy, FollowUpPolicy::new(25, 365));
    assert_eq!(config.undo_capacity.get(), 3);
}

#[rstest]
fn zero_undo_capacity_fails_startup() {
    let settings = settings_from(&[("CRM_UNDO_CAPACITY", "0")]);

    let error = server_config(&settings).err().expect("zero capacity rejected");

    assert!(error.to_string().contains("undo capacity must be at least 1"));
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(health_state: web::Data<HealthState>) {
    assert!(!health_state.is_ready(), "state should start unready");
    let temp = TempDir::new().expect("temp dir");
    let data_dir =
        camino::Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 path");
    let config = ServerConfig::new(
        "127.0.0.1:0".parse().expect("valid address"),
        FollowUpPolicy::default(),
    )
    .with_data_dir(data_dir);
    assert_eq!(config.bind_addr().port(), 0);

    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}
