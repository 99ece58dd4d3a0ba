//! Unit tests for the Isilon backend.

use super::*;


fn config() -> ProvisionerConfig {
    ProvisionerConfig {
        server: String::from("nfs.example.com"),
        api_server: Some(String::from("api.example.com")),
        api_port: 8080,
        path: String::from("/ifs/data/k8s"),
        zone: String::from("System"),
        user: String::from("admin"),
        password: String::from("secret"),
        group: String::from("k8s"),
        quota_enable: None,
        provisioner_name: String::from("isilon"),
        identity: None,
        insecure: None,
        volume_mode: 0o777,
        umask: 0,
    }
}

fn name() -> VolumeName {
    VolumeName::new("team-a-pvc-1-pv-1").expect("name")
}

#[test]
fn new_rejects_invalid_configuration() {
    let cfg = ProvisionerConfig {
        password: String::new(),
        ..config()
    };
    let err = IsilonBackend::new(&cfg).expect_err("password is required");
    assert!(
        matches!(err, IsilonBackendError::Config(ref message) if message.contains("ISI_PASSWORD"))
    );
}

#[test]
fn new_accepts_strict_certificate_checking() {
    let cfg = ProvisionerConfig {
        insecure: Some(false),
        ..config()
    };
    assert!(!cfg.insecure());
    let backend = IsilonBackend::new(&cfg).expect("backend");
    assert_eq!(backend.endpoint(), "https://api.example.com:8080");
}

#[test]
fn namespace_url_targets_volume_directory() {
    let backend = IsilonBackend::new(&config()).expect("backend");
    assert_eq!(
        backend.namespace_url(&name()),
        "https://api.example.com:8080/namespace/ifs/data/k8s/team-a-pvc-1-pv-1"
    );
}

#[test]
fn platform_url_joins_endpoint_and_path() {
    let backend = IsilonBackend::new(&config()).expect("backend");
    assert_eq!(
        backend.platform_url(api::EXPORTS_PATH),
        "https://api.example.com:8080/platform/2/protocols/nfs/exports"
    );
}

#[test]
fn decode_reports_operation_on_malformed_body() {
    let err = IsilonBackend::decode::<api::CreatedResource>("create export", b"not json")
        .expect_err("decode should fail");
    assert!(matches!(
        err,
        IsilonBackendError::Decode {
            operation: "create export",
            ..
        }
    ));
}
