use paramsearch_core::errors::{ErrorInfo, PsError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("param", "lr")
        .with_context("reason", "example")
}

#[test]
fn invalid_config_surface() {
    let err = PsError::InvalidConfig(sample_info("negative-device-count", "num_gpu < 0"));
    assert_eq!(err.info().code, "negative-device-count");
    assert!(err.info().context.contains_key("param"));
}

#[test]
fn invalid_spec_surface() {
    let err = PsError::InvalidSpec(sample_info("grid-count", "count must be >= 1"));
    assert_eq!(err.info().code, "grid-count");
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn dimension_mismatch_surface() {
    let err = PsError::DimensionMismatch(sample_info("zip-length", "lengths differ"));
    assert_eq!(err.info().code, "zip-length");
}

#[test]
fn io_surface() {
    let err = PsError::Io(sample_info("table-open", "permission denied"));
    assert_eq!(err.info().code, "table-open");
}

#[test]
fn display_names_param_and_hint() {
    let err = PsError::spec("lr", "grid-count", "grid count must be at least 1")
        .to_string();
    assert!(err.starts_with("invalid parameter spec: grid count must be at least 1"));
    assert!(err.contains("param=lr"));

    let hinted = PsError::InvalidConfig(
        ErrorInfo::new("output-path", "output path is a directory").with_hint("pass a file path"),
    );
    assert!(hinted.to_string().ends_with("| hint: pass a file path"));
}

#[test]
fn config_shorthand_records_flag() {
    let err = PsError::config("num_gpu", "negative-device-count", "num_gpu must be >= 0");
    assert!(matches!(err, PsError::InvalidConfig(_)));
    assert_eq!(
        err.info().context.get("flag").map(String::as_str),
        Some("num_gpu")
    );
}
