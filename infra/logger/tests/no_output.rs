use c3dp_logger::{Logger, LoggerError};

#[test]
fn disabling_every_output_is_rejected() {
    let err = Logger::builder().name("c3dp-silent").console(false).init().unwrap_err();
    assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
}
