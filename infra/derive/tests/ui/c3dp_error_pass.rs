use c3dp_derive::c3dp_error;
use std::borrow::Cow;

#[c3dp_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Not ready")]
    NotReady {},

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let io: Result<(), std::io::Error> = Err(std::io::Error::other("disk"));
    let err = io.context("reading").unwrap_err();
    assert_eq!(err.to_string(), "IO error (reading): disk");

    let err = DemoError::from("boom");
    assert_eq!(err.to_string(), "Internal error: boom");

    let not_ready: Result<(), DemoError> = Err(DemoError::NotReady {});
    assert!(matches!(not_ready.context("ignored"), Err(DemoError::NotReady {})));
}
