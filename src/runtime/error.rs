use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

use crate::lang::source_buffer::SourceLocation;

pub type Result<T> = std::result::Result<T, AtlastError>;

/// The stable, externally-visible outcome of an `eval`. These are the sole status tokens a host
/// ever sees back from the engine; new internal failure modes must be folded into one of these,
/// never invented ad hoc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Normal,
    StackOver,
    StackUnder,
    RStackOver,
    RStackUnder,
    HeapOver,
    BadPointer,
    Undefined,
    ForgetProt,
    NotInDef,
    RunString,
    RunComm,
    Break,
    DivZero,
    Application,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let text = match self {
            Status::Normal => "NORMAL",
            Status::StackOver => "STACKOVER",
            Status::StackUnder => "STACKUNDER",
            Status::RStackOver => "RSTACKOVER",
            Status::RStackUnder => "RSTACKUNDER",
            Status::HeapOver => "HEAPOVER",
            Status::BadPointer => "BADPOINTER",
            Status::Undefined => "UNDEFINED",
            Status::ForgetProt => "FORGETPROT",
            Status::NotInDef => "NOTINDEF",
            Status::RunString => "RUNSTRING",
            Status::RunComm => "RUNCOMM",
            Status::Break => "BREAK",
            Status::DivZero => "DIVZERO",
            Status::Application => "APPLICATION",
        };
        write!(f, "{}", text)
    }
}

/// Any error raised while scanning, compiling, or executing an ATLAST program. Carries the
/// stable `Status` token the host sees out of `eval`, plus a human-readable message and the
/// source location it occurred at, when one is available.
#[derive(Clone)]
pub struct AtlastError {
    status: Status,
    location: Option<SourceLocation>,
    message: String,
}

impl Error for AtlastError {}

impl Display for AtlastError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {} ({})", location, self.message, self.status),
            None => write!(f, "{} ({})", self.message, self.status),
        }
    }
}

impl Debug for AtlastError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl AtlastError {
    pub fn new(status: Status, location: Option<SourceLocation>, message: String) -> AtlastError {
        AtlastError {
            status,
            location,
            message,
        }
    }

    pub fn new_as_result<T>(status: Status, location: Option<SourceLocation>, message: String) -> Result<T> {
        Err(AtlastError::new(status, location, message))
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn location(&self) -> &Option<SourceLocation> {
        &self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for AtlastError {
    fn from(error: std::io::Error) -> AtlastError {
        AtlastError::new(Status::Application, None, format!("I/O error: {}", error))
    }
}

/// A convenience constructor for raising an `APPLICATION` error from a host-registered primitive.
pub fn application_error<T>(location: Option<SourceLocation>, message: &str) -> Result<T> {
    AtlastError::new_as_result(Status::Application, location, message.to_string())
}
