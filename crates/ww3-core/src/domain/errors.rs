use std::error::Error;
use std::fmt::{Display, Formatter};

pub type Ww3Result<T> = Result<T, Ww3Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ww3ErrorCategory {
    MissingInput,
    Setup,
    InvalidValue,
    MalformedBlock,
    ToolNotFound,
    IoSystem,
    Internal,
}

impl Ww3ErrorCategory {
    pub const fn exit_placeholder(self) -> ExitPlaceholder {
        match self {
            Self::MissingInput => ExitPlaceholder {
                exit_code: 2,
                rust_category: "MissingInputError",
                diagnostic_class: "INPUT_MISSING",
            },
            Self::Setup => ExitPlaceholder {
                exit_code: 3,
                rust_category: "SetupError",
                diagnostic_class: "SETUP_FATAL",
            },
            Self::InvalidValue => ExitPlaceholder {
                exit_code: 4,
                rust_category: "InvalidValueError",
                diagnostic_class: "VALUE_FATAL",
            },
            Self::MalformedBlock => ExitPlaceholder {
                exit_code: 5,
                rust_category: "MalformedBlockError",
                diagnostic_class: "BLOCK_FATAL",
            },
            Self::ToolNotFound => ExitPlaceholder {
                exit_code: 6,
                rust_category: "ExternalToolNotFoundError",
                diagnostic_class: "TOOL_FATAL",
            },
            Self::IoSystem => ExitPlaceholder {
                exit_code: 7,
                rust_category: "IoSystemError",
                diagnostic_class: "IO_FATAL",
            },
            Self::Internal => ExitPlaceholder {
                exit_code: 8,
                rust_category: "InternalError",
                diagnostic_class: "SYS_FATAL",
            },
        }
    }

    pub const fn exit_code(self) -> i32 {
        self.exit_placeholder().exit_code
    }

    pub const fn rust_category(self) -> &'static str {
        self.exit_placeholder().rust_category
    }

    pub const fn diagnostic_class(self) -> &'static str {
        self.exit_placeholder().diagnostic_class
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitPlaceholder {
    pub exit_code: i32,
    pub rust_category: &'static str,
    pub diagnostic_class: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ww3Error {
    category: Ww3ErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl Ww3Error {
    pub fn new(
        category: Ww3ErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn missing_input(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(Ww3ErrorCategory::MissingInput, placeholder, message)
    }

    pub fn setup(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(Ww3ErrorCategory::Setup, placeholder, message)
    }

    pub fn invalid_value(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(Ww3ErrorCategory::InvalidValue, placeholder, message)
    }

    pub fn malformed_block(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(Ww3ErrorCategory::MalformedBlock, placeholder, message)
    }

    pub fn tool_not_found(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(Ww3ErrorCategory::ToolNotFound, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(Ww3ErrorCategory::IoSystem, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(Ww3ErrorCategory::Internal, placeholder, message)
    }

    pub const fn category(&self) -> Ww3ErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for Ww3Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.rust_category(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for Ww3Error {}
