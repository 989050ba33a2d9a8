pub type PosterResult<T> = Result<T, PosterError>;

/// Every fatal condition of a load or render.
///
/// Non-fatal conditions (element not ready, unsupported operation, unknown font family) never
/// surface here; they are reported through `tracing` and the pipeline keeps going.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    #[error("duplicate element identifier '{0}'")]
    DuplicateIdentifier(String),

    #[error("element '{element}' references unknown anchor '{anchor}'")]
    UnknownAnchor { element: String, anchor: String },

    #[error("element '{element}' references unknown element '{target}'")]
    UnknownElement { element: String, target: String },

    #[error("cyclic position dependency involving element '{0}'")]
    CyclicPositionDependency(String),

    #[error("unsupported schema version \"{found}\" (supported: \"{supported}\")")]
    UnsupportedSchema {
        found: String,
        supported: &'static str,
    },

    #[error("{path}: undefined variable '{name}'")]
    UndefinedVariable { name: String, path: String },

    #[error("{path}: invalid color: {message}")]
    InvalidColor { path: String, message: String },

    #[error("{path}: invalid point: {message}")]
    InvalidPoint { path: String, message: String },

    #[error("{path}: invalid alignment: {message}")]
    InvalidAlignment { path: String, message: String },

    #[error("element '{element}' has unknown type '{kind}' (registered: {registered})")]
    UnknownElementType {
        element: String,
        kind: String,
        registered: String,
    },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn invalid_color(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidColor {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn invalid_point(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidPoint {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn invalid_alignment(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidAlignment {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn unknown_element(element: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnknownElement {
            element: element.into(),
            target: target.into(),
        }
    }
}
