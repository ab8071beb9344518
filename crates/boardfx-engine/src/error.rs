use boardfx_dom::DomError;
use boardfx_geometry::CssParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error(transparent)]
    Css(#[from] CssParseError),
}

pub type Result<T, E = AnimationError> = std::result::Result<T, E>;
