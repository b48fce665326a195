use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// A training or network parameter that can never produce a meaningful run.
    Config(String),
    /// Data whose dimensions disagree with the layer sizes of the network.
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    Io(std::io::Error),
    /// A dataset file that is not valid IDX.
    Format(String),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(message) => write!(f, "invalid configuration: {message}"),
            Error::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "shape mismatch for {what}: expected [{} x {}], found [{} x {}]",
                expected.0, expected.1, found.0, found.1
            ),
            Error::Io(err) => write!(f, "IO error: {err}"),
            Error::Format(message) => write!(f, "malformed dataset: {message}"),
            Error::Yaml(err) => write!(f, "config parse error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Yaml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Self {
        Error::Yaml(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_names_both_shapes() {
        let err = Error::ShapeMismatch {
            what: "input",
            expected: (784, 1),
            found: (2, 1),
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch for input: expected [784 x 1], found [2 x 1]"
        );
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
