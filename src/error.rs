//! Errors reported by the parser and by the precision-tracking values.

/// The reason a numeral could not be parsed.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("the input provided was empty")]
    InputEmpty,
    #[error("found a character that is not a digit")]
    InvalidDigit,
    #[error("the number has more than one point")]
    MisplacedPoint,
    #[error("failed parsing the exponent")]
    ExponentParseFailed,
    #[error("the exponent is out of range")]
    ExponentOutOfRange,
    #[error("expected a complex number in the form (re, im)")]
    MalformedComplex,
    #[error("the precision must be at least one digit")]
    ZeroPrecision,
}

/// The errors of parsing and of the operations on `Apfloat` and `Apcomplex`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("cannot parse {literal:?}: {kind}")]
    Parse {
        literal: String,
        kind: ParseErrorKind,
    },

    #[error("radix {0} is outside of the supported range 2..=36")]
    InvalidRadix(u32),

    #[error("cannot combine values in radix {left} and radix {right}")]
    RadixMismatch { left: u32, right: u32 },

    #[error("{operation}: {reason}")]
    Domain {
        operation: &'static str,
        reason: &'static str,
    },

    #[error("{operation} needs a finite precision, but every operand is exact")]
    InfinitePrecision { operation: &'static str },
}

impl Error {
    pub(crate) fn parse(literal: &str, kind: ParseErrorKind) -> Self {
        Error::Parse {
            literal: literal.to_string(),
            kind,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[test]
fn test_error_messages() {
    let e = Error::parse("1.2.3", ParseErrorKind::MisplacedPoint);
    assert_eq!(
        e.to_string(),
        "cannot parse \"1.2.3\": the number has more than one point"
    );
    let e = Error::Domain {
        operation: "pow",
        reason: "zero raised to a non-positive power",
    };
    assert_eq!(e.to_string(), "pow: zero raised to a non-positive power");
    assert_eq!(
        Error::RadixMismatch { left: 10, right: 16 }.to_string(),
        "cannot combine values in radix 10 and radix 16"
    );
    assert_eq!(
        ParseErrorKind::MalformedComplex.to_string(),
        "expected a complex number in the form (re, im)"
    );
}
