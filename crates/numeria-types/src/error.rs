/// Big number arithmetic errors.
#[derive(Debug, thiserror::Error)]
pub enum BnError {
    // General errors
    #[error("invalid argument")]
    InvalidArg,
    #[error("operation not supported")]
    NotSupported,

    // Buffer errors
    #[error("buffer length not enough: need {need}, got {got}")]
    BufferTooSmall { need: usize, got: usize },
    #[error("malformed decimal string")]
    BadDecimalString,

    // Arithmetic errors
    #[error("division by zero")]
    DivisionByZero,
    #[error("no modular inverse")]
    NoInverse,
    #[error("modulus must be positive")]
    NonPositiveModulus,
    #[error("modulus must be odd")]
    EvenModulus,

    // Generation errors
    #[error("requested bit length too small: {0}")]
    InvalidBitLength(usize),
    #[error("random generation failed")]
    RandGenFail,
    #[error("domain parameter sizes {pbits}/{qbits} not allowed")]
    InvalidParamSizes { pbits: usize, qbits: usize },
    #[error("seed too short: need at least {need} bytes, got {got}")]
    SeedTooShort { need: usize, got: usize },
}
