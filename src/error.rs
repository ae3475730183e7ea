/// Errors raised while turning a source line into an encoded instruction.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("empty line")]
    EmptyLine,
    #[error("malformed {what} {token:?}")]
    Parse { what: &'static str, token: String },
    #[error("{mnemonic} takes {expected} operand(s), found {found}")]
    Arity {
        mnemonic: String,
        expected: usize,
        found: usize,
    },
    #[error("{what} {value} out of range (0-{max})")]
    Range {
        what: &'static str,
        value: i64,
        max: u16,
    },
    #[error("label {0} not found")]
    LabelNotFound(String),
    #[error("unknown instruction {0:?}")]
    UnknownInstruction(String),
    #[error("encoded word is {width} bits wide, expected 16")]
    Encoding { width: u32 },
}

impl AsmError {
    pub(crate) fn parse(what: &'static str, token: &str) -> Self {
        AsmError::Parse {
            what,
            token: token.to_string(),
        }
    }
}

/// Errors raised while reading a `v2.0 raw` hex record.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    #[error("missing `v2.0 raw` header")]
    MissingHeader,
    #[error("line {line}: malformed value {token:?}")]
    Value { line: usize, token: String },
}
