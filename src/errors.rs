use std::fmt;
use std::error::Error;

/// Represents precondition failures reported by the force evaluators.
///
/// A declined computation is always reported through one of these variants
/// rather than a sentinel result such as a zero duration, which would be
/// indistinguishable from "computed instantly". Once preconditions pass, a
/// force evaluation cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluatorError {
    /// The body set is empty.
    EmptyBodySet,
    /// The body count is not an exact multiple of the evaluator's block,
    /// tile or lane width.
    LengthNotMultiple { n: usize, multiple: usize },
    /// An input or output buffer does not hold exactly the expected number
    /// of entries for the body count.
    BufferSizeMismatch { expected: usize, actual: usize },
    /// A planar buffer does not satisfy the lane evaluator's alignment
    /// requirement (in bytes).
    MisalignedBuffer { required: usize },
    /// The instruction-set family a lane evaluator targets is not available
    /// on this CPU.
    UnsupportedInstructionSet(&'static str),
}

impl fmt::Display for EvaluatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvaluatorError::EmptyBodySet => write!(f, "Body set is empty"),
            EvaluatorError::LengthNotMultiple { n, multiple } => {
                write!(f, "Body count {} is not a multiple of {}", n, multiple)
            }
            EvaluatorError::BufferSizeMismatch { expected, actual } => {
                write!(f, "Buffer holds {} entries, expected {}", actual, expected)
            }
            EvaluatorError::MisalignedBuffer { required } => {
                write!(f, "Buffer is not aligned to {} bytes", required)
            }
            EvaluatorError::UnsupportedInstructionSet(name) => {
                write!(f, "Instruction set {} is not available on this CPU", name)
            }
        }
    }
}

impl Error for EvaluatorError {}
