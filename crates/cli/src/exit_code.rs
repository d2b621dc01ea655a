/// Process exit status shared by the front ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExitCode {
    /// Everything succeeded.
    Success,
    /// At least one file or attribute could not be processed.
    Failure,
    /// The command line was not understood.
    Usage,
}

impl ExitCode {
    /// Status for a run that reported `failures` problems.
    #[must_use]
    pub const fn from_failures(failures: usize) -> Self {
        if failures == 0 {
            Self::Success
        } else {
            Self::Failure
        }
    }

    /// Numeric process status.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Usage => 2,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

/// Converts a status returned by one of the `run` functions for `main`.
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, i32::from(u8::MAX));
    std::process::ExitCode::from(u8::try_from(clamped).unwrap_or(u8::MAX))
}
