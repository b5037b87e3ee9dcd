use std::fmt;

/// Tally light color for a source (pure domain)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyColor {
    /// Source is in neither the program nor the preview scene
    Idle,
    /// Source is queued in the preview scene
    Preview,
    /// Source is live in the program scene
    Program,
}

impl TallyColor {
    /// Resolve a source's color from its scene membership. Program always
    /// wins over preview.
    pub fn resolve(in_preview: bool, in_program: bool) -> Self {
        if in_program {
            Self::Program
        } else if in_preview {
            Self::Preview
        } else {
            Self::Idle
        }
    }

    /// Hex code published as the tally payload
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Idle => "000000",
            Self::Preview => "00ff00",
            Self::Program => "ff0000",
        }
    }
}

impl fmt::Display for TallyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl Default for TallyColor {
    fn default() -> Self {
        Self::Idle
    }
}
