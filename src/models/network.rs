use serde::Serialize;

/// Outcome of the reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reachability {
    Reachable,
    Unreachable,
    Unexpected(u16),
}

impl Reachability {
    pub fn from_status(code: u16) -> Self {
        if (200..300).contains(&code) {
            Reachability::Reachable
        } else {
            Reachability::Unexpected(code)
        }
    }

    pub fn status_display(&self) -> &'static str {
        match self {
            Reachability::Reachable => "Normal",
            Reachability::Unreachable => "No Connectivity",
            Reachability::Unexpected(_) => "Issue Detected",
        }
    }
}
