//! Status enum string conversions with wire aliases
//!
//! Remote services are not consistent about status spelling (the simulate
//! action says `pending` where the dataset table says `queued`, and so on),
//! so each variant has one canonical string plus any number of aliases that
//! are accepted on parse.
//!
//! # Example
//!
//! ```rust
//! use plansim_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum JobStatus {
//!     Waiting,
//!     Done,
//! }
//!
//! impl_domain_status_conversions!(JobStatus {
//!     Waiting => "waiting" | "pending",
//!     Done => "done",
//! });
//!
//! assert_eq!("PENDING".parse::<JobStatus>(), Ok(JobStatus::Waiting));
//! assert_eq!(JobStatus::Waiting.to_string(), "waiting");
//! ```

/// Generates `Display` (canonical spelling) and `FromStr` (canonical or
/// alias, case-insensitive, surrounding whitespace ignored).
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase();
                $(
                    if normalized == $str $(|| normalized == $alias)* {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum RunState {
        Pending,
        Running,
        Finished,
    }

    impl_domain_status_conversions!(RunState {
        Pending => "pending" | "queued",
        Running => "running" | "in-progress" | "incomplete",
        Finished => "finished",
    });

    #[test]
    fn test_display_uses_canonical_string() {
        assert_eq!(RunState::Pending.to_string(), "pending");
        assert_eq!(RunState::Running.to_string(), "running");
        assert_eq!(RunState::Finished.to_string(), "finished");
    }

    #[test]
    fn test_fromstr_accepts_aliases() {
        assert_eq!(RunState::from_str("queued").unwrap(), RunState::Pending);
        assert_eq!(RunState::from_str("in-progress").unwrap(), RunState::Running);
        assert_eq!(RunState::from_str("incomplete").unwrap(), RunState::Running);
    }

    #[test]
    fn test_fromstr_mixed_case_and_whitespace() {
        assert_eq!(RunState::from_str(" Pending ").unwrap(), RunState::Pending);
        assert_eq!(RunState::from_str("FINISHED").unwrap(), RunState::Finished);
    }

    #[test]
    fn unknown_spelling_is_rejected() {
        let result = RunState::from_str("exploded");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid RunState: exploded"));
        assert!(RunState::from_str("").is_err());
    }

    #[test]
    fn canonical_spelling_parses_back() {
        for status in [RunState::Pending, RunState::Running, RunState::Finished] {
            assert_eq!(RunState::from_str(&status.to_string()).unwrap(), status);
        }
    }
}
