//! Maps `Box<dyn Error>` from collaborator trait boundaries to typed `TimerError`.
//!
//! The traits in `wodtimer_traits` use `Box<dyn Error + Send + Sync>` so any
//! device backend can plug in. With the `notify-errors` feature the errors of
//! the bundled terminal collaborators are recognized precisely.

use crate::error::TimerError;

/// Map a collaborator failure to a typed `TimerError`.
///
/// Known notification error types are downcast first; anything else falls
/// back to its message.
pub fn map_collaborator_error(
    collaborator: &'static str,
    e: &(dyn std::error::Error + 'static),
) -> TimerError {
    #[cfg(feature = "notify-errors")]
    {
        use wodtimer_notify::error::NotifyError;
        if let Some(n) = e.downcast_ref::<NotifyError>() {
            return match n {
                NotifyError::Unavailable(_) => TimerError::CollaboratorUnavailable { collaborator },
                other => TimerError::Collaborator {
                    collaborator,
                    message: other.to_string(),
                },
            };
        }
    }

    let message = e.to_string();
    if message.to_lowercase().contains("not available") {
        TimerError::CollaboratorUnavailable { collaborator }
    } else {
        TimerError::Collaborator {
            collaborator,
            message,
        }
    }
}
