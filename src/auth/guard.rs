use crate::error::ApiError;

/// The validated `{subject, privilege}` pair carried by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub is_admin: bool,
}

/// Fails with `Forbidden` unless the identity is privileged.
pub fn require_admin(identity: &Identity) -> Result<(), ApiError> {
    if identity.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin access required".into()))
    }
}

/// Fails with `Forbidden` unless the identity is the target user or is
/// privileged.
pub fn require_self_or_admin(identity: &Identity, target_user_id: i64) -> Result<(), ApiError> {
    if identity.user_id == target_user_id || identity.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Cannot update other users".into()))
    }
}

/// Fails with `Forbidden` when a non-privileged identity attempts to change
/// an admin flag. `attempted` is the `is_admin` field of the update request,
/// `None` when the request leaves the flag untouched.
pub fn require_admin_flag_change(
    identity: &Identity,
    attempted: Option<bool>,
) -> Result<(), ApiError> {
    if attempted.is_some() && !identity.is_admin {
        return Err(ApiError::Forbidden(
            "Only admins can change admin status".into(),
        ));
    }
    Ok(())
}
