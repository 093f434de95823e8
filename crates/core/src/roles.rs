//! Role names carried in identity tokens and stored on `users.role`.

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_EDITOR: &str = "EDITOR";
pub const ROLE_VIEWER: &str = "VIEWER";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR, ROLE_VIEWER];

/// Whether the role may create or modify campaigns.
pub fn can_edit(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_EDITOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editors_and_admins_can_edit() {
        assert!(can_edit(ROLE_ADMIN));
        assert!(can_edit(ROLE_EDITOR));
        assert!(!can_edit(ROLE_VIEWER));
        assert!(!can_edit("editor"));
    }
}
