//! Export permissions.

/// Roles allowed to export CSV, lowercase.
pub const CSV_EXPORT_ROLES: [&str; 3] = ["advisor", "manager", "admin"];

/// Whether `role` may export CSV. Comparison ignores ASCII case and
/// surrounding whitespace.
pub fn can_export_csv(role: &str) -> bool {
    let role = role.trim();
    CSV_EXPORT_ROLES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(role))
}
