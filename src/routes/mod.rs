/// Router Module Index
///
/// Organizes the application's routing into access-segregated modules so
/// that the authentication layer is applied explicitly at the module level
/// rather than per handler.

/// Routes accessible to any client: article reads, contact form, newsletter
/// signup, and login itself.
pub mod public;

/// Article mutation routes, restricted to the admin role. Wrapped in the
/// bearer-token middleware by `create_router`.
pub mod admin;
