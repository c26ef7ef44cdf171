/// Router Module Index
///
/// Groups the routes by the access the default rule table gives them. Grouping
/// is for readers only: every request, whichever module its route lives in,
/// passes through the `security::authorize` middleware and the rule engine.

/// Pages anyone may open, anonymous callers included.
pub mod public;

/// Pages for any signed-in caller.
pub mod authenticated;

/// Member pages under `/user/*` (USER role).
pub mod user;

/// Administration pages under `/admin/*` (ADMIN role).
pub mod admin;
