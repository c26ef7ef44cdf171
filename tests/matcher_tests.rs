use session_security::{
    authz::PathPattern,
    security::{StaticLocation, StaticResources},
};

fn pattern(raw: &str) -> PathPattern {
    PathPattern::parse(raw).unwrap()
}

#[test]
fn test_exact_pattern_matches_only_identical_path() {
    let p = pattern("/auth/login");

    assert!(p.matches("/auth/login"));
    assert!(!p.matches("/auth/login/"));
    assert!(!p.matches("/auth/Login"));
    assert!(!p.matches("/auth"));
    assert!(!p.matches(""));
}

#[test]
fn test_wildcard_requires_a_further_segment() {
    let p = pattern("/admin/*");

    assert!(p.matches("/admin/x"));
    assert!(p.matches("/admin/x/y"));
    assert!(!p.matches("/admin"));
    assert!(!p.matches("/adminx"));
    assert!(!p.matches("/adminx/y"));
    assert!(!p.matches("/other/admin/x"));
}

#[test]
fn test_wildcard_trailing_slash_counts_as_segment() {
    // Simple segment split: "/admin/" is ["", "admin", ""].
    assert!(pattern("/admin/*").matches("/admin/"));
}

#[test]
fn test_wildcard_is_case_sensitive_and_unnormalized() {
    let p = pattern("/admin/*");

    assert!(!p.matches("/Admin/x"));
    // No `..` resolution; callers normalize first.
    assert!(p.matches("/admin/../user"));
    assert!(!p.matches("admin/x"));
}

#[test]
fn test_root_wildcard_matches_every_rooted_path() {
    let p = pattern("/*");

    assert!(p.matches("/"));
    assert!(p.matches("/a"));
    assert!(p.matches("/a/b/c"));
    assert!(!p.matches("a"));
    assert!(!p.matches(""));
}

#[test]
fn test_nested_prefix() {
    let p = pattern("/api/v1/*");

    assert!(p.matches("/api/v1/users"));
    assert!(!p.matches("/api/v1"));
    assert!(!p.matches("/api/v2/users"));
}

#[test]
fn test_any_matches_everything_including_empty() {
    assert!(PathPattern::Any.matches(""));
    assert!(PathPattern::Any.matches("/"));
    assert!(PathPattern::Any.matches("not-even-rooted"));
}

#[test]
fn test_display_keeps_configured_text() {
    assert_eq!(pattern("/admin/*").to_string(), "/admin/*");
    assert_eq!(pattern("/main").to_string(), "/main");
}

// --- Static Resource Pre-filter ---

#[test]
fn test_static_locations() {
    assert!(StaticLocation::Css.matches("/css/site.css"));
    assert!(StaticLocation::JavaScript.matches("/js/vendor/app.js"));
    assert!(StaticLocation::WebJars.matches("/webjars/jquery/jquery.min.js"));
    assert!(StaticLocation::Favicon.matches("/favicon.ico"));
    assert!(StaticLocation::Icons.matches("/apple/icon-180.png"));

    assert!(!StaticLocation::Css.matches("/css"));
    assert!(!StaticLocation::Favicon.matches("/favicon."));
    assert!(!StaticLocation::Favicon.matches("/favicon.d/x"));
    assert!(!StaticLocation::Icons.matches("/icon-180.png"));
    assert!(!StaticLocation::Icons.matches("/a/b/icon-180.png"));
}

#[test]
fn test_static_resources_never_cover_application_paths() {
    let statics = StaticResources::common_locations();

    for path in ["/", "/admin/dashboard", "/user/profile", "/auth/login", "/cssx/a"] {
        assert!(!statics.matches(path), "path {path}");
    }
    assert!(statics.matches("/images/logo.png"));
}
