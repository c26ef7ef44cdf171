use proptest::prelude::*;
use session_security::authz::{AuthState, Requirement, Role, RuleSet, Verdict};

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,6}", 0..5).prop_map(|segments| {
        if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", segments.join("/"))
        }
    })
}

fn auth_strategy() -> impl Strategy<Value = AuthState> {
    prop_oneof![
        Just(AuthState::Anonymous),
        Just(AuthState::authenticated([Role::User])),
        Just(AuthState::authenticated([Role::Admin])),
        Just(AuthState::authenticated([Role::Admin, Role::User])),
    ]
}

fn requirement_strategy() -> impl Strategy<Value = Requirement> {
    prop_oneof![
        Just(Requirement::Public),
        Just(Requirement::Authenticated),
        Just(Requirement::Role(Role::Admin)),
        Just(Requirement::Role(Role::User)),
    ]
}

proptest! {
    #[test]
    fn anonymous_is_allowed_only_by_public_rules(
        path in path_strategy(),
        requirement in requirement_strategy(),
    ) {
        let rs = RuleSet::builder().rule("/*", requirement).build().unwrap();
        let verdict = rs.evaluate(&path, &AuthState::Anonymous);

        match requirement {
            Requirement::Public => prop_assert_eq!(verdict, Verdict::Allow),
            _ => prop_assert_eq!(verdict, Verdict::DenyUnauthenticated),
        }
    }

    #[test]
    fn public_rule_allows_any_caller(path in path_strategy(), auth in auth_strategy()) {
        let rs = RuleSet::builder().permit_all(["/*"]).build().unwrap();
        prop_assert_eq!(rs.evaluate(&path, &auth), Verdict::Allow);
    }

    #[test]
    fn role_rule_forbids_only_authenticated_callers_missing_the_role(
        path in path_strategy(),
        auth in auth_strategy(),
    ) {
        let rs = RuleSet::builder().has_role("/*", Role::Admin).build().unwrap();
        let expected = match &auth {
            AuthState::Anonymous => Verdict::DenyUnauthenticated,
            a if a.has_role(Role::Admin) => Verdict::Allow,
            _ => Verdict::DenyForbidden,
        };
        prop_assert_eq!(rs.evaluate(&path, &auth), expected);
    }

    #[test]
    fn only_the_first_matching_rule_counts(
        path in path_strategy(),
        auth in auth_strategy(),
        first in requirement_strategy(),
        second in requirement_strategy(),
    ) {
        let both = RuleSet::builder()
            .rule("/*", first)
            .rule(path.clone(), second)
            .build()
            .unwrap();
        let only_first = RuleSet::builder().rule("/*", first).build().unwrap();

        prop_assert_eq!(both.evaluate(&path, &auth), only_first.evaluate(&path, &auth));
    }

    #[test]
    fn unmatched_paths_require_authentication(path in path_strategy(), auth in auth_strategy()) {
        let rs = RuleSet::builder()
            .permit_all(["/nowhere/exact"])
            .build()
            .unwrap();
        prop_assume!(path != "/nowhere/exact");

        let expected = if auth.is_authenticated() {
            Verdict::Allow
        } else {
            Verdict::DenyUnauthenticated
        };
        prop_assert_eq!(rs.evaluate(&path, &auth), expected);
    }
}
