use super::*;
use dns_controller_core::Ttl;
use dns_controller_k8s_api::Selector;
use maplit::btreemap;
use pretty_assertions::assert_eq;

const RESOURCE: &str = "httproute/default/test";

#[test]
fn multiple_gateways_union_targets() {
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "one", vec![http_listener()], &["1.2.3.4"]))
        .with_gateway(mk_gateway("default", "two", vec![http_listener()], &["2.3.4.5"]))
        .with_route(mk_http_route(
            "default",
            "test",
            &["test.example.internal"],
            vec![parent_ref("default", "one"), parent_ref("default", "two")],
        ));

    assert_eq!(
        test.resolve(),
        vec![a_record(
            "test.example.internal",
            &["1.2.3.4", "2.3.4.5"],
            RESOURCE
        )]
    );
}

#[test]
fn wildcard_listeners_fan_out_to_route_hostnames() {
    let test = TestConfig::default()
        .with_gateway(mk_gateway(
            "default",
            "test",
            vec![
                mk_listener("foo", "HTTP", Some("foo.example.internal"), 80),
                mk_listener("bar", "HTTP", Some("bar.example.internal"), 80),
            ],
            &["1.2.3.4"],
        ))
        .with_route(mk_http_route(
            "default",
            "test",
            &["*.example.internal"],
            vec![parent_ref("default", "test")],
        ));

    assert_eq!(
        test.resolve(),
        vec![
            a_record("foo.example.internal", &["1.2.3.4"], RESOURCE),
            a_record("bar.example.internal", &["1.2.3.4"], RESOURCE),
        ]
    );
}

#[test]
fn section_name_selects_listener() {
    let mut parent = parent_ref("default", "test");
    parent.section_name = Some("foo".to_string());
    let test = TestConfig::default()
        .with_gateway(mk_gateway(
            "default",
            "test",
            vec![
                mk_listener("foo", "HTTP", Some("foo.example.internal"), 80),
                mk_listener("bar", "HTTP", Some("bar.example.internal"), 80),
            ],
            &["1.2.3.4"],
        ))
        .with_route(mk_http_route(
            "default",
            "test",
            &["*.example.internal"],
            vec![parent],
        ));

    assert_eq!(
        test.resolve(),
        vec![a_record("foo.example.internal", &["1.2.3.4"], RESOURCE)]
    );
}

#[test]
fn port_selects_listeners() {
    let mut parent = parent_ref("default", "test");
    parent.port = Some(80);
    let test = TestConfig::default()
        .with_gateway(mk_gateway(
            "default",
            "test",
            vec![
                mk_listener("foo", "HTTP", Some("foo.example.internal"), 80),
                mk_listener("bar", "HTTP", Some("bar.example.internal"), 80),
                mk_listener("qux", "HTTP", Some("qux.example.internal"), 8080),
            ],
            &["1.2.3.4"],
        ))
        .with_route(mk_http_route(
            "default",
            "test",
            &["*.example.internal"],
            vec![parent],
        ));

    assert_eq!(
        test.resolve(),
        vec![
            a_record("foo.example.internal", &["1.2.3.4"], RESOURCE),
            a_record("bar.example.internal", &["1.2.3.4"], RESOURCE),
        ]
    );
}

#[test]
fn wildcard_listener_keeps_specific_route_hostname() {
    let test = TestConfig::default()
        .with_gateway(mk_gateway(
            "default",
            "test",
            vec![mk_listener("http", "HTTP", Some("*.example.internal"), 80)],
            &["1.2.3.4"],
        ))
        .with_route(mk_http_route(
            "default",
            "test",
            &["test.example.internal"],
            vec![parent_ref("default", "test")],
        ));

    assert_eq!(
        test.resolve(),
        vec![a_record("test.example.internal", &["1.2.3.4"], RESOURCE)]
    );
}

#[test]
fn matching_wildcards_on_both_sides() {
    let test = TestConfig::default()
        .with_gateway(mk_gateway(
            "default",
            "test",
            vec![mk_listener("http", "HTTP", Some("*.example.internal"), 80)],
            &["1.2.3.4"],
        ))
        .with_route(mk_http_route(
            "default",
            "test",
            &["*.example.internal"],
            vec![parent_ref("default", "test")],
        ));

    assert_eq!(
        test.resolve(),
        vec![a_record("*.example.internal", &["1.2.3.4"], RESOURCE)]
    );
}

#[test]
fn route_without_hostnames_uses_listener_hostname() {
    let test = TestConfig::default()
        .with_gateway(mk_gateway(
            "default",
            "test",
            vec![mk_listener("http", "HTTP", Some("example.internal"), 80)],
            &["1.2.3.4"],
        ))
        .with_route(mk_http_route(
            "default",
            "test",
            &[],
            vec![parent_ref("default", "test")],
        ));

    assert_eq!(
        test.resolve(),
        vec![a_record("example.internal", &["1.2.3.4"], RESOURCE)]
    );
}

#[test]
fn no_gateways_resolve_nothing() {
    let test = TestConfig::default().with_route(mk_http_route(
        "default",
        "test",
        &["example.internal"],
        vec![parent_ref("default", "test")],
    ));

    assert_eq!(test.resolve(), vec![]);
}

#[test]
fn no_hostnames_resolve_nothing() {
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(mk_http_route(
            "default",
            "test",
            &[],
            vec![parent_ref("default", "test")],
        ));

    assert_eq!(test.resolve(), vec![]);
}

#[test]
fn hostname_annotation_adds_hostnames() {
    let mut route = mk_http_route(
        "default",
        "test",
        &["valid.example.internal"],
        vec![parent_ref("default", "test")],
    );
    route.metadata.annotations = mk_annotations(&[(
        "external-dns.alpha.kubernetes.io/hostname",
        "annotation.without-spec.internal, annotation.with-spec.internal",
    )]);
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(route);

    assert_eq!(
        test.resolve(),
        vec![
            a_record("valid.example.internal", &["1.2.3.4"], RESOURCE),
            a_record("annotation.without-spec.internal", &["1.2.3.4"], RESOURCE),
            a_record("annotation.with-spec.internal", &["1.2.3.4"], RESOURCE),
        ]
    );
}

#[test]
fn hostname_annotation_can_be_ignored() {
    let mut route = mk_http_route(
        "default",
        "test",
        &["valid.example.internal"],
        vec![parent_ref("default", "test")],
    );
    route.metadata.annotations = mk_annotations(&[(
        "external-dns.alpha.kubernetes.io/hostname",
        "annotation.example.internal",
    )]);
    let mut test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(route);
    test.resolver = Resolver::new(crate::DEFAULT_CONTROLLER, false);

    assert_eq!(
        test.resolve(),
        vec![a_record("valid.example.internal", &["1.2.3.4"], RESOURCE)]
    );
}

#[test]
fn route_ttl_annotation() {
    let mut valid = mk_http_route(
        "default",
        "valid-ttl",
        &["valid-ttl.internal"],
        vec![parent_ref("default", "test")],
    );
    valid.metadata.annotations =
        mk_annotations(&[("external-dns.alpha.kubernetes.io/ttl", "15s")]);
    let mut invalid = mk_http_route(
        "default",
        "invalid-ttl",
        &["invalid-ttl.internal"],
        vec![parent_ref("default", "test")],
    );
    invalid.metadata.annotations =
        mk_annotations(&[("external-dns.alpha.kubernetes.io/ttl", "abc")]);
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(valid)
        .with_route(invalid);

    assert_eq!(
        test.resolve(),
        vec![
            a_record(
                "valid-ttl.internal",
                &["1.2.3.4"],
                "httproute/default/valid-ttl"
            )
            .with_ttl(Ttl::from_secs(15)),
            a_record(
                "invalid-ttl.internal",
                &["1.2.3.4"],
                "httproute/default/invalid-ttl"
            ),
        ]
    );
}

#[test]
fn gateway_ttl_applies_unless_route_is_lower() {
    let mut gateway = mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]);
    gateway.metadata.annotations =
        mk_annotations(&[("external-dns.alpha.kubernetes.io/ttl", "15s")]);

    let route = |name: &str, ttl: Option<&str>| {
        let hostname = format!("{name}.internal");
        let mut route = mk_http_route(
            "default",
            name,
            &[hostname.as_str()],
            vec![parent_ref("default", "test")],
        );
        if let Some(ttl) = ttl {
            route.metadata.annotations =
                mk_annotations(&[("external-dns.alpha.kubernetes.io/ttl", ttl)]);
        }
        route
    };

    let test = TestConfig::default()
        .with_gateway(gateway)
        .with_route(route("no-ttl", None))
        .with_route(route("longer-ttl", Some("20s")))
        .with_route(route("shorter-ttl", Some("5s")));

    assert_eq!(
        test.resolve(),
        vec![
            a_record("no-ttl.internal", &["1.2.3.4"], "httproute/default/no-ttl")
                .with_ttl(Ttl::from_secs(15)),
            a_record(
                "longer-ttl.internal",
                &["1.2.3.4"],
                "httproute/default/longer-ttl"
            )
            .with_ttl(Ttl::from_secs(15)),
            a_record(
                "shorter-ttl.internal",
                &["1.2.3.4"],
                "httproute/default/shorter-ttl"
            )
            .with_ttl(Ttl::from_secs(5)),
        ]
    );
}

#[test]
fn route_provider_annotations() {
    let mut route = mk_http_route(
        "default",
        "test",
        &["test.example.internal"],
        vec![parent_ref("default", "test")],
    );
    route.metadata.annotations = mk_annotations(&[
        ("external-dns.alpha.kubernetes.io/alias", "true"),
        ("external-dns.alpha.kubernetes.io/set-identifier", "test-set-identifier"),
    ]);
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(route);

    assert_eq!(
        test.resolve(),
        vec![a_record("test.example.internal", &["1.2.3.4"], RESOURCE)
            .with_provider_specific("alias", "true")
            .with_set_identifier("test-set-identifier")]
    );
}

#[test]
fn gateway_provider_annotations_are_inherited() {
    let mut gateway = mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]);
    gateway.metadata.annotations = mk_annotations(&[
        ("external-dns.alpha.kubernetes.io/webhook-property", "gateway"),
        ("external-dns.alpha.kubernetes.io/set-identifier", "gateway-set"),
    ]);
    let plain = mk_http_route(
        "default",
        "plain",
        &["plain.example.internal"],
        vec![parent_ref("default", "test")],
    );
    let mut own = mk_http_route(
        "default",
        "own",
        &["own.example.internal"],
        vec![parent_ref("default", "test")],
    );
    own.metadata.annotations = mk_annotations(&[(
        "external-dns.alpha.kubernetes.io/webhook-property",
        "route",
    )]);
    let test = TestConfig::default()
        .with_gateway(gateway)
        .with_route(plain)
        .with_route(own);

    let endpoints = test.resolve();
    assert_eq!(
        endpoints,
        vec![
            a_record(
                "plain.example.internal",
                &["1.2.3.4"],
                "httproute/default/plain"
            )
            .with_provider_specific("webhook/property", "gateway")
            .with_set_identifier("gateway-set"),
            a_record(
                "own.example.internal",
                &["1.2.3.4"],
                "httproute/default/own"
            )
            .with_provider_specific("webhook/property", "route"),
        ]
    );
    assert_eq!(
        endpoints[0].provider_specific,
        btreemap! { "webhook/property".to_string() => "gateway".to_string() }
    );
}

#[test]
fn different_hostnames_on_different_gateways() {
    let test = TestConfig::default()
        .with_gateway(mk_gateway(
            "default",
            "one",
            vec![mk_listener("http", "HTTP", Some("*.one.internal"), 80)],
            &["1.2.3.4"],
        ))
        .with_gateway(mk_gateway(
            "default",
            "two",
            vec![mk_listener("http", "HTTP", Some("*.two.internal"), 80)],
            &["2.3.4.5"],
        ))
        .with_route(mk_http_route(
            "default",
            "test",
            &["test.one.internal", "test.two.internal"],
            vec![parent_ref("default", "one"), parent_ref("default", "two")],
        ));

    assert_eq!(
        test.resolve(),
        vec![
            a_record("test.one.internal", &["1.2.3.4"], RESOURCE),
            a_record("test.two.internal", &["2.3.4.5"], RESOURCE),
        ]
    );
}

#[test]
fn listener_defaults_to_same_namespace() {
    let test = TestConfig::default()
        .with_namespaces(vec![mk_namespace("default", &[]), mk_namespace("other", &[])])
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(mk_http_route(
            "default",
            "same",
            &["same.example.internal"],
            vec![parent_ref("default", "test")],
        ))
        .with_route(mk_http_route(
            "other",
            "other",
            &["other.example.internal"],
            vec![parent_ref("default", "test")],
        ));

    assert_eq!(
        test.resolve(),
        vec![a_record(
            "same.example.internal",
            &["1.2.3.4"],
            "httproute/default/same"
        )]
    );
}

#[test]
fn listener_allows_all_namespaces() {
    let mut listener = http_listener();
    listener.allowed_routes = allow_from(FromNamespaces::All, None);
    let test = TestConfig::default()
        .with_namespaces(vec![mk_namespace("default", &[]), mk_namespace("other", &[])])
        .with_gateway(mk_gateway("default", "test", vec![listener], &["1.2.3.4"]))
        .with_route(mk_http_route(
            "other",
            "other",
            &["other.example.internal"],
            vec![parent_ref("default", "test")],
        ));

    assert_eq!(
        test.resolve(),
        vec![a_record(
            "other.example.internal",
            &["1.2.3.4"],
            "httproute/other/other"
        )]
    );
}

#[test]
fn listener_selects_namespaces_by_label() {
    let mut listener = http_listener();
    listener.allowed_routes =
        allow_from(FromNamespaces::Selector, match_labels(&[("team", "foo")]));
    let test = TestConfig::default()
        .with_namespaces(vec![
            mk_namespace("default", &[]),
            mk_namespace("foo", &[("team", "foo")]),
            mk_namespace("bar", &[("team", "bar")]),
        ])
        .with_gateway(mk_gateway("default", "test", vec![listener], &["1.2.3.4"]))
        .with_route(mk_http_route(
            "foo",
            "test",
            &["foo.example.internal"],
            vec![parent_ref("default", "test")],
        ))
        .with_route(mk_http_route(
            "bar",
            "test",
            &["bar.example.internal"],
            vec![parent_ref("default", "test")],
        ));

    assert_eq!(
        test.resolve(),
        vec![a_record(
            "foo.example.internal",
            &["1.2.3.4"],
            "httproute/foo/test"
        )]
    );
}

#[test]
fn unknown_route_namespace_is_not_selected() {
    let mut listener = http_listener();
    listener.allowed_routes =
        allow_from(FromNamespaces::Selector, match_labels(&[("team", "foo")]));
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![listener], &["1.2.3.4"]))
        .with_route(mk_http_route(
            "missing",
            "test",
            &["test.example.internal"],
            vec![parent_ref("default", "test")],
        ));

    assert_eq!(test.resolve(), vec![]);
}

#[test]
fn invalid_namespace_selector_fails_resolution() {
    let mut listener = http_listener();
    listener.allowed_routes = allow_from(FromNamespaces::Selector, None);
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![listener], &["1.2.3.4"]))
        .with_route(mk_http_route(
            "default",
            "test",
            &["test.example.internal"],
            vec![parent_ref("default", "test")],
        ));

    assert!(matches!(test.try_resolve(), Err(ResolveError::Gateway(_))));
}

#[test]
fn target_annotation_overrides_addresses() {
    let mut gateway = mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]);
    gateway.metadata.annotations =
        mk_annotations(&[("external-dns.alpha.kubernetes.io/target", "4.3.2.1")]);
    let test = TestConfig::default()
        .with_gateway(gateway)
        .with_route(mk_http_route(
            "default",
            "test",
            &["test.example.internal"],
            vec![parent_ref("default", "test")],
        ));

    assert_eq!(
        test.resolve(),
        vec![a_record("test.example.internal", &["4.3.2.1"], RESOURCE)]
    );
}

#[test]
fn one_gateway_overrides_targets() {
    let mut overridden = mk_gateway("default", "one", vec![http_listener()], &["1.2.3.4"]);
    overridden.metadata.annotations =
        mk_annotations(&[("external-dns.alpha.kubernetes.io/target", "4.3.2.1")]);
    let test = TestConfig::default()
        .with_gateway(overridden)
        .with_gateway(mk_gateway("default", "two", vec![http_listener()], &["2.3.4.5"]))
        .with_route(mk_http_route(
            "default",
            "test",
            &["test.example.internal"],
            vec![parent_ref("default", "one"), parent_ref("default", "two")],
        ));

    assert_eq!(
        test.resolve(),
        vec![a_record(
            "test.example.internal",
            &["4.3.2.1", "2.3.4.5"],
            RESOURCE
        )]
    );
}

#[test]
fn multiple_gateways_and_routes() {
    let test = TestConfig::default()
        .with_gateway(mk_gateway(
            "default",
            "one",
            vec![mk_listener("http", "HTTP", Some("*.one.internal"), 80)],
            &["1.2.3.4"],
        ))
        .with_gateway(mk_gateway(
            "default",
            "two",
            vec![mk_listener("http", "HTTP", Some("*.two.internal"), 80)],
            &["2.3.4.5"],
        ))
        .with_route(mk_http_route(
            "default",
            "one",
            &["test.one.internal"],
            vec![parent_ref("default", "one")],
        ))
        .with_route(mk_http_route(
            "default",
            "two",
            &["test.two.internal", "test.one.internal"],
            vec![parent_ref("default", "one"), parent_ref("default", "two")],
        ));

    assert_eq!(
        test.resolve(),
        vec![
            a_record("test.one.internal", &["1.2.3.4"], "httproute/default/one"),
            a_record("test.two.internal", &["2.3.4.5"], "httproute/default/two"),
        ]
    );
}

#[test]
fn stale_acceptance_is_ignored() {
    let parents = vec![parent_ref("default", "test")];
    let mut route = mk_http_route("default", "test", &["test.example.internal"], parents.clone());
    route.metadata.generation = Some(2);
    route.status = Some(accepted_by(&parents, Some(5)));
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(route);

    assert_eq!(test.resolve(), vec![]);
}

#[test]
fn current_acceptance_is_honored() {
    let parents = vec![parent_ref("default", "test")];
    let mut route = mk_http_route("default", "test", &["test.example.internal"], parents.clone());
    route.metadata.generation = Some(2);
    route.status = Some(accepted_by(&parents, Some(2)));
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(route);

    assert_eq!(
        test.resolve(),
        vec![a_record("test.example.internal", &["1.2.3.4"], RESOURCE)]
    );
}

#[test]
fn routes_for_other_controllers_are_skipped() {
    let mut route = mk_http_route(
        "default",
        "test",
        &["test.example.internal"],
        vec![parent_ref("default", "test")],
    );
    route.metadata.annotations =
        mk_annotations(&[("external-dns.alpha.kubernetes.io/controller", "something-else")]);
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(route);

    assert_eq!(test.resolve(), vec![]);
}

#[test]
fn mixed_address_families() {
    let test = TestConfig::default()
        .with_gateway(mk_gateway(
            "default",
            "test",
            vec![http_listener()],
            &["1.2.3.4", "2001:db8::1", "lb.example.internal."],
        ))
        .with_route(mk_http_route(
            "default",
            "test",
            &["test.example.internal"],
            vec![parent_ref("default", "test")],
        ));

    assert_eq!(
        test.resolve(),
        vec![
            a_record("test.example.internal", &["1.2.3.4"], RESOURCE),
            mk_endpoint(
                "test.example.internal",
                RecordType::Aaaa,
                &["2001:db8::1"],
                RESOURCE
            ),
            mk_endpoint(
                "test.example.internal",
                RecordType::Cname,
                &["lb.example.internal"],
                RESOURCE
            ),
        ]
    );
}

#[test]
fn route_without_accepted_status_is_ignored() {
    let mut route = mk_http_route(
        "default",
        "test",
        &["test.example.internal"],
        vec![parent_ref("default", "test")],
    );
    route.status = None;
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(route);

    assert_eq!(test.resolve(), vec![]);
}

#[test]
fn overflowing_ttl_annotation_is_ignored() {
    let mut route = mk_http_route(
        "default",
        "test",
        &["test.example.internal"],
        vec![parent_ref("default", "test")],
    );
    route.metadata.annotations = mk_annotations(&[(
        "external-dns.alpha.kubernetes.io/ttl",
        "99999999999999999999h",
    )]);
    let test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(route);

    let endpoints = test.resolve();
    assert_eq!(
        endpoints,
        vec![a_record("test.example.internal", &["1.2.3.4"], RESOURCE)]
    );
    assert_eq!(endpoints[0].ttl, Ttl::default());
}

#[test]
fn fully_qualified_annotation_hostname_matches_wildcard_listener() {
    let mut route = mk_http_route(
        "default",
        "test",
        &[],
        vec![parent_ref("default", "test")],
    );
    route.metadata.annotations = mk_annotations(&[(
        "external-dns.alpha.kubernetes.io/hostname",
        "foo.example.internal.",
    )]);
    let test = TestConfig::default()
        .with_gateway(mk_gateway(
            "default",
            "test",
            vec![mk_listener("http", "HTTP", Some("*.example.internal"), 80)],
            &["1.2.3.4"],
        ))
        .with_route(route);

    assert_eq!(
        test.resolve(),
        vec![a_record("foo.example.internal", &["1.2.3.4"], RESOURCE)]
    );
}

#[test]
fn gateway_namespace_filter() {
    let mut listener = http_listener();
    listener.allowed_routes = allow_from(FromNamespaces::All, None);
    let mut test = TestConfig::default()
        .with_namespaces(vec![
            mk_namespace("gateway-namespace", &[]),
            mk_namespace("not-gateway-namespace", &[]),
            mk_namespace("route-namespace", &[]),
        ])
        .with_gateway(mk_gateway(
            "gateway-namespace",
            "test",
            vec![listener.clone()],
            &["1.2.3.4"],
        ))
        .with_gateway(mk_gateway(
            "not-gateway-namespace",
            "test",
            vec![listener],
            &["2.3.4.5"],
        ))
        .with_route(mk_http_route(
            "route-namespace",
            "test",
            &["test.example.internal"],
            vec![
                parent_ref("gateway-namespace", "test"),
                parent_ref("not-gateway-namespace", "test"),
            ],
        ));
    test.resolver = Resolver::default().with_gateway_namespace("gateway-namespace");

    assert_eq!(
        test.resolve(),
        vec![a_record(
            "test.example.internal",
            &["1.2.3.4"],
            "httproute/route-namespace/test"
        )]
    );
}

#[test]
fn route_namespace_filter() {
    let mut listener = http_listener();
    listener.allowed_routes = allow_from(FromNamespaces::All, None);
    let mut test = TestConfig::default()
        .with_namespaces(vec![
            mk_namespace("default", &[]),
            mk_namespace("route-namespace", &[]),
            mk_namespace("not-route-namespace", &[]),
        ])
        .with_gateway(mk_gateway("default", "test", vec![listener], &["1.2.3.4"]))
        .with_route(mk_http_route(
            "route-namespace",
            "test",
            &["route-namespace.example.internal"],
            vec![parent_ref("default", "test")],
        ))
        .with_route(mk_http_route(
            "not-route-namespace",
            "test",
            &["not-route-namespace.example.internal"],
            vec![parent_ref("default", "test")],
        ));
    test.resolver = Resolver::default().with_namespace("route-namespace");

    assert_eq!(
        test.resolve(),
        vec![a_record(
            "route-namespace.example.internal",
            &["1.2.3.4"],
            "httproute/route-namespace/test"
        )]
    );
}

#[test]
fn gateway_label_filter() {
    let labelled = |name: &str, value: &str, address: &str| {
        let mut gateway = mk_gateway("default", name, vec![http_listener()], &[address]);
        gateway.metadata.labels = Some(btreemap! { "foo".to_string() => value.to_string() });
        gateway
    };
    let mut test = TestConfig::default()
        .with_gateway(labelled("labels-match", "bar", "1.2.3.4"))
        .with_gateway(labelled("labels-dont-match", "qux", "2.3.4.5"))
        .with_route(mk_http_route(
            "default",
            "test",
            &["test.example.internal"],
            vec![
                parent_ref("default", "labels-match"),
                parent_ref("default", "labels-dont-match"),
            ],
        ));
    let selector = "foo=bar".parse::<Selector>().expect("selector must parse");
    test.resolver = Resolver::default().with_gateway_label_filter(selector);

    assert_eq!(
        test.resolve(),
        vec![a_record("test.example.internal", &["1.2.3.4"], RESOURCE)]
    );
}

#[test]
fn route_label_filter() {
    let labelled = |name: &str, value: &str| {
        let hostname = format!("{name}.example.internal");
        let mut route = mk_http_route(
            "default",
            name,
            &[hostname.as_str()],
            vec![parent_ref("default", "test")],
        );
        route.metadata.labels = Some(btreemap! { "foo".to_string() => value.to_string() });
        route
    };
    let mut test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(labelled("labels-match", "bar"))
        .with_route(labelled("labels-dont-match", "qux"));
    let selector = "foo=bar".parse::<Selector>().expect("selector must parse");
    test.resolver = Resolver::default().with_label_filter(selector);

    assert_eq!(
        test.resolve(),
        vec![a_record(
            "labels-match.example.internal",
            &["1.2.3.4"],
            "httproute/default/labels-match"
        )]
    );
}

#[test]
fn route_annotation_filter() {
    let annotated = |name: &str, value: &str| {
        let hostname = format!("{name}.example.internal");
        let mut route = mk_http_route(
            "default",
            name,
            &[hostname.as_str()],
            vec![parent_ref("default", "test")],
        );
        route.metadata.annotations = mk_annotations(&[("foo", value)]);
        route
    };
    let mut test = TestConfig::default()
        .with_gateway(mk_gateway("default", "test", vec![http_listener()], &["1.2.3.4"]))
        .with_route(annotated("annotations-match", "bar"))
        .with_route(annotated("annotations-dont-match", "qux"));
    let selector = "foo=bar".parse::<Selector>().expect("selector must parse");
    test.resolver = Resolver::default().with_annotation_filter(selector);

    assert_eq!(
        test.resolve(),
        vec![a_record(
            "annotations-match.example.internal",
            &["1.2.3.4"],
            "httproute/default/annotations-match"
        )]
    );
}
