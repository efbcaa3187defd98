use super::*;
use crate::dialect::{DialectDescriptor, PlaceholderStyle, QuoteRules};

const GROUPED: &str = "SELECT round(temperature, :floatNumber), count(*) AS \"count\" \
                       FROM \"weather\" \"Weather\" GROUP BY round(temperature, :floatNumber)";

fn float_params() -> Params<f64> {
    Params::new().set("floatNumber", 2.4)
}

#[test]
fn shared_parameter_postgres_and_cockroach() {
    let params = float_params();
    for dialect in [Dialect::Postgres, Dialect::CockroachDb] {
        let out = render(GROUPED, &params, dialect).unwrap();
        assert_eq!(
            out.sql(),
            "SELECT round(temperature, $1), count(*) AS \"count\" FROM \"weather\" \"Weather\" GROUP BY round(temperature, $1)"
        );
        assert_eq!(out.values(), &[&2.4]);
    }
}

#[test]
fn shared_parameter_spanner() {
    let params = float_params();
    let out = render(GROUPED, &params, Dialect::Spanner).unwrap();
    assert_eq!(
        out.sql(),
        "SELECT round(temperature, @param1), count(*) AS \"count\" FROM \"weather\" \"Weather\" GROUP BY round(temperature, @param1)"
    );
    assert_eq!(out.param_count(), 1);
}

#[test]
fn shared_parameter_oracle() {
    let params = float_params();
    let out = render(GROUPED, &params, Dialect::Oracle).unwrap();
    assert_eq!(
        out.sql(),
        "SELECT round(temperature, :1), count(*) AS \"count\" FROM \"weather\" \"Weather\" GROUP BY round(temperature, :1)"
    );
    assert_eq!(out.param_count(), 1);
}

#[test]
fn shared_parameter_sqlserver() {
    let params = float_params();
    let out = render(GROUPED, &params, Dialect::SqlServer).unwrap();
    assert_eq!(
        out.sql(),
        "SELECT round(temperature, @1), count(*) AS \"count\" FROM \"weather\" \"Weather\" GROUP BY round(temperature, @1)"
    );
    assert_eq!(out.param_count(), 1);
    assert_eq!(out.placeholders, 2);
}

#[test]
fn repeated_name_binds_once_for_any_count() {
    let params: Params<i32> = Params::new().set("k", 7);
    for k in 1..=6 {
        let template = vec!["x = :k"; k].join(" OR ");
        let out = render(&template, &params, Dialect::Postgres).unwrap();
        assert_eq!(out.sql(), vec!["x = $1"; k].join(" OR "));
        assert_eq!(out.values(), &[&7]);
    }
}

#[test]
fn slots_follow_first_occurrence_not_map_order() {
    let params: Params<&str> = Params::new().set("a", "A").set("b", "B").set("c", "C");

    let out = render("WHERE c = :c AND a = :a AND c2 = :c AND b = :b", &params, Dialect::Postgres)
        .unwrap();
    assert_eq!(out.sql(), "WHERE c = $1 AND a = $2 AND c2 = $1 AND b = $3");
    assert_eq!(out.values(), &[&"C", &"A", &"B"]);

    let out = render("WHERE b = :b AND a = :a AND c = :c", &params, Dialect::Postgres).unwrap();
    assert_eq!(out.sql(), "WHERE b = $1 AND a = $2 AND c = $3");
    assert_eq!(out.values(), &[&"B", &"A", &"C"]);
}

#[test]
fn undeclared_extra_params_are_not_bound() {
    let params: Params<i32> = Params::new().set("used", 1).set("unused", 2);
    let out = render("a = :used", &params, Dialect::Postgres).unwrap();
    assert_eq!(out.values(), &[&1]);
}

#[test]
fn references_in_literals_are_untouched() {
    let params: Params<i32> = Params::new().set("x", 1);
    let out = render(
        "SELECT ':x', \"a:x\" FROM t WHERE v = :x -- :x\n",
        &params,
        Dialect::Postgres,
    )
    .unwrap();
    assert_eq!(out.sql(), "SELECT ':x', \"a:x\" FROM t WHERE v = $1 -- :x\n");
    assert_eq!(out.param_count(), 1);
}

#[test]
fn literal_only_reference_allocates_nothing() {
    let params: Params<i32> = Params::new();
    let out = render("SELECT ':missing'", &params, Dialect::Oracle).unwrap();
    assert_eq!(out.sql(), "SELECT ':missing'");
    assert!(out.values().is_empty());
}

#[test]
fn list_expands_to_comma_joined_placeholders() {
    let params: Params<i64> = Params::new().set("status", 0).set_list("ids", [10, 20, 30]);
    let out = render(
        "SELECT * FROM t WHERE status = :status AND id IN (:ids)",
        &params,
        Dialect::Postgres,
    )
    .unwrap();
    assert_eq!(out.sql(), "SELECT * FROM t WHERE status = $1 AND id IN ($2, $3, $4)");
    assert_eq!(out.values(), &[&0, &10, &20, &30]);
}

#[test]
fn list_referenced_twice_is_not_renumbered() {
    let params: Params<i64> = Params::new().set_list("ids", [1, 2, 3]).set("n", 9);
    let out = render(
        "a IN (:ids) AND b = :n AND c IN (:ids)",
        &params,
        Dialect::SqlServer,
    )
    .unwrap();
    assert_eq!(out.sql(), "a IN (@1, @2, @3) AND b = @4 AND c IN (@1, @2, @3)");
    assert_eq!(out.values(), &[&1, &2, &3, &9]);
}

#[test]
fn empty_list_renders_null_by_default() {
    let params: Params<i64> = Params::new().set_list("ids", Vec::<i64>::new()).set("x", 1);
    let out = render("id IN (:ids) AND x = :x", &params, Dialect::Postgres).unwrap();
    assert_eq!(out.sql(), "id IN (NULL) AND x = $1");
    assert_eq!(out.values(), &[&1]);
}

#[test]
fn empty_list_can_be_rejected() {
    let params: Params<i64> = Params::new().set_list("ids", Vec::<i64>::new());
    let renderer = Renderer::new(Dialect::Postgres)
        .with_config(RenderConfig::new().with_empty_list_policy(EmptyListPolicy::Reject));
    let err = renderer.render("id IN (:ids)", &params).unwrap_err();
    assert_eq!(err, RenderError::EmptyList("ids".to_string()));
}

#[test]
fn marker_dialects_bind_per_occurrence() {
    let params: Params<&str> = Params::new().set("a", "A").set("b", "B");
    for dialect in [Dialect::MySql, Dialect::Sqlite] {
        let out = render("x = :a AND y = :b AND z = :a", &params, dialect).unwrap();
        assert_eq!(out.sql(), "x = ? AND y = ? AND z = ?");
        assert_eq!(out.values(), &[&"A", &"B", &"A"]);
    }
}

#[test]
fn marker_dialects_repeat_lists_per_occurrence() {
    let params: Params<i32> = Params::new().set_list("ids", [1, 2]);
    let out = render("a IN (:ids) OR b IN (:ids)", &params, Dialect::MySql).unwrap();
    assert_eq!(out.sql(), "a IN (?, ?) OR b IN (?, ?)");
    assert_eq!(out.values(), &[&1, &2, &1, &2]);
}

#[test]
fn unknown_parameter_aborts() {
    let params: Params<i32> = Params::new().set("a", 1);
    let err = render("a = :a AND b = :b", &params, Dialect::Postgres).unwrap_err();
    assert_eq!(err, RenderError::UnknownParameter("b".to_string()));
    assert_eq!(err.parameter_name(), Some("b"));
}

#[test]
fn names_are_case_sensitive() {
    let params: Params<i32> = Params::new().set("userId", 1);
    assert!(render("id = :userid", &params, Dialect::Postgres).is_err());
}

#[test]
fn malformed_literal_aborts() {
    let params: Params<i32> = Params::new().set("a", 1);
    let err = render("a = :a AND b = 'open", &params, Dialect::Postgres).unwrap_err();
    assert_eq!(err, RenderError::MalformedLiteral { position: 15 });
}

#[test]
fn postgres_cast_after_reference() {
    let params: Params<&str> = Params::new().set("v", "2024-01-01");
    let out = render("SELECT :v::date, now()::text", &params, Dialect::Postgres).unwrap();
    assert_eq!(out.sql(), "SELECT $1::date, now()::text");
}

#[test]
fn rendering_is_idempotent() {
    let params: Params<i64> = Params::new().set("a", 1).set_list("ids", [4, 5]).set("b", 2);
    let template = "SELECT :a, :b FROM t WHERE id IN (:ids) GROUP BY :a";
    let renderer = Renderer::new(Dialect::Spanner);
    let first = renderer.render(template, &params).unwrap();
    let second = renderer.render(template, &params).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.sql(),
        "SELECT @param1, @param2 FROM t WHERE id IN (@param3, @param4) GROUP BY @param1"
    );
}

#[test]
fn max_params_limit() {
    let params: Params<i64> = Params::new().set_list("ids", [1, 2, 3]);
    let renderer =
        Renderer::new(Dialect::Postgres).with_config(RenderConfig::new().with_max_params(2));
    let err = renderer.render("id IN (:ids)", &params).unwrap_err();
    assert_eq!(err, RenderError::TooManyParameters { limit: 2, count: 3 });

    let renderer =
        Renderer::new(Dialect::Postgres).with_config(RenderConfig::new().with_max_params(3));
    assert!(renderer.render("id IN (:ids)", &params).is_ok());
}

#[test]
fn custom_descriptor_with_at_sigil() {
    let dialect = DialectDescriptor::new("custom", PlaceholderStyle::Dollar, QuoteRules::ANSI)
        .with_sigil(b'@');
    let params: Params<i32> = Params::new().set("id", 5);
    let out = render("WHERE id = @id AND note = '@id'", &params, &dialect).unwrap();
    assert_eq!(out.sql(), "WHERE id = $1 AND note = '@id'");
}

#[test]
fn independent_renders_share_nothing() {
    let template = "a = :x AND b = :y";
    let p1: Params<i32> = Params::new().set("x", 1).set("y", 2);
    let p2: Params<i32> = Params::new().set("x", 3).set("y", 4);
    let renderer = Renderer::new(Dialect::Oracle);

    let handles: Vec<_> = [p1, p2]
        .into_iter()
        .map(|params| {
            let renderer = renderer.clone();
            std::thread::spawn(move || {
                let out = renderer.render(template, &params).unwrap();
                (out.sql, out.values.into_iter().copied().collect::<Vec<_>>())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results[0], ("a = :1 AND b = :2".to_string(), vec![1, 2]));
    assert_eq!(results[1], ("a = :1 AND b = :2".to_string(), vec![3, 4]));
}

#[test]
fn into_parts_returns_sql_and_values() {
    let params: Params<i32> = Params::new().set("a", 1);
    let (sql, values) = render("v = :a", &params, Dialect::SqlServer)
        .unwrap()
        .into_parts();
    assert_eq!(sql, "v = @1");
    assert_eq!(values, vec![&1]);
}

#[cfg(feature = "tracing")]
#[test]
fn log_truncation_respects_char_boundaries() {
    assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
    assert_eq!(truncate_sql_bytes("SELECT 1", 6), "SELECT");
    // 'é' is two bytes starting at offset 1.
    assert_eq!(truncate_sql_bytes("aé", 2), "a");
}

#[test]
fn spanner_triple_quoted_string_is_not_bound() {
    let params: Params<i32> = Params::new().set("x", 1);
    let out = render("SELECT '''a ':x' b''' AS s", &params, Dialect::Spanner).unwrap();
    assert_eq!(out.sql(), "SELECT '''a ':x' b''' AS s");
    assert!(out.values().is_empty());

    let out = render("SELECT '''it's :x''' AS s, :x", &params, Dialect::Spanner).unwrap();
    assert_eq!(out.sql(), "SELECT '''it's :x''' AS s, @param1");
    assert_eq!(out.values(), &[&1]);
}

#[test]
fn spanner_backslash_escaped_quote_stays_in_string() {
    let params: Params<i32> = Params::new().set("x", 1);
    let out = render(r"SELECT 'it\'s :x', :x", &params, Dialect::Spanner).unwrap();
    assert_eq!(out.sql(), r"SELECT 'it\'s :x', @param1");
    assert_eq!(out.param_count(), 1);
}

#[test]
fn oracle_alternative_quoting() {
    let params: Params<i32> = Params::new().set("x", 1);
    let out = render(
        "SELECT q'[it's :x]' FROM dual WHERE a = :x",
        &params,
        Dialect::Oracle,
    )
    .unwrap();
    assert_eq!(out.sql(), "SELECT q'[it's :x]' FROM dual WHERE a = :1");
    assert_eq!(out.values(), &[&1]);
}
